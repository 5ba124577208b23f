//! Batched fixes
//!
//! A fixer receives every diagnostic one rule produced for a document and
//! returns the next version of the document in a single step.
//!
//! [`write_fixed`] persists the result, or renders it as a unified diff in
//! dry-run mode.

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostic;
use crate::document::Document;
use crate::error::QuillError;
use crate::Result;

/// Produces one combined edit for all diagnostics of a rule
pub trait BatchFixer: Send + Sync {
    /// Id of the rule whose diagnostics this fixer consumes
    fn rule_id(&self) -> &'static str;

    /// Fix every diagnostic in `diagnostics` that this fixer can handle
    ///
    /// Diagnostics from other rules, or spans that no longer resolve, are
    /// skipped. With nothing to fix the input document is returned as is.
    fn fix(&self, document: &Document, diagnostics: &[Diagnostic]) -> Result<FixOutcome>;
}

/// The next document version plus the diagnostics it addressed
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub document: Document,
    pub fixed: Vec<Diagnostic>,
}

impl FixOutcome {
    pub fn unchanged(document: &Document) -> Self {
        Self {
            document: document.clone(),
            fixed: Vec::new(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.fixed.is_empty()
    }
}

/// Configuration for fix application
#[derive(Debug, Clone, Default)]
pub struct FixConfig {
    /// Whether to run in dry-run mode (don't modify files)
    pub dry_run: bool,
}

impl FixConfig {
    /// Create a config for dry-run preview
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Result of applying fixes to a file
#[derive(Debug, Clone)]
pub struct FixResult {
    /// Path to the file that was modified
    pub file: PathBuf,
    /// Number of diagnostics addressed
    pub applied_count: usize,
    /// Whether the file on disk was rewritten
    pub written: bool,
    /// Unified diff of the change (dry-run mode only)
    pub diff: Option<String>,
}

/// Persist `fixed` over the file it was loaded from, or describe the change in dry-run mode
pub fn write_fixed(
    original: &Document,
    fixed: &Document,
    applied_count: usize,
    config: &FixConfig,
) -> Result<FixResult> {
    let path = original.path();
    let changed = original.source() != fixed.source();

    if config.dry_run {
        let diff = changed.then(|| generate_unified_diff(original.source(), fixed.source(), path));
        return Ok(FixResult {
            file: path.to_path_buf(),
            applied_count,
            written: false,
            diff,
        });
    }

    if changed {
        fs::write(path, fixed.source()).map_err(|e| QuillError::io_error(path, e))?;
        tracing::info!(
            "Applied {} fix(es) to {}",
            applied_count,
            path.display()
        );
    }

    Ok(FixResult {
        file: path.to_path_buf(),
        applied_count,
        written: changed,
        diff: None,
    })
}

/// Generate a plain unified diff between original and modified content
pub fn generate_unified_diff(original: &str, modified: &str, file_path: &Path) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(original, modified);
    let mut output = format!(
        "--- {}\n+++ {} (fixed)\n",
        file_path.display(),
        file_path.display()
    );

    for group in diff.grouped_ops(3) {
        let Some(first) = group.first() else {
            continue;
        };
        let old_len: usize = group.iter().map(|op| op.old_range().len()).sum();
        let new_len: usize = group.iter().map(|op| op.new_range().len()).sum();
        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            first.old_range().start + 1,
            old_len,
            first.new_range().start + 1,
            new_len
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                output.push(sign);
                output.push_str(change.value());
                if !change.value().ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.cs");
        fs::write(&path, "x;  \ny;\n").unwrap();

        let original = Document::load(&path).unwrap();
        let fixed = original.with_text("x;\ny;\n");
        let result = write_fixed(&original, &fixed, 1, &FixConfig::dry_run()).unwrap();

        assert!(!result.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "x;  \ny;\n");
        let diff = result.diff.unwrap();
        assert!(diff.contains("-x;  \n"));
        assert!(diff.contains("+x;\n"));
    }

    #[test]
    fn write_persists_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.cs");
        fs::write(&path, "#region R\nz;\n").unwrap();

        let original = Document::load(&path).unwrap();
        let fixed = original.with_text("z;\n");
        let result = write_fixed(&original, &fixed, 1, &FixConfig::default()).unwrap();

        assert!(result.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "z;\n");
    }

    #[test]
    fn unchanged_documents_are_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.cs");
        fs::write(&path, "ok;\n").unwrap();

        let original = Document::load(&path).unwrap();
        let result = write_fixed(&original, &original, 0, &FixConfig::default()).unwrap();
        assert!(!result.written);
        assert!(result.diff.is_none());
    }
}
