//! Batched removal of `#region` groups
//!
//! All diagnostics of one rule are resolved against the current tree, each
//! marker is widened to its balanced group and the groups nested inside it,
//! and every group is removed in a single rebuild of the tree.

use std::collections::BTreeMap;

use quill_core::cst::{
    DirectiveGroups, DirectiveMarker, QuillSyntaxKind, QuillSyntaxNode, QuillSyntaxToken,
    is_missing, remove_tokens,
};
use quill_core::{BatchFixer, Diagnostic, Document, FixOutcome, Result};
use rowan::{TextRange, TextSize};
use tracing::debug;

/// Removes the region groups reported by one rule
#[derive(Debug, Clone)]
pub struct DirectiveRemoval {
    rule_id: &'static str,
}

impl DirectiveRemoval {
    pub fn new(rule_id: &'static str) -> Self {
        Self { rule_id }
    }
}

impl BatchFixer for DirectiveRemoval {
    fn rule_id(&self) -> &'static str {
        self.rule_id
    }

    fn fix(&self, document: &Document, diagnostics: &[Diagnostic]) -> Result<FixOutcome> {
        let root = document.root();
        let groups = DirectiveGroups::new(root);

        // Keyed by span so overlapping groups collapse.
        let mut doomed: BTreeMap<(TextSize, TextSize), &DirectiveMarker> = BTreeMap::new();
        let mut fixed = Vec::new();

        for diagnostic in diagnostics.iter().filter(|d| d.rule_id == self.rule_id) {
            let Some(token) = resolve_directive(root, diagnostic.range) else {
                debug!(
                    "Skipping {} diagnostic at {:?}: no directive there",
                    diagnostic.rule_id, diagnostic.range
                );
                continue;
            };
            let Some(marker) = groups.marker_at(token.text_range()) else {
                continue;
            };
            if !marker.kind.is_region_marker() {
                debug!("Skipping non-region directive `{}`", token.text());
                continue;
            }
            for related in groups.with_nested(marker) {
                let range = related.range();
                doomed.entry((range.start(), range.end())).or_insert(related);
            }
            fixed.push(diagnostic.clone());
        }

        if doomed.is_empty() {
            return Ok(FixOutcome::unchanged(document));
        }

        let removed: Vec<TextRange> = doomed
            .values()
            .flat_map(|marker| line_tokens(&marker.token))
            .collect();
        debug!(
            "Removing {} directive lines from {}",
            doomed.len(),
            document.path().display()
        );

        let edited = remove_tokens(root, &removed);
        Ok(FixOutcome {
            document: document.with_root(edited),
            fixed,
        })
    }
}

/// The directive token covering `range` in `root`, if any
fn resolve_directive(root: &QuillSyntaxNode, range: TextRange) -> Option<QuillSyntaxToken> {
    if range.is_empty() || !root.text_range().contains_range(range) {
        return None;
    }
    let token = root.covering_element(range).into_token()?;
    (token.kind() == QuillSyntaxKind::Directive && !is_missing(&token)).then_some(token)
}

/// The directive token plus its indentation and its line break
fn line_tokens(directive: &QuillSyntaxToken) -> Vec<TextRange> {
    let mut ranges = vec![directive.text_range()];

    if let Some(indent) = directive.prev_token()
        && indent.kind() == QuillSyntaxKind::Whitespace
        && indent
            .prev_token()
            .is_none_or(|before| before.kind() == QuillSyntaxKind::Newline)
    {
        ranges.push(indent.text_range());
    }

    if let Some(line_break) = directive.next_token()
        && line_break.kind() == QuillSyntaxKind::Newline
    {
        ranges.push(line_break.text_range());
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Severity;

    const RULE: &str = "readability/no-regions";

    fn diagnostic_at(source: &str, needle: &str) -> Diagnostic {
        let start = source.find(needle).unwrap();
        Diagnostic::new(
            RULE,
            Severity::Warning,
            "Regions are not allowed",
            TextRange::at(TextSize::from(start as u32), TextSize::of(needle)),
        )
    }

    fn fix(source: &str, diagnostics: &[Diagnostic]) -> FixOutcome {
        let document = Document::parse("test.cs", source);
        DirectiveRemoval::new(RULE)
            .fix(&document, diagnostics)
            .unwrap()
    }

    #[test]
    fn removes_the_whole_group_with_indentation() {
        let source = "class C\n{\n    #region Fields\n    int x;\n    #endregion\n}\n";
        let outcome = fix(source, &[diagnostic_at(source, "#region Fields")]);
        assert_eq!(outcome.document.source(), "class C\n{\n    int x;\n}\n");
        assert_eq!(outcome.fixed.len(), 1);
    }

    #[test]
    fn nested_groups_are_removed_once() {
        let source = "#region Outer\na();\n#region Inner\nb();\n#endregion\n#endregion\n";
        let diagnostics = [
            diagnostic_at(source, "#region Outer"),
            diagnostic_at(source, "#region Inner"),
        ];
        let outcome = fix(source, &diagnostics);
        assert_eq!(outcome.document.source(), "a();\nb();\n");
        assert_eq!(outcome.fixed.len(), 2);
        assert!(DirectiveGroups::new(outcome.document.root()).is_empty());
    }

    #[test]
    fn outer_region_takes_nested_groups_with_it() {
        let source = "#region Outer\nx;\n#region Inner\ny;\n#endregion\n#endregion\n";
        let outcome = fix(source, &[diagnostic_at(source, "#region Outer")]);
        assert_eq!(outcome.document.source(), "x;\ny;\n");
        assert_eq!(outcome.fixed.len(), 1);
        assert!(DirectiveGroups::new(outcome.document.root()).is_empty());
    }

    #[test]
    fn inner_region_leaves_outer_group() {
        let source = "#region Outer\nx;\n#region Inner\ny;\n#endregion\n#endregion\n";
        let outcome = fix(source, &[diagnostic_at(source, "#region Inner")]);
        assert_eq!(outcome.document.source(), "#region Outer\nx;\ny;\n#endregion\n");
    }

    #[test]
    fn words_around_removed_lines_stay_apart() {
        let source = "int\n  #region R\nx;\n#endregion\nreturn\ny;\n";
        let outcome = fix(source, &[diagnostic_at(source, "#region R")]);
        assert_eq!(outcome.document.source(), "int\nx;\nreturn\ny;\n");

        let words: Vec<String> = outcome
            .document
            .root()
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| !token.text().is_empty())
            .filter(|token| {
                !matches!(
                    token.kind(),
                    QuillSyntaxKind::Whitespace | QuillSyntaxKind::Newline
                )
            })
            .map(|token| token.text().to_string())
            .collect();
        assert_eq!(words, vec!["int", "x", ";", "return", "y", ";"]);
    }

    #[test]
    fn repeated_diagnostics_are_idempotent() {
        let source = "#region R\nx;\n#endregion\n";
        let diagnostic = diagnostic_at(source, "#region R");
        let outcome = fix(source, &[diagnostic.clone(), diagnostic]);
        assert_eq!(outcome.document.source(), "x;\n");
    }

    #[test]
    fn no_diagnostics_is_a_no_op() {
        let source = "#region R\nx;\n#endregion\n";
        let document = Document::parse("test.cs", source);
        let outcome = DirectiveRemoval::new(RULE).fix(&document, &[]).unwrap();
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.document.source(), source);
        assert_eq!(outcome.document.root(), document.root());
    }

    #[test]
    fn unresolvable_spans_are_skipped() {
        let source = "#region R\nx;\n#endregion\n";
        let outside = Diagnostic::new(
            RULE,
            Severity::Warning,
            "Regions are not allowed",
            TextRange::at(TextSize::from(500), TextSize::from(3)),
        );
        let not_a_directive = diagnostic_at(source, "x;");
        let other_rule = Diagnostic::new(
            "style/other",
            Severity::Warning,
            "elsewhere",
            diagnostic_at(source, "#region R").range,
        );
        let outcome = fix(source, &[outside, not_a_directive, other_rule]);
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.document.source(), source);
    }

    #[test]
    fn conditional_directives_are_left_alone() {
        let source = "#if DEBUG\nx;\n#endif\n";
        let outcome = fix(source, &[diagnostic_at(source, "#if DEBUG")]);
        assert!(outcome.is_unchanged());
    }

    #[test]
    fn unterminated_last_line_is_removed_cleanly() {
        let source = "#region R\r\nx;\r\n#endregion";
        let outcome = fix(source, &[diagnostic_at(source, "#region R")]);
        assert_eq!(outcome.document.source(), "x;\r\n");
    }
}
