//! Engine runs over files on disk

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use quill_core::{CancellationToken, FixConfig, QuillConfig, Severity};
use quill_rules::{LintEngine, LintInput, NO_TRAILING_WHITESPACE};

fn write_files(dir: &TempDir, files: &[(&str, &str)]) -> Vec<LintInput> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            LintInput::File(path)
        })
        .collect()
}

#[test]
fn lint_all_reads_files() {
    let dir = TempDir::new().unwrap();
    let inputs = write_files(
        &dir,
        &[
            ("clean.cs", "class A\n{\n}\n"),
            ("dirty.cs", "class B\n{\n    int x;   \n}\n"),
        ],
    );

    let engine = LintEngine::new(&QuillConfig::default());
    let run = engine.lint_all(&inputs, &CancellationToken::new());

    assert_eq!(run.reports.len(), 2);
    assert!(run.reports[0].diagnostics.is_empty());
    assert_eq!(run.reports[1].diagnostics.len(), 1);
    assert_eq!(run.reports[1].diagnostics[0].rule_id, NO_TRAILING_WHITESPACE);
    assert_eq!(run.count_with_severity(Severity::Warning), 1);
    assert_eq!(run.error_count(), 0);
}

#[test]
fn fix_all_rewrites_files() {
    let dir = TempDir::new().unwrap();
    let inputs = write_files(&dir, &[("a.cs", "class A\n{\n    int x;  \n}\n")]);

    let engine = LintEngine::new(&QuillConfig::default());
    let run = engine.fix_all(&inputs, &FixConfig::default(), &CancellationToken::new());

    let report = &run.reports[0];
    let fix = report.fix.as_ref().unwrap();
    assert!(fix.written);
    assert_eq!(fix.applied_count, 1);
    assert!(report.diagnostics.is_empty());
    assert_eq!(run.fixed_count(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("a.cs")).unwrap(),
        "class A\n{\n    int x;\n}\n"
    );
}

#[test]
fn dry_run_leaves_files_untouched() {
    let dir = TempDir::new().unwrap();
    let original = "class A\n{\n    int x;  \n}\n";
    let inputs = write_files(&dir, &[("a.cs", original)]);

    let engine = LintEngine::new(&QuillConfig::default());
    let run = engine.fix_all(&inputs, &FixConfig::dry_run(), &CancellationToken::new());

    let report = &run.reports[0];
    let fix = report.fix.as_ref().unwrap();
    assert!(!fix.written);
    let diff = fix.diff.as_deref().unwrap();
    assert!(diff.contains("-    int x;  "));
    assert!(diff.contains("+    int x;"));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(fs::read_to_string(dir.path().join("a.cs")).unwrap(), original);
}

#[test]
fn missing_files_are_reported_per_input() {
    let engine = LintEngine::new(&QuillConfig::default());
    let inputs = vec![LintInput::File(PathBuf::from("does/not/exist.cs"))];
    let run = engine.lint_all(&inputs, &CancellationToken::new());
    assert_eq!(run.failed_inputs(), 1);
    assert!(run.reports[0].error.is_some());
    assert!(!run.cancelled);
}
