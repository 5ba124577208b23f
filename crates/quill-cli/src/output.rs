//! Output formatting and reporting

use anyhow::{Context, Result};
use colored::*;
use quill_core::{DiagnosticRenderer, Severity};
use quill_rules::{FileReport, LintRun};

use crate::OutputFormat;

/// Summary statistics for linting results
#[derive(Debug, Clone, Default)]
pub struct LintSummary {
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub fixes_applied: usize,
    pub failed_files: usize,
    pub syntax_errors: usize,
}

impl LintSummary {
    pub fn from_run(run: &LintRun) -> Self {
        Self {
            files_checked: run.reports.len() - run.failed_inputs(),
            errors: run.count_with_severity(Severity::Error),
            warnings: run.count_with_severity(Severity::Warning),
            info: run.count_with_severity(Severity::Info),
            fixes_applied: run.fixed_count(),
            failed_files: run.failed_inputs(),
            syntax_errors: run.reports.iter().map(|r| r.syntax_errors).sum(),
        }
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.info
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Format and print linting results
    pub fn print_results(&self, run: &LintRun, summary: &LintSummary) -> Result<()> {
        match self.format {
            OutputFormat::Human => self.print_human_format(run, summary),
            OutputFormat::Json => self.print_json_format(run, summary),
        }
    }

    fn print_human_format(&self, run: &LintRun, summary: &LintSummary) -> Result<()> {
        let renderer = if self.use_colors {
            DiagnosticRenderer::new()
        } else {
            DiagnosticRenderer::no_colors()
        };

        for report in &run.reports {
            if let Some(error) = &report.error {
                eprintln!("{} {}", "error:".red().bold(), error);
                continue;
            }
            for diagnostic in &report.diagnostics {
                println!("{}", renderer.render(&report.path, &report.text, diagnostic));
            }
            self.print_fix_human(report);
        }

        if let Some(cancelled) = run.cancellation() {
            println!("{}", cancelled.to_string().yellow());
        }
        self.print_summary_human(summary);
        Ok(())
    }

    fn print_fix_human(&self, report: &FileReport) {
        let Some(fix) = &report.fix else {
            return;
        };
        if let Some(diff) = &fix.diff {
            println!("{diff}");
        } else if fix.written {
            println!(
                "{} Fixed {} issue{} in {}",
                "✓".green(),
                fix.applied_count,
                if fix.applied_count == 1 { "" } else { "s" },
                report.path.display()
            );
        }
    }

    fn print_summary_human(&self, summary: &LintSummary) {
        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);
        if summary.failed_files > 0 {
            println!(
                "  Files failed: {}",
                summary.failed_files.to_string().red()
            );
        }

        if summary.has_issues() {
            println!("  Issues found:");
            if summary.errors > 0 {
                println!("    Errors: {}", summary.errors.to_string().red());
            }
            if summary.warnings > 0 {
                println!("    Warnings: {}", summary.warnings.to_string().yellow());
            }
            if summary.info > 0 {
                println!("    Info: {}", summary.info.to_string().blue());
            }
        } else {
            println!("  {} No issues found", "✓".green());
        }

        if summary.syntax_errors > 0 {
            println!(
                "  Syntax errors: {}",
                summary.syntax_errors.to_string().yellow()
            );
        }
        if summary.fixes_applied > 0 {
            println!(
                "  Fixes applied: {}",
                summary.fixes_applied.to_string().green()
            );
        }
    }

    fn print_json_format(&self, run: &LintRun, summary: &LintSummary) -> Result<()> {
        let renderer = DiagnosticRenderer::no_colors();

        let issues: Vec<serde_json::Value> = run
            .reports
            .iter()
            .flat_map(|report| {
                report
                    .diagnostics
                    .iter()
                    .map(|d| renderer.to_json(&report.path, &report.text, d))
            })
            .collect();

        let failures: Vec<serde_json::Value> = run
            .reports
            .iter()
            .filter_map(|report| {
                let error = report.error.as_ref()?;
                Some(serde_json::json!({
                    "path": report.path.display().to_string(),
                    "error": error.to_string(),
                }))
            })
            .collect();

        let fixes: Vec<serde_json::Value> = run
            .reports
            .iter()
            .filter_map(|report| {
                let fix = report.fix.as_ref()?;
                Some(serde_json::json!({
                    "path": report.path.display().to_string(),
                    "applied": fix.applied_count,
                    "written": fix.written,
                    "diff": fix.diff,
                }))
            })
            .collect();

        let result = serde_json::json!({
            "files_checked": summary.files_checked,
            "cancelled": run.cancelled,
            "issues": issues,
            "fixes": fixes,
            "failures": failures,
            "summary": {
                "errors": summary.errors,
                "warnings": summary.warnings,
                "info": summary.info,
                "total": summary.total_issues(),
                "fixes_applied": summary.fixes_applied,
                "syntax_errors": summary.syntax_errors,
            }
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize JSON")?
        );
        Ok(())
    }
}

/// Utility functions for output formatting
pub mod utils {
    /// Format duration in human-readable format
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_ms = duration.as_millis();

        if total_ms < 1000 {
            format!("{total_ms}ms")
        } else if total_ms < 60_000 {
            format!("{:.1}s", total_ms as f64 / 1000.0)
        } else {
            let minutes = total_ms / 60_000;
            let seconds = (total_ms % 60_000) as f64 / 1000.0;
            format!("{minutes}m {seconds:.1}s")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{Document, QuillConfig};
    use quill_rules::LintEngine;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_summary_counts_by_severity() {
        let engine = LintEngine::new(&QuillConfig::default());
        let report = FileReport {
            path: PathBuf::from("a.cs"),
            text: Document::parse("a.cs", "int x; \n").text().clone(),
            diagnostics: engine.lint(&Document::parse("a.cs", "int x; \n")),
            syntax_errors: 0,
            fix: None,
            error: None,
        };
        let run = LintRun {
            reports: vec![report],
            cancelled: false,
        };

        let summary = LintSummary::from_run(&run);
        assert_eq!(summary.files_checked, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.total_issues(), 1);
        assert!(!summary.has_errors());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(utils::format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(utils::format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(utils::format_duration(Duration::from_secs(90)), "1m 30.0s");
    }
}
