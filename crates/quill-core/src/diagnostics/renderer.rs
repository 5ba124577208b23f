//! Diagnostic renderer with rich terminal output

use serde_json::{Value, json};
use std::path::Path;

use super::{Diagnostic, Severity};
use crate::console::{Color, Console};
use crate::text::SourceText;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with colors and a code frame
    Text,
    /// JSON for programmatic consumption
    Json,
}

/// Renders diagnostics of one document against its text
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticRenderer {
    console: Console,
    output_format: OutputFormat,
}

impl DiagnosticRenderer {
    /// Text output with automatic terminal detection
    pub fn new() -> Self {
        Self {
            console: Console::new(),
            output_format: OutputFormat::Text,
        }
    }

    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
            output_format: OutputFormat::Text,
        }
    }

    pub fn with_format(format: OutputFormat) -> Self {
        let console = match format {
            OutputFormat::Json => Console::no_colors(),
            OutputFormat::Text => Console::new(),
        };
        Self {
            console,
            output_format: format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.output_format
    }

    /// Render a single diagnostic in the configured format
    pub fn render(&self, path: &Path, text: &SourceText, diagnostic: &Diagnostic) -> String {
        match self.output_format {
            OutputFormat::Text => self.render_text(path, text, diagnostic),
            OutputFormat::Json => self.to_json(path, text, diagnostic).to_string(),
        }
    }

    /// JSON object describing `diagnostic`, with resolved positions
    pub fn to_json(&self, path: &Path, text: &SourceText, diagnostic: &Diagnostic) -> Value {
        let location = diagnostic.location(text);
        json!({
            "path": path.display().to_string(),
            "ruleId": diagnostic.rule_id,
            "severity": diagnostic.severity,
            "message": diagnostic.message,
            "range": [u32::from(diagnostic.range.start()), u32::from(diagnostic.range.end())],
            "start": { "line": location.start.line, "column": location.start.column },
            "end": { "line": location.end.line, "column": location.end.column },
        })
    }

    fn render_text(&self, path: &Path, text: &SourceText, diagnostic: &Diagnostic) -> String {
        let mut output = self.render_header(diagnostic);
        output.push('\n');
        output.push_str(&self.render_code_frame(path, text, diagnostic));
        output
    }

    /// Header: `severity[rule_id]: message`
    fn render_header(&self, diagnostic: &Diagnostic) -> String {
        let severity = self.console.colorize(
            &diagnostic.severity.to_string(),
            severity_color(diagnostic.severity),
        );
        let rule_id = self
            .console
            .colorize(&format!("[{}]", diagnostic.rule_id), Color::Dim);
        format!(
            "{severity}{rule_id}: {}",
            self.console.colorize(&diagnostic.message, Color::Bold)
        )
    }

    /// Code frame showing the offending line with one line of context on each side
    fn render_code_frame(&self, path: &Path, text: &SourceText, diagnostic: &Diagnostic) -> String {
        let location = diagnostic.location(text);
        let error_line = text.line_index(diagnostic.range.start());
        let first = error_line.saturating_sub(1);
        let last = (error_line + 1).min(text.line_count().saturating_sub(1));
        let gutter_width = (last + 1).to_string().len();
        let color = severity_color(diagnostic.severity);

        let mut frame = format!(
            "  {}─[{}:{}]\n",
            self.console.colorize("┌", Color::Blue),
            path.display(),
            location.start
        );
        frame.push_str(&format!("  {}\n", self.console.colorize("│", Color::Blue)));

        for index in first..=last {
            let Some(line) = text.line(index) else {
                continue;
            };
            let content = text.slice(line.range());
            let marker = if index == error_line {
                self.console.colorize(">", color)
            } else {
                " ".to_string()
            };
            frame.push_str(&format!(
                "{marker} {}{}{content}\n",
                self.console
                    .colorize(&format!("{:>gutter_width$}", index + 1), Color::Dim),
                self.console.colorize(" │ ", Color::Dim),
            ));

            if index == error_line {
                let column = location.start.column as usize;
                let width = if location.end.line == location.start.line {
                    (location.end.column.saturating_sub(location.start.column)) as usize
                } else {
                    content.chars().count() + 1 - column.min(content.chars().count() + 1)
                };
                frame.push_str(&format!(
                    "  {}{}{}{}\n",
                    " ".repeat(gutter_width),
                    self.console.colorize(" │ ", Color::Dim),
                    " ".repeat(column.saturating_sub(1)),
                    self.console.colorize(&"^".repeat(width.max(1)), color),
                ));
            }
        }

        frame
    }
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Blue,
    }
}
