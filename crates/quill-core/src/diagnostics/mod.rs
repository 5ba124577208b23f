//! Diagnostics produced by rules and the sinks that collect them
//!
//! A [`Diagnostic`] is immutable once created and carries only a span; line
//! and column information is derived on demand from the document text via
//! [`Diagnostic::location`].

mod renderer;

pub use renderer::{DiagnosticRenderer, OutputFormat};

use rowan::TextRange;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

use crate::text::{LineCol, SourceText};

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// A rule finding attached to a span of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(serialize_with = "serialize_range")]
    pub range: TextRange,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        range: TextRange,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            range,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Resolve the span to one-based start and end positions
    pub fn location(&self, text: &SourceText) -> Location {
        Location {
            start: text.line_col(self.range.start()),
            end: text.line_col(self.range.end()),
        }
    }
}

fn serialize_range<S: Serializer>(range: &TextRange, serializer: S) -> Result<S::Ok, S::Error> {
    let span: [u32; 2] = [range.start().into(), range.end().into()];
    span.serialize(serializer)
}

/// One-based start/end positions of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: LineCol,
    pub end: LineCol,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Append-only destination for diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collects diagnostics in discovery order, dropping repeated `(rule, span)` pairs
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<(String, TextRange)>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self
            .seen
            .insert((diagnostic.rule_id.clone(), diagnostic.range))
        {
            self.diagnostics.push(diagnostic);
        } else {
            tracing::trace!(
                "Dropping duplicate {} diagnostic at {:?}",
                diagnostic.rule_id,
                diagnostic.range
            );
        }
    }
}
