//! Rule interface
//!
//! Rules are independent: each one reads a [`RuleContext`] and reports into
//! its own sink, and never sees another rule's output.

use serde::Serialize;
use std::cell::OnceCell;
use std::fmt;

use crate::cst::{DirectiveGroups, TriviaMap};
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::document::Document;

/// Rule categories, the prefix of every rule id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Whitespace and formatting hygiene
    Style,
    /// Placement of structural delimiters
    Layout,
    /// Constructs that hide or fragment code
    Readability,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleCategory::Style => "style",
            RuleCategory::Layout => "layout",
            RuleCategory::Readability => "readability",
        };
        f.write_str(name)
    }
}

/// Static description of a rule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    /// `category/name`
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub default_severity: Severity,
    /// A batch fixer exists for this rule
    pub fixable: bool,
    /// Enabled when the configuration does not mention the rule
    pub recommended: bool,
}

/// Everything a rule may read while checking one document
///
/// Derived views are built on first use and shared by the rules that run
/// against the same context.
pub struct RuleContext<'a> {
    document: &'a Document,
    severity: Severity,
    trivia: OnceCell<TriviaMap>,
    directives: OnceCell<DirectiveGroups>,
}

impl<'a> RuleContext<'a> {
    pub fn new(document: &'a Document, severity: Severity) -> Self {
        Self {
            document,
            severity,
            trivia: OnceCell::new(),
            directives: OnceCell::new(),
        }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Severity the rule's diagnostics are reported with
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Re-target the context at another rule's severity, keeping built views
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    pub fn trivia(&self) -> &TriviaMap {
        self.trivia
            .get_or_init(|| TriviaMap::new(self.document.root()))
    }

    pub fn directives(&self) -> &DirectiveGroups {
        self.directives
            .get_or_init(|| DirectiveGroups::new(self.document.root()))
    }
}

/// A lint rule
pub trait LintRule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Append this rule's findings for `ctx.document()` to `sink`
    fn check(&self, ctx: &RuleContext<'_>, sink: &mut dyn DiagnosticSink);

    fn id(&self) -> &'static str {
        self.metadata().id
    }
}
