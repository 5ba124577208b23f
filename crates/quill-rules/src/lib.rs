//! Quill Rules
//!
//! Built-in lint rules, their batch fixers, and the engine that runs them.
//!
//! # Example
//!
//! ```rust
//! use quill_core::{Document, QuillConfig};
//! use quill_rules::LintEngine;
//!
//! let engine = LintEngine::new(&QuillConfig::default());
//! let document = Document::parse("Program.cs", "int x;  \n");
//! let diagnostics = engine.lint(&document);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].rule_id, "style/no-trailing-whitespace");
//!
//! let fixed = engine.fix(&document).unwrap();
//! assert_eq!(fixed.document.source(), "int x;\n");
//! ```

pub mod builtin;
pub mod engine;
pub mod fixes;

pub use builtin::{
    BRACE_PLACEMENT, BraceOptions, BracePlacement, NO_REGIONS, NO_REGIONS_IN_ELEMENTS,
    NO_TRAILING_WHITESPACE, NoRegions, NoRegionsInElements, TrailingWhitespace,
};
pub use engine::{FileReport, LintEngine, LintInput, LintRun, RegisteredRule, RuleRegistry};
pub use fixes::{DirectiveRemoval, TrailingWhitespaceFix};
