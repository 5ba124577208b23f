//! Quill Core
//!
//! Core linting engine for brace-delimited source files.
//! This crate provides the fundamental components for parsing sources into
//! a lossless token/trivia tree, reporting diagnostics against it, and
//! applying batched fixes.

pub mod autofix;
pub mod cancel;
pub mod config;
pub mod console; // Terminal console utilities for rich output
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod discovery;
pub mod document;
pub mod error;
pub mod result;
pub mod rules;
pub mod text;

// Re-export commonly used types
pub use autofix::{BatchFixer, FixConfig, FixOutcome, FixResult, write_fixed};
pub use cancel::CancellationToken;
pub use config::{
    BraceConfiguration, CloseBraceAnchor, ConfigLoader, FilesConfiguration, LinterConfiguration,
    QuillConfig, RuleSeverity,
};
pub use console::{Color, Console};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticRenderer, DiagnosticSink, Location, OutputFormat,
    Severity,
};
pub use discovery::{DefaultFileDiscovery, FileDiscovery};
pub use document::Document;
pub use error::{ErrorKind, QuillError};
pub use result::{Result, ResultExt};
pub use rules::{LintRule, RuleCategory, RuleContext, RuleMetadata};
pub use text::{Line, LineCol, SourceText};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
