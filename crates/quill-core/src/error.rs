//! Error types and handling for Quill operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Quill operations
#[derive(Debug, Error)]
pub enum QuillError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A rule's fixer failed
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled before all documents were processed
    #[error("Operation cancelled after {completed} document(s)")]
    Cancelled { completed: usize },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Rule,
    Io,
    Cancelled,
}

impl QuillError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuillError::ConfigError { .. } => ErrorKind::Config,
            QuillError::RuleError { .. } => ErrorKind::Rule,
            QuillError::IoError { .. } => ErrorKind::Io,
            QuillError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Rule | ErrorKind::Io)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_not_recoverable() {
        let err = QuillError::Cancelled { completed: 3 };
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Operation cancelled after 3 document(s)");
    }

    #[test]
    fn io_error_keeps_path() {
        let err = QuillError::io_error(
            "src/Program.cs",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("src/Program.cs"));
    }
}
