//! Result type alias for Quill operations

use crate::error::QuillError;

/// Standard Result type for Quill operations
pub type Result<T> = std::result::Result<T, QuillError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Log a recoverable error and continue with `None`; other errors pass through
    fn recoverable(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
