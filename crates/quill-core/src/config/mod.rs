//! Configuration system for quill
//!
//! - TOML (`.quillrc.toml`, `quill.toml`) and JSON with comments
//!   (`.quillrc.json`) configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde; unset fields fall back to defaults
//!
//! ## Example Configuration
//!
//! ```toml
//! [linter]
//! enabled = true
//!
//! [linter.rules]
//! "style/no-trailing-whitespace" = "warn"
//! "readability/no-regions" = "off"
//!
//! [braces]
//! closeBraceAnchor = "shared-content"
//! allowSingleLineSingleElement = true
//! ignoreKinds = ["initializer"]
//!
//! [files]
//! include = ["**/*.cs"]
//! exclude = ["**/bin/**", "**/obj/**"]
//! ```

mod loader;
mod quill_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use quill_config::{
    BraceConfiguration, CloseBraceAnchor, FilesConfiguration, LinterConfiguration, QuillConfig,
    RuleSeverity,
};
