//! Configuration file discovery and loading

use super::QuillConfig;
use crate::error::QuillError;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
pub const CONFIG_FILE_NAMES: [&str; 3] = [".quillrc.toml", ".quillrc.json", "quill.toml"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Each directory is searched for [`CONFIG_FILE_NAMES`] in order, moving
    /// up until a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| QuillError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// `.toml` files are read as TOML; `.json` files as JSON with comments
    /// and trailing commas allowed.
    pub fn load_from_file(path: &Path) -> Result<QuillConfig> {
        let content = fs::read_to_string(path).map_err(|e| QuillError::io_error(path, e))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => json5::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("unsupported file extension (expected .toml or .json)".to_string()),
        };
        parsed.map_err(|message| {
            QuillError::config_error(format!(
                "Failed to load config from '{}': {message}",
                path.display()
            ))
        })
    }

    /// Load config from an explicit path or auto-discover it
    ///
    /// An explicit path must exist. Without one, discovery starts at
    /// `start_dir` (or the current directory); when nothing is found the
    /// defaults apply.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<QuillConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(QuillError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(QuillConfig::default())
            }
        }
    }
}
