//! Source file discovery
//!
//! Walks a directory tree and keeps the files whose path, relative to the
//! discovery root, matches an include pattern and no exclude pattern.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::FilesConfiguration;
use crate::error::QuillError;
use crate::Result;

/// File discovery interface
pub trait FileDiscovery {
    /// Discover all files matching the configuration, sorted by path
    fn discover_files(&self, config: &FilesConfiguration) -> Result<Vec<PathBuf>>;

    /// Check whether a single path would be discovered
    fn should_include(&self, path: &Path, config: &FilesConfiguration) -> bool;
}

/// Walks the tree under `root_dir`
#[derive(Debug, Clone)]
pub struct DefaultFileDiscovery {
    root_dir: PathBuf,
}

impl DefaultFileDiscovery {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root_dir).unwrap_or(path)
    }
}

/// Compiled include/exclude patterns
struct PatternSet {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PatternSet {
    fn compile(config: &FilesConfiguration) -> Result<Self> {
        let compile = |patterns: Vec<String>| -> Result<Vec<Pattern>> {
            patterns
                .iter()
                .map(|p| {
                    Pattern::new(p).map_err(|e| {
                        QuillError::config_error(format!("Invalid glob pattern '{p}': {e}"))
                    })
                })
                .collect()
        };
        Ok(Self {
            include: compile(config.include_patterns())?,
            exclude: compile(config.exclude_patterns())?,
        })
    }

    fn matches(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        let included = self
            .include
            .iter()
            .any(|p| p.matches_path_with(relative, options));
        included
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_path_with(relative, options))
    }
}

impl FileDiscovery for DefaultFileDiscovery {
    fn discover_files(&self, config: &FilesConfiguration) -> Result<Vec<PathBuf>> {
        info!("Discovering source files in {}", self.root_dir.display());
        let patterns = PatternSet::compile(config)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root_dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && patterns.matches(self.relative(entry.path())) {
                files.push(entry.into_path());
            }
        }
        files.sort();

        info!("Discovered {} source files", files.len());
        debug!("Files: {:?}", files);
        Ok(files)
    }

    fn should_include(&self, path: &Path, config: &FilesConfiguration) -> bool {
        PatternSet::compile(config)
            .map(|patterns| patterns.matches(self.relative(path)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config() -> FilesConfiguration {
        FilesConfiguration {
            include: Some(vec!["**/*.cs".to_string()]),
            exclude: Some(vec!["**/obj/**".to_string()]),
        }
    }

    #[test]
    fn test_discover_files_basic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/obj")).unwrap();
        fs::write(root.join("Program.cs"), "class P { }").unwrap();
        fs::write(root.join("src/Widget.cs"), "class W { }").unwrap();
        fs::write(root.join("src/obj/Generated.cs"), "class G { }").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let discovery = DefaultFileDiscovery::new(root);
        let files = discovery.discover_files(&create_test_config()).unwrap();

        assert_eq!(
            files,
            vec![root.join("Program.cs"), root.join("src/Widget.cs")]
        );
    }

    #[test]
    fn test_should_include() {
        let temp_dir = TempDir::new().unwrap();
        let discovery = DefaultFileDiscovery::new(temp_dir.path());
        let config = create_test_config();

        assert!(discovery.should_include(Path::new("test.cs"), &config));
        assert!(!discovery.should_include(Path::new("test.md"), &config));
        assert!(!discovery.should_include(Path::new("obj/test.cs"), &config));
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = FilesConfiguration {
            include: Some(vec!["[".to_string()]),
            exclude: None,
        };
        let error = DefaultFileDiscovery::new(temp_dir.path())
            .discover_files(&config)
            .unwrap_err();
        assert_eq!(error.kind(), crate::error::ErrorKind::Config);
    }
}
