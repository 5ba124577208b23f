//! CLI command implementations

use anyhow::{Context, Result, bail};
use quill_core::{
    CancellationToken, ConfigLoader, DefaultFileDiscovery, FileDiscovery, FilesConfiguration,
    FixConfig, QuillConfig,
};
use quill_rules::{LintEngine, LintInput};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::OutputFormat;
use crate::output::{LintSummary, OutputFormatter, utils};

/// Arguments of `quill lint`
#[derive(Debug)]
pub struct LintOptions {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub fix: bool,
    pub dry_run: bool,
    pub use_colors: bool,
    pub config_path: Option<PathBuf>,
}

/// Lint command implementation
///
/// Returns `false` when error-severity diagnostics remain or an input failed.
pub fn lint_command(options: LintOptions) -> Result<bool> {
    debug!("Running lint command on paths: {:?}", options.paths);

    let config = load_config(options.config_path.as_deref(), options.paths.first())?;
    let files = collect_files(&options.paths, &config.files_config())?;

    if files.is_empty() {
        if options.format == OutputFormat::Human {
            println!("No source files found in specified paths.");
        }
        return Ok(true);
    }
    debug!("Found {} source files to lint", files.len());

    let start_time = Instant::now();
    let engine = LintEngine::new(&config);
    let inputs: Vec<LintInput> = files.into_iter().map(LintInput::File).collect();
    let cancel = CancellationToken::new();

    let run = if options.dry_run {
        engine.fix_all(&inputs, &FixConfig::dry_run(), &cancel)
    } else if options.fix {
        engine.fix_all(&inputs, &FixConfig::default(), &cancel)
    } else {
        engine.lint_all(&inputs, &cancel)
    };
    info!(
        "Linted {} file(s) in {}",
        run.reports.len(),
        utils::format_duration(start_time.elapsed())
    );

    let summary = LintSummary::from_run(&run);
    OutputFormatter::new(options.format, options.use_colors).print_results(&run, &summary)?;

    Ok(!summary.has_errors() && run.failed_inputs() == 0)
}

/// Rules command implementation
pub fn rules_command(
    detailed: bool,
    category: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Listing available rules");

    let config = load_config(config_path.as_deref(), None)?;
    let engine = LintEngine::new(&config);

    println!("Available Rules:");
    println!("================");

    let mut count = 0;
    for registered in engine.registry().iter() {
        let rule = registered.rule();
        let metadata = rule.metadata();

        if let Some(filter) = &category
            && metadata.category.to_string() != *filter
        {
            continue;
        }
        count += 1;

        if detailed {
            let effective = engine
                .severity_of(rule)
                .map_or_else(|| "off".to_string(), |severity| severity.to_string());
            println!();
            println!("{}", metadata.id);
            println!("  Description: {}", metadata.description);
            println!("  Category: {}", metadata.category);
            println!("  Default severity: {}", metadata.default_severity);
            println!("  Configured severity: {effective}");
            println!("  Recommended: {}", if metadata.recommended { "yes" } else { "no" });
            println!(
                "  Fixable: {}",
                if registered.fixer().is_some() { "yes" } else { "no" }
            );
        } else {
            println!("  {} - {}", metadata.id, metadata.description);
        }
    }

    println!();
    println!("Total: {count} rules");
    Ok(())
}

/// Explicit config path, or discovery starting next to the first input
fn load_config(config_path: Option<&Path>, first_input: Option<&PathBuf>) -> Result<QuillConfig> {
    let start_dir = first_input.map(|path| {
        if path.is_dir() {
            path.as_path()
        } else {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() && parent.is_dir() => parent,
                _ => Path::new("."),
            }
        }
    });
    let config = ConfigLoader::load(config_path, start_dir).context("Failed to load configuration")?;
    debug!("Loaded configuration");
    Ok(config)
}

/// Expand the command line paths into the files to lint
///
/// Files named directly are always linted; directories are walked with the
/// configured include/exclude patterns; anything else is tried as a glob.
fn collect_files(paths: &[PathBuf], files_config: &FilesConfiguration) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let discovery = DefaultFileDiscovery::new(path);
            files.extend(discovery.discover_files(files_config)?);
        } else {
            let pattern = path.to_string_lossy();
            let entries = glob::glob(&pattern)
                .with_context(|| format!("Invalid path pattern: {}", path.display()))?;
            let before = files.len();
            files.extend(entries.filter_map(|entry| entry.ok()).filter(|p| p.is_file()));
            if files.len() == before {
                warn!("Path does not exist: {}", path.display());
            }
        }
    }

    files.sort();
    files.dedup();
    if files.is_empty() && paths.iter().all(|p| !p.exists()) {
        bail!(
            "None of the given paths exist: {}",
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_walks_directories_and_keeps_explicit_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("src/a.cs"), "class A {}\n").unwrap();
        fs::write(dir.path().join("obj/b.cs"), "class B {}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "text\n").unwrap();

        let files = collect_files(
            &[dir.path().to_path_buf(), dir.path().join("notes.txt")],
            &FilesConfiguration::default(),
        )
        .unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("notes.txt"), dir.path().join("src/a.cs")]
        );
    }

    #[test]
    fn test_collect_files_expands_globs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.cs"), "").unwrap();
        fs::write(dir.path().join("b.cs"), "").unwrap();

        let pattern = dir.path().join("*.cs");
        let files = collect_files(&[pattern], &FilesConfiguration::default()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_files_rejects_missing_paths() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.cs");
        assert!(collect_files(&[missing], &FilesConfiguration::default()).is_err());
    }
}
