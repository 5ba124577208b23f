//! Quill CLI
//!
//! Command-line interface for the quill brace-style linter

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use quill_core::init_tracing;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill: trailing whitespace, brace placement and region linting")]
#[command(version = quill_core::VERSION)]
#[command(
    long_about = "Quill lints brace-delimited source files for trailing whitespace,\n\
brace placement and region directives, and fixes what it can.\n\
\n\
Examples:\n  \
quill lint                    # Lint current directory\n  \
quill lint --fix src/         # Lint and fix files in src/\n  \
quill lint --dry-run src/     # Show fixes as a diff\n  \
quill rules --detailed        # List all available rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.quillrc.toml/.quillrc.json/quill.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint source files
    Lint {
        /// Files or directories to lint
        #[arg(help = "Files, directories or glob patterns (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for diagnostics"
        )]
        format: OutputFormat,

        /// Write fixes to files
        #[arg(long, help = "Apply fixes and write them to the files")]
        fix: bool,

        /// Show fixes without applying them
        #[arg(
            long,
            help = "Show proposed fixes as a diff without writing them",
            conflicts_with = "fix"
        )]
        dry_run: bool,
    },

    /// List the available rules
    Rules {
        /// Show category, severity and fix support for each rule
        #[arg(long)]
        detailed: bool,

        /// Only list rules of this category (style, layout, readability)
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output with colors and context
    Human,
    /// JSON format for programmatic consumption
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize colored output
    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "quill=warn",
        1 => "quill=info",
        2 => "quill=debug",
        _ => "quill=trace",
    };
    init_tracing(log_level);

    // Set thread pool size if specified
    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    match run_command(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Quill failed: {:#}", e);
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Run the selected command; `Ok(false)` means the run should exit non-zero
fn run_command(cli: Cli) -> Result<bool> {
    let use_colors = !cli.no_color && std::env::var("NO_COLOR").is_err();

    match cli.command {
        Commands::Lint {
            paths,
            format,
            fix,
            dry_run,
        } => {
            let paths = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            commands::lint_command(commands::LintOptions {
                paths,
                format,
                fix,
                dry_run,
                use_colors,
                config_path: cli.config,
            })
        }

        Commands::Rules { detailed, category } => {
            commands::rules_command(detailed, category, cli.config)?;
            Ok(true)
        }
    }
}
