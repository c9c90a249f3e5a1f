//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations. The binary is a thin local driver
//! around the job pipeline: it collects assets, fans out jobs, dispatches
//! them, and prints the aggregated response.

mod build;
mod jobs;

use crate::jobs::JobPolicy;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Find all supported asset files in a directory (recursively).
///
/// Claims are decided by the policy's extension table; results come back
/// sorted so discovery order never depends on the filesystem.
pub fn find_asset_files(dir: &Path, policy: &JobPolicy) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let dir_str = dir.display().to_string();

    if let Ok(paths) = glob(&format!("{}/**/*", dir_str)) {
        for path in paths.filter_map(Result::ok) {
            if path.is_file() && policy.supports(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Assetbuild - per-platform build jobs for script assets
#[derive(Parser)]
#[command(name = "abuild")]
#[command(about = "Assetbuild - fan out and run per-platform build jobs for script assets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build assets for every enabled platform
    Build {
        /// Asset files to build (in addition to --src discovery)
        assets: Vec<PathBuf>,

        /// Directory to scan for supported assets
        #[arg(long)]
        src: Option<PathBuf>,

        /// Comma-separated platform list (overrides config order)
        #[arg(long, value_delimiter = ',')]
        platforms: Option<Vec<String>>,

        /// Cache root directory (overrides config)
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Number of worker threads (default: available parallelism)
        #[arg(short = 'j', long)]
        workers: Option<usize>,

        /// Config file path (default: discovered assetbuild.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,

        /// Suppress per-job progress output
        #[arg(short, long)]
        quiet: bool,

        /// Verbose progress output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the jobs an asset would fan out to, without running them
    Jobs {
        /// Asset file to inspect
        asset: PathBuf,

        /// Comma-separated platform list (overrides config order)
        #[arg(long, value_delimiter = ',')]
        platforms: Option<Vec<String>>,

        /// Config file path (default: discovered assetbuild.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            assets,
            src,
            platforms,
            cache,
            workers,
            config,
            format,
            quiet,
            verbose,
        } => build::run_build(build::BuildArgs {
            assets,
            src,
            platforms,
            cache,
            workers,
            config,
            format,
            quiet,
            verbose,
        }),
        Commands::Jobs {
            asset,
            platforms,
            config,
        } => jobs::run_jobs(&asset, platforms, config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_asset_files_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("ai")).unwrap();
        fs::write(temp.path().join("walk.lua"), "print(1)").unwrap();
        fs::write(temp.path().join("ai/idle.lua"), "print(2)").unwrap();
        fs::write(temp.path().join("notes.md"), "not an asset").unwrap();

        let policy = JobPolicy::new(["lua"]);
        let files = find_asset_files(temp.path(), &policy);

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("ai/idle.lua"));
        assert!(files[1].ends_with("walk.lua"));
    }

    #[test]
    fn test_find_asset_files_empty_dir() {
        let temp = TempDir::new().unwrap();
        let policy = JobPolicy::new(["lua"]);
        assert!(find_asset_files(temp.path(), &policy).is_empty());
    }
}
