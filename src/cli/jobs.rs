//! Jobs command implementation
//!
//! Prints the jobs that a build would dispatch for an asset, without
//! running any of them. Useful for checking platform fan-out and
//! whether an asset type is supported at all.

use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::config::loader::load_config;
use crate::jobs::{JobPolicy, JobRequest};

/// Run the jobs command
pub(crate) fn run_jobs(
    asset: &Path,
    platforms: Option<Vec<String>>,
    config_path: Option<&Path>,
) -> ExitCode {
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Some(platforms) = platforms {
        config.worker.platforms = platforms;
    }

    let policy = JobPolicy::from_config(&config);
    let request = JobRequest::new(asset, config.worker.platforms.clone());
    let jobs = policy.create_jobs(&request);

    if jobs.is_empty() {
        println!(
            "no jobs: {} is not a supported asset type",
            asset.display()
        );
        return ExitCode::from(EXIT_SUCCESS);
    }

    for job in &jobs {
        println!("{}", job.key());
    }
    ExitCode::from(EXIT_SUCCESS)
}
