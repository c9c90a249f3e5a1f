//! Build command implementation

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use super::{find_asset_files, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::compiler::{CommandCompiler, ScriptCompiler, UnconfiguredCompiler};
use crate::config::loader::{load_config, merge_cli_overrides, CliOverrides};
use crate::jobs::{
    ConsoleProgress, JobDispatcher, JobExecutor, JobPolicy, JobRequest, JsonProgress,
    NullProgress, ProgressEvent, ProgressReporter, ShutdownGate,
};
use crate::store::FsArtifactStore;

/// Arguments for the build command.
pub(crate) struct BuildArgs {
    pub assets: Vec<PathBuf>,
    pub src: Option<PathBuf>,
    pub platforms: Option<Vec<String>>,
    pub cache: Option<PathBuf>,
    pub workers: Option<usize>,
    pub config: Option<PathBuf>,
    pub format: String,
    pub quiet: bool,
    pub verbose: bool,
}

/// Run the build command
pub(crate) fn run_build(args: BuildArgs) -> ExitCode {
    // Reject bad usage before any work starts.
    match args.format.as_str() {
        "console" | "json" => {}
        other => {
            eprintln!("Error: Unknown format '{}'. Supported: console, json", other);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    // Load config and apply CLI overrides
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let overrides = CliOverrides {
        cache: args.cache,
        platforms: args.platforms,
    };
    merge_cli_overrides(&mut config, &overrides);

    let policy = JobPolicy::from_config(&config);

    // Collect assets: positional paths plus --src discovery
    let mut assets = args.assets;
    if let Some(src) = &args.src {
        if !src.is_dir() {
            eprintln!("Error: source directory not found: {}", src.display());
            return ExitCode::from(EXIT_ERROR);
        }
        assets.extend(find_asset_files(src, &policy));
    }
    if assets.is_empty() {
        eprintln!("Error: no assets given; pass asset paths or --src <dir>");
        return ExitCode::from(EXIT_ERROR);
    }

    let progress: Box<dyn ProgressReporter> = if args.quiet {
        Box::new(NullProgress::new())
    } else if args.format == "json" {
        Box::new(JsonProgress::new())
    } else {
        Box::new(ConsoleProgress::new().with_verbose(args.verbose))
    };

    // Wire up the pipeline collaborators from config
    let compiler: Arc<dyn ScriptCompiler> = if config.compiler.command.is_empty() {
        Arc::new(UnconfiguredCompiler)
    } else {
        Arc::new(CommandCompiler::new(
            config.compiler.command.clone(),
            config.compiler.output_extension.clone(),
        ))
    };
    let store = Arc::new(FsArtifactStore::new(config.cache.root.clone()));
    let gate = Arc::new(ShutdownGate::new());

    let executor = JobExecutor::new(compiler, store, gate);
    let mut dispatcher = JobDispatcher::new(executor);
    if let Some(workers) = args.workers {
        dispatcher = dispatcher.with_workers(workers);
    }

    // Fan out jobs for every asset, in input order
    let mut jobs = Vec::new();
    for asset in &assets {
        let request = JobRequest::new(asset.clone(), config.worker.platforms.clone());
        let created = policy.create_jobs(&request);
        if created.is_empty() {
            progress.report(ProgressEvent::Warning {
                job: None,
                message: format!(
                    "{}: unsupported asset type, no jobs created",
                    asset.display()
                ),
            });
            continue;
        }
        jobs.extend(created);
    }

    let response = dispatcher.dispatch(&jobs, progress.as_ref());

    // Console mode prints the summary; json mode prints the full response
    if args.format == "json" {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing response: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{}", response.summary());
    }

    if response.is_success() && !response.was_stopped() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
