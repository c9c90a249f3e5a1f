//! Job execution.
//!
//! Runs one job descriptor to a terminal outcome: compile jobs go through
//! the asset compiler collaborator, copy jobs republish the source bytes
//! into the cache. Every failure comes back as a value. The compiler call
//! is wrapped in a panic guard so a crashing collaborator resolves the job
//! as crashed instead of taking the worker down with it.

use crate::compiler::{CompileFailure, ScriptCompiler};
use crate::jobs::descriptor::{JobDescriptor, JobKind};
use crate::jobs::outcome::JobOutcome;
use crate::jobs::product::JobProduct;
use crate::jobs::shutdown::ShutdownGate;
use crate::store::ArtifactStore;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Executes job descriptors against the compiler and store collaborators.
///
/// Stateless between jobs; one executor serves a whole batch from any
/// number of worker threads.
pub struct JobExecutor {
    compiler: Arc<dyn ScriptCompiler>,
    store: Arc<dyn ArtifactStore>,
    gate: Arc<ShutdownGate>,
}

impl JobExecutor {
    pub fn new(
        compiler: Arc<dyn ScriptCompiler>,
        store: Arc<dyn ArtifactStore>,
        gate: Arc<ShutdownGate>,
    ) -> Self {
        Self {
            compiler,
            store,
            gate,
        }
    }

    /// Run one job to completion.
    ///
    /// The shutdown gate is polled before any work starts and again at each
    /// safe checkpoint; a set gate resolves the job as cancelled without
    /// touching the cache.
    pub fn process_job(&self, job: &JobDescriptor) -> JobOutcome {
        if self.gate.is_shutting_down() {
            return JobOutcome::cancelled();
        }
        match job.kind() {
            JobKind::Compile => self.run_compile(job),
            JobKind::Copy => self.run_copy(job),
        }
    }

    /// Copy strategy: republish the source bytes under the source's file
    /// name. Dependency handling is trivially complete since the product
    /// is the source.
    fn run_copy(&self, job: &JobDescriptor) -> JobOutcome {
        let source = match fs::read(job.source_path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                return JobOutcome::failed(format!(
                    "failed to read {}: {}",
                    job.source_path().display(),
                    e
                ))
            }
        };
        let relative = match source_file_name(job) {
            Ok(name) => name,
            Err(outcome) => return outcome,
        };

        if self.gate.is_shutting_down() {
            return JobOutcome::cancelled();
        }
        if let Err(e) = self.store.write_artifact(job.platform(), &relative, &source) {
            return JobOutcome::failed(format!(
                "failed to write {}: {}",
                relative.display(),
                e
            ));
        }
        JobOutcome::success(JobProduct::single(relative, true))
    }

    /// Compile strategy: feed the source to the compiler collaborator and
    /// persist whatever it emits. Rejection maps to failed, a collaborator
    /// fault or panic maps to crashed.
    fn run_compile(&self, job: &JobDescriptor) -> JobOutcome {
        let source = match fs::read(job.source_path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                return JobOutcome::failed(format!(
                    "failed to read {}: {}",
                    job.source_path().display(),
                    e
                ))
            }
        };
        let source_name = match source_file_name(job) {
            Ok(name) => name.display().to_string(),
            Err(outcome) => return outcome,
        };

        if self.gate.is_shutting_down() {
            return JobOutcome::cancelled();
        }

        let compiled = panic::catch_unwind(AssertUnwindSafe(|| {
            self.compiler.compile(&source, &source_name, job.platform())
        }));
        let output = match compiled {
            Ok(Ok(output)) => output,
            Ok(Err(CompileFailure::Rejected { diagnostic })) => {
                return JobOutcome::failed(diagnostic)
            }
            Ok(Err(CompileFailure::Fault { description })) => {
                return JobOutcome::crashed(description)
            }
            Err(payload) => {
                return JobOutcome::crashed(format!(
                    "compiler panicked: {}",
                    panic_message(&payload)
                ))
            }
        };
        if output.artifacts.is_empty() {
            return JobOutcome::failed(
                "compiler reported success but produced no artifacts".to_string(),
            );
        }

        // Persist artifacts one by one. If anything stops the loop, take
        // back what was already written so the cache never holds a partial
        // product.
        let mut written: Vec<PathBuf> = Vec::new();
        for artifact in &output.artifacts {
            if self.gate.is_shutting_down() {
                self.discard(job.platform(), &written);
                return JobOutcome::cancelled();
            }
            if let Err(e) =
                self.store
                    .write_artifact(job.platform(), &artifact.path, &artifact.bytes)
            {
                self.discard(job.platform(), &written);
                return JobOutcome::failed(format!(
                    "failed to write {}: {}",
                    artifact.path.display(),
                    e
                ));
            }
            written.push(artifact.path.clone());
        }

        JobOutcome::success(JobProduct::from_paths(
            output.artifacts.iter().map(|a| a.path.clone()),
            output.dependencies_handled,
        ))
    }

    /// Best-effort removal of partially written outputs.
    fn discard(&self, platform: &str, written: &[PathBuf]) {
        for path in written {
            let _ = self.store.remove_artifact(platform, path);
        }
    }
}

/// File name of the job's source asset, as the artifact-relative path.
fn source_file_name(job: &JobDescriptor) -> Result<PathBuf, JobOutcome> {
    match job.source_path().file_name() {
        Some(name) => Ok(PathBuf::from(name)),
        None => Err(JobOutcome::failed(format!(
            "source path has no file name: {}",
            job.source_path().display()
        ))),
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
