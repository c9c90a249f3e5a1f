//! Batch dispatch of build jobs.
//!
//! Runs a batch of independent job descriptors across worker threads and
//! returns exactly one report per descriptor, in dispatch order, no matter
//! how an individual execution ends. Work is handed out through an atomic
//! cursor; results are re-sorted by dispatch index so thread scheduling
//! never leaks into the response.

use crate::jobs::descriptor::JobDescriptor;
use crate::jobs::executor::{panic_message, JobExecutor};
use crate::jobs::outcome::JobOutcome;
use crate::jobs::progress::{ProgressEvent, ProgressReporter};
use crate::jobs::report::{BuildResponse, JobReport};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Default number of workers (uses available parallelism).
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Dispatches job batches against one executor.
pub struct JobDispatcher {
    executor: JobExecutor,
    workers: usize,
}

impl JobDispatcher {
    pub fn new(executor: JobExecutor) -> Self {
        Self {
            executor,
            workers: default_workers(),
        }
    }

    /// Set the number of worker threads (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every job in the batch and collect one report per descriptor.
    ///
    /// Reports come back in the order the descriptors were given. The batch
    /// always runs to the end: a failed, crashed, or cancelled job never
    /// swallows its neighbours' reports.
    pub fn dispatch(
        &self,
        jobs: &[JobDescriptor],
        progress: &dyn ProgressReporter,
    ) -> BuildResponse {
        let start = Instant::now();
        progress.report(ProgressEvent::BatchStarted {
            total_jobs: jobs.len(),
        });

        let mut response = BuildResponse::new();

        // Single-worker or trivial batches run inline.
        if self.workers == 1 || jobs.len() <= 1 {
            for job in jobs {
                response.add_report(self.run_one(job, progress));
            }
        } else {
            let reports: Mutex<Vec<(usize, JobReport)>> =
                Mutex::new(Vec::with_capacity(jobs.len()));
            let cursor = AtomicUsize::new(0);
            let worker_count = self.workers.min(jobs.len());

            std::thread::scope(|s| {
                for _ in 0..worker_count {
                    s.spawn(|| loop {
                        let idx = cursor.fetch_add(1, Ordering::SeqCst);
                        if idx >= jobs.len() {
                            break;
                        }
                        let report = self.run_one(&jobs[idx], progress);
                        reports.lock().unwrap().push((idx, report));
                    });
                }
            });

            // Sort by dispatch index to keep the response deterministic.
            let mut reports = reports.into_inner().unwrap();
            reports.sort_by_key(|(idx, _)| *idx);
            for (_, report) in reports {
                response.add_report(report);
            }
        }

        response.total_duration = start.elapsed();
        progress.report(ProgressEvent::BatchCompleted {
            succeeded: response.succeeded_count(),
            failed: response.failed_count(),
            crashed: response.crashed_count(),
            cancelled: response.cancelled_count(),
            duration_ms: response.total_duration.as_millis() as u64,
        });
        response
    }

    /// Run one job and wrap it into a report.
    ///
    /// The executor already guards the compiler call, but a panic anywhere
    /// else on the execution path must still resolve the job, so the whole
    /// call sits behind its own guard.
    fn run_one(&self, job: &JobDescriptor, progress: &dyn ProgressReporter) -> JobReport {
        let key = job.key();
        progress.report(ProgressEvent::JobStarted {
            job: key.to_string(),
        });

        let start = Instant::now();
        let outcome =
            match panic::catch_unwind(AssertUnwindSafe(|| self.executor.process_job(job))) {
                Ok(outcome) => outcome,
                Err(payload) => JobOutcome::crashed(format!(
                    "job execution panicked: {}",
                    panic_message(&payload)
                )),
            };
        let duration = start.elapsed();

        progress.report(ProgressEvent::JobCompleted {
            job: key.to_string(),
            code: outcome.code(),
            duration_ms: duration.as_millis() as u64,
            message: outcome.message().map(|m| m.to_string()),
        });
        JobReport::new(key, outcome, duration)
    }
}
