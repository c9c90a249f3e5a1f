//! Aggregated job outcomes.
//!
//! The dispatcher folds every terminal outcome into a [`BuildResponse`]
//! holding exactly one report per dispatched descriptor, in dispatch
//! order. The orchestrator marks every requested job resolved from this
//! one object; jobs are never dropped, duplicated, or left implicit.

use crate::jobs::descriptor::JobKey;
use crate::jobs::outcome::{JobOutcome, JobResultCode};
use serde::Serialize;
use std::time::Duration;

/// Outcome of one dispatched job, tagged with its identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub key: JobKey,
    pub outcome: JobOutcome,
    /// Wall-clock execution time. Informational; not part of identity.
    pub duration: Duration,
}

impl JobReport {
    pub fn new(key: JobKey, outcome: JobOutcome, duration: Duration) -> Self {
        Self {
            key,
            outcome,
            duration,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Response for one dispatched batch.
#[derive(Debug, Default, Serialize)]
pub struct BuildResponse {
    reports: Vec<JobReport>,
    /// Total wall-clock time for the batch.
    pub total_duration: Duration,
}

impl BuildResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one report. The dispatcher calls this exactly once per
    /// descriptor it was handed.
    pub fn add_report(&mut self, report: JobReport) {
        self.reports.push(report);
    }

    /// All reports, in dispatch order.
    pub fn reports(&self) -> &[JobReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Look up the outcome for one job identity.
    pub fn outcome_for(&self, key: &JobKey) -> Option<&JobOutcome> {
        self.reports
            .iter()
            .find(|report| report.key == *key)
            .map(|report| &report.outcome)
    }

    /// Number of reports with the given result code.
    pub fn count(&self, code: JobResultCode) -> usize {
        self.reports
            .iter()
            .filter(|report| report.outcome.code() == code)
            .count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.count(JobResultCode::Success)
    }

    pub fn failed_count(&self) -> usize {
        self.count(JobResultCode::Failed)
    }

    pub fn crashed_count(&self) -> usize {
        self.count(JobResultCode::Crashed)
    }

    pub fn cancelled_count(&self) -> usize {
        self.count(JobResultCode::Cancelled)
    }

    /// Whether the batch finished without failures or crashes.
    /// Cancellations do not count against success here; use
    /// [`BuildResponse::was_stopped`] to tell a clean build from a stopped
    /// one.
    pub fn is_success(&self) -> bool {
        self.reports
            .iter()
            .all(|report| !report.outcome.code().is_error())
    }

    /// Whether the shutdown gate stopped any job in this batch.
    pub fn was_stopped(&self) -> bool {
        self.cancelled_count() > 0
    }

    /// Reports for jobs that failed or crashed, in dispatch order.
    pub fn failures(&self) -> Vec<&JobReport> {
        self.reports
            .iter()
            .filter(|report| report.outcome.code().is_error())
            .collect()
    }

    /// Generate a human-readable summary of the batch.
    ///
    /// Failures are listed per job with their diagnostics verbatim;
    /// cancellations are summarized in one line without per-job noise.
    pub fn summary(&self) -> String {
        let succeeded = self.succeeded_count();
        let failed = self.failed_count();
        let crashed = self.crashed_count();
        let cancelled = self.cancelled_count();
        let total = self.len();

        let mut lines = Vec::new();
        if failed + crashed > 0 {
            lines.push(format!(
                "Build failed: {} succeeded, {} failed, {} crashed ({} job{})",
                succeeded,
                failed,
                crashed,
                total,
                if total == 1 { "" } else { "s" }
            ));
            for report in self.failures() {
                lines.push(format!("  - {}: {}", report.key, report.outcome));
            }
            if cancelled > 0 {
                lines.push(format!(
                    "  build stopped; {} job{} cancelled",
                    cancelled,
                    if cancelled == 1 { "" } else { "s" }
                ));
            }
        } else if cancelled > 0 {
            lines.push(format!(
                "Build stopped: {} succeeded, {} cancelled ({} job{})",
                succeeded,
                cancelled,
                total,
                if total == 1 { "" } else { "s" }
            ));
        } else {
            lines.push(format!(
                "Build succeeded: {} job{} in {:?}",
                total,
                if total == 1 { "" } else { "s" },
                self.total_duration
            ));
        }
        lines.join("\n")
    }
}
