//! Typed outcomes of job execution.
//!
//! Every dispatched job resolves to exactly one [`JobOutcome`]: a product
//! on success, or a result code plus diagnostic on anything else. Failures
//! travel as values, never as panics or process exits, so the orchestrator
//! can always account for the job.

use crate::jobs::product::JobProduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal classification of a completed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobResultCode {
    /// The job produced its artifacts.
    Success,
    /// Deterministic failure: bad source, compiler rejection, output not
    /// writable. Re-running without changing the input fails again.
    Failed,
    /// Abnormal termination: the compiler or executor fell over mid-job.
    Crashed,
    /// The shutdown gate stopped the job before or during execution.
    Cancelled,
}

impl JobResultCode {
    /// True for the codes that should fail a batch (crashes included,
    /// cancellations not).
    pub fn is_error(&self) -> bool {
        matches!(self, JobResultCode::Failed | JobResultCode::Crashed)
    }
}

impl fmt::Display for JobResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobResultCode::Success => write!(f, "success"),
            JobResultCode::Failed => write!(f, "failed"),
            JobResultCode::Crashed => write!(f, "crashed"),
            JobResultCode::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of one job. Exactly one side exists, and the variant never
/// changes once constructed.
///
/// The representation is private: `success`, `failed`, `crashed` and
/// `cancelled` are the only way to build an outcome, so a failure can never
/// carry a `Success` code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobOutcome {
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
enum Repr {
    /// The job finished and produced artifact metadata.
    Success(JobProduct),
    /// The job did not produce a product; `code` says how it ended.
    Failure { code: JobResultCode, message: String },
}

impl JobOutcome {
    pub fn success(product: JobProduct) -> Self {
        Self {
            repr: Repr::Success(product),
        }
    }

    /// Deterministic failure with a diagnostic for the asset author.
    ///
    /// The message is carried verbatim; compiler diagnostics must reach the
    /// author unedited.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            repr: Repr::Failure {
                code: JobResultCode::Failed,
                message: message.into(),
            },
        }
    }

    /// Abnormal termination of the job's collaborator or executor.
    pub fn crashed(message: impl Into<String>) -> Self {
        Self {
            repr: Repr::Failure {
                code: JobResultCode::Crashed,
                message: message.into(),
            },
        }
    }

    /// Job stopped by the shutdown gate.
    pub fn cancelled() -> Self {
        Self {
            repr: Repr::Failure {
                code: JobResultCode::Cancelled,
                message: "build stopped".to_string(),
            },
        }
    }

    pub fn code(&self) -> JobResultCode {
        match &self.repr {
            Repr::Success(_) => JobResultCode::Success,
            Repr::Failure { code, .. } => *code,
        }
    }

    /// Product metadata, present only on success.
    pub fn product(&self) -> Option<&JobProduct> {
        match &self.repr {
            Repr::Success(product) => Some(product),
            Repr::Failure { .. } => None,
        }
    }

    /// Failure diagnostic, absent on success.
    pub fn message(&self) -> Option<&str> {
        match &self.repr {
            Repr::Success(_) => None,
            Repr::Failure { message, .. } => Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.repr, Repr::Success(_))
    }

    pub fn is_cancelled(&self) -> bool {
        self.code() == JobResultCode::Cancelled
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Success(_) => write!(f, "success"),
            Repr::Failure { code, message } => match code {
                // Cancellations are quiet; there is nothing to diagnose.
                JobResultCode::Cancelled => write!(f, "cancelled"),
                _ => write!(f, "{}: {}", code, message),
            },
        }
    }
}
