//! Job descriptors: the immutable records describing units of build work.
//!
//! A descriptor captures one asset/platform pair and the strategy used to
//! build it. Descriptors are produced by the job creation policy and
//! consumed by the executor; re-evaluating an asset produces fresh
//! descriptors rather than editing existing ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// How a job turns its source asset into a platform artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Transform the source through the asset compiler.
    Compile,
    /// Republish the source bytes unchanged.
    Copy,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Compile => write!(f, "compile"),
            JobKind::Copy => write!(f, "copy"),
        }
    }
}

/// Identity of a job: one asset, one platform, one kind.
///
/// Two descriptors with equal keys describe the same unit of work. The
/// batch response is looked up by this triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobKey {
    pub source_path: PathBuf,
    pub platform: String,
    pub kind: JobKind,
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}@{}",
            self.kind,
            self.source_path.display(),
            self.platform
        )
    }
}

/// One unit of build work for one asset/platform pair.
///
/// Fields are private; a descriptor never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    source_path: PathBuf,
    platform: String,
    kind: JobKind,
    dependencies: Vec<JobDescriptor>,
}

impl JobDescriptor {
    /// Create a descriptor with no dependencies.
    pub fn new(
        source_path: impl Into<PathBuf>,
        platform: impl Into<String>,
        kind: JobKind,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            platform: platform.into(),
            kind,
            dependencies: Vec::new(),
        }
    }

    /// Attach jobs whose products this one depends on.
    pub fn with_dependencies(mut self, dependencies: Vec<JobDescriptor>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Path of the source asset this job builds.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Target platform identifier (e.g. "pc", "console").
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Build strategy for this job.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Jobs that must complete before this one is dispatched.
    pub fn dependencies(&self) -> &[JobDescriptor] {
        &self.dependencies
    }

    /// The identity triple for this descriptor.
    pub fn key(&self) -> JobKey {
        JobKey {
            source_path: self.source_path.clone(),
            platform: self.platform.clone(),
            kind: self.kind,
        }
    }
}

/// Input to job creation: one source asset plus the platforms currently
/// enabled for building. The policy reads it and never writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    source_path: PathBuf,
    platforms: Vec<String>,
}

impl JobRequest {
    pub fn new(source_path: impl Into<PathBuf>, platforms: Vec<String>) -> Self {
        Self {
            source_path: source_path.into(),
            platforms,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Enabled platforms, in the order jobs should be created.
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }
}
