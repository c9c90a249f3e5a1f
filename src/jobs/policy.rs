//! Job creation policy.
//!
//! Decides, from a static capability table, which build jobs a source asset
//! needs: one per enabled platform, compiling where the platform's runtime
//! wants transformed output and copying where it consumes the source format
//! directly. The policy never looks at file contents, only names.

use crate::config::WorkerConfig;
use crate::jobs::descriptor::{JobDescriptor, JobKind, JobRequest};
use std::collections::HashMap;
use std::path::Path;

/// Capability table for one build worker.
#[derive(Debug, Clone)]
pub struct JobPolicy {
    /// Claimed source extensions, lowercase, no leading dot.
    extensions: Vec<String>,
    /// Per-platform build strategy. Platforms without an entry get the
    /// default.
    actions: HashMap<String, JobKind>,
    default_kind: JobKind,
}

impl JobPolicy {
    /// Policy that copies for every platform unless told otherwise.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.into().to_ascii_lowercase())
                .collect(),
            actions: HashMap::new(),
            default_kind: JobKind::Copy,
        }
    }

    /// Set the build strategy for one platform.
    pub fn with_action(mut self, platform: impl Into<String>, kind: JobKind) -> Self {
        self.actions.insert(platform.into(), kind);
        self
    }

    /// Build the capability table from loaded configuration.
    pub fn from_config(config: &WorkerConfig) -> Self {
        let mut policy = Self::new(config.worker.extensions.iter().cloned());
        for (platform, platform_config) in &config.platforms {
            policy = policy.with_action(platform.clone(), platform_config.action);
        }
        policy
    }

    /// Whether this worker builds the given source at all.
    ///
    /// Matching is by file extension, case-insensitive. Paths without an
    /// extension are never claimed.
    pub fn supports(&self, source_path: &Path) -> bool {
        match source_path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|claimed| *claimed == ext)
            }
            None => false,
        }
    }

    /// Build strategy for a platform.
    pub fn action_for(&self, platform: &str) -> JobKind {
        self.actions
            .get(platform)
            .copied()
            .unwrap_or(self.default_kind)
    }

    /// Fan a request out into build jobs.
    ///
    /// Returns one descriptor per enabled platform, in the request's
    /// platform order. An unsupported asset yields no jobs at all; that is
    /// a normal answer, not an error, since another worker may claim it.
    pub fn create_jobs(&self, request: &JobRequest) -> Vec<JobDescriptor> {
        if !self.supports(request.source_path()) {
            return Vec::new();
        }
        request
            .platforms()
            .iter()
            .map(|platform| {
                JobDescriptor::new(
                    request.source_path(),
                    platform.clone(),
                    self.action_for(platform),
                )
            })
            .collect()
    }
}
