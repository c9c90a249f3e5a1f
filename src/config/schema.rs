//! Configuration schema for `assetbuild.toml`.
//!
//! The config file describes one build worker: which source extensions it
//! claims, which platforms it builds by default, how each platform wants
//! its output produced, and where the cache lives.
//!
//! ```toml
//! [worker]
//! name = "scripts"
//! extensions = ["lua"]
//! platforms = ["pc", "console"]
//!
//! [cache]
//! root = "cache"
//!
//! [platforms.pc]
//! action = "copy"
//!
//! [platforms.console]
//! action = "compile"
//!
//! [compiler]
//! command = ["luac", "-o", "-", "-"]
//! output_extension = "luac"
//! ```

use crate::jobs::JobKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Worker identity and capability section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSection {
    /// Worker name, used in logs only.
    #[serde(default = "default_worker_name")]
    pub name: String,
    /// Source extensions this worker claims (lowercase, no leading dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Platforms built when the caller does not narrow the set, in build
    /// order.
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            name: default_worker_name(),
            extensions: default_extensions(),
            platforms: default_platforms(),
        }
    }
}

fn default_worker_name() -> String {
    "scripts".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["lua".to_string()]
}

fn default_platforms() -> Vec<String> {
    vec!["pc".to_string()]
}

/// Output cache section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSection {
    /// Cache root directory; artifacts land under `<root>/<platform>/`.
    #[serde(default = "default_cache_root")]
    pub root: PathBuf,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
        }
    }
}

fn default_cache_root() -> PathBuf {
    PathBuf::from("cache")
}

/// Build strategy for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// "copy" or "compile".
    #[serde(default = "default_action")]
    pub action: JobKind,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            action: default_action(),
        }
    }
}

fn default_action() -> JobKind {
    JobKind::Copy
}

/// External compiler section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerSection {
    /// Argv template for the compiler command. `{platform}` in any argument
    /// is replaced with the job's platform. Empty means no compiler is
    /// available.
    #[serde(default)]
    pub command: Vec<String>,
    /// Extension for compiled artifacts (no leading dot).
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            output_extension: default_output_extension(),
        }
    }
}

fn default_output_extension() -> String {
    "bin".to_string()
}

/// Root configuration for one build worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default)]
    pub worker: WorkerSection,
    #[serde(default)]
    pub cache: CacheSection,
    /// Per-platform build strategies. Platforms missing from this table
    /// default to copy.
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformConfig>,
    #[serde(default)]
    pub compiler: CompilerSection,
}

impl WorkerConfig {
    /// Validate cross-field constraints.
    ///
    /// Returns a list of human-readable problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.worker.extensions.is_empty() {
            errors.push("worker.extensions must not be empty".to_string());
        }
        for ext in &self.worker.extensions {
            if ext.is_empty() {
                errors.push("worker.extensions contains an empty entry".to_string());
            } else if ext.starts_with('.') {
                errors.push(format!(
                    "extension '{}' must be written without the leading dot",
                    ext
                ));
            }
        }

        if self.worker.platforms.is_empty() {
            errors.push("worker.platforms must not be empty".to_string());
        }

        let wants_compile = self
            .platforms
            .values()
            .any(|p| p.action == JobKind::Compile);
        if wants_compile && self.compiler.command.is_empty() {
            errors.push(
                "a platform requests compiled output but compiler.command is empty".to_string(),
            );
        }

        if self.compiler.output_extension.starts_with('.') {
            errors.push(format!(
                "compiler.output_extension '{}' must be written without the leading dot",
                self.compiler.output_extension
            ));
        }

        errors
    }
}
