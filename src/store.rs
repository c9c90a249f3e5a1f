//! Output cache store.
//!
//! Where finished artifacts land. The pipeline only needs to write and
//! remove; the concrete cache layout belongs to the store, and the
//! executor addresses everything by platform plus relative path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Platform-addressed artifact storage.
///
/// Implementations must be callable from any worker thread.
pub trait ArtifactStore: Send + Sync {
    /// Write one artifact into a platform's cache, creating parent
    /// directories as needed. Returns the absolute path written.
    fn write_artifact(
        &self,
        platform: &str,
        relative_path: &Path,
        bytes: &[u8],
    ) -> io::Result<PathBuf>;

    /// Remove a previously written artifact. A missing file is not an
    /// error; removal exists so failed jobs can take back partial output.
    fn remove_artifact(&self, platform: &str, relative_path: &Path) -> io::Result<()>;
}

/// Filesystem store with the layout `<root>/<platform>/<relative_path>`.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path an artifact occupies in this store.
    pub fn artifact_path(&self, platform: &str, relative_path: &Path) -> PathBuf {
        self.root.join(platform).join(relative_path)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write_artifact(
        &self,
        platform: &str,
        relative_path: &Path,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let path = self.artifact_path(platform, relative_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, bytes)?;
        Ok(path)
    }

    fn remove_artifact(&self, platform: &str, relative_path: &Path) -> io::Result<()> {
        match fs::remove_file(self.artifact_path(platform, relative_path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
