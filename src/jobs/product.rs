//! Product metadata returned by successful jobs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One output artifact of a successful job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductArtifact {
    /// Path relative to the platform's cache root.
    pub path: PathBuf,
    /// Stable identifier for this artifact within its product, assigned in
    /// artifact order starting at zero. Downstream references use it to
    /// survive output reordering between builds.
    pub sub_id: u32,
    /// Whether dependency bookkeeping for this artifact is complete.
    pub dependencies_handled: bool,
}

/// Artifact metadata for one successful job.
///
/// Returned to the caller as part of the job outcome; the pipeline keeps no
/// copy once the outcome is handed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProduct {
    artifacts: Vec<ProductArtifact>,
}

impl JobProduct {
    /// Product with a single artifact (sub id 0).
    pub fn single(path: impl Into<PathBuf>, dependencies_handled: bool) -> Self {
        Self {
            artifacts: vec![ProductArtifact {
                path: path.into(),
                sub_id: 0,
                dependencies_handled,
            }],
        }
    }

    /// Product from ordered relative paths. Sub ids follow the iteration
    /// order, so callers must pass paths in output order.
    pub fn from_paths<I, P>(paths: I, dependencies_handled: bool) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let artifacts = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| ProductArtifact {
                path: path.into(),
                sub_id: index as u32,
                dependencies_handled,
            })
            .collect();
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &[ProductArtifact] {
        &self.artifacts
    }

    /// Relative output paths, in artifact order.
    pub fn output_paths(&self) -> Vec<&Path> {
        self.artifacts.iter().map(|a| a.path.as_path()).collect()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_artifact() {
        let product = JobProduct::single("walk.lua", true);
        assert_eq!(product.len(), 1);
        assert_eq!(product.artifacts()[0].path, PathBuf::from("walk.lua"));
        assert_eq!(product.artifacts()[0].sub_id, 0);
        assert!(product.artifacts()[0].dependencies_handled);
    }

    #[test]
    fn test_from_paths_assigns_sub_ids_in_order() {
        let product = JobProduct::from_paths(["walk.luac", "walk.dbg"], false);
        let subs: Vec<u32> = product.artifacts().iter().map(|a| a.sub_id).collect();
        assert_eq!(subs, vec![0, 1]);
        assert!(!product.artifacts()[0].dependencies_handled);
    }

    #[test]
    fn test_output_paths_preserve_order() {
        let product = JobProduct::from_paths(["b.bin", "a.bin"], true);
        assert_eq!(
            product.output_paths(),
            vec![Path::new("b.bin"), Path::new("a.bin")]
        );
    }

    #[test]
    fn test_empty_product() {
        let product = JobProduct::default();
        assert!(product.is_empty());
        assert!(product.output_paths().is_empty());
    }
}
