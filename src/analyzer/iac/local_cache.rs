//! Local on-disk cache holding the policy artifacts for each engine type.

use crate::analyzer::iac::types::EngineType;
use crate::error::{IacError, Result};
use std::path::{Path, PathBuf};

/// Default cache directory name.
pub const LOCAL_POLICY_ENGINE_DIR: &str = ".iac-data";

/// Policy module and metadata file names for an engine type.
fn artifact_names(engine_type: EngineType) -> (&'static str, &'static str) {
    match engine_type {
        EngineType::Kubernetes => ("k8s_policy.rego", "k8s_data.json"),
        EngineType::Terraform => ("tf_policy.rego", "tf_data.json"),
    }
}

/// Handle on the policy cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.iac-scan/.iac-data`, or `./.iac-data` when there is no home directory.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".iac-scan").join(LOCAL_POLICY_ENGINE_DIR))
            .unwrap_or_else(|| PathBuf::from(LOCAL_POLICY_ENGINE_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the policy module and its metadata for `engine_type`.
    pub fn policy_paths(&self, engine_type: EngineType) -> (PathBuf, PathBuf) {
        let (policy, metadata) = artifact_names(engine_type);
        (self.dir.join(policy), self.dir.join(metadata))
    }

    /// Every file the scanner needs, across all engine types.
    pub fn required_files(&self) -> Vec<PathBuf> {
        EngineType::ALL
            .iter()
            .flat_map(|engine_type| {
                let (policy, metadata) = self.policy_paths(*engine_type);
                [policy, metadata]
            })
            .collect()
    }

    pub fn exists(&self) -> bool {
        self.required_files().iter().all(|path| path.is_file())
    }

    /// Fail with the list of required files if any of them is missing.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(IacError::MissingLocalCache {
                required: self.required_files(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_policy_paths() {
        let cache = LocalCache::new("/tmp/cache");
        let (policy, metadata) = cache.policy_paths(EngineType::Terraform);
        assert_eq!(policy, PathBuf::from("/tmp/cache/tf_policy.rego"));
        assert_eq!(metadata, PathBuf::from("/tmp/cache/tf_data.json"));
    }

    #[test]
    fn test_required_files_cover_every_engine() {
        let cache = LocalCache::new("cache");
        let required = cache.required_files();
        assert_eq!(required.len(), 4);
        assert!(required.contains(&PathBuf::from("cache/k8s_policy.rego")));
        assert!(required.contains(&PathBuf::from("cache/tf_data.json")));
    }

    #[test]
    fn test_exists_requires_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LocalCache::new(temp_dir.path());
        assert!(!cache.exists());

        for path in cache.required_files().iter().skip(1) {
            fs::write(path, "{}").unwrap();
        }
        assert!(!cache.exists());

        fs::write(&cache.required_files()[0], "package rules").unwrap();
        assert!(cache.exists());
        assert!(cache.ensure_exists().is_ok());
    }

    #[test]
    fn test_missing_cache_error_lists_files() {
        let cache = LocalCache::new("nowhere");
        let err = cache.ensure_exists().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Missing IaC local cache data"));
        for path in cache.required_files() {
            assert!(message.contains(&path.display().to_string()));
        }
    }
}
