//! Local IaC scanning.
//!
//! Scans Kubernetes manifests and Terraform configurations against policy
//! artifacts kept in a local cache, without any network access.
//!
//! # Pipeline
//!
//! 1. Check the local policy cache is complete
//! 2. Load the files to scan (`file_loader`)
//! 3. Parse them into JSON documents (`parser`)
//! 4. Evaluate every document against its engine type's policy (`scanner`)
//!
//! # Example
//!
//! ```rust,ignore
//! use iac_scanner::analyzer::iac::{test, TestOptions};
//! use std::path::Path;
//!
//! let results = test(Path::new("./k8s"), &TestOptions::default()).await?;
//! for result in &results.scanned_files {
//!     for policy in &result.violated_policies {
//!         println!("{}: [{}] {}", result.file_path().display(), policy.severity, policy.title);
//!     }
//! }
//! ```

pub mod engine_cache;
pub mod file_loader;
pub mod formatter;
pub mod local_cache;
pub mod parser;
pub mod policy_engine;
pub mod scanner;
pub mod types;

pub use engine_cache::PolicyEngineCache;
pub use local_cache::LocalCache;
pub use policy_engine::{LocalCacheLoader, PolicyEngine, PolicyEngineLoader};
pub use scanner::IacScanner;
pub use types::{
    EngineType, FailedIacFileParse, IacFileData, IacFileScanResult, IacFileType, ParsedIacFile,
    PolicyMetadata, ScanningResults, Severity,
};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Settings for a single scan.
#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Directory holding the policy artifacts.
    pub cache_dir: PathBuf,
    /// Maximum directory depth when scanning a directory.
    pub max_depth: usize,
    /// Rego rule evaluated for every document.
    pub entrypoint: String,
    /// Report per-document evaluation failures instead of failing the scan.
    pub isolate_failures: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            cache_dir: LocalCache::default_dir(),
            max_depth: file_loader::DEFAULT_MAX_DEPTH,
            entrypoint: policy_engine::DEFAULT_ENTRYPOINT.to_string(),
            isolate_failures: false,
        }
    }
}

/// Scan a file or directory.
///
/// Files that failed to parse (only possible when more than one file was
/// loaded) are returned as unscanned files next to the scan results.
pub async fn test(path: &Path, options: &TestOptions) -> Result<ScanningResults> {
    let local_cache = LocalCache::new(&options.cache_dir);
    local_cache.ensure_exists()?;

    let files = file_loader::get_file_paths_to_scan(path, options.max_depth).await?;
    let parsing = parser::parse_files_for_scan(files)?;

    let loader = LocalCacheLoader::new(local_cache, options.entrypoint.clone());
    let scanner = IacScanner::new(PolicyEngineCache::new(loader));

    let mut unscanned_files = parsing.failed_files;
    let scanned_files = if options.isolate_failures {
        let (scanned, failed) = scanner.scan_files_isolated(parsing.parsed_files).await?;
        unscanned_files.extend(failed);
        scanned
    } else {
        scanner.scan_files_for_issues(parsing.parsed_files).await?
    };

    Ok(ScanningResults {
        scanned_files,
        unscanned_files,
    })
}
