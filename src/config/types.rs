use crate::analyzer::iac::file_loader::DEFAULT_MAX_DEPTH;
use crate::analyzer::iac::formatter::OutputFormat;
use crate::analyzer::iac::local_cache::LocalCache;
use crate::analyzer::iac::policy_engine::DEFAULT_ENTRYPOINT;
use crate::analyzer::iac::types::Severity;
use crate::analyzer::iac::TestOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

/// Local policy cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the policy artifacts
    pub dir: PathBuf,
}

/// Scan configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum directory depth when scanning a directory
    pub max_depth: usize,
    /// Rego rule evaluated for every document
    pub entrypoint: String,
    /// Report per-document evaluation failures instead of failing the scan
    pub isolate_failures: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Lowest severity that is reported and counted
    pub severity_threshold: Severity,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: LocalCache::default_dir(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            entrypoint: DEFAULT_ENTRYPOINT.to_string(),
            isolate_failures: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Plain,
            severity_threshold: Severity::Low,
        }
    }
}

impl Config {
    /// Scan options derived from this configuration.
    pub fn test_options(&self) -> TestOptions {
        TestOptions {
            cache_dir: self.cache.dir.clone(),
            max_depth: self.scan.max_depth,
            entrypoint: self.scan.entrypoint.clone(),
            isolate_failures: self.scan.isolate_failures,
        }
    }
}
