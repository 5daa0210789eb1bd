use crate::analyzer::iac::types::Severity;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iac-scan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan Kubernetes and Terraform files against locally cached policies")]
#[command(long_about = "Tests Kubernetes manifests (YAML/JSON) and Terraform configurations against Rego policies kept in a local cache directory. No network access is needed.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Test a file or directory of IaC files for issues
    Test {
        /// File or directory to scan
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,

        /// Only report issues at or above this severity
        #[arg(long, value_enum)]
        severity_threshold: Option<SeverityThreshold>,

        /// Directory holding the policy artifacts
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Report documents whose evaluation failed instead of aborting the scan
        #[arg(long)]
        isolate_failures: bool,

        /// Exit with status 0 even when issues are found
        #[arg(long)]
        no_fail: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityThreshold {
    Low,
    Medium,
    High,
    Critical,
}

impl From<SeverityThreshold> for Severity {
    fn from(threshold: SeverityThreshold) -> Self {
        match threshold {
            SeverityThreshold::Low => Severity::Low,
            SeverityThreshold::Medium => Severity::Medium,
            SeverityThreshold::High => Severity::High,
            SeverityThreshold::Critical => Severity::Critical,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
