//! # IaC Scanner
//!
//! Tests Kubernetes manifests and Terraform configurations against Rego
//! policies stored in a local cache directory.
//!
//! ## Features
//!
//! - **Kubernetes**: multi-document YAML and JSON manifests, validated per document
//! - **Terraform**: HCL configurations converted to JSON documents
//! - **Local policies**: one policy engine per engine type, built once per scan
//! - **Concurrent scanning**: every document is evaluated concurrently
//!
//! ## Example
//!
//! ```rust,no_run
//! use iac_scanner::analyzer::iac::{test, TestOptions};
//! use std::path::Path;
//!
//! # async fn run() -> iac_scanner::Result<()> {
//! let results = test(Path::new("./deploy"), &TestOptions::default()).await?;
//! println!("{} document(s) scanned", results.scanned_files.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

pub use analyzer::iac::{TestOptions, test};
pub use error::{IacError, Result};
pub use handlers::*;
use cli::Commands;

/// Run a command and return the process exit code.
pub async fn run_command(command: Commands, config: &config::types::Config) -> Result<i32> {
    match command {
        Commands::Test {
            path,
            json,
            severity_threshold,
            cache_dir,
            isolate_failures,
            no_fail,
        } => {
            let args = TestArgs {
                path,
                json,
                severity_threshold,
                cache_dir,
                isolate_failures,
                no_fail,
            };
            handlers::handle_test(args, config).await
        }
    }
}
