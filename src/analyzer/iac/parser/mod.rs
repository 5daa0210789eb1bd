//! Parsing of loaded IaC files into normalized JSON documents.
//!
//! Each engine type has one parsing strategy:
//! - Kubernetes manifests (`yaml`, `yml`, `json`) are read as a YAML stream
//! - Terraform configurations (`tf`) are read as HCL
//!
//! Failures are isolated per file when more than one file is parsed. A batch
//! with a single file fails outright instead.

pub mod kubernetes;
pub mod terraform;

use crate::analyzer::iac::types::{
    EngineType, FailedIacFileParse, IacFileData, ParsedIacFile, ParsingResults,
};
use crate::error::{IacError, Result};
use thiserror::Error;

pub use kubernetes::{REQUIRED_K8S_FIELDS, parse_kubernetes_file};
pub use terraform::parse_terraform_file;

/// Signature shared by all parsing strategies.
pub type ParseFn = fn(&IacFileData) -> std::result::Result<Vec<ParsedIacFile>, ParseError>;

/// Why a single file could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// YAML stream could not be decoded.
    #[error("Invalid K8s File! YAML syntax error: {0}")]
    InvalidYaml(String),

    /// A document in the stream is not a Kubernetes object.
    #[error("Invalid K8s File! Document {doc_id} is missing required field(s): {}", .missing.join(", "))]
    InvalidKubernetesFile { doc_id: usize, missing: Vec<String> },

    /// HCL could not be parsed.
    #[error("Invalid Terraform File! {0}")]
    InvalidTerraformFile(String),

    /// Extension outside of the accepted set.
    #[error("Invalid IaC file type: {0}")]
    UnsupportedFileType(String),
}

/// Parsing strategy for an engine type.
pub fn strategy_for(engine_type: EngineType) -> ParseFn {
    match engine_type {
        EngineType::Kubernetes => parse_kubernetes_file,
        EngineType::Terraform => parse_terraform_file,
    }
}

/// Parse one file with the strategy its declared type maps to.
pub fn try_parse_iac_file(
    file: &IacFileData,
) -> std::result::Result<Vec<ParsedIacFile>, ParseError> {
    strategy_for(file.file_type.engine_type())(file)
}

/// Parse a batch of files.
///
/// With exactly one file, its parse error is returned as the fatal outcome.
/// With more, every failing file becomes a `FailedIacFileParse` and the rest
/// of the batch is still parsed.
pub fn parse_files_for_scan(files: Vec<IacFileData>) -> Result<ParsingResults> {
    let fail_fast = files.len() == 1;
    let mut results = ParsingResults::default();

    for file in files {
        match try_parse_iac_file(&file) {
            Ok(documents) => results.parsed_files.extend(documents),
            Err(source) if fail_fast => {
                return Err(IacError::Parse {
                    path: file.file_path,
                    source,
                });
            }
            Err(err) => {
                log::debug!("Failed to parse {}: {}", file.file_path.display(), err);
                results
                    .failed_files
                    .push(FailedIacFileParse::from_parse_error(file, err));
            }
        }
    }

    log::info!(
        "Parsed {} document(s), {} file(s) failed",
        results.parsed_files.len(),
        results.failed_files.len()
    );

    Ok(results)
}
