use crate::analyzer::iac::parser::ParseError;
use crate::analyzer::iac::policy_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IacError {
    #[error("Missing IaC local cache data, please validate you have: \n{}", display_paths(.required))]
    MissingLocalCache { required: Vec<PathBuf> },

    #[error("No valid IaC files found in provided directory: {}", .0.display())]
    NoValidFiles(PathBuf),

    #[error("Invalid IaC file: {}", .0.display())]
    InvalidIacFile(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to build policy engine from path: {}: \n err: {source}", .path.display())]
    PolicyEngineBuild {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Failed to run policy engine on {}: {reason}", .path.display())]
    PolicyEvaluation { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    ParsingFailed { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, IacError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
