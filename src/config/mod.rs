pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".iac-scan.toml";

/// Get the global config file path (~/.iac-scan.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (project/.iac-scan.toml)
pub fn local_config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit `config_file` must exist and parse. Otherwise the local config
/// in `project_path` is tried, then the global one, then defaults; unreadable
/// implicit config files are skipped with a warning.
pub fn load_config(config_file: Option<&Path>, project_path: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = config_file {
        return Ok(read_config(path)?);
    }

    let candidates = project_path
        .map(local_config_path)
        .into_iter()
        .chain(global_config_path());

    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match read_config(&candidate) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", candidate.display());
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring configuration: {}", e),
        }
    }

    Ok(types::Config::default())
}

fn read_config(path: &Path) -> std::result::Result<types::Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
