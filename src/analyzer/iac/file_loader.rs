//! Discovery and loading of IaC files to scan.

use crate::analyzer::iac::types::{IacFileData, IacFileType};
use crate::error::{IacError, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How deep a directory scan descends by default.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Load the files to scan from `path`.
///
/// A directory is walked up to `max_depth` levels, keeping files with an
/// accepted extension; finding none is an error. A single file must itself
/// have an accepted extension.
pub async fn get_file_paths_to_scan(path: &Path, max_depth: usize) -> Result<Vec<IacFileData>> {
    if path.is_dir() {
        let files = get_files_from_directory(path, max_depth).await?;
        if files.is_empty() {
            return Err(IacError::NoValidFiles(path.to_path_buf()));
        }
        log::info!("Found {} IaC file(s) in {}", files.len(), path.display());
        return Ok(files);
    }

    match IacFileType::from_path(path) {
        Some(file_type) => Ok(vec![load_file(path.to_path_buf(), file_type).await?]),
        None => Err(IacError::InvalidIacFile(path.to_path_buf())),
    }
}

async fn get_files_from_directory(root: &Path, max_depth: usize) -> Result<Vec<IacFileData>> {
    let candidates: Vec<(PathBuf, IacFileType)> = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            IacFileType::from_path(entry.path()).map(|file_type| (entry.into_path(), file_type))
        })
        .collect();

    let mut files = Vec::with_capacity(candidates.len());
    for (path, file_type) in candidates {
        files.push(load_file(path, file_type).await?);
    }
    Ok(files)
}

/// Read a file as UTF-8. Invalid sequences are replaced; the parser reports
/// content that is still unusable.
async fn load_file(path: PathBuf, file_type: IacFileType) -> Result<IacFileData> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| IacError::FileRead {
            path: path.clone(),
            source,
        })?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(IacFileData::new(path, file_type, content))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
