//! JSON formatter.

use crate::analyzer::iac::types::{
    EngineType, FailedIacFileParse, IacFileScanResult, IacFileType, PolicyMetadata,
    ScanningResults, Severity,
};
use serde::Serialize;

/// Format scan results as JSON.
pub fn format(results: &ScanningResults, threshold: Severity) -> String {
    let output = JsonOutput::new(results, threshold);
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    scanned_files: Vec<JsonScannedFile<'a>>,
    unscanned_files: Vec<JsonUnscannedFile<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonScannedFile<'a> {
    file_path: String,
    file_type: IacFileType,
    engine_type: EngineType,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_id: Option<usize>,
    violated_policies: Vec<&'a PolicyMetadata>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonUnscannedFile<'a> {
    file_path: String,
    file_type: IacFileType,
    failure_reason: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    scanned: usize,
    unscanned: usize,
    total_violations: usize,
    severity_threshold: Severity,
}

impl<'a> JsonOutput<'a> {
    fn new(results: &'a ScanningResults, threshold: Severity) -> Self {
        let mut scanned: Vec<&IacFileScanResult> = results.scanned_files.iter().collect();
        scanned.sort_by_key(|result| result.position);

        Self {
            scanned_files: scanned
                .into_iter()
                .map(|result| JsonScannedFile::new(result, threshold))
                .collect(),
            unscanned_files: results
                .unscanned_files
                .iter()
                .map(JsonUnscannedFile::from)
                .collect(),
            summary: JsonSummary {
                scanned: results.scanned_files.len(),
                unscanned: results.unscanned_files.len(),
                total_violations: results.violation_count(threshold),
                severity_threshold: threshold,
            },
        }
    }
}

impl<'a> JsonScannedFile<'a> {
    fn new(result: &'a IacFileScanResult, threshold: Severity) -> Self {
        Self {
            file_path: result.file_path().display().to_string(),
            file_type: result.parsed.file.file_type,
            engine_type: result.parsed.engine_type,
            doc_id: result.parsed.doc_id,
            violated_policies: result.violations_at_or_above(threshold).collect(),
        }
    }
}

impl<'a> From<&'a FailedIacFileParse> for JsonUnscannedFile<'a> {
    fn from(failed: &'a FailedIacFileParse) -> Self {
        Self {
            file_path: failed.file_path().display().to_string(),
            file_type: failed.file.file_type,
            failure_reason: &failed.failure_reason,
        }
    }
}
