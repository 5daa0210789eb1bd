//! Core types for the local IaC scan pipeline.
//!
//! - `IacFileType` / `EngineType` - what a file declares itself as, and which policy domain it maps to
//! - `IacFileData` - a loaded file, input to the parser
//! - `ParsedIacFile` / `FailedIacFileParse` - parser outputs
//! - `PolicyMetadata` - a violation reported by the policy engine
//! - `IacFileScanResult` - a parsed document plus its violations

use crate::analyzer::iac::parser::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Declared type of an IaC file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IacFileType {
    Tf,
    Json,
    Yaml,
    Yml,
}

impl IacFileType {
    /// Classify a path by its extension. Returns `None` for anything the scanner does not accept.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tf => "tf",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Yml => "yml",
        }
    }

    /// The policy domain this file type is scanned under.
    pub fn engine_type(&self) -> EngineType {
        match self {
            Self::Yaml | Self::Yml | Self::Json => EngineType::Kubernetes,
            Self::Tf => EngineType::Terraform,
        }
    }
}

impl FromStr for IacFileType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tf" => Ok(Self::Tf),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "yml" => Ok(Self::Yml),
            other => Err(ParseError::UnsupportedFileType(other.to_string())),
        }
    }
}

impl fmt::Display for IacFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy domain a document belongs to. Each engine type has its own policy artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Kubernetes,
    Terraform,
}

impl EngineType {
    /// Every engine type, in warm-up order.
    pub const ALL: [EngineType; Self::COUNT] = [EngineType::Kubernetes, EngineType::Terraform];

    pub const COUNT: usize = 2;

    /// Dense index for per-engine-type tables.
    pub fn index(&self) -> usize {
        match self {
            Self::Kubernetes => 0,
            Self::Terraform => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kubernetes => "kubernetes",
            Self::Terraform => "terraform",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file loaded from disk, ready to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IacFileData {
    pub file_path: PathBuf,
    pub file_type: IacFileType,
    pub file_content: String,
}

impl IacFileData {
    pub fn new(
        file_path: impl Into<PathBuf>,
        file_type: IacFileType,
        file_content: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            file_type,
            file_content: file_content.into(),
        }
    }
}

/// A single document normalized to JSON.
///
/// Multi-document YAML files produce one `ParsedIacFile` per document, each
/// tagged with its position in the stream (`doc_id`). Terraform files never
/// carry a document index.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIacFile {
    pub file: IacFileData,
    pub json_content: serde_json::Value,
    pub engine_type: EngineType,
    pub doc_id: Option<usize>,
}

impl ParsedIacFile {
    pub fn new(
        file: IacFileData,
        json_content: serde_json::Value,
        engine_type: EngineType,
        doc_id: Option<usize>,
    ) -> Self {
        Self {
            file,
            json_content,
            engine_type,
            doc_id,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file.file_path
    }
}

/// A file that could not be scanned.
///
/// There is no engine type and no JSON content. `error` holds the parser
/// classification; it is `None` when the file parsed but its evaluation failed
/// with failure isolation enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedIacFileParse {
    pub file: IacFileData,
    pub failure_reason: String,
    pub error: Option<ParseError>,
}

impl FailedIacFileParse {
    pub fn from_parse_error(file: IacFileData, error: ParseError) -> Self {
        Self {
            file,
            failure_reason: error.to_string(),
            error: Some(error),
        }
    }

    pub fn from_scan_failure(file: IacFileData, reason: impl Into<String>) -> Self {
        Self {
            file,
            failure_reason: reason.into(),
            error: None,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file.file_path
    }
}

/// Output of the parse stage.
#[derive(Debug, Clone, Default)]
pub struct ParsingResults {
    pub parsed_files: Vec<ParsedIacFile>,
    pub failed_files: Vec<FailedIacFileParse>,
}

/// Violation severity, ordered `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Marker for which policy runtime produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyEngineKind {
    #[default]
    Opa,
}

/// A policy violation as emitted by the policy engine.
///
/// The scanner does not interpret these fields; they are deserialized from the
/// engine's output and handed to the formatter unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyMetadata {
    pub id: String,
    pub public_id: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub sub_type: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub msg: String,
    pub policy_engine_type: PolicyEngineKind,
    pub issue: String,
    pub impact: String,
    pub resolve: String,
    pub references: Vec<String>,
}

/// A scanned document and the violations found in it.
///
/// `position` is the index of the source document in the orchestrator's input,
/// so callers that need input order can sort on it.
#[derive(Debug, Clone, PartialEq)]
pub struct IacFileScanResult {
    pub parsed: ParsedIacFile,
    pub violated_policies: Vec<PolicyMetadata>,
    pub position: usize,
}

impl IacFileScanResult {
    pub fn file_path(&self) -> &Path {
        self.parsed.file_path()
    }

    /// Violations at or above `threshold`.
    pub fn violations_at_or_above(
        &self,
        threshold: Severity,
    ) -> impl Iterator<Item = &PolicyMetadata> {
        self.violated_policies
            .iter()
            .filter(move |policy| policy.severity >= threshold)
    }
}

/// Final output of a scan: what was scanned and what could not be.
#[derive(Debug, Clone, Default)]
pub struct ScanningResults {
    pub scanned_files: Vec<IacFileScanResult>,
    pub unscanned_files: Vec<FailedIacFileParse>,
}

impl ScanningResults {
    /// Total number of violations at or above `threshold` across all scanned files.
    pub fn violation_count(&self, threshold: Severity) -> usize {
        self.scanned_files
            .iter()
            .map(|result| result.violations_at_or_above(threshold).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(
            IacFileType::from_path(Path::new("main.tf")),
            Some(IacFileType::Tf)
        );
        assert_eq!(
            IacFileType::from_path(Path::new("k8s/deploy.yml")),
            Some(IacFileType::Yml)
        );
        assert_eq!(IacFileType::from_path(Path::new("README.md")), None);
        assert_eq!(IacFileType::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_file_type_rejects_unknown_extension() {
        let err = "hcl".parse::<IacFileType>().unwrap_err();
        assert_eq!(err, ParseError::UnsupportedFileType("hcl".to_string()));
    }

    #[test]
    fn test_file_type_engine_mapping() {
        assert_eq!(IacFileType::Tf.engine_type(), EngineType::Terraform);
        assert_eq!(IacFileType::Json.engine_type(), EngineType::Kubernetes);
        assert_eq!(IacFileType::Yaml.engine_type(), EngineType::Kubernetes);
        assert_eq!(IacFileType::Yml.engine_type(), EngineType::Kubernetes);
    }

    #[test]
    fn test_engine_type_indices_are_dense() {
        for (i, engine_type) in EngineType::ALL.iter().enumerate() {
            assert_eq!(engine_type.index(), i);
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_policy_metadata_deserializes_engine_output() {
        let json = r#"{
            "id": "1",
            "publicId": "IAC-K8S-1",
            "type": "k8s",
            "subType": "Deployment",
            "title": "Container is running in privileged mode",
            "description": "",
            "severity": "high",
            "msg": "spec.containers[web].securityContext.privileged",
            "policyEngineType": "opa",
            "issue": "Container is privileged",
            "impact": "Compromised container could escape",
            "resolve": "Remove `privileged: true`",
            "references": ["https://kubernetes.io/docs/"]
        }"#;
        let policy: PolicyMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(policy.public_id, "IAC-K8S-1");
        assert_eq!(policy.policy_type, "k8s");
        assert_eq!(policy.sub_type, "Deployment");
        assert_eq!(policy.severity, Severity::High);
        assert_eq!(policy.policy_engine_type, PolicyEngineKind::Opa);
        assert_eq!(policy.references.len(), 1);
    }

    #[test]
    fn test_violation_count_respects_threshold() {
        let file = IacFileData::new("a.yaml", IacFileType::Yaml, "");
        let parsed = ParsedIacFile::new(
            file,
            serde_json::json!({}),
            EngineType::Kubernetes,
            Some(0),
        );
        let policy = |severity| PolicyMetadata {
            id: "x".to_string(),
            severity,
            ..Default::default()
        };
        let results = ScanningResults {
            scanned_files: vec![IacFileScanResult {
                parsed,
                violated_policies: vec![policy(Severity::Low), policy(Severity::High)],
                position: 0,
            }],
            unscanned_files: Vec::new(),
        };
        assert_eq!(results.violation_count(Severity::Low), 2);
        assert_eq!(results.violation_count(Severity::Medium), 1);
        assert_eq!(results.violation_count(Severity::Critical), 0);
    }
}
