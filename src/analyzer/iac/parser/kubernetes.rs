//! Kubernetes manifest parsing.
//!
//! A manifest file is a YAML stream (JSON files are read the same way, being
//! valid YAML). Every document in the stream must be a Kubernetes object; the
//! first one that is not fails the whole file.

use super::ParseError;
use crate::analyzer::iac::types::{EngineType, IacFileData, ParsedIacFile};
use serde::Deserialize;
use serde_json::Value;

/// Top-level fields every Kubernetes object must declare.
pub const REQUIRED_K8S_FIELDS: [&str; 3] = ["apiVersion", "kind", "metadata"];

/// Parse a manifest file into one document per YAML document in the stream.
pub fn parse_kubernetes_file(file: &IacFileData) -> Result<Vec<ParsedIacFile>, ParseError> {
    let documents = load_yaml_documents(&file.file_content)?;

    documents
        .into_iter()
        .enumerate()
        .map(|(doc_id, document)| {
            validate_k8s_object(&document, doc_id)?;
            Ok(ParsedIacFile::new(
                file.clone(),
                document,
                EngineType::Kubernetes,
                Some(doc_id),
            ))
        })
        .collect()
}

/// Decode every document of a YAML stream into JSON values.
///
/// A stream with no content at all (empty, blank or comments only) holds no
/// documents.
fn load_yaml_documents(content: &str) -> Result<Vec<Value>, ParseError> {
    if !has_yaml_content(content) {
        return Ok(Vec::new());
    }

    serde_yaml::Deserializer::from_str(content)
        .map(|document| {
            Value::deserialize(document).map_err(|e| ParseError::InvalidYaml(e.to_string()))
        })
        .collect()
}

fn has_yaml_content(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}

fn validate_k8s_object(document: &Value, doc_id: usize) -> Result<(), ParseError> {
    let missing: Vec<String> = REQUIRED_K8S_FIELDS
        .iter()
        .filter(|field| document.get(**field).is_none())
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::InvalidKubernetesFile { doc_id, missing })
    }
}
