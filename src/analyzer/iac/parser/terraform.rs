//! Terraform HCL parsing.
//!
//! The whole file becomes one JSON document with the same shape as the HCL
//! body: `resource "aws_s3_bucket" "logs" { .. }` is found under
//! `resource.aws_s3_bucket.logs`. Expressions that are not literals are kept
//! as interpolation strings (e.g. `"${var.region}"`).

use super::ParseError;
use crate::analyzer::iac::types::{EngineType, IacFileData, ParsedIacFile};

/// Parse a Terraform file into a single JSON document.
pub fn parse_terraform_file(file: &IacFileData) -> Result<Vec<ParsedIacFile>, ParseError> {
    let json_content: serde_json::Value = hcl::from_str(&file.file_content)
        .map_err(|e| ParseError::InvalidTerraformFile(e.to_string()))?;

    Ok(vec![ParsedIacFile::new(
        file.clone(),
        json_content,
        EngineType::Terraform,
        None,
    )])
}
