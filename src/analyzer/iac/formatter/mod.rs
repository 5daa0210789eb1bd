//! Output formatters for scan results.

pub mod json;
pub mod plain;

use crate::analyzer::iac::types::{ScanningResults, Severity};
use serde::{Deserialize, Serialize};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Plain,
    /// JSON output.
    Json,
}

/// Format scan results to a string, keeping violations at or above `threshold`.
pub fn format_results(results: &ScanningResults, format: OutputFormat, threshold: Severity) -> String {
    match format {
        OutputFormat::Plain => plain::format(results, threshold),
        OutputFormat::Json => json::format(results, threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dispatch() {
        let results = ScanningResults::default();
        let json = format_results(&results, OutputFormat::Json, Severity::Low);
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

        colored::control::set_override(false);
        let plain = format_results(&results, OutputFormat::Plain, Severity::Low);
        assert!(plain.contains("No issues found."));
    }
}
