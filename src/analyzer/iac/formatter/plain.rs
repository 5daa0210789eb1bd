//! Plain text formatter.

use crate::analyzer::iac::types::{IacFileScanResult, ScanningResults, Severity};
use colored::{ColoredString, Colorize};

/// Format scan results as human-readable text.
pub fn format(results: &ScanningResults, threshold: Severity) -> String {
    let mut output = String::new();

    let mut scanned: Vec<&IacFileScanResult> = results.scanned_files.iter().collect();
    scanned.sort_by_key(|result| result.position);

    for result in scanned {
        let violations: Vec<_> = result.violations_at_or_above(threshold).collect();

        let location = match result.parsed.doc_id {
            Some(doc_id) => format!("{} (document {})", result.file_path().display(), doc_id),
            None => result.file_path().display().to_string(),
        };
        output.push_str(&format!(
            "\nTesting {} [{}]\n",
            location.bold(),
            result.parsed.engine_type
        ));

        if violations.is_empty() {
            output.push_str(&format!("  {}\n", "No issues found.".green()));
            continue;
        }

        for policy in violations {
            output.push_str(&format!(
                "  {} {} [{}]\n",
                severity_label(policy.severity),
                policy.title,
                policy.public_id,
            ));
            if !policy.msg.is_empty() {
                output.push_str(&format!("    Path: {}\n", policy.msg));
            }
            if !policy.resolve.is_empty() {
                output.push_str(&format!("    Remediation: {}\n", policy.resolve));
            }
        }
    }

    if !results.unscanned_files.is_empty() {
        output.push_str(&format!("\n{}\n", "Files that could not be scanned:".yellow()));
        for failed in &results.unscanned_files {
            output.push_str(&format!(
                "  {}: {}\n",
                failed.file_path().display(),
                failed.failure_reason
            ));
        }
    }

    let total = results.violation_count(threshold);
    if total == 0 {
        output.push_str("\nNo issues found.\n");
    } else {
        output.push_str(&format!(
            "\nFound {} issue(s) across {} document(s).\n",
            total,
            results.scanned_files.len()
        ));
    }

    output
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("✗ {}", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => label.magenta().bold(),
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::iac::types::{
        EngineType, FailedIacFileParse, IacFileData, IacFileType, ParsedIacFile, PolicyMetadata,
    };

    fn scanned(path: &str, violations: Vec<PolicyMetadata>, position: usize) -> IacFileScanResult {
        IacFileScanResult {
            parsed: ParsedIacFile::new(
                IacFileData::new(path, IacFileType::Tf, ""),
                serde_json::json!({}),
                EngineType::Terraform,
                None,
            ),
            violated_policies: violations,
            position,
        }
    }

    #[test]
    fn test_plain_output() {
        colored::control::set_override(false);

        let policy = PolicyMetadata {
            title: "S3 bucket is publicly readable".to_string(),
            public_id: "IAC-TF-1".to_string(),
            severity: Severity::Medium,
            msg: "resource.aws_s3_bucket.acl".to_string(),
            resolve: "Set `acl` to `private`".to_string(),
            ..Default::default()
        };
        let results = ScanningResults {
            scanned_files: vec![scanned("b.tf", Vec::new(), 1), scanned("a.tf", vec![policy], 0)],
            unscanned_files: vec![FailedIacFileParse::from_scan_failure(
                IacFileData::new("c.tf", IacFileType::Tf, ""),
                "Invalid Terraform File!",
            )],
        };

        let output = format(&results, Severity::Low);
        assert!(output.contains("✗ MEDIUM S3 bucket is publicly readable [IAC-TF-1]"));
        assert!(output.contains("Remediation: Set `acl` to `private`"));
        assert!(output.contains("c.tf: Invalid Terraform File!"));
        assert!(output.contains("Found 1 issue(s) across 2 document(s)."));
        // Ordered by input position, not by result order.
        assert!(output.find("a.tf").unwrap() < output.find("b.tf").unwrap());
    }

    #[test]
    fn test_plain_output_no_issues() {
        colored::control::set_override(false);
        let results = ScanningResults {
            scanned_files: vec![scanned("main.tf", Vec::new(), 0)],
            unscanned_files: Vec::new(),
        };
        let output = format(&results, Severity::Low);
        assert!(output.ends_with("\nNo issues found.\n"));
        assert!(!output.contains("could not be scanned"));
    }
}
