//! Human-readable rendering of batch validation results.
//!
//! Formatting only: the structured `errors`/`warnings` lists on the
//! report are the source of truth for callers.

use super::BatchReport;

/// Render a batch report as plain text for logs or console output.
pub fn validation_report(report: &BatchReport) -> String {
    let mut lines = Vec::new();
    let rule = "=".repeat(60);
    let thin_rule = "-".repeat(60);

    lines.push(rule.clone());
    lines.push("SHAPE VALIDATION REPORT".to_string());
    lines.push(rule.clone());
    lines.push(format!("Total documents: {}", report.total));
    lines.push(format!("Valid: {}", report.valid));
    lines.push(format!("Invalid: {}", report.invalid));
    lines.push(String::new());

    let invalid: Vec<_> = report.documents.iter().filter(|d| !d.valid).collect();
    if !invalid.is_empty() {
        lines.push("INVALID DOCUMENTS:".to_string());
        lines.push(thin_rule.clone());
        for doc in invalid {
            lines.push(String::new());
            lines.push(format!("{} - {}", doc.schema_type, doc.id));
            for error in &doc.errors {
                lines.push(format!("  ✗ {}", error));
            }
        }
    }

    let with_warnings: Vec<_> = report
        .documents
        .iter()
        .filter(|d| !d.warnings.is_empty())
        .collect();
    if !with_warnings.is_empty() {
        lines.push(String::new());
        lines.push("WARNINGS:".to_string());
        lines.push(thin_rule);
        for doc in with_warnings {
            lines.push(String::new());
            lines.push(format!("{} - {}", doc.schema_type, doc.id));
            for warning in &doc.warnings {
                lines.push(format!("  ⚠ {}", warning));
            }
        }
    }

    lines.push(String::new());
    lines.push(rule);

    lines.join("\n")
}
