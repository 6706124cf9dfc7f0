//! Plain-text review reports
//!
//! Formats issue lists for console and log output, and runs the simplified
//! quick-check catalog used before a full review.

use shared_types::{DocumentContent, DocumentStructure, Issue, Severity};

use crate::rules::simplified_catalog;

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "【严重】",
        Severity::Warning => "【警告】",
        Severity::Info => "【提示】",
    }
}

/// Render issues as a numbered text report
pub fn format_issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "审查通过，未发现问题。".to_string();
    }

    let mut output = format!("发现 {} 个问题：\n\n", issues.len());
    for (index, issue) in issues.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} {}\n   位置：{}\n   修改：{}\n\n",
            index + 1,
            severity_label(issue.severity),
            issue.problem,
            issue.location,
            issue.solution
        ));
    }

    output.trim_end().to_string()
}

/// Run the quick-check subset and format the outcome
pub fn simplified_review(content: &DocumentContent, structure: &DocumentStructure) -> String {
    let mut issues: Vec<Issue> = Vec::new();
    for rule in simplified_catalog() {
        issues.extend((rule.check)(content, structure));
    }
    format_issues(&issues)
}
