//! Merging AI findings into the rule finding list
//!
//! The dedup key is the `(category, title)` pair — deliberately coarse,
//! favoring precision of the merged list over recall of AI restatements of
//! issues the rules already found.

use shared_types::{IssueSource, ReviewFinding};

use crate::parser::AiIssue;

/// Append AI issues that do not duplicate an existing finding.
///
/// AI finding ids are sequence numbers (`ai_1`, `ai_2`, …) assigned over
/// the proposed list before dedup, so an issue keeps its id whether or not
/// earlier proposals were dropped.
pub fn merge_ai_issues(
    mut findings: Vec<ReviewFinding>,
    ai_issues: Vec<AiIssue>,
) -> Vec<ReviewFinding> {
    for (index, issue) in ai_issues.into_iter().enumerate() {
        let duplicate = findings
            .iter()
            .any(|existing| existing.category == issue.category && existing.title == issue.title);
        if duplicate {
            continue;
        }

        findings.push(ReviewFinding {
            id: format!("ai_{}", index + 1),
            source: IssueSource::Ai,
            severity: issue.severity,
            category: issue.category,
            title: issue.title,
            description: issue.description,
            location: issue.location,
            suggestion: issue.suggestion,
            confidence: issue.confidence,
        });
    }

    findings
}
