//! Pipeline execution over the rule catalog
//!
//! Runs every rule in catalog order and isolates per-rule failures: a rule
//! that panics is logged and contributes zero issues, and the run as a whole
//! never fails because of a single rule. Output is fully deterministic for
//! identical inputs — rules read no clock and no global state, and finding
//! ids are derived from rule ids alone.

use std::panic::{self, AssertUnwindSafe};

use shared_types::{DocumentContent, DocumentStructure, IssueSource, ReviewFinding};
use tracing::warn;

use crate::rules::{catalog, Rule};

/// Confidence attached to every rule finding; rule checks are exact
pub const RULE_CONFIDENCE: u8 = 95;

/// Run the full catalog against one document
pub fn run(content: &DocumentContent, structure: &DocumentStructure) -> Vec<ReviewFinding> {
    run_rules(&catalog(), content, structure)
}

/// Run an explicit rule list, in the order given
pub fn run_rules(
    rules: &[Rule],
    content: &DocumentContent,
    structure: &DocumentStructure,
) -> Vec<ReviewFinding> {
    let mut findings = Vec::new();

    for rule in rules {
        let check = rule.check;
        let issues = match panic::catch_unwind(AssertUnwindSafe(|| check(content, structure))) {
            Ok(issues) => issues,
            Err(_) => {
                warn!(rule_id = rule.id, "rule check panicked; skipping its issues");
                continue;
            }
        };

        for (index, issue) in issues.into_iter().enumerate() {
            findings.push(ReviewFinding {
                id: format!("{}_{}", rule.id, index + 1),
                source: IssueSource::Rules,
                severity: issue.severity,
                category: rule.category.label().to_string(),
                title: rule.name.to_string(),
                description: issue.problem,
                location: issue.location,
                suggestion: issue.solution,
                confidence: RULE_CONFIDENCE,
            });
        }
    }

    findings
}
