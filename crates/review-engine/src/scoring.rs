//! Score aggregation
//!
//! Converts issue severities into a 0-100 compliance score. The aggregator
//! looks only at severities and categories — never at issue provenance — so
//! a reconciliation-filtered issue set scores exactly like an unfiltered one
//! with the same contents.

use shared_types::{CategoryScore, ReviewCategory, ReviewFinding, ScoreConfig, Severity};

/// Overall score: 100 minus the weighted deduction sum, never below the
/// configured floor
pub fn overall_score(findings: &[ReviewFinding], config: &ScoreConfig) -> u32 {
    deducted_score(findings.iter().map(|f| f.severity), config, config.floor)
}

/// Per-category sub-scores over the eight rule categories, in stage order.
/// Category scores floor at zero regardless of the overall floor.
pub fn category_scores(findings: &[ReviewFinding], config: &ScoreConfig) -> Vec<CategoryScore> {
    ReviewCategory::ALL
        .iter()
        .map(|category| {
            let severities = findings
                .iter()
                .filter(|f| f.category == category.label())
                .map(|f| f.severity);
            CategoryScore {
                category: *category,
                score: deducted_score(severities, config, 0),
            }
        })
        .collect()
}

fn deducted_score(
    severities: impl Iterator<Item = Severity>,
    config: &ScoreConfig,
    floor: u32,
) -> u32 {
    let deduction: u32 = severities.map(|s| config.deduction_for(s)).sum();
    100u32.saturating_sub(deduction).max(floor)
}
