//! Rule-based review engine for administrative penalty decisions
//!
//! Consumes extracted [`DocumentContent`]/[`DocumentStructure`] and emits
//! severity-ranked findings plus compliance scores. Rule evaluation is a
//! pure synchronous fold over the catalog: no I/O, no clock, no shared
//! state, so identical inputs always produce identical output.

pub mod doctype;
pub mod extractors;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scoring;

use shared_types::{CategoryScore, DocumentContent, DocumentStructure, ReviewFinding, ScoreConfig};

pub use doctype::{validate_document_type, TypeValidation};
pub use rules::{catalog, Rule};

/// Engine entry point: the rule catalog plus a scoring configuration
pub struct ReviewEngine {
    score_config: ScoreConfig,
}

impl ReviewEngine {
    pub fn new() -> Self {
        Self {
            score_config: ScoreConfig::default(),
        }
    }

    pub fn with_score_config(score_config: ScoreConfig) -> Self {
        Self { score_config }
    }

    pub fn score_config(&self) -> &ScoreConfig {
        &self.score_config
    }

    /// Run every rule against one document
    pub fn run_rules(
        &self,
        content: &DocumentContent,
        structure: &DocumentStructure,
    ) -> Vec<ReviewFinding> {
        pipeline::run(content, structure)
    }

    pub fn score(&self, findings: &[ReviewFinding]) -> u32 {
        scoring::overall_score(findings, &self.score_config)
    }

    pub fn category_scores(&self, findings: &[ReviewFinding]) -> Vec<CategoryScore> {
        scoring::category_scores(findings, &self.score_config)
    }
}

impl Default for ReviewEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Severity;

    #[test]
    fn engine_flags_skeletal_document() {
        let engine = ReviewEngine::new();
        let content = DocumentContent::from_text("处罚相关通知\n请知悉。");
        let findings = engine.run_rules(&content, &DocumentStructure::default());

        assert!(findings.iter().any(|f| f.severity == Severity::Critical));
        assert!(engine.score(&findings) < 100);
    }

    #[test]
    fn score_floor_applies_through_engine() {
        let engine = ReviewEngine::new();
        let content = DocumentContent::from_text("空");
        let findings = engine.run_rules(&content, &DocumentStructure::default());
        assert!(engine.score(&findings) >= engine.score_config().floor);
    }

    #[test]
    fn strict_config_scores_lower() {
        let content = DocumentContent::from_text("处罚相关通知\n请知悉。");
        let structure = DocumentStructure::default();

        let balanced = ReviewEngine::new();
        let strict = ReviewEngine::with_score_config(ScoreConfig::strict());
        let findings = balanced.run_rules(&content, &structure);

        assert!(strict.score(&findings) <= balanced.score(&findings));
    }
}
