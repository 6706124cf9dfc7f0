//! Comprehensive review orchestration
//!
//! Ties the rule engine and the semantic layer together: rules always run;
//! the AI layer confirms or discards rule findings and contributes its own;
//! every failure on the AI side degrades to a rules-only result. A review
//! never hard-fails because the optional semantic layer is unavailable.

use review_engine::ReviewEngine;
use shared_types::{
    ComplianceStatus, DocumentContent, DocumentStructure, IssueSource, IssueStatistics, Priority,
    Recommendations, ReviewFinding, ReviewResult, ReviewSummary, RiskLevel, Severity,
};
use tracing::{info, warn};

use crate::analyzer;
use crate::client::ChatCompletion;
use crate::merge::merge_ai_issues;
use crate::prompts::AnalysisOptions;
use crate::reconcile::reconcile;

/// Weight of the rule-derived score when blending with the AI sub-scores
const RULE_SCORE_WEIGHT: f64 = 0.7;

/// Caller-facing review options; AI participation is an explicit opt-in,
/// never an ambient flag
#[derive(Debug, Clone, Copy)]
pub struct ReviewOptions {
    pub enable_ai: bool,
    pub strict_mode: bool,
    pub enable_semantic_check: bool,
    pub enable_language_check: bool,
    pub enable_logic_check: bool,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            enable_ai: false,
            strict_mode: false,
            enable_semantic_check: true,
            enable_language_check: true,
            enable_logic_check: true,
        }
    }
}

impl ReviewOptions {
    fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            strict_mode: self.strict_mode,
            enable_semantic_check: self.enable_semantic_check,
            enable_language_check: self.enable_language_check,
            enable_logic_check: self.enable_logic_check,
        }
    }
}

/// Rule engine plus an optional semantic analyzer
pub struct ReviewService {
    engine: ReviewEngine,
    analyzer: Option<Box<dyn ChatCompletion>>,
}

impl ReviewService {
    /// A service that only ever runs the rule catalog
    pub fn rules_only(engine: ReviewEngine) -> Self {
        Self {
            engine,
            analyzer: None,
        }
    }

    pub fn with_analyzer(engine: ReviewEngine, analyzer: Box<dyn ChatCompletion>) -> Self {
        Self {
            engine,
            analyzer: Some(analyzer),
        }
    }

    /// Run one full review
    pub async fn review(
        &self,
        content: &DocumentContent,
        structure: &DocumentStructure,
        options: &ReviewOptions,
    ) -> ReviewResult {
        let rule_findings = self.engine.run_rules(content, structure);
        info!(rule_findings = rule_findings.len(), "rule pipeline finished");

        let mut findings = rule_findings;
        let mut ai_issues = Vec::new();
        let mut ai_enabled = false;
        let mut model_used = None;
        let mut language_score: u32 = 90;
        let mut logic_score: u32 = 90;
        let mut assessment = "AI语义分析未启用，本次仅依据规则审查结果评估。".to_string();

        if options.enable_ai {
            match &self.analyzer {
                Some(client) => {
                    match analyzer::analyze(client.as_ref(), content, &options.analysis_options())
                        .await
                    {
                        Ok(analysis) => {
                            let outcome = reconcile(client.as_ref(), content, findings).await;
                            info!(
                                kept = outcome.kept.len(),
                                discarded = outcome.discarded_ids.len(),
                                ai_proposed = analysis.issues.len(),
                                "semantic layer finished"
                            );
                            findings = outcome.kept;
                            ai_issues = analysis.issues;
                            language_score = analysis.summary.language_score;
                            logic_score = analysis.summary.logic_score;
                            assessment = analysis.summary.overall_assessment;
                            model_used = Some(analysis.model_used);
                            ai_enabled = true;
                        }
                        Err(err) => {
                            warn!(error = %err, "semantic analysis failed; rules-only result");
                        }
                    }
                }
                None => {
                    warn!("AI review requested but no analyzer configured; rules-only result");
                }
            }
        }

        let merged = merge_ai_issues(findings, ai_issues);

        let rule_score = self.engine.score(&merged);
        let score = if ai_enabled {
            let ai_score = language_score.min(logic_score);
            (f64::from(rule_score) * RULE_SCORE_WEIGHT
                + f64::from(ai_score) * (1.0 - RULE_SCORE_WEIGHT))
                .round() as u32
        } else {
            rule_score
        };

        let category_scores = self.engine.category_scores(&merged);
        let statistics = compute_statistics(&merged);
        let recommendations = build_recommendations(
            &statistics,
            score,
            &merged,
            ai_enabled,
            language_score,
            logic_score,
        );

        ReviewResult {
            issues: merged,
            score,
            category_scores,
            statistics,
            summary: ReviewSummary {
                language_score,
                logic_score,
                overall_assessment: assessment,
                ai_enabled,
                model_used,
            },
            recommendations,
        }
    }
}

fn compute_statistics(findings: &[ReviewFinding]) -> IssueStatistics {
    IssueStatistics {
        total_issues: findings.len(),
        critical_issues: findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count(),
        warning_issues: findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count(),
        info_issues: findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count(),
        rule_issues: findings
            .iter()
            .filter(|f| f.source == IssueSource::Rules)
            .count(),
        ai_issues: findings
            .iter()
            .filter(|f| f.source == IssueSource::Ai)
            .count(),
    }
}

fn build_recommendations(
    statistics: &IssueStatistics,
    score: u32,
    findings: &[ReviewFinding],
    ai_enabled: bool,
    language_score: u32,
    logic_score: u32,
) -> Recommendations {
    let mut actions: Vec<String> = Vec::new();
    let priority;
    let risk_level;
    let compliance_status;

    if statistics.critical_issues > 0 {
        priority = Priority::High;
        risk_level = if statistics.critical_issues >= 3 {
            RiskLevel::Critical
        } else {
            RiskLevel::High
        };
        compliance_status = ComplianceStatus::NonCompliant;

        actions.push(format!(
            "立即处理 {} 个严重问题，涉及法定要素缺失或程序违法",
            statistics.critical_issues
        ));
        actions.push("重点关注当事人信息、违法事实认定、法律依据引用等核心要素".to_string());
        actions.push("建议法律专家进行复核，确保合规性".to_string());
    } else if statistics.warning_issues > 3 {
        priority = Priority::Medium;
        risk_level = RiskLevel::Medium;
        compliance_status = ComplianceStatus::NeedsImprovement;

        actions.push(format!("及时修正 {} 个警告问题", statistics.warning_issues));
        actions.push("完善格式规范和表述完整性".to_string());
    } else {
        priority = Priority::Low;
        risk_level = RiskLevel::Low;
        compliance_status = if statistics.warning_issues > 0 {
            ComplianceStatus::NeedsImprovement
        } else {
            ComplianceStatus::Compliant
        };

        if statistics.info_issues > 0 {
            actions.push(format!(
                "优化 {} 个提示问题，提升文书质量",
                statistics.info_issues
            ));
        }
    }

    if score < 60 {
        actions.push("文书质量不符合基本要求，建议全面重新审查和修订".to_string());
    } else if score < 80 {
        actions.push("文书质量需要改进，建议按优先级逐项完善".to_string());
    } else if score < 90 {
        actions.push("文书质量良好，建议关注细节完善".to_string());
    } else {
        actions.push("文书质量优秀，符合规范要求".to_string());
    }

    if ai_enabled && language_score < 80 {
        actions.push("注意语言表述的规范性，避免口语化表述".to_string());
    }
    if ai_enabled && logic_score < 80 {
        actions.push("加强逻辑结构的完整性，确保事实认定与法律适用的一致性".to_string());
    }

    let has_remedy_issues = findings.iter().any(|f| f.category == "履行与权利告知");
    if has_remedy_issues {
        actions.push("完善救济途径告知，明确行政复议和诉讼的期限、机关信息".to_string());
    }

    if actions.is_empty() {
        actions.push("文书符合基本要求，建议定期复查".to_string());
    }

    Recommendations {
        priority,
        actions,
        risk_level,
        compliance_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity, source: IssueSource, category: &str) -> ReviewFinding {
        ReviewFinding {
            id: "x_1".to_string(),
            source,
            severity,
            category: category.to_string(),
            title: "标题".to_string(),
            description: "描述".to_string(),
            location: "全文".to_string(),
            suggestion: "建议".to_string(),
            confidence: 95,
        }
    }

    #[test]
    fn statistics_count_by_severity_and_source() {
        let findings = vec![
            finding(Severity::Critical, IssueSource::Rules, "正文部分"),
            finding(Severity::Warning, IssueSource::Rules, "标题部分"),
            finding(Severity::Info, IssueSource::Ai, "逻辑一致性"),
        ];
        let stats = compute_statistics(&findings);
        assert_eq!(stats.total_issues, 3);
        assert_eq!(stats.critical_issues, 1);
        assert_eq!(stats.warning_issues, 1);
        assert_eq!(stats.info_issues, 1);
        assert_eq!(stats.rule_issues, 2);
        assert_eq!(stats.ai_issues, 1);
    }

    #[test]
    fn criticals_drive_noncompliance() {
        let findings = vec![
            finding(Severity::Critical, IssueSource::Rules, "正文部分"),
            finding(Severity::Critical, IssueSource::Rules, "正文部分"),
            finding(Severity::Critical, IssueSource::Rules, "落款部分"),
        ];
        let stats = compute_statistics(&findings);
        let recs = build_recommendations(&stats, 55, &findings, false, 90, 90);
        assert_eq!(recs.priority, Priority::High);
        assert_eq!(recs.risk_level, RiskLevel::Critical);
        assert_eq!(recs.compliance_status, ComplianceStatus::NonCompliant);
        assert!(recs.actions.iter().any(|a| a.contains("3 个严重问题")));
        assert!(recs.actions.iter().any(|a| a.contains("全面重新审查")));
    }

    #[test]
    fn clean_document_is_compliant() {
        let stats = compute_statistics(&[]);
        let recs = build_recommendations(&stats, 100, &[], false, 90, 90);
        assert_eq!(recs.priority, Priority::Low);
        assert_eq!(recs.compliance_status, ComplianceStatus::Compliant);
        assert!(recs.actions.iter().any(|a| a.contains("文书质量优秀")));
    }

    #[test]
    fn remedy_category_issues_add_targeted_action() {
        let findings = vec![finding(Severity::Warning, IssueSource::Rules, "履行与权利告知")];
        let stats = compute_statistics(&findings);
        let recs = build_recommendations(&stats, 85, &findings, false, 90, 90);
        assert!(recs.actions.iter().any(|a| a.contains("救济途径告知")));
    }

    #[test]
    fn low_ai_subscores_add_language_and_logic_actions() {
        let stats = compute_statistics(&[]);
        let recs = build_recommendations(&stats, 85, &[], true, 70, 75);
        assert!(recs.actions.iter().any(|a| a.contains("口语化")));
        assert!(recs.actions.iter().any(|a| a.contains("逻辑结构")));
    }
}
