//! Review domain types
//!
//! Shared between the rule engine and the AI layer. Everything here is a
//! plain serializable structure; no binary formats are owned by this
//! workspace.

use serde::{Deserialize, Serialize};

/// Severity of one detected defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// The eight review stages, mirroring the document's physical structure.
///
/// Rules are evaluated top-to-bottom in this order, and category sub-scores
/// map directly to which part of the document needs rework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCategory {
    Format,
    Title,
    CaseNumber,
    MainContent,
    Fulfillment,
    Signature,
    FixedContent,
    Consistency,
}

impl ReviewCategory {
    /// All categories in evaluation order
    pub const ALL: [ReviewCategory; 8] = [
        ReviewCategory::Format,
        ReviewCategory::Title,
        ReviewCategory::CaseNumber,
        ReviewCategory::MainContent,
        ReviewCategory::Fulfillment,
        ReviewCategory::Signature,
        ReviewCategory::FixedContent,
        ReviewCategory::Consistency,
    ];

    /// Display label used in issue records and reports
    pub fn label(&self) -> &'static str {
        match self {
            ReviewCategory::Format => "文书格式检查",
            ReviewCategory::Title => "标题部分",
            ReviewCategory::CaseNumber => "文号部分",
            ReviewCategory::MainContent => "正文部分",
            ReviewCategory::Fulfillment => "履行与权利告知",
            ReviewCategory::Signature => "落款部分",
            ReviewCategory::FixedContent => "固定内容比对",
            ReviewCategory::Consistency => "整体一致性",
        }
    }
}

/// One defect reported by a single rule invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub problem: String,
    pub location: String,
    pub solution: String,
    pub severity: Severity,
}

/// Which analyzer produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSource {
    Rules,
    Ai,
}

/// One entry of the final merged issue list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFinding {
    pub id: String,
    pub source: IssueSource,
    pub severity: Severity,
    /// Category label; rule findings carry a [`ReviewCategory`] label, AI
    /// findings carry the model's free-form dimension
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub suggestion: String,
    /// Confidence 0-100; rule findings are fixed at 95
    pub confidence: u8,
}

/// External judgment on one rule-detected issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub issue_id: String,
    pub decision: VerdictDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictDecision {
    Keep,
    Discard,
}

/// Deduction weights for score computation.
///
/// The deductions and floor are explicit configuration, not hidden
/// constants; see DESIGN.md for the provenance of the two presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub critical_deduction: u32,
    pub warning_deduction: u32,
    pub info_deduction: u32,
    /// Overall score never drops below this value
    pub floor: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            critical_deduction: 10,
            warning_deduction: 5,
            info_deduction: 1,
            floor: 40,
        }
    }
}

impl ScoreConfig {
    /// Heavier deductions with no floor
    pub fn strict() -> Self {
        Self {
            critical_deduction: 20,
            warning_deduction: 10,
            info_deduction: 5,
            floor: 0,
        }
    }

    pub fn deduction_for(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical_deduction,
            Severity::Warning => self.warning_deduction,
            Severity::Info => self.info_deduction,
        }
    }
}

/// Sub-score for one review category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ReviewCategory,
    pub score: u32,
}

/// Issue counts by severity and source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatistics {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,
    pub rule_issues: usize,
    pub ai_issues: usize,
}

/// Narrative summary attached to a review result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Language-quality sub-score from the semantic analyzer, 0-100
    pub language_score: u32,
    /// Logical-consistency sub-score from the semantic analyzer, 0-100
    pub logic_score: u32,
    pub overall_assessment: String,
    /// False when the semantic layer was disabled or unreachable and the
    /// result is rules-only
    pub ai_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NeedsImprovement,
    NonCompliant,
}

/// Actionable follow-up guidance derived from the issue set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub priority: Priority,
    pub actions: Vec<String>,
    pub risk_level: RiskLevel,
    pub compliance_status: ComplianceStatus,
}

/// Final output of one review run.
///
/// Deterministic given identical inputs and identical AI responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub issues: Vec<ReviewFinding>,
    pub score: u32,
    pub category_scores: Vec<CategoryScore>,
    pub statistics: IssueStatistics,
    pub summary: ReviewSummary,
    pub recommendations: Recommendations,
}
