pub mod document;
pub mod review;

pub use document::{
    DocumentContent, DocumentStructure, FormatInfo, LineRule, ParagraphFormat, Section,
};
pub use review::{
    CategoryScore, ComplianceStatus, Issue, IssueSource, IssueStatistics, Priority,
    Recommendations, ReviewCategory, ReviewFinding, ReviewResult, ReviewSummary, RiskLevel,
    ScoreConfig, Severity, Verdict, VerdictDecision,
};
