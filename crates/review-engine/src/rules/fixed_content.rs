//! Stage 7: 固定内容比对 — boilerplate template comparison
//!
//! Having a remedy clause is necessary but not sufficient: its shape must
//! match the canonical ordering of trigger, deadline and venue tokens.
//! Presence itself is judged in stage 5; these rules only fire when a clause
//! exists but deviates from the template.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::extractors::analyze_remedy_section;
use crate::patterns::normalize_text;

use super::Rule;

lazy_static! {
    /// 3%-per-day surcharge wording for overdue fines
    static ref OVERDUE_SURCHARGE: Regex = Regex::new(
        r"逾期(不|未)缴(纳)?罚款.{0,20}(每日)?按(罚款)?数额.{0,12}(百分之三|3%)[^。；]*加(收|处)罚款"
    )
    .unwrap();
    /// Court-enforcement wording for overdue fines
    static ref COURT_ENFORCEMENT: Regex = Regex::new(
        r"申请人民法院[^。；]{0,12}强制执行|依法[^。；]{0,12}申请人民法院强制执行|向人民法院申请强制执行"
    )
    .unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "fixed_reconsideration_content",
            name: "行政复议固定表述",
            category: ReviewCategory::FixedContent,
            severity: Severity::Warning,
            description: "比对行政复议救济告知是否符合标准模板",
            check: check_reconsideration_template,
        },
        Rule {
            id: "fixed_litigation_content",
            name: "行政诉讼固定表述",
            category: ReviewCategory::FixedContent,
            severity: Severity::Warning,
            description: "比对行政诉讼救济告知是否符合标准模板",
            check: check_litigation_template,
        },
        Rule {
            id: "fixed_overdue_consequence",
            name: "逾期履行后果表述",
            category: ReviewCategory::FixedContent,
            severity: Severity::Warning,
            description: "检查逾期不履行的法律后果表述是否完整",
            check: check_overdue_consequence,
        },
    ]
}

fn check_reconsideration_template(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let remedy = analyze_remedy_section(content);

    if remedy.review.present && !remedy.review.template_like {
        issues.push(Issue {
            problem: "行政复议救济语句存在表述顺序或要素偏差".to_string(),
            location: "第十部分救济途径".to_string(),
            solution: "参考模板调整为“如不服本处罚决定，可以在收到本决定书之日起六十日内向××人民政府申请行政复议”。".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_litigation_template(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let remedy = analyze_remedy_section(content);

    if remedy.litigation.present && !remedy.litigation.template_like {
        issues.push(Issue {
            problem: "行政诉讼救济语句未按照“六个月+人民法院+行政诉讼”模板表述".to_string(),
            location: "第十部分救济途径".to_string(),
            solution: "建议写为“也可以在收到本决定书之日起六个月内向××人民法院提起行政诉讼”。"
                .to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_overdue_consequence(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let normalized = normalize_text(&content.text);

    if normalized.contains("罚款")
        && (!OVERDUE_SURCHARGE.is_match(&normalized) || !COURT_ENFORCEMENT.is_match(&normalized))
    {
        issues.push(Issue {
            problem: "罚款逾期履行后果表述不完整".to_string(),
            location: "第九部分履行方式与期限".to_string(),
            solution: "补充“逾期不缴纳罚款的，每日按罚款数额的百分之三加处罚款，并可申请人民法院强制执行”".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_clause_fires_no_template_issue() {
        let content = DocumentContent::from_text("决定处以警告。\n特此决定。");
        assert!(check_reconsideration_template(&content, &DocumentStructure::default()).is_empty());
        assert!(check_litigation_template(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn off_template_review_clause_warns() {
        let content = DocumentContent::from_text(
            "可以申请行政复议，向杭州市人民政府提出，如不服本处罚决定，期限为收到本决定书之日起六十日内。",
        );
        let issues = check_reconsideration_template(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn canonical_clauses_pass_template_checks() {
        let content = DocumentContent::from_text(
            "如不服本处罚决定，可以在收到本决定书之日起六十日内向杭州市人民政府申请行政复议；也可以在六个月内直接向人民法院提起行政诉讼。",
        );
        assert!(check_reconsideration_template(&content, &DocumentStructure::default()).is_empty());
        assert!(check_litigation_template(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn off_template_litigation_clause_warns() {
        let content = DocumentContent::from_text(
            "当事人亦可提起行政诉讼，六个月内为限，受理机关为人民法院。",
        );
        let issues = check_litigation_template(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn complete_overdue_consequence_passes() {
        let content = DocumentContent::from_text(
            "处以罚款5000元。逾期不缴纳罚款的，每日按罚款数额的百分之三加处罚款，并可依法申请人民法院强制执行。",
        );
        assert!(check_overdue_consequence(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn missing_enforcement_half_warns() {
        let content = DocumentContent::from_text(
            "处以罚款5000元。逾期不缴纳罚款的，每日按罚款数额的百分之三加处罚款。",
        );
        let issues = check_overdue_consequence(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn no_fine_no_overdue_requirement() {
        let content = DocumentContent::from_text("决定给予警告。");
        assert!(check_overdue_consequence(&content, &DocumentStructure::default()).is_empty());
    }
}
