//! Stage 6: 落款部分 — signature block checks

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::patterns::{normalize_text, tail_paragraph_text, DATE_PATTERN};

use super::Rule;

/// Closing paragraphs the signature block is expected in
const SIGNATURE_TAIL_PARAGRAPHS: usize = 5;
/// Tail window for the decision date
const DATE_TAIL_PARAGRAPHS: usize = 3;
/// An agency-name line is short; long paragraphs merely mention the agency
const MAX_AGENCY_LINE_CHARS: usize = 40;

lazy_static! {
    static ref AGENCY_NAME: Regex = Regex::new(
        r"(人民政府|市场监督管理局|监督管理局|管理局|监督局|执法队|执法局|管理委员会|管理所|大队|支队|行政执法|行政机关)"
    )
    .unwrap();
    static ref SIGNATURE_DATE: Regex =
        Regex::new(r"\d{4}\s*年\s*\d{1,2}\s*月\s*\d{1,2}\s*日").unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "authority_signature",
            name: "执法机关落款",
            category: ReviewCategory::Signature,
            severity: Severity::Critical,
            description: "检查文末是否标注执法机关名称且与落款日期位置匹配",
            check: check_authority_signature,
        },
        Rule {
            id: "decision_date",
            name: "决定日期规范性",
            category: ReviewCategory::Signature,
            severity: Severity::Critical,
            description: "检查落款日期是否存在且格式正确",
            check: check_decision_date,
        },
    ]
}

fn check_authority_signature(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let tail: Vec<&str> = content
        .paragraphs
        .iter()
        .rev()
        .take(SIGNATURE_TAIL_PARAGRAPHS)
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let agency_index = tail.iter().position(|paragraph| {
        AGENCY_NAME.is_match(paragraph) && paragraph.chars().count() <= MAX_AGENCY_LINE_CHARS
    });

    let Some(agency_index) = agency_index else {
        issues.push(Issue {
            problem: "未在文末明确标注作出处罚决定的执法机关名称".to_string(),
            location: "落款部分".to_string(),
            solution: "在落款处单独列出执法机关全称，如“××市市场监督管理局”。".to_string(),
            severity: Severity::Critical,
        });
        return issues;
    };

    let date_index = tail
        .iter()
        .position(|paragraph| SIGNATURE_DATE.is_match(&normalize_text(paragraph)));

    if let Some(date_index) = date_index {
        if date_index < agency_index {
            issues.push(Issue {
                problem: "落款日期位置异常，应在执法机关名称之后".to_string(),
                location: "落款部分".to_string(),
                solution: "调整版式，使落款日期置于执法机关名称下方并保持对齐。".to_string(),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

fn check_decision_date(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    let tail = normalize_text(&tail_paragraph_text(content, DATE_TAIL_PARAGRAPHS));

    if !DATE_PATTERN.is_match(&tail) {
        issues.push(Issue {
            problem: "文书末尾未见标准的作出决定日期".to_string(),
            location: "落款日期".to_string(),
            solution: "在落款处写明“2025年5月10日”等完整日期，与机关名称对齐".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_signature_block_passes() {
        let content = DocumentContent::from_text(
            "决定处以罚款5000元。\n特此决定。\n杭州市临安区市场监督管理局\n2025年5月10日",
        );
        assert!(check_authority_signature(&content, &DocumentStructure::default()).is_empty());
        assert!(check_decision_date(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn missing_agency_line_is_critical() {
        let content = DocumentContent::from_text("决定处以罚款5000元。\n特此决定。\n2025年5月10日");
        let issues = check_authority_signature(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn long_paragraph_mentioning_agency_does_not_count() {
        let content = DocumentContent::from_text(
            "本案由杭州市临安区市场监督管理局执法人员于检查中发现，经立案调查后依法作出处理决定并送达当事人。\n2025年5月10日",
        );
        let issues = check_authority_signature(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn date_before_agency_is_a_warning() {
        let content = DocumentContent::from_text(
            "决定处以罚款5000元。\n2025年5月10日\n杭州市临安区市场监督管理局",
        );
        let issues = check_authority_signature(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn spaced_out_date_still_detected() {
        let content = DocumentContent::from_text(
            "特此决定。\n杭州市临安区市场监督管理局\n2025 年 5 月 10 日",
        );
        assert!(check_authority_signature(&content, &DocumentStructure::default()).is_empty());
        assert!(check_decision_date(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn missing_tail_date_is_critical() {
        let content = DocumentContent::from_text(
            "2024年1月1日立案调查。\n特此决定。\n杭州市临安区市场监督管理局\n（公章）",
        );
        let issues = check_decision_date(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }
}
