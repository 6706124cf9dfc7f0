//! Stage 2: 标题部分 — title block checks

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use super::Rule;

/// The fixed phrase identifying the document type; line 2 must match exactly
const DOCUMENT_TYPE_PHRASE: &str = "行政处罚决定书";

lazy_static! {
    /// An issuing-authority name ends in one of these agency suffixes
    static ref AGENCY_SUFFIX: Regex =
        Regex::new(r"(局|委员会|人民政府|管理局|监督局|执法队)").unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "title_keyword_check",
            name: "标题包含“行政处罚决定书”",
            category: ReviewCategory::Title,
            severity: Severity::Critical,
            description: "检查标题是否严格包含“行政处罚决定书”字样",
            check: check_title_keyword,
        },
        Rule {
            id: "title_two_line_structure",
            name: "标题两行结构",
            category: ReviewCategory::Title,
            severity: Severity::Warning,
            description: "检查标题是否采用“机关名称 + 行政处罚决定书”的两行结构",
            check: check_two_line_structure,
        },
    ]
}

fn check_title_keyword(_content: &DocumentContent, structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !structure.title.contains(DOCUMENT_TYPE_PHRASE) {
        issues.push(Issue {
            problem: "标题未包含“行政处罚决定书”标准表述".to_string(),
            location: "标题".to_string(),
            solution: "标题第二行应准确使用“行政处罚决定书”字样".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

fn check_two_line_structure(
    _content: &DocumentContent,
    structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let title_lines = &structure.title_lines;

    if title_lines.len() < 2 {
        issues.push(Issue {
            problem: "未检测到“机关名称 + 行政处罚决定书”的两行标题结构".to_string(),
            location: "标题".to_string(),
            solution: "标题建议分两行：第一行机关名称，第二行“行政处罚决定书”".to_string(),
            severity: Severity::Warning,
        });
        return issues;
    }

    let first_line = title_lines[0].trim();
    let second_line = title_lines[1].trim();

    if !AGENCY_SUFFIX.is_match(first_line) {
        issues.push(Issue {
            problem: "标题第一行未呈现完整执法机关名称".to_string(),
            location: "标题第一行".to_string(),
            solution: "第一行应为完整机关名称，如“××市市场监督管理局”".to_string(),
            severity: Severity::Warning,
        });
    }

    if second_line != DOCUMENT_TYPE_PHRASE {
        issues.push(Issue {
            problem: "标题第二行表述不规范".to_string(),
            location: "标题第二行".to_string(),
            solution: "第二行建议严格书写为“行政处罚决定书”".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}
