//! Stage 3: 文号部分 — case-number checks
//!
//! The case number sits in the first few lines under the title. Detection is
//! a cascade: the strict bracketed shape first, then a whitespace-stripped
//! looser shape that survives sloppy formatting.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::patterns::{
    normalize_text, CASE_NUMBER_LINE_PATTERN, CASE_NUMBER_NORMALIZED_PATTERN, CASE_NUMBER_PATTERN,
};

use super::Rule;

/// Only the opening paragraphs can hold the case number
const HEAD_PARAGRAPHS: usize = 8;

lazy_static! {
    static ref HALF_WIDTH_PARENS: Regex = Regex::new(r"\([^)]+\)").unwrap();
    static ref FULL_WIDTH_PARENS: Regex = Regex::new(r"（[^）]+）").unwrap();
    static ref YEAR_BRACKETS: Regex = Regex::new(r"〔\d{4}〕").unwrap();
    static ref PAREN_PREFIX: Regex = Regex::new(r"[（(][^）)]{1,12}[）)]").unwrap();
    static ref CATEGORY_TOKEN: Regex =
        Regex::new(r"(罚|处|决定|警告|没收|吊销|责令|字|罚处|罚字|处字|罚决)").unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "document_number_presence",
            name: "案件文号存在性",
            category: ReviewCategory::CaseNumber,
            severity: Severity::Critical,
            description: "检查是否匹配标准案件文号格式",
            check: check_number_presence,
        },
        Rule {
            id: "document_number_format",
            name: "文号格式规范性",
            category: ReviewCategory::CaseNumber,
            severity: Severity::Warning,
            description: "检查括号、方括号和处罚类型标识是否完整",
            check: check_number_format,
        },
    ]
}

/// Candidate lines from the opening paragraphs
fn head_lines(content: &DocumentContent) -> Vec<String> {
    content
        .paragraphs
        .iter()
        .take(HEAD_PARAGRAPHS)
        .flat_map(|p| p.split('\n'))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn check_number_presence(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    let has_number = head_lines(content).iter().any(|line| {
        let normalized = normalize_text(line).replace('_', "");
        CASE_NUMBER_PATTERN.is_match(line) || CASE_NUMBER_NORMALIZED_PATTERN.is_match(&normalized)
    });

    if !has_number {
        issues.push(Issue {
            problem: "未发现符合规范的案件文号".to_string(),
            location: "标题下方文号区域".to_string(),
            solution: "按照“（机关简称）处罚〔年份〕序号号”格式补充案件文号".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

fn check_number_format(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    let candidates: Vec<String> = head_lines(content)
        .into_iter()
        .filter(|line| CASE_NUMBER_LINE_PATTERN.is_match(line))
        .collect();

    for line in candidates {
        let mut problems: Vec<&str> = Vec::new();
        let mut suggestions: Vec<&str> = Vec::new();
        let mut severity = Severity::Info;

        if HALF_WIDTH_PARENS.is_match(&line) && !FULL_WIDTH_PARENS.is_match(&line) {
            problems.push("机关简称未使用中文全角括号");
            suggestions.push("机关简称应使用中文全角括号（），例如：（市监）");
            severity = Severity::Warning;
        }

        if !YEAR_BRACKETS.is_match(&line) {
            problems.push("缺少年份方括号“〔〕”标注");
            suggestions.push("年份需使用〔〕标注，例如：〔2025〕");
            severity = Severity::Warning;
        }

        // The category token lives between the agency abbreviation and the
        // year brackets, e.g. the 罚处 in 临市监罚处〔2025〕12号
        let before_year = line.split('〔').next().unwrap_or("");
        let category_segment: String = PAREN_PREFIX
            .replace(before_year, "")
            .chars()
            .filter(|c| ('\u{4e00}'..='\u{9fa5}').contains(c) || c.is_ascii_alphabetic())
            .collect();

        let has_category =
            category_segment.is_empty() || CATEGORY_TOKEN.is_match(&category_segment);

        if !has_category {
            problems.push("未识别到处罚类别或文种标识");
            suggestions
                .push("可在机关简称后加入“罚处”“罚字”“决定”等文种标识，与本机关惯用格式保持一致");
        }

        if !problems.is_empty() {
            issues.push(Issue {
                problem: format!("案件文号“{}”存在：{}", line, problems.join("；")),
                location: "文号部分".to_string(),
                solution: suggestions.join("；"),
                severity,
            });
        }
    }

    issues
}
