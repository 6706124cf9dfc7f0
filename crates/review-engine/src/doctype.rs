//! Document-type validation
//!
//! Weighted keyword and structure scoring that decides whether an uploaded
//! document is an administrative penalty decision at all, before the full
//! review is attempted.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::DocumentContent;

use crate::patterns::DATE_PATTERN;

lazy_static! {
    static ref CORE_TITLE: Regex = Regex::new(r"行政处罚决定书|行政处罚决定\s*$").unwrap();
    static ref TYPE_PHRASE: Regex = Regex::new(r"行政处罚决定书").unwrap();
}

/// Keyword groups with their weights and the reason reported when present
const KEYWORD_CHECKS: &[(&[&str], u32, &str)] = &[
    (&["行政处罚", "处罚决定"], 30, "包含处罚相关关键词"),
    (&["当事人", "违法行为"], 20, "包含当事人和违法行为"),
    (&["依据", "法律", "法规"], 15, "包含法律依据"),
    (&["决定", "处以", "罚款"], 20, "包含处罚决定"),
    (&["复议", "诉讼", "救济"], 10, "包含救济途径"),
    (&["执法机关", "年", "月", "日"], 5, "包含执法机关和日期"),
];

const ESSENTIAL_KEYWORDS: &[&str] = &["当事人", "违法", "处罚", "依据", "救济"];

/// Outcome of the type check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeValidation {
    pub is_valid: bool,
    /// 0-100, how confidently the document reads as a penalty decision
    pub confidence: u32,
    pub reasons: Vec<String>,
}

/// Decide whether the content is an administrative penalty decision.
pub fn validate_document_type(content: &DocumentContent) -> TypeValidation {
    let text = &content.text;
    let mut reasons: Vec<String> = Vec::new();
    let mut score: u32 = 0;

    let first_line = content.paragraphs.first().map(String::as_str).unwrap_or("");
    let second_line = content.paragraphs.get(1).map(String::as_str).unwrap_or("");

    let mut matched_groups = 0;
    for (keywords, weight, name) in KEYWORD_CHECKS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            score += weight;
            matched_groups += 1;
            reasons.push((*name).to_string());
        }
    }

    let has_core_title = CORE_TITLE.is_match(first_line) || CORE_TITLE.is_match(text);
    if has_core_title {
        reasons.push("检测到行政处罚决定书核心标题".to_string());
        score += 10;
    }

    let has_two_line_title =
        !first_line.is_empty() && !second_line.is_empty() && TYPE_PHRASE.is_match(second_line);
    if has_two_line_title {
        reasons.push("标题符合“机关名称 + 行政处罚决定书”两行格式".to_string());
        score += 10;
    }

    let essential_matches = ESSENTIAL_KEYWORDS
        .iter()
        .filter(|kw| text.contains(*kw))
        .count();
    if essential_matches >= 3 {
        reasons.push("包含核心要素信息".to_string());
        score += 10;
    }

    if content.paragraphs.len() >= 5 {
        score += 10;
        reasons.push("文档结构完整（段落数量合理）".to_string());
    }
    if text.chars().count() >= 200 {
        score += 5;
        reasons.push("内容长度符合要求".to_string());
    }
    if DATE_PATTERN.is_match(text) {
        score += 10;
        reasons.push("包含日期格式".to_string());
    }

    if !has_core_title {
        reasons.push("未检测到典型的行政处罚决定书标题".to_string());
    }
    if essential_matches < 3 {
        reasons.push("核心要素出现次数不足".to_string());
    }
    if !has_two_line_title {
        reasons.push("标题格式未检测到“机关名称 + 行政处罚决定书”两行排列".to_string());
    }

    let confidence = score.min(100);
    let is_valid = has_core_title
        && has_two_line_title
        && matched_groups >= 4
        && essential_matches >= 3
        && confidence >= 70;

    TypeValidation {
        is_valid,
        confidence,
        reasons,
    }
}
