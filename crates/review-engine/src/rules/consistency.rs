//! Stage 8: 整体一致性 — cross-paragraph consistency checks

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::patterns::{
    context_snippet, paragraph_location, ALT_DATE_PATTERN, DATE_PATTERN, INFORMAL_WORDS,
    LABEL_PREFIX_PATTERN, MULTIPLE_SPACE_PATTERN,
};

use super::Rule;

lazy_static! {
    static ref PARTY_NAME: Regex = Regex::new(r"当事人[：:]\s*([^\s，。\n]{2,30})").unwrap();
    static ref AMOUNT_MENTION: Regex =
        Regex::new(r"(罚款|人民币|合计)[^\d]{0,6}(\d{1,3}(?:,\d{3})+|\d+)").unwrap();
    static ref LABEL_PHRASE: Regex = Regex::new(r"[\u{4e00}-\u{9fa5}]{2,12}[：:]").unwrap();
    static ref NUMBERED_ITEM: Regex = Regex::new(r"^\s*(\d+[．.])([\s\u{3000}]+)(.+)$").unwrap();
    static ref POSITIVE_SALE: Regex =
        Regex::new(r"(?:已)?(?:销售|售出|出售)[^，。；\n]{0,30}").unwrap();
    static ref NEGATIVE_SALE: Regex =
        Regex::new(r"未(?:曾)?(?:销售|售出|出售)[^，。；\n]{0,30}").unwrap();
    static ref TOTAL_BOTTLES: Regex =
        Regex::new(r"共[^。；\n]{0,20}?(\d+)[^。；\n]{0,3}?瓶").unwrap();
    static ref SUMMARY_BOTTLES: Regex =
        Regex::new(r"(?:上述|综上|本次|该批)[^。；\n]{0,20}?(\d+)[^。；\n]{0,3}?瓶").unwrap();
}

/// Punctuation pairs that never legitimately occur in sequence
const ILLEGAL_PUNCTUATION_PAIRS: &[&str] = &["，，", "。。", "：：", "；；", "，。", "。，"];

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "party_name_consistency",
            name: "当事人名称前后一致",
            category: ReviewCategory::Consistency,
            severity: Severity::Warning,
            description: "检查当事人姓名或单位名称是否前后一致",
            check: check_party_name_consistency,
        },
        Rule {
            id: "penalty_amount_consistency",
            name: "处罚金额一致性",
            category: ReviewCategory::Consistency,
            severity: Severity::Warning,
            description: "检查罚款金额在文中是否多次出现不同数值",
            check: check_amount_consistency,
        },
        Rule {
            id: "duplicate_prompt_phrases",
            name: "提示性短语重复",
            category: ReviewCategory::Consistency,
            severity: Severity::Warning,
            description: "检查段落中是否出现“经查明”等提示性短语重复粘贴的情况",
            check: check_duplicate_labels,
        },
        Rule {
            id: "book_title_bracket_balance",
            name: "书名号成对使用",
            category: ReviewCategory::Consistency,
            severity: Severity::Warning,
            description: "检查《》书名号是否成对出现，避免缺失前导或后续符号",
            check: check_bracket_balance,
        },
        Rule {
            id: "ordered_list_spacing",
            name: "编号后空格规范",
            category: ReviewCategory::Consistency,
            severity: Severity::Info,
            description: "检查数字编号后是否存在多余或全角空格导致排版不整齐",
            check: check_list_spacing,
        },
        Rule {
            id: "excessive_internal_spacing",
            name: "文本空格规范",
            category: ReviewCategory::Consistency,
            severity: Severity::Info,
            description: "检查正文中是否存在连续空格或全角空格影响版式",
            check: check_internal_spacing,
        },
        Rule {
            id: "duplicate_punctuation_sequence",
            name: "标点连续误用",
            category: ReviewCategory::Consistency,
            severity: Severity::Warning,
            description: "检查明显不可能连续出现的标点组合，降低误判",
            check: check_punctuation_pairs,
        },
        Rule {
            id: "sales_statement_contradiction",
            name: "销售事实自相矛盾",
            category: ReviewCategory::Consistency,
            severity: Severity::Critical,
            description: "检查同一段落内是否同时存在“已销售/出售”与“未销售”等相反表述",
            check: check_sales_contradiction,
        },
        Rule {
            id: "bottle_quantity_inconsistency",
            name: "瓶数描述一致性",
            category: ReviewCategory::Consistency,
            severity: Severity::Warning,
            description: "检查“共×瓶”与“上述×瓶”等总结性语句的数量是否前后一致",
            check: check_bottle_quantities,
        },
        Rule {
            id: "date_format_consistency",
            name: "日期格式统一",
            category: ReviewCategory::Consistency,
            severity: Severity::Info,
            description: "检查文中日期格式是否混用“YYYY年MM月DD日”和“YYYY-MM-DD”等形式",
            check: check_date_format_consistency,
        },
        Rule {
            id: "informal_language",
            name: "语言表述规范性",
            category: ReviewCategory::Consistency,
            severity: Severity::Info,
            description: "检查是否存在口语化或模糊表述",
            check: check_informal_language,
        },
    ]
}

fn check_party_name_consistency(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let names: Vec<&str> = PARTY_NAME
        .captures_iter(&content.text)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();

    if names.len() > 1 {
        let uniques: Vec<&str> = {
            let mut seen = BTreeSet::new();
            names
                .iter()
                .copied()
                .filter(|name| seen.insert(*name))
                .collect()
        };

        if uniques.len() > 1 {
            issues.push(Issue {
                problem: format!("当事人名称存在前后不一致：{}", uniques.join("、")),
                location: "全文".to_string(),
                solution: "核对当事人名称，确保全文表述完全一致".to_string(),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

fn check_amount_consistency(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let amounts: Vec<String> = AMOUNT_MENTION
        .captures_iter(&content.text)
        .map(|caps| caps.get(2).unwrap().as_str().replace(',', ""))
        .collect();

    if amounts.len() > 1 {
        let uniques: Vec<String> = {
            let mut seen = BTreeSet::new();
            amounts
                .iter()
                .cloned()
                .filter(|amount| seen.insert(amount.clone()))
                .collect()
        };

        if uniques.len() > 1 {
            issues.push(Issue {
                problem: format!("文书中罚款金额出现多个数值：{}元", uniques.join("、")),
                location: "处罚决定部分".to_string(),
                solution: "核对金额，保留法定金额并确保全篇一致".to_string(),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

/// Find a label phrase that is immediately repeated, e.g. 经查明：经查明：
fn find_duplicated_label(paragraph: &str) -> Option<(String, String)> {
    for label_match in LABEL_PHRASE.find_iter(paragraph) {
        let label = label_match.as_str();
        let rest = &paragraph[label_match.end()..];
        let after_gap = rest.trim_start();
        // The colon variant may differ between the two copies
        let bare = &label[..label.len() - label.chars().last().unwrap().len_utf8()];
        for colon in ["：", ":"] {
            let repeated = format!("{}{}", bare, colon);
            if after_gap.starts_with(&repeated) {
                return Some((format!("{}{}", label, repeated), bare.to_string()));
            }
        }
    }
    None
}

fn check_duplicate_labels(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (index, paragraph) in content.paragraphs.iter().enumerate() {
        if let Some((found, phrase)) = find_duplicated_label(paragraph) {
            issues.push(Issue {
                problem: format!("检测到提示性短语重复：{}", found),
                location: paragraph_location(index),
                solution: format!("删除重复的“{}：”表述，仅保留一次。", phrase),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

fn check_bracket_balance(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    let mut stack: Vec<usize> = Vec::new();
    let mut unmatched_closings: Vec<usize> = Vec::new();

    for (char_index, ch) in text.chars().enumerate() {
        match ch {
            '《' => stack.push(char_index),
            '》' => {
                if stack.pop().is_none() {
                    unmatched_closings.push(char_index);
                }
            }
            _ => {}
        }
    }

    for index in unmatched_closings {
        issues.push(Issue {
            problem: "发现缺少对应前导“《”的书名号，可能导致引用不完整".to_string(),
            location: context_snippet(text, index, 20),
            solution: "补充对应的“《”使书名号成对出现，如“《书证提取单》”。".to_string(),
            severity: Severity::Warning,
        });
    }

    // Whatever is left on the stack never found its closing bracket
    for index in stack {
        issues.push(Issue {
            problem: "发现缺少对应结束“》”的书名号".to_string(),
            location: context_snippet(text, index, 20),
            solution: "补全“》”使引用名称完整，例如“《食品安全法》第三十四条”。".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_list_spacing(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (index, paragraph) in content.paragraphs.iter().enumerate() {
        let trimmed = paragraph.trim();
        let Some(caps) = NUMBERED_ITEM.captures(trimmed) else {
            continue;
        };

        let number = caps.get(1).unwrap().as_str();
        let spaces = caps.get(2).unwrap().as_str();
        let space_label = if spaces.contains('\u{3000}') {
            "全角空格"
        } else {
            "空格"
        };

        issues.push(Issue {
            problem: format!(
                "编号“{}”后存在多余{}，影响编号与正文对齐",
                number, space_label
            ),
            location: paragraph_location(index),
            solution: "删除编号后的空格，使数字与正文直接衔接，例如“3.2022年…”".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

fn check_internal_spacing(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut details: Vec<String> = Vec::new();

    for (index, paragraph) in content.paragraphs.iter().enumerate() {
        for space_match in MULTIPLE_SPACE_PATTERN.find_iter(paragraph) {
            // A run directly after a label such as 当事人： is deliberate alignment
            let preceding = &paragraph[..space_match.start()];
            if LABEL_PREFIX_PATTERN.is_match(preceding) {
                continue;
            }
            details.push(describe_space_run(paragraph, space_match.start(), space_match.end(), index));
        }
    }

    if !details.is_empty() {
        let mut seen = BTreeSet::new();
        let unique: Vec<String> = details
            .into_iter()
            .filter(|detail| seen.insert(detail.clone()))
            .collect();

        issues.push(Issue {
            problem: "检测到正文中存在连续空格或全角空格，可能影响排版整齐".to_string(),
            location: format!("位点：{}", unique.join("、")),
            solution: "请删除多余空格或改用首行缩进等方式对齐文本。".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

/// Describe where in a paragraph a whitespace run sits, for the issue text
fn describe_space_run(paragraph: &str, start: usize, end: usize, index: usize) -> String {
    let before = paragraph[..start].chars().next_back();
    let after = paragraph[end..].chars().next();

    match (before, after) {
        (None, _) => format!("{}段开头", paragraph_location(index)),
        (_, None) => format!("{}段末尾", paragraph_location(index)),
        (Some(b), Some(a)) => {
            format!("{} · “{}”与“{}”之间", paragraph_location(index), b, a)
        }
    }
}

fn check_punctuation_pairs(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (index, paragraph) in content.paragraphs.iter().enumerate() {
        let normalized: String = paragraph.chars().filter(|c| !c.is_whitespace()).collect();
        let chars: Vec<char> = normalized.chars().collect();

        for window in chars.windows(2) {
            let pair: String = window.iter().collect();
            if ILLEGAL_PUNCTUATION_PAIRS.contains(&pair.as_str()) {
                issues.push(Issue {
                    problem: format!("检测到不规范的连续标点“{}”", pair),
                    location: paragraph_location(index),
                    solution: "请检查该处标点，通常应保留一个或调整为规范组合。".to_string(),
                    severity: Severity::Info,
                });
                // One report per paragraph is enough
                break;
            }
        }
    }

    issues
}

fn check_sales_contradiction(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (index, paragraph) in content.paragraphs.iter().enumerate() {
        let normalized: String = paragraph.chars().filter(|c| !c.is_whitespace()).collect();

        let negative_spans: Vec<(usize, usize)> = NEGATIVE_SALE
            .find_iter(&normalized)
            .map(|m| (m.start(), m.end()))
            .collect();

        // A sale verb inside a negated span is not an affirmative statement
        let positive: Option<regex::Match> = POSITIVE_SALE.find_iter(&normalized).find(|m| {
            !negative_spans
                .iter()
                .any(|(start, end)| m.start() >= *start && m.start() < *end)
        });

        let (Some(positive), Some((neg_start, neg_end))) = (positive, negative_spans.first().copied())
        else {
            continue;
        };

        let negative_text = &normalized[neg_start..neg_end];
        let span_start = positive.start().min(neg_start);
        let span_end = positive.end().max(neg_end);
        let chars: Vec<char> = normalized.chars().collect();
        let char_start = normalized[..span_start].chars().count().saturating_sub(10);
        let char_end = (normalized[..span_end].chars().count() + 10).min(chars.len());
        let snippet: String = chars[char_start..char_end].iter().collect();

        issues.push(Issue {
            problem: format!(
                "同一段内检测到相反销售结论：例如“{}”与“{}”",
                positive.as_str(),
                negative_text
            ),
            location: format!("{} · 上下文：…{}…", paragraph_location(index), snippet),
            solution: "请核对销售事实，将不同时间段或状态拆分表述，确保同一段落内结论一致。"
                .to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

fn check_bottle_quantities(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    let total_numbers: BTreeSet<&str> = TOTAL_BOTTLES
        .captures_iter(text)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();
    let summary_matches: Vec<(usize, &str)> = SUMMARY_BOTTLES
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            (whole.start(), caps.get(1).unwrap().as_str())
        })
        .collect();

    let mut combined = total_numbers.clone();
    combined.extend(summary_matches.iter().map(|(_, n)| *n));

    let mismatched: Vec<&(usize, &str)> = summary_matches
        .iter()
        .filter(|(_, number)| !total_numbers.contains(number))
        .collect();

    if combined.len() > 1 && !mismatched.is_empty() {
        for (byte_start, number) in mismatched {
            let char_index = text[..*byte_start].chars().count();
            issues.push(Issue {
                problem: format!("总结语句中的“{}瓶”与前文“共计”数量不一致", number),
                location: context_snippet(text, char_index, 20),
                solution: "请核对各段落的瓶数描述，保持“共计”“上述”等表述口径一致。".to_string(),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

fn check_date_format_consistency(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if DATE_PATTERN.is_match(&content.text) && ALT_DATE_PATTERN.is_match(&content.text) {
        issues.push(Issue {
            problem: "文中日期格式不统一，混用“YYYY年MM月DD日”和“YYYY-MM-DD”等格式".to_string(),
            location: "全文".to_string(),
            solution: "统一日期格式，建议使用“YYYY年MM月DD日”".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

fn check_informal_language(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let found: Vec<&str> = INFORMAL_WORDS
        .iter()
        .copied()
        .filter(|word| content.text.contains(word))
        .collect();

    if !found.is_empty() {
        issues.push(Issue {
            problem: format!("文中出现口语化或模糊词语：{}", found.join("、")),
            location: "全文".to_string(),
            solution: "替换为准确、规范的法律用语，避免口语化描述".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}
