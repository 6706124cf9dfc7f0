//! Stage 1: 文书格式检查 — document-level format checks

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::extractors::layout;
use crate::patterns::normalize_text;

use super::Rule;

/// Minimum non-whitespace character count for a complete decision
const MIN_CONTENT_CHARS: usize = 500;
/// Minimum paragraph count for a structurally complete decision
const MIN_PARAGRAPHS: usize = 6;
/// Title and case-number paragraphs are exempt from body-layout rules
const BODY_START_PARAGRAPH: usize = 3;
/// Cap on locations listed in one layout issue
const MAX_LISTED_LOCATIONS: usize = 8;

lazy_static! {
    static ref PARTY_SECTION: Regex = Regex::new(r"(当事人|被处罚人)").unwrap();
    static ref FACT_SECTION: Regex = Regex::new(r"(违法事实|违法行为|经查|经调查)").unwrap();
    static ref DECISION_SECTION: Regex =
        Regex::new(r"(决定给予|决定对|现决定|处罚如下)").unwrap();

    static ref LIST_HEADING: Regex =
        Regex::new(r"^[（(]?[一二三四五六七八九十0-9]+[、.．）)]").unwrap();
    static ref CHAPTER_HEADING: Regex =
        Regex::new(r"^第[一二三四五六七八九十百]+[章节条款]").unwrap();
    static ref LABEL_PARAGRAPH: Regex =
        Regex::new(r"^[\u{4e00}-\u{9fa5}（）()]{1,15}[：:]").unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "format_title_presence",
            name: "文书标题是否存在",
            category: ReviewCategory::Format,
            severity: Severity::Critical,
            description: "检查文书是否包含标题，避免文书结构缺失",
            check: check_title_presence,
        },
        Rule {
            id: "format_content_length",
            name: "文书内容完整性",
            category: ReviewCategory::Format,
            severity: Severity::Warning,
            description: "检查文书字数是否足以覆盖必备要素",
            check: check_content_length,
        },
        Rule {
            id: "format_basic_sections",
            name: "基本结构要素",
            category: ReviewCategory::Format,
            severity: Severity::Critical,
            description: "检查是否至少出现当事人信息、违法事实和处罚决定要素",
            check: check_basic_sections,
        },
        Rule {
            id: "paragraph_indentation",
            name: "正文段落首行缩进",
            category: ReviewCategory::Format,
            severity: Severity::Warning,
            description: "检查正文段落是否保持首行缩进两个字符（标准：18-24pt）",
            check: check_paragraph_indentation,
        },
        Rule {
            id: "paragraph_line_spacing",
            name: "段落行间距规范",
            category: ReviewCategory::Format,
            severity: Severity::Warning,
            description: "检查段落行间距是否符合公文格式要求（固定值28磅或1.5倍行距）",
            check: check_paragraph_line_spacing,
        },
    ]
}

fn check_title_presence(_content: &DocumentContent, structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    if structure.title.trim().is_empty() {
        issues.push(Issue {
            problem: "缺少文书标题，无法识别为行政处罚决定书".to_string(),
            location: "文书顶部".to_string(),
            solution: "补充完整的标题信息，建议两行格式：机关名称 + 行政处罚决定书".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

fn check_content_length(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    if normalize_text(&content.text).chars().count() < MIN_CONTENT_CHARS {
        issues.push(Issue {
            problem: "文书内容明显偏少，可能缺失必要事实或程序说明".to_string(),
            location: "全文".to_string(),
            solution: "核对文书模板，补充调查经过、事实认定、法律依据等必要部分".to_string(),
            severity: Severity::Warning,
        });
    }

    if content.paragraphs.len() < MIN_PARAGRAPHS {
        issues.push(Issue {
            problem: "文书段落数量过少，结构可能不完整".to_string(),
            location: "全文".to_string(),
            solution: "对照标准模板补充当事人信息、违法事实、权利告知等段落".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

fn check_basic_sections(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    if !PARTY_SECTION.is_match(text) {
        issues.push(Issue {
            problem: "文书缺少当事人身份信息段落".to_string(),
            location: "正文开头".to_string(),
            solution: "补充“当事人”“被处罚人”等基本身份信息及联系方式".to_string(),
            severity: Severity::Critical,
        });
    }

    if !FACT_SECTION.is_match(text) {
        issues.push(Issue {
            problem: "未见违法事实认定段落，无法体现处罚依据".to_string(),
            location: "正文主体部分".to_string(),
            solution: "增加违法事实认定段落，写明时间、地点、行为及证据".to_string(),
            severity: Severity::Critical,
        });
    }

    if !DECISION_SECTION.is_match(text) {
        issues.push(Issue {
            problem: "文书缺少明确的处罚决定表述".to_string(),
            location: "处罚决定部分".to_string(),
            solution: "使用“决定给予……处罚”等标准决定语句".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

/// Paragraphs the layout rules should not judge: title block, short lines,
/// numbered headings and label-style lines
fn exempt_from_layout(para: &shared_types::ParagraphFormat) -> bool {
    if para.index < BODY_START_PARAGRAPH {
        return true;
    }
    let trimmed = para.text.trim();
    if trimmed.chars().count() < 10 {
        return true;
    }
    LIST_HEADING.is_match(trimmed)
        || CHAPTER_HEADING.is_match(trimmed)
        || LABEL_PARAGRAPH.is_match(trimmed)
}

fn check_paragraph_indentation(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let Some(format_info) = &content.format_info else {
        // Extraction could not read the layout; flag for manual review
        issues.push(Issue {
            problem: "无法精确检测段落缩进格式（Word格式解析失败）".to_string(),
            location: "全文".to_string(),
            solution: "请手动检查所有正文段落是否设置了首行缩进2字符（约21pt或0.74cm）"
                .to_string(),
            severity: Severity::Info,
        });
        return issues;
    };

    let mut missing: Vec<(usize, String)> = Vec::new();
    let mut insufficient: Vec<(usize, String)> = Vec::new();

    for para in &format_info.paragraphs {
        if exempt_from_layout(para) {
            continue;
        }

        if layout::has_valid_indent(para) {
            continue;
        }

        if layout::has_partial_indent(para) {
            insufficient.push((para.index, layout::format_indent(para.first_line_indent)));
        } else {
            let label = if para.first_line_indent > 0 {
                layout::format_indent(para.first_line_indent)
            } else {
                "无缩进".to_string()
            };
            missing.push((para.index, label));
        }
    }

    if !missing.is_empty() {
        issues.push(Issue {
            problem: format!(
                "以下段落首行缩进不符合标准（应为18-24pt）：{}",
                describe_locations(&missing)
            ),
            location: "正文段落".to_string(),
            solution: "请在Word中设置首行缩进为2字符（约21pt或0.74cm），或在段首添加两个全角空格"
                .to_string(),
            severity: Severity::Warning,
        });
    }

    if !insufficient.is_empty() {
        issues.push(Issue {
            problem: format!(
                "以下段落首行缩进不足2字符：{}",
                describe_locations(&insufficient)
            ),
            location: "正文段落".to_string(),
            solution: "请调整缩进至标准的2字符（约21pt或0.74cm）".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

fn describe_locations(entries: &[(usize, String)]) -> String {
    let listed: Vec<String> = entries
        .iter()
        .take(MAX_LISTED_LOCATIONS)
        .map(|(index, detail)| format!("第{}段({})", index + 1, detail))
        .collect();
    let suffix = if entries.len() > MAX_LISTED_LOCATIONS {
        format!("等共{}段", entries.len())
    } else {
        String::new()
    };
    format!("{}{}", listed.join("、"), suffix)
}

fn check_paragraph_line_spacing(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let Some(format_info) = &content.format_info else {
        issues.push(Issue {
            problem: "无法精确检测段落行间距格式（Word格式解析失败）".to_string(),
            location: "全文".to_string(),
            solution: "请手动检查所有正文段落行距是否设置为“固定值28磅”或“1.5倍行距”"
                .to_string(),
            severity: Severity::Info,
        });
        return issues;
    };

    let mut checked = 0usize;
    let mut problems: Vec<(usize, String)> = Vec::new();

    for para in &format_info.paragraphs {
        if exempt_from_layout(para) {
            continue;
        }
        checked += 1;
        if !layout::has_valid_line_spacing(para) {
            problems.push((para.index, layout::format_line_spacing(para)));
        }
    }

    // A lone off-spec paragraph is usually an intentional layout choice;
    // only report when over 30% of the body deviates
    if checked > 0 && problems.len() * 10 > checked * 3 {
        let listed: Vec<String> = problems
            .iter()
            .take(5)
            .map(|(index, detail)| format!("第{}段({})", index + 1, detail))
            .collect();
        let suffix = if problems.len() > 5 {
            format!("等共{}段", problems.len())
        } else {
            String::new()
        };

        issues.push(Issue {
            problem: format!(
                "多个段落行间距不符合公文格式标准：{}{}",
                listed.join("、"),
                suffix
            ),
            location: "正文段落".to_string(),
            solution: "请在Word中选中正文段落，设置行距为“固定值28磅”或“1.5倍行距”".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{FormatInfo, LineRule, ParagraphFormat};

    fn structure_with_title(title: &str) -> DocumentStructure {
        DocumentStructure {
            title: title.to_string(),
            title_lines: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn body_paragraph(index: usize, indent: u32) -> ParagraphFormat {
        ParagraphFormat {
            text: "经查明，当事人于检查当日存在相关经营行为，情节如下。".to_string(),
            index,
            first_line_indent: indent,
            line: Some(560),
            line_rule: Some(LineRule::Exact),
        }
    }

    #[test]
    fn missing_title_is_critical() {
        let content = DocumentContent::from_text("正文");
        let issues = check_title_presence(&content, &structure_with_title("  "));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn present_title_passes() {
        let content = DocumentContent::from_text("正文");
        let issues = check_title_presence(&content, &structure_with_title("行政处罚决定书"));
        assert!(issues.is_empty());
    }

    #[test]
    fn short_document_flags_length_and_paragraph_count() {
        let content = DocumentContent::from_text("当事人：张三\n经查明。\n决定如下。");
        let issues = check_content_length(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.severity == Severity::Warning));
        assert!(issues.iter().any(|i| i.severity == Severity::Info));
    }

    #[test]
    fn missing_decision_statement_detected() {
        let content =
            DocumentContent::from_text("当事人：张三。经查，存在违法行为。双方确认无误。");
        let issues = check_basic_sections(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].problem.contains("处罚决定"));
    }

    #[test]
    fn indentation_rule_reports_missing_and_partial() {
        let format_info = FormatInfo {
            paragraphs: vec![
                body_paragraph(0, 0), // title block, exempt
                body_paragraph(3, 0),
                body_paragraph(4, 200),
                body_paragraph(5, 420),
            ],
        };
        let content = DocumentContent::from_text("正文").with_format_info(format_info);
        let issues = check_paragraph_indentation(&content, &DocumentStructure::default());

        assert_eq!(issues.len(), 2);
        assert!(issues[0].problem.contains("第4段(无缩进)"));
        assert!(issues[1].problem.contains("第5段(10.0pt (0.35cm))"));
    }

    #[test]
    fn indentation_rule_degrades_without_format_info() {
        let content = DocumentContent::from_text("正文");
        let issues = check_paragraph_indentation(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn line_spacing_needs_thirty_percent_deviation() {
        let mut paragraphs: Vec<ParagraphFormat> =
            (3..13).map(|i| body_paragraph(i, 420)).collect();
        // 2 of 10 off-spec: below the reporting threshold
        paragraphs[0].line = Some(240);
        paragraphs[0].line_rule = Some(LineRule::Auto);
        paragraphs[1].line = None;
        paragraphs[1].line_rule = None;

        let content = DocumentContent::from_text("正文")
            .with_format_info(FormatInfo { paragraphs: paragraphs.clone() });
        assert!(check_paragraph_line_spacing(&content, &DocumentStructure::default()).is_empty());

        // 4 of 10 off-spec: reported
        paragraphs[2].line = Some(240);
        paragraphs[2].line_rule = Some(LineRule::Auto);
        paragraphs[3].line = Some(700);
        paragraphs[3].line_rule = Some(LineRule::Exact);
        let content =
            DocumentContent::from_text("正文").with_format_info(FormatInfo { paragraphs });
        let issues = check_paragraph_line_spacing(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
