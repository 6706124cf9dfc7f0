//! Defensive parsing of semantic-model responses
//!
//! The model is asked for JSON but is free text in practice: prose around
//! the payload, markdown fences, or no JSON at all. Parsing is two-staged —
//! strict extraction of a balanced brace span first, then a
//! natural-language heuristic — and the outcome is a tagged value, never an
//! exception.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use shared_types::Severity;

lazy_static! {
    static ref KEY_REMNANT: Regex = Regex::new(r#""[A-Za-z_]+"\s*[:：]"#).unwrap();
    static ref SEPARATOR_RUN: Regex = Regex::new(r"\s*[,;，；]\s*").unwrap();
    static ref COLON_RUN: Regex = Regex::new(r"\s*[:：]\s*").unwrap();
    static ref PARAGRAPH_LOCATION: Regex = Regex::new(r"第(\d+)段").unwrap();
    static ref SECTION_LOCATION: Regex = Regex::new(r"第([一二三四五六七八九十百千]+)部分").unwrap();
    static ref PAGE_PARAGRAPH_LOCATION: Regex = Regex::new(r"第(\d+)页第(\d+)段").unwrap();
    static ref SEVERITY_HEADING: Regex = Regex::new(r"##?\s*(严重问题|警告问题)").unwrap();
    static ref ASSESSMENT_HEADING: Regex = Regex::new(r"##?\s*总体评价").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^[-\d.、]+\s*(.+)$").unwrap();
}

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '`'];
const FALLBACK_TEXT: &str = "内容待补充";
const DEFAULT_CONFIDENCE: u8 = 85;

/// Location keyword → section label mapping for vague model locations
const LOCATION_LABELS: &[(&[&str], &str)] = &[
    (&["标题", "抬头", "两行结构"], "标题部分"),
    (&["文号", "案号", "字号"], "文号部分"),
    (&["当事人", "被处罚人", "法定代表人"], "当事人信息段"),
    (&["违法事实", "经查", "调查", "事实"], "违法事实部分"),
    (&["证据", "笔录", "材料"], "证据说明部分"),
    (&["处罚决定", "决定如下", "责令", "处以"], "处罚决定段"),
    (&["复议", "诉讼", "救济", "期限", "缴纳", "滞纳金"], "救济及履行要求段"),
    (&["落款", "盖章", "机关", "日期", "署名"], "落款部分"),
    (&["附表", "附件", "表格"], "附件部分"),
];

/// One issue proposed by the semantic model, sanitized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiIssue {
    pub severity: Severity,
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub suggestion: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSummary {
    pub language_score: u32,
    pub logic_score: u32,
    pub overall_assessment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAnalysis {
    pub issues: Vec<AiIssue>,
    pub summary: AiSummary,
}

/// Outcome of response parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAnalysis {
    /// Strict JSON payload found and decoded
    Json(AiAnalysis),
    /// No JSON; the natural-language extractor recovered something
    Heuristic(AiAnalysis),
    /// Neither stage produced a usable result
    Unparseable,
}

impl ParsedAnalysis {
    /// The analysis, treating an unparseable reply as zero issues
    pub fn into_analysis(self) -> Option<AiAnalysis> {
        match self {
            ParsedAnalysis::Json(analysis) | ParsedAnalysis::Heuristic(analysis) => Some(analysis),
            ParsedAnalysis::Unparseable => None,
        }
    }
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

fn is_anchor(c: char) -> bool {
    c.is_ascii_digit() || is_cjk(c)
}

/// Clean one text field from the model: collapse whitespace, strip JSON
/// remnants and stray quotes, normalize punctuation spacing.
pub fn sanitize_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return FALLBACK_TEXT.to_string();
    }

    // Collapse newlines and runs of whitespace, undo escaped quotes
    let mut text = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("\\\"", "\"");

    // Strip wrapping braces/brackets
    text = text
        .trim_start_matches(['[', '{'])
        .trim_end_matches([']', '}'])
        .trim()
        .to_string();

    // Drop leaked English key names such as "issues": before touching
    // quotes, then the wrapping quotes themselves
    text = KEY_REMNANT.replace_all(&text, "").to_string();
    text = text
        .trim()
        .trim_matches(|c| QUOTE_CHARS.contains(&c))
        .trim()
        .to_string();

    // Remove quote runs not anchored to a digit or CJK character on either
    // side; quotes hugging content stay
    let chars: Vec<char> = text.chars().collect();
    let mut kept = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if QUOTE_CHARS.contains(&chars[i]) {
            let run_start = i;
            while i < chars.len() && QUOTE_CHARS.contains(&chars[i]) {
                i += 1;
            }
            let before_anchored = run_start > 0 && is_anchor(chars[run_start - 1]);
            let after_anchored = i < chars.len() && is_anchor(chars[i]);
            if before_anchored || after_anchored {
                kept.extend(&chars[run_start..i]);
            }
        } else {
            kept.push(chars[i]);
            i += 1;
        }
    }
    text = kept
        .trim_matches(|c| QUOTE_CHARS.contains(&c))
        .trim()
        .to_string();

    if text.chars().any(is_cjk) {
        text = SEPARATOR_RUN
            .replace_all(&text, |caps: &regex::Captures| {
                let m = caps.get(0).unwrap().as_str();
                if m.contains('，') || m.contains('；') {
                    m.trim().to_string()
                } else {
                    "，".to_string()
                }
            })
            .to_string();
        text = COLON_RUN.replace_all(&text, "：").to_string();
        text = strip_spaces_between_cjk(&text);
        text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    if text.is_empty() {
        FALLBACK_TEXT.to_string()
    } else {
        text
    }
}

fn strip_spaces_between_cjk(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            let prev = chars[..i].iter().rev().find(|ch| !ch.is_whitespace());
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if let (Some(prev), Some(next)) = (prev, next) {
                if is_cjk(*prev) && is_cjk(*next) {
                    continue;
                }
            }
        }
        out.push(*c);
    }
    out
}

/// Extract the first balanced `{…}` span that parses as JSON.
pub fn extract_json_payload(text: &str) -> Option<String> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;

    if last > first {
        let candidate = &text[first..=last];
        if serde_json::from_str::<Value>(candidate).is_ok() {
            return Some(candidate.to_string());
        }
    }

    // Outermost span was not valid JSON; walk balanced spans from each brace
    for (start, _) in text.char_indices().filter(|(_, c)| *c == '{') {
        let mut depth = 0usize;
        for (offset, c) in text[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &text[start..start + offset + 1];
                        if serde_json::from_str::<Value>(candidate).is_ok() {
                            return Some(candidate.to_string());
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    None
}

fn severity_from_str(raw: Option<&str>) -> Severity {
    match raw {
        Some("critical") => Severity::Critical,
        Some("warning") => Severity::Warning,
        _ => Severity::Info,
    }
}

fn clamp_score(value: Option<i64>) -> u32 {
    value.unwrap_or(85).clamp(0, 100) as u32
}

fn clamp_confidence(value: Option<i64>) -> u8 {
    value
        .unwrap_or(i64::from(DEFAULT_CONFIDENCE))
        .clamp(0, 100) as u8
}

/// Paragraph/section references the model stated explicitly
fn extract_explicit_location(raw: &str) -> Option<String> {
    let normalized: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(caps) = PARAGRAPH_LOCATION.captures(&normalized) {
        return Some(format!("第{}段", &caps[1]));
    }
    if let Some(caps) = SECTION_LOCATION.captures(&normalized) {
        return Some(format!("第{}部分", &caps[1]));
    }
    if let Some(caps) = PAGE_PARAGRAPH_LOCATION.captures(&normalized) {
        return Some(format!("第{}页第{}段", &caps[1], &caps[2]));
    }

    None
}

/// Map a vague location onto a document section label
fn refine_location(raw: &str, description: &str) -> String {
    let cleaned = sanitize_text(raw);
    if cleaned != FALLBACK_TEXT {
        return cleaned;
    }

    let haystack = format!("{} {}", raw, description);
    for (keywords, label) in LOCATION_LABELS {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return (*label).to_string();
        }
    }

    "全文".to_string()
}

fn sanitize_issue(issue: AiIssue) -> AiIssue {
    let description = sanitize_text(&issue.description);
    let location = extract_explicit_location(&issue.location)
        .unwrap_or_else(|| refine_location(&issue.location, &description));
    AiIssue {
        severity: issue.severity,
        category: sanitize_text(&issue.category),
        title: sanitize_text(&issue.title),
        description,
        location,
        suggestion: sanitize_text(&issue.suggestion),
        confidence: issue.confidence,
    }
}

fn analysis_from_value(value: &Value) -> AiAnalysis {
    let issues = value
        .get("issues")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let text_field = |key: &str, default: &str| {
                        item.get(key)
                            .and_then(Value::as_str)
                            .filter(|s| !s.trim().is_empty())
                            .unwrap_or(default)
                            .to_string()
                    };
                    sanitize_issue(AiIssue {
                        severity: severity_from_str(item.get("type").and_then(Value::as_str)),
                        category: text_field("category", "AI分析"),
                        title: text_field("title", "检测到问题"),
                        description: text_field("description", ""),
                        location: text_field("location", "相关段落"),
                        suggestion: text_field("suggestion", "建议进行优化"),
                        confidence: clamp_confidence(
                            item.get("confidence").and_then(Value::as_i64),
                        ),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = value.get("summary");
    let summary = AiSummary {
        language_score: clamp_score(
            summary
                .and_then(|s| s.get("languageScore"))
                .and_then(Value::as_i64),
        ),
        logic_score: clamp_score(
            summary
                .and_then(|s| s.get("logicScore"))
                .and_then(Value::as_i64),
        ),
        overall_assessment: sanitize_text(
            summary
                .and_then(|s| s.get("overallAssessment"))
                .and_then(Value::as_str)
                .unwrap_or("整体质量良好"),
        ),
    };

    AiAnalysis { issues, summary }
}

/// Parse a full analysis reply: strict JSON first, heuristics second.
pub fn parse_analysis_response(text: &str) -> ParsedAnalysis {
    if let Some(payload) = extract_json_payload(text) {
        if let Ok(value) = serde_json::from_str::<Value>(&payload) {
            return ParsedAnalysis::Json(analysis_from_value(&value));
        }
    }

    match natural_language_analysis(text) {
        Some(analysis) => ParsedAnalysis::Heuristic(analysis),
        None => ParsedAnalysis::Unparseable,
    }
}

/// Take the body of a `## 标题` section up to the next heading
fn section_body<'a>(text: &'a str, heading: &Regex) -> Option<&'a str> {
    let found = heading.find(text)?;
    let rest = &text[found.end()..];
    match rest.find("##") {
        Some(end) => Some(&rest[..end]),
        None => Some(rest),
    }
}

fn section_issues(text: &str, heading_text: &str, severity: Severity) -> Vec<AiIssue> {
    let heading = Regex::new(&format!(r"##?\s*{}", heading_text)).unwrap();
    let Some(body) = section_body(text, &heading) else {
        return Vec::new();
    };

    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let caps = LIST_ITEM.captures(trimmed)?;
            let item = caps.get(1).unwrap().as_str().trim();
            if item.chars().count() <= 5 {
                return None;
            }
            Some(sanitize_issue(AiIssue {
                severity,
                category: "AI分析".to_string(),
                title: heading_text.to_string(),
                description: item.to_string(),
                location: "相关段落".to_string(),
                suggestion: if severity == Severity::Critical {
                    "建议立即修正".to_string()
                } else {
                    "建议优化".to_string()
                },
                confidence: if severity == Severity::Critical { 90 } else { 85 },
            }))
        })
        .collect()
}

/// Heuristic extraction from a prose reply.
///
/// Returns `None` when the reply carries no recognizable review content at
/// all, which callers treat as zero AI issues.
fn natural_language_analysis(text: &str) -> Option<AiAnalysis> {
    let mut issues = section_issues(text, "严重问题", Severity::Critical);
    issues.extend(section_issues(text, "警告问题", Severity::Warning));

    let assessment = section_body(text, &ASSESSMENT_HEADING)
        .map(sanitize_text)
        .filter(|a| *a != FALLBACK_TEXT);

    if issues.is_empty() && assessment.is_none() && !SEVERITY_HEADING.is_match(text) {
        // Last resort: a reply that talks about problems without structure
        // becomes a single low-confidence pointer
        let mentions_review =
            text.contains("问题") || text.contains("建议") || text.contains("不规范");
        if !mentions_review {
            return None;
        }
        let preview: String = text.chars().take(200).collect();
        return Some(AiAnalysis {
            issues: vec![sanitize_issue(AiIssue {
                severity: Severity::Info,
                category: "AI语义分析".to_string(),
                title: "AI检测到改进点".to_string(),
                description: "根据AI分析，文档存在可以改进的地方".to_string(),
                location: "全文".to_string(),
                suggestion: format!("{}…", preview),
                confidence: 70,
            })],
            summary: AiSummary {
                language_score: 80,
                logic_score: 80,
                overall_assessment: "AI分析完成，请参考具体建议".to_string(),
            },
        });
    }

    let critical_count = issues.iter().filter(|i| i.severity == Severity::Critical).count();
    let warning_count = issues.iter().filter(|i| i.severity == Severity::Warning).count();
    let score = (95i64 - critical_count as i64 * 10 - warning_count as i64 * 5).max(60) as u32;

    Some(AiAnalysis {
        issues,
        summary: AiSummary {
            language_score: score,
            logic_score: score,
            overall_assessment: assessment.unwrap_or_else(|| "文书已通过AI审查".to_string()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_extracted_from_fenced_reply() {
        let reply = "分析如下：\n```json\n{\"issues\": [], \"summary\": {\"languageScore\": 90}}\n```\n以上。";
        let payload = extract_json_payload(reply).unwrap();
        assert!(payload.starts_with('{') && payload.ends_with('}'));
        assert!(serde_json::from_str::<Value>(&payload).is_ok());
    }

    #[test]
    fn payload_found_despite_stray_brace_in_prose() {
        let reply = "注意 } 这里有个括号。{\"issues\": []} 完毕。";
        let payload = extract_json_payload(reply).unwrap();
        assert_eq!(payload, "{\"issues\": []}");
    }

    #[test]
    fn no_payload_in_plain_prose() {
        assert_eq!(extract_json_payload("文书整体质量良好。"), None);
    }

    #[test]
    fn json_reply_parses_issues_and_summary() {
        let reply = r#"{"issues": [{"type": "critical", "category": "当事人信息",
            "title": "缺少身份证号", "description": "当事人段未见身份证号码",
            "location": "第2段", "suggestion": "补充身份证号码", "confidence": 92}],
            "summary": {"languageScore": 88, "logicScore": 76, "overallAssessment": "基本规范"}}"#;

        let ParsedAnalysis::Json(analysis) = parse_analysis_response(reply) else {
            panic!("expected strict JSON parse");
        };
        assert_eq!(analysis.issues.len(), 1);
        let issue = &analysis.issues[0];
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.location, "第2段");
        assert_eq!(issue.confidence, 92);
        assert_eq!(analysis.summary.language_score, 88);
        assert_eq!(analysis.summary.logic_score, 76);
        assert_eq!(analysis.summary.overall_assessment, "基本规范");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let reply = r#"{"issues": [{"description": "表述含糊"}], "summary": {}}"#;
        let ParsedAnalysis::Json(analysis) = parse_analysis_response(reply) else {
            panic!("expected strict JSON parse");
        };
        let issue = &analysis.issues[0];
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.category, "AI分析");
        assert_eq!(issue.title, "检测到问题");
        assert_eq!(issue.confidence, 85);
        assert_eq!(analysis.summary.language_score, 85);
    }

    #[test]
    fn out_of_range_scores_clamped() {
        let reply = r#"{"issues": [], "summary": {"languageScore": 140, "logicScore": -3}}"#;
        let ParsedAnalysis::Json(analysis) = parse_analysis_response(reply) else {
            panic!("expected strict JSON parse");
        };
        assert_eq!(analysis.summary.language_score, 100);
        assert_eq!(analysis.summary.logic_score, 0);
    }

    #[test]
    fn natural_language_sections_recovered() {
        let reply = "审查意见如下。\n## 严重问题\n1. 文书缺少听证权利告知内容\n2. 短\n## 警告问题\n- 落款日期格式不规范，建议修改\n## 总体评价\n整体结构完整，个别要素缺失。";

        let ParsedAnalysis::Heuristic(analysis) = parse_analysis_response(reply) else {
            panic!("expected heuristic parse");
        };
        assert_eq!(analysis.issues.len(), 2);
        assert_eq!(analysis.issues[0].severity, Severity::Critical);
        assert_eq!(analysis.issues[1].severity, Severity::Warning);
        // 95 - 10 - 5
        assert_eq!(analysis.summary.language_score, 80);
        assert!(analysis.summary.overall_assessment.contains("结构完整"));
    }

    #[test]
    fn unstructured_problem_mention_becomes_single_pointer() {
        let reply = "这份文书存在一些问题，建议复核当事人信息。";
        let ParsedAnalysis::Heuristic(analysis) = parse_analysis_response(reply) else {
            panic!("expected heuristic parse");
        };
        assert_eq!(analysis.issues.len(), 1);
        assert_eq!(analysis.issues[0].severity, Severity::Info);
        assert_eq!(analysis.issues[0].confidence, 70);
    }

    #[test]
    fn contentless_reply_is_unparseable() {
        assert_eq!(
            parse_analysis_response("好的，已经收到文书内容。"),
            ParsedAnalysis::Unparseable
        );
    }

    #[test]
    fn sanitize_strips_json_remnants_but_keeps_digits() {
        assert_eq!(sanitize_text("{\"罚款 300 元\"}"), "罚款 300 元");
        assert_eq!(sanitize_text("\"description\": 缺少 依据"), "缺少依据");
    }

    #[test]
    fn sanitize_removes_spaces_between_cjk() {
        assert_eq!(sanitize_text("缺少  听证  告知"), "缺少听证告知");
    }

    #[test]
    fn sanitize_empty_falls_back() {
        assert_eq!(sanitize_text("  \n "), FALLBACK_TEXT);
        assert_eq!(sanitize_text("\"\""), FALLBACK_TEXT);
    }

    #[test]
    fn explicit_paragraph_location_wins() {
        assert_eq!(extract_explicit_location("第 3 段末尾"), Some("第3段".to_string()));
        assert_eq!(extract_explicit_location("第二部分"), Some("第二部分".to_string()));
        assert_eq!(extract_explicit_location("开头附近"), None);
    }

    #[test]
    fn vague_location_mapped_to_section_label() {
        assert_eq!(refine_location("", "落款处缺少盖章"), "落款部分");
        assert_eq!(refine_location("", "行政复议期限表述不全"), "救济及履行要求段");
        assert_eq!(refine_location("", "没有任何线索"), "全文");
    }
}
