//! Regex patterns and text helpers shared across the rule catalog

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::DocumentContent;

lazy_static! {
    /// Standard Chinese date: 2025年5月10日
    pub static ref DATE_PATTERN: Regex = Regex::new(r"\d{4}年\d{1,2}月\d{1,2}日").unwrap();

    /// Western-style date: 2025-05-10, 2025/5/10, 2025.5.10
    pub static ref ALT_DATE_PATTERN: Regex =
        Regex::new(r"\d{4}[-/.]\d{1,2}[-/.]\d{1,2}").unwrap();

    /// Strict case-number shape: （机关简称）…处罚〔2025〕…号
    pub static ref CASE_NUMBER_PATTERN: Regex = Regex::new(
        r"[（(][^）)]{1,12}[）)][^〔\[]*?(处罚|决定|字)[〔\[]\d{4}[〕\]][^号]{0,8}号"
    )
    .unwrap();

    /// Looser case-number shape, matched against whitespace-stripped lines
    pub static ref CASE_NUMBER_NORMALIZED_PATTERN: Regex = Regex::new(
        r"[（(]?[\u{4e00}-\u{9fa5}]{0,8}[）)]?(市监罚处|市监罚字|市监处字|市监处罚|市监罚决|市监处|市监罚|市监|监罚|监处|处罚字|处罚|罚字|罚处|处字|决定|罚决|政处|执法处)[〔\[]?\d{4}[〕\]]?\d{1,6}号"
    )
    .unwrap();

    /// A line that looks like it is meant to be the case-number line
    pub static ref CASE_NUMBER_LINE_PATTERN: Regex = Regex::new(
        r"^\s*[（(]?[\u{4e00}-\u{9fa5}A-Za-z（）()]{1,20}[）)]?[^〔\[]*?[〔\[]\d{4}[〕\]]\s*\d{1,6}号"
    )
    .unwrap();

    /// Keywords marking a party as a unit rather than an individual
    pub static ref UNIT_KEYWORDS_PATTERN: Regex = Regex::new(
        r"(单位|公司|有限责任公司|分公司|合作社|中心|企业|商行|门店|药店|学校|医院|超市|店|集团|支队|大队|事务所|研究所|协会|合作联社|工作室|个体工商户)"
    )
    .unwrap();

    /// Two or more consecutive spacing characters, full-width included
    pub static ref MULTIPLE_SPACE_PATTERN: Regex =
        Regex::new(r"[\u{3000}\u{00A0}\u{2000}-\u{200B}\s]{2,}").unwrap();

    /// Label prefix such as 当事人： at the start of a paragraph
    pub static ref LABEL_PREFIX_PATTERN: Regex =
        Regex::new(r"^[\u{4e00}-\u{9fa5}（）()]{1,20}[：:]").unwrap();

    /// Statute article locator: 第…条 / 款 / 项, Chinese numerals included
    pub static ref ARTICLE_LOCATOR_PATTERN: Regex = Regex::new(
        r"第[零〇一二三四五六七八九十百千万亿两壹贰叁肆伍陆柒捌玖拾佰仟萬\d]+(条|款|项)"
    )
    .unwrap();

    /// Statute citation in book-title brackets: 《食品安全法》
    pub static ref LAW_TITLE_PATTERN: Regex =
        Regex::new(r"《([\u{4e00}-\u{9fa5}]{2,})》").unwrap();
}

/// Fine thresholds above which a hearing notice is mandatory, in yuan
pub const HEARING_THRESHOLD_INDIVIDUAL: f64 = 10_000.0;
pub const HEARING_THRESHOLD_UNIT: f64 = 100_000.0;

/// Colloquial or vague wording that has no place in a penalty decision
pub const INFORMAL_WORDS: &[&str] = &[
    "很", "比较", "可能", "差不多", "挺", "特别", "估计", "大约", "左右", "基本上", "通常",
];

/// Penalty kinds a decision must name explicitly
pub const PENALTY_TYPE_KEYWORDS: &[&str] = &[
    "警告", "罚款", "没收", "责令停产停业", "暂扣", "吊销", "行政拘留",
];

/// Strip all whitespace; most phrase checks run on this form so that line
/// breaks inside a clause cannot defeat them
pub fn normalize_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Human-readable paragraph reference, 1-based
pub fn paragraph_location(index: usize) -> String {
    format!("第{}段", index + 1)
}

/// Snippet of up to `radius` characters on each side of a character offset,
/// whitespace collapsed, for use as an issue location
pub fn context_snippet(text: &str, char_index: usize, radius: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = char_index.saturating_sub(radius);
    let end = (char_index + radius).min(chars.len());
    let snippet: String = chars[start..end].iter().filter(|c| !c.is_whitespace()).collect();
    if snippet.is_empty() {
        "相关段落".to_string()
    } else {
        format!("…{}…", snippet)
    }
}

/// Concatenated text of the last `count` paragraphs; the whole text when the
/// document has no paragraph segmentation
pub fn tail_paragraph_text(content: &DocumentContent, count: usize) -> String {
    if content.paragraphs.is_empty() {
        return content.text.clone();
    }
    let start = content.paragraphs.len().saturating_sub(count);
    content.paragraphs[start..].concat()
}

/// Split normalized text into sentences on Chinese and Western terminators
pub fn split_sentences(normalized: &str) -> Vec<String> {
    normalized
        .split(['。', '；', ';', '!', '?', '？', '！'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

pub fn contains_article_locator(text: &str) -> bool {
    ARTICLE_LOCATOR_PATTERN.is_match(text)
}

pub fn is_unit_party(text: &str) -> bool {
    UNIT_KEYWORDS_PATTERN.is_match(text)
}
