//! Stage 4: 正文部分 — body content checks

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::patterns::{
    contains_article_locator, is_unit_party, normalize_text, LAW_TITLE_PATTERN,
    PENALTY_TYPE_KEYWORDS, ALT_DATE_PATTERN, DATE_PATTERN,
};

use super::Rule;

/// Party identity details are expected within the opening of the document
const PARTY_SECTION_CHARS: usize = 1000;

lazy_static! {
    static ref ID_INFO: Regex = Regex::new(
        r"(?i)(身份证|居民身份证|身份证号|身份证号码|公民身份号码|证件号|证件号码)[\s（(]*[^：:]*[）)]*\s*[：:]\s*[0-9X\s]{15,20}"
    )
    .unwrap();
    static ref CREDIT_INFO: Regex = Regex::new(
        r"(?i)(统一社会信用代码|社会信用代码|信用代码|组织机构代码|营业执照号|注册号)[\s（(]*[^：:]*[）)]*\s*[：:]\s*[0-9A-Z\-\s]{8,}"
    )
    .unwrap();
    static ref REPRESENTATIVE_INFO: Regex =
        Regex::new(r"(法定代表人|主要负责人|负责人|经理)[：:].+").unwrap();

    static ref FACT_SECTION: Regex =
        Regex::new(r"(违法事实|违法行为|经查|查明|案件来源|调查发现)").unwrap();
    static ref LOCATION_PHRASE: Regex = Regex::new(
        r"(在.{0,30}(进行|经营|销售|生产)|于.{0,20}处|地点为|发生在|位于|营业场所|经营地址|经营场所|现场检查)"
    )
    .unwrap();

    static ref EVIDENCE_KEYWORDS: Regex = Regex::new(
        r"证据[一二三四五六七八九十0-9]|询问笔录|现场检查笔录|检查笔录|调查笔录|检测报告|检验报告|鉴定意见|票据|照片|凭证|扣押清单|证明材料|书证|物证|视听资料|电子数据"
    )
    .unwrap();
    static ref EVIDENCE_PROCEDURE: Regex = Regex::new(
        r"(有证据证明|经调查|经查|查明|调查取证|现场检查|抽样检验|送检|经审查)"
    )
    .unwrap();

    static ref VIOLATION_CITATION: Regex =
        Regex::new(r"(违反|构成).*?(法|条例|规定|办法)[^。；]{0,20}(条|款|项)").unwrap();
    static ref BASIS_CITATION: Regex =
        Regex::new(r"(依据|根据).*?(法|条例|规定|办法)[^。；]{0,30}(条|款|项)").unwrap();

    static ref FINE_AMOUNT_STATED: Regex = Regex::new(
        r"(?:人民币|金额|共计).*?(元|万元)|罚款[:：]\s*\d+(?:,\d{3})*(?:\.\d+)?\s*元?"
    )
    .unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "party_information_completeness",
            name: "当事人信息完整性",
            category: ReviewCategory::MainContent,
            severity: Severity::Warning,
            description: "检查当事人基本信息是否包含关键要素（身份证/统一社会信用代码）",
            check: check_party_information,
        },
        Rule {
            id: "legal_representative_information",
            name: "法定代表人信息",
            category: ReviewCategory::MainContent,
            severity: Severity::Warning,
            description: "检查单位当事人是否注明法定代表人或负责人",
            check: check_legal_representative,
        },
        Rule {
            id: "violation_facts_specificity",
            name: "违法事实具体性",
            category: ReviewCategory::MainContent,
            severity: Severity::Critical,
            description: "检查违法事实是否包含时间、地点、行为三要素",
            check: check_violation_facts,
        },
        Rule {
            id: "evidence_enumeration",
            name: "证据列举情况",
            category: ReviewCategory::MainContent,
            severity: Severity::Warning,
            description: "检查证据材料是否逐项列举并能支撑事实",
            check: check_evidence_enumeration,
        },
        Rule {
            id: "legal_basis_completeness",
            name: "法律依据引用完整",
            category: ReviewCategory::MainContent,
            severity: Severity::Critical,
            description: "检查违法依据与处罚依据引用是否准确、格式规范",
            check: check_legal_basis,
        },
        Rule {
            id: "penalty_decision_specificity",
            name: "处罚决定明确性",
            category: ReviewCategory::MainContent,
            severity: Severity::Critical,
            description: "检查处罚种类、幅度、履行方式是否明确",
            check: check_penalty_decision,
        },
    ]
}

/// The opening chars that carry the party identity block
fn party_section(content: &DocumentContent) -> String {
    content.text.chars().take(PARTY_SECTION_CHARS).collect()
}

fn check_party_information(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let section = party_section(content);

    // Unit keywords anywhere in the text win over the opening-block heuristic
    if is_unit_party(&content.text) {
        if !CREDIT_INFO.is_match(&section) {
            issues.push(Issue {
                problem: "单位当事人未提供统一社会信用代码或组织机构代码".to_string(),
                location: "当事人基本信息段".to_string(),
                solution: "补充单位统一社会信用代码、组织机构代码等主体身份信息（如“统一社会信用代码：91330000XXXXXXXXXX”）".to_string(),
                severity: Severity::Warning,
            });
        }
    } else if !ID_INFO.is_match(&section) {
        issues.push(Issue {
            problem: "个人当事人未提供身份证号码或有效证件号码".to_string(),
            location: "当事人基本信息段".to_string(),
            solution: "补充个人身份证号码或其他有效身份证明信息（如“身份证号码：330XXXXXXXXXXXXXXXXX”）".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_legal_representative(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if is_unit_party(&content.text) && !REPRESENTATIVE_INFO.is_match(&party_section(content)) {
        issues.push(Issue {
            problem: "单位当事人未注明法定代表人或负责人".to_string(),
            location: "当事人信息段".to_string(),
            solution: "为单位当事人补充“法定代表人/负责人：××”等信息".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_violation_facts(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    let has_fact_section = FACT_SECTION.is_match(text);

    if !has_fact_section {
        issues.push(Issue {
            problem: "未明确设置违法事实认定段落".to_string(),
            location: "违法事实部分".to_string(),
            solution: "增加“违法事实：……”段落，说明调查情况及事实认定".to_string(),
            severity: Severity::Critical,
        });
    }

    if has_fact_section && !DATE_PATTERN.is_match(text) && !ALT_DATE_PATTERN.is_match(text) {
        issues.push(Issue {
            problem: "违法事实缺少明确的发生时间".to_string(),
            location: "违法事实部分".to_string(),
            solution: "补充违法行为发生的具体日期，例如“2025年5月10日”".to_string(),
            severity: Severity::Warning,
        });
    }

    if has_fact_section && !LOCATION_PHRASE.is_match(text) {
        issues.push(Issue {
            problem: "违法事实未说明具体地点".to_string(),
            location: "违法事实部分".to_string(),
            solution: "写明违法行为发生地点或经营场所，确保要素完整".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

fn check_evidence_enumeration(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    let evidence_count = EVIDENCE_KEYWORDS.find_iter(text).count();

    // Only worth flagging when the document claims an evidentiary process
    if EVIDENCE_PROCEDURE.is_match(text) && evidence_count < 2 {
        issues.push(Issue {
            problem: "未见对证据材料的逐项列举，难以支撑事实认定".to_string(),
            location: "证据说明部分".to_string(),
            solution: "以“证据一……证据二……”形式列出主要证据及证明目的".to_string(),
            severity: Severity::Info,
        });
    }

    issues
}

fn check_legal_basis(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let normalized = normalize_text(&content.text);

    if !VIOLATION_CITATION.is_match(&normalized) {
        issues.push(Issue {
            problem: "未引用具体的违法法律条款".to_string(),
            location: "法律依据部分".to_string(),
            solution: "补充“违反《××法》第×条第×款”的违法依据表述".to_string(),
            severity: Severity::Critical,
        });
    }

    if !BASIS_CITATION.is_match(&normalized) {
        issues.push(Issue {
            problem: "未引用作出处罚决定的法律依据".to_string(),
            location: "法律依据部分".to_string(),
            solution: "补充“依据《××法》第×条”的处罚依据表述".to_string(),
            severity: Severity::Critical,
        });
    }

    if LAW_TITLE_PATTERN.is_match(&content.text) && !contains_article_locator(&normalized) {
        issues.push(Issue {
            problem: "法律条文引用格式可能不够规范，未见“第×条/款/项”表述".to_string(),
            location: "法律依据部分".to_string(),
            solution: "在引用法律名称后补充具体条款，例如“《食品安全法》第三十四条”。".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_penalty_decision(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    let has_penalty_type = PENALTY_TYPE_KEYWORDS.iter().any(|kw| text.contains(kw));

    if !has_penalty_type {
        issues.push(Issue {
            problem: "未明确写明处罚种类或处罚幅度".to_string(),
            location: "处罚决定部分".to_string(),
            solution: "明确写明具体处罚种类，如“决定给予警告并罚款人民币××元”".to_string(),
            severity: Severity::Critical,
        });
    }

    if text.contains("罚款") && !FINE_AMOUNT_STATED.is_match(text) {
        issues.push(Issue {
            problem: "罚款处罚未注明具体金额及币种".to_string(),
            location: "处罚决定部分".to_string(),
            solution: "补充罚款金额及单位，如“罚款人民币5000元”".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}
