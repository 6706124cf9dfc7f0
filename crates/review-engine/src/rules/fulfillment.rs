//! Stage 5: 履行与权利告知 — fulfillment terms and rights notices

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

use crate::extractors::{analyze_remedy_section, hearing_right_assessment};

use super::Rule;

lazy_static! {
    static ref ENFORCEABLE_PENALTY: Regex = Regex::new(r"(罚款|没收|责令改正)").unwrap();
    static ref FULFILLMENT_DEADLINE: Regex =
        Regex::new(r"(\d+日内|十五日内|30日内|三十日内|自收到.*?之日)").unwrap();
    static ref PAYMENT_CHANNEL: Regex =
        Regex::new(r"(缴纳|缴款|银行|账户|非税收入|代收机构)").unwrap();
    static ref STATEMENT_NOTICE: Regex =
        Regex::new(r"(陈述|申辩|事先告知|拟处罚告知)").unwrap();
    static ref HEARING_NOTICE: Regex = Regex::new(r"(听证|听证权)").unwrap();

    /// 3-day hearing application window, stated in either clause order
    static ref HEARING_DEADLINE: Regex = Regex::new(
        r"(?:收到.*?告知.*?之日起|自收到.*?告知.*?之日起).*?(?:三|3).*?(?:日|天).*?(?:内|之内).*?(?:提出|申请).*?听证|(?:提出|申请).*?听证.*?(?:收到.*?告知.*?之日起|自收到.*?告知.*?之日起).*?(?:三|3).*?(?:日|天)"
    )
    .unwrap();
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "penalty_deadline",
            name: "处罚履行期限",
            category: ReviewCategory::Fulfillment,
            severity: Severity::Critical,
            description: "检查是否明确处罚履行期限",
            check: check_penalty_deadline,
        },
        Rule {
            id: "payment_instructions",
            name: "罚款缴纳方式",
            category: ReviewCategory::Fulfillment,
            severity: Severity::Warning,
            description: "检查罚款类处罚是否说明缴纳途径",
            check: check_payment_instructions,
        },
        Rule {
            id: "statement_and_defense_notice",
            name: "陈述申辩权利告知",
            category: ReviewCategory::Fulfillment,
            severity: Severity::Warning,
            description: "检查是否告知当事人陈述、申辩或听证权利",
            check: check_statement_and_hearing,
        },
        Rule {
            id: "remedy_notice",
            name: "行政复议与诉讼告知",
            category: ReviewCategory::Fulfillment,
            severity: Severity::Critical,
            description: "检查行政复议与诉讼途径是否完整规范",
            check: check_remedy_notice,
        },
    ]
}

fn check_penalty_deadline(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    if ENFORCEABLE_PENALTY.is_match(&content.text)
        && !FULFILLMENT_DEADLINE.is_match(&content.text)
    {
        issues.push(Issue {
            problem: "未告知处罚决定的履行期限".to_string(),
            location: "执行要求部分".to_string(),
            solution: "补充“自收到本决定书之日起十五日内履行”等履行期限表述".to_string(),
            severity: Severity::Critical,
        });
    }

    issues
}

fn check_payment_instructions(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if content.text.contains("罚款") && !PAYMENT_CHANNEL.is_match(&content.text) {
        issues.push(Issue {
            problem: "罚款处罚未明确缴纳方式或账户".to_string(),
            location: "执行要求部分".to_string(),
            solution: "补充缴款方式，如“通过非税收入一般缴款书在××银行缴纳”".to_string(),
            severity: Severity::Warning,
        });
    }

    issues
}

fn check_statement_and_hearing(
    content: &DocumentContent,
    _structure: &DocumentStructure,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let text = &content.text;

    if !STATEMENT_NOTICE.is_match(text) {
        issues.push(Issue {
            problem: "未见陈述申辩权利的告知记录".to_string(),
            location: "权利告知部分".to_string(),
            solution: "补充表述“你单位已享有陈述申辩权利”或说明是否放弃".to_string(),
            severity: Severity::Warning,
        });
    }

    let hearing = hearing_right_assessment(content);

    if hearing.required {
        if !HEARING_NOTICE.is_match(text) {
            issues.push(Issue {
                problem: format!(
                    "{}罚款{}元，达到听证标准（{}元），但未告知听证权利",
                    hearing.party_type.label(),
                    hearing.fine_amount.unwrap_or(0.0),
                    hearing.threshold.unwrap_or(0.0)
                ),
                location: "权利告知部分".to_string(),
                solution: format!(
                    "根据《行政处罚法》规定，{}，应告知当事人享有听证权利，并说明应在收到行政处罚事先告知书之日起三日内提出听证申请",
                    hearing.reason
                ),
                severity: Severity::Critical,
            });
        } else if !HEARING_DEADLINE.is_match(text) {
            issues.push(Issue {
                problem: "已告知听证权利，但未明确说明听证申请期限".to_string(),
                location: "听证权利告知部分".to_string(),
                solution: "应明确告知“当事人有权在收到本告知书之日起三日内向本机关提出听证申请”"
                    .to_string(),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

fn check_remedy_notice(content: &DocumentContent, _structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let remedy = analyze_remedy_section(content);

    // Both channels absent is a legal-element failure; a single missing
    // channel may just be phrasing and is downgraded
    match (remedy.review.present, remedy.litigation.present) {
        (false, false) => {
            issues.push(Issue {
                problem: "未检测到行政复议和行政诉讼救济途径的完整表述".to_string(),
                location: "救济途径告知部分".to_string(),
                solution: "补充“如不服本决定，可以在收到本决定书之日起六十日内向××申请行政复议；也可以在收到本决定书之日起六个月内直接向人民法院提起行政诉讼”".to_string(),
                severity: Severity::Critical,
            });
        }
        (false, true) => {
            issues.push(Issue {
                problem: "未检测到行政复议救济途径的完整表述".to_string(),
                location: "救济途径告知部分".to_string(),
                solution: "补充“如不服本决定，可以在收到本决定书之日起六十日内向××申请行政复议”"
                    .to_string(),
                severity: Severity::Warning,
            });
        }
        (true, false) => {
            issues.push(Issue {
                problem: "未检测到行政诉讼救济途径的完整表述".to_string(),
                location: "救济途径告知部分".to_string(),
                solution: "补充“也可以在收到本决定书之日起六个月内直接向人民法院提起行政诉讼”"
                    .to_string(),
                severity: Severity::Warning,
            });
        }
        (true, true) => {}
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    const REMEDY_TAIL: &str = "如不服本处罚决定，可以在收到本决定书之日起六十日内向杭州市人民政府申请行政复议；也可以在六个月内直接向人民法院提起行政诉讼。";

    #[test]
    fn fine_without_deadline_is_critical() {
        let content = DocumentContent::from_text("决定处以罚款5000元。");
        let issues = check_penalty_deadline(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn deadline_phrase_satisfies_rule() {
        let content =
            DocumentContent::from_text("决定处以罚款5000元，自收到本决定书之日起十五日内缴纳。");
        assert!(check_penalty_deadline(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn fine_without_payment_channel_warns() {
        let content = DocumentContent::from_text("决定处以罚款5000元，限期履行。");
        let issues = check_payment_instructions(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn individual_over_threshold_without_hearing_notice_is_critical() {
        let content = DocumentContent::from_text(
            "当事人：张三\n身份证号：330123198001011234\n经查明，存在违法行为。\n决定对当事人处以罚款10000元。当事人已陈述申辩。",
        );
        let issues = check_statement_and_hearing(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].problem.contains("听证"));
    }

    #[test]
    fn unit_below_threshold_needs_no_hearing_notice() {
        let content = DocumentContent::from_text(
            "当事人：杭州某某有限公司\n经查明，存在违法行为。\n决定处以罚款10000元。当事人已陈述申辩。",
        );
        let issues = check_statement_and_hearing(&content, &DocumentStructure::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn hearing_notice_without_deadline_warns() {
        let content = DocumentContent::from_text(
            "当事人：张三\n身份证号：330123198001011234\n决定处罚款15000元。当事人已陈述申辩，并享有听证权利。",
        );
        let issues = check_statement_and_hearing(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].problem.contains("听证申请期限"));
    }

    #[test]
    fn hearing_notice_with_deadline_passes() {
        let content = DocumentContent::from_text(
            "当事人：张三\n身份证号：330123198001011234\n决定处罚款15000元。当事人已陈述申辩。当事人有权在收到本告知书之日起三日内向本机关提出听证申请。",
        );
        assert!(check_statement_and_hearing(&content, &DocumentStructure::default()).is_empty());
    }

    #[test]
    fn missing_both_remedy_channels_is_critical() {
        let content = DocumentContent::from_text("决定处以罚款5000元。\n特此决定。");
        let issues = check_remedy_notice(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn missing_single_channel_is_downgraded() {
        let content = DocumentContent::from_text(
            "决定处以罚款5000元。\n如不服本处罚决定，可以在收到本决定书之日起六十日内向杭州市人民政府申请行政复议。",
        );
        let issues = check_remedy_notice(&content, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].problem.contains("行政诉讼"));
    }

    #[test]
    fn complete_remedy_notice_passes() {
        let content =
            DocumentContent::from_text(format!("决定处以罚款5000元。\n{}", REMEDY_TAIL));
        assert!(check_remedy_notice(&content, &DocumentStructure::default()).is_empty());
    }
}
