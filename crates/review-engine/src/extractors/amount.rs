//! Fine-amount extraction and party-type classification

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::DocumentContent;

use crate::patterns::{
    normalize_text, UNIT_KEYWORDS_PATTERN, HEARING_THRESHOLD_INDIVIDUAL, HEARING_THRESHOLD_UNIT,
};

lazy_static! {
    /// 罚款人民币300元 / 处罚款3,000.00元 and friends, amount captured
    static ref FINE_AMOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"(?:罚款|处罚款|处以罚款|并处罚款|罚金)(?:人民币)?[^\d]*?(\d+(?:[,，]\d{3})*(?:\.\d{1,2})?)元"
        )
        .unwrap(),
        Regex::new(
            r"(?:罚款|处罚款|处以罚款|并处罚款|罚金)[^\d]*?(\d+(?:[,，]\d{3})*(?:\.\d{1,2})?)[^\d]*?(?:元|圆)"
        )
        .unwrap(),
    ];

    /// The party block: everything after 当事人： up to 200 characters
    static ref PARTY_SECTION_PATTERN: Regex =
        Regex::new(r"(?s)当事人[：:](.{0,200})").unwrap();

    /// A resident ID number stated for the party
    static ref ID_NUMBER_PATTERN: Regex =
        Regex::new(r"身份证(?:号码?|号|证号)[：:]?\d{15,18}").unwrap();

    /// Roles that indicate the ID number belongs to a unit's representative
    static ref REPRESENTATIVE_PATTERN: Regex =
        Regex::new(r"法定代表人|负责人|经营者").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyType {
    Individual,
    Unit,
    Unknown,
}

impl PartyType {
    pub fn label(&self) -> &'static str {
        match self {
            PartyType::Individual => "个人",
            PartyType::Unit => "单位",
            PartyType::Unknown => "当事人",
        }
    }
}

/// Extract the maximum cited fine amount in yuan.
///
/// The document may restate the fine several times (decision body, payment
/// section, surcharge clause); the hearing-threshold rule cares about the
/// largest figure.
pub fn extract_fine_amount(text: &str) -> Option<f64> {
    let normalized = normalize_text(text);
    let mut max_amount: Option<f64> = None;

    for pattern in FINE_AMOUNT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&normalized) {
            let raw = caps[1].replace([',', '，'], "");
            if let Ok(amount) = raw.parse::<f64>() {
                if max_amount.map_or(true, |m| amount > m) {
                    max_amount = Some(amount);
                }
            }
        }
    }

    max_amount
}

/// Classify the party named after 当事人： as an individual or a unit.
///
/// Unit keywords win over the ID-number heuristic: a sole proprietorship
/// lists both a shop name and its operator's ID number.
pub fn party_type(content: &DocumentContent) -> PartyType {
    let normalized = normalize_text(&content.text);

    let section = match PARTY_SECTION_PATTERN.captures(&normalized) {
        Some(caps) => caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        None => return PartyType::Unknown,
    };

    if UNIT_KEYWORDS_PATTERN.is_match(&section) {
        return PartyType::Unit;
    }

    if ID_NUMBER_PATTERN.is_match(&section) && !REPRESENTATIVE_PATTERN.is_match(&section) {
        return PartyType::Individual;
    }

    PartyType::Unknown
}

/// Outcome of the hearing-right threshold check
#[derive(Debug, Clone)]
pub struct HearingAssessment {
    pub required: bool,
    pub party_type: PartyType,
    pub fine_amount: Option<f64>,
    pub threshold: Option<f64>,
    pub reason: String,
}

/// Decide whether the cited fine obliges the agency to offer a hearing.
///
/// Individuals at 10,000 yuan and units at 100,000 yuan. When the party type
/// cannot be determined the lower individual threshold applies, erring on
/// the side of notifying.
pub fn hearing_right_assessment(content: &DocumentContent) -> HearingAssessment {
    let party = party_type(content);
    let fine_amount = extract_fine_amount(&content.text);

    let Some(amount) = fine_amount else {
        return HearingAssessment {
            required: false,
            party_type: party,
            fine_amount: None,
            threshold: None,
            reason: "未检测到明确的罚款金额".to_string(),
        };
    };

    let (threshold, reason) = match party {
        PartyType::Individual => {
            let threshold = HEARING_THRESHOLD_INDIVIDUAL;
            let reason = if amount >= threshold {
                format!("个人罚款{}元，达到{}元听证标准", amount, threshold)
            } else {
                format!("个人罚款{}元，未达到{}元听证标准", amount, threshold)
            };
            (threshold, reason)
        }
        PartyType::Unit => {
            let threshold = HEARING_THRESHOLD_UNIT;
            let reason = if amount >= threshold {
                format!("单位罚款{}元，达到{}元听证标准", amount, threshold)
            } else {
                format!("单位罚款{}元，未达到{}元听证标准", amount, threshold)
            };
            (threshold, reason)
        }
        PartyType::Unknown => {
            let threshold = HEARING_THRESHOLD_INDIVIDUAL;
            let reason = if amount >= threshold {
                format!(
                    "罚款{}元，当事人类型未明确识别，建议按个人标准{}元进行听证告知",
                    amount, threshold
                )
            } else {
                format!("罚款{}元，未达到最低听证标准{}元", amount, threshold)
            };
            (threshold, reason)
        }
    };

    HearingAssessment {
        required: amount >= threshold,
        party_type: party,
        fine_amount: Some(amount),
        threshold: Some(threshold),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_fine_amount() {
        assert_eq!(extract_fine_amount("决定处以罚款10000元。"), Some(10000.0));
    }

    #[test]
    fn extracts_renminbi_prefixed_amount() {
        assert_eq!(
            extract_fine_amount("决定处以罚款人民币100000元。"),
            Some(100000.0)
        );
    }

    #[test]
    fn takes_maximum_of_repeated_amounts() {
        let text = "没收违法所得并处罚款5000元，逾期加处罚款10000元。";
        assert_eq!(extract_fine_amount(text), Some(10000.0));
    }

    #[test]
    fn tolerates_thousands_separators_and_line_breaks() {
        assert_eq!(extract_fine_amount("罚款\n3,000.50元"), Some(3000.50));
    }

    #[test]
    fn no_amount_when_no_fine_mentioned() {
        assert_eq!(extract_fine_amount("责令改正，给予警告。"), None);
    }

    #[test]
    fn individual_party_by_id_number() {
        let content = DocumentContent::from_text(
            "当事人：张三，男\n身份证号：330123198001011234\n住所：杭州市临安区",
        );
        assert_eq!(party_type(&content), PartyType::Individual);
    }

    #[test]
    fn unit_party_by_company_keyword() {
        let content = DocumentContent::from_text(
            "当事人：杭州某某有限公司\n统一社会信用代码：913301XXXXXXXXXX",
        );
        assert_eq!(party_type(&content), PartyType::Unit);
    }

    #[test]
    fn sole_proprietorship_counts_as_unit() {
        let content = DocumentContent::from_text(
            "当事人：杭州某某商店（个体工商户）\n经营者：赵六\n身份证号：330123198001011234",
        );
        assert_eq!(party_type(&content), PartyType::Unit);
    }

    #[test]
    fn unknown_without_party_block() {
        let content = DocumentContent::from_text("经查明，存在违法行为。");
        assert_eq!(party_type(&content), PartyType::Unknown);
    }

    #[test]
    fn hearing_required_for_individual_at_threshold() {
        let content = DocumentContent::from_text(
            "当事人：张三\n身份证号：330123198001011234\n决定对当事人处以罚款10000元。",
        );
        let assessment = hearing_right_assessment(&content);
        assert!(assessment.required);
        assert_eq!(assessment.party_type, PartyType::Individual);
        assert_eq!(assessment.threshold, Some(10000.0));
    }

    #[test]
    fn hearing_not_required_for_unit_below_threshold() {
        let content = DocumentContent::from_text(
            "当事人：杭州某某有限公司\n决定处以罚款10000元。",
        );
        let assessment = hearing_right_assessment(&content);
        assert!(!assessment.required);
        assert_eq!(assessment.party_type, PartyType::Unit);
    }

    #[test]
    fn unknown_party_falls_back_to_individual_threshold() {
        let content = DocumentContent::from_text("决定处以罚款20000元。");
        let assessment = hearing_right_assessment(&content);
        assert!(assessment.required);
        assert_eq!(assessment.threshold, Some(HEARING_THRESHOLD_INDIVIDUAL));
    }
}
