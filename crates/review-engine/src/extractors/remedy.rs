//! Remedy-clause analysis over the document tail
//!
//! The reconsideration and litigation notices live in the closing paragraphs
//! of a penalty decision. Scanning only the last few paragraphs keeps body
//! text that merely mentions the same keywords from producing false
//! positives, so the window size here is load-bearing.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::DocumentContent;

use crate::patterns::{normalize_text, split_sentences, tail_paragraph_text};

/// Number of closing paragraphs the remedy clauses are expected in
const REMEDY_TAIL_PARAGRAPHS: usize = 7;

lazy_static! {
    static ref REVIEW_TRIGGER: Regex =
        Regex::new(r"(如不服|对本处罚?决定不服|对本决定不服|不服本处罚?决定)").unwrap();
    static ref REVIEW_DEADLINE: Regex = Regex::new(
        r"(收到本决定(?:书)?之日起(?:六十|60)日内|自收到本决定(?:书)?之日起(?:六十|60)日内|在(?:六十|60)日内向)"
    )
    .unwrap();
    static ref REVIEW_ACTION: Regex = Regex::new(r"申请行政复议").unwrap();
    static ref REVIEW_VENUE: Regex = Regex::new(
        r"(人民政府|行政复议机关|行政复议委员会|人民政府行政复议办公室)"
    )
    .unwrap();

    /// Canonical trigger → deadline → venue → action ordering in one sentence
    static ref REVIEW_TEMPLATE: Regex = Regex::new(
        r"如不服.*?(处罚)?决定.{0,40}(收到本决定(?:书)?之日起(?:六十|60)日内|自收到本决定(?:书)?之日起(?:六十|60)日内|在(?:六十|60)日内向).{0,30}(人民政府|行政复议机关|行政复议委员会|人民政府行政复议办公室).{0,15}申请行政复议"
    )
    .unwrap();

    static ref LITIGATION_DEADLINE: Regex = Regex::new(r"(六个月内|6个月内|半年内)").unwrap();
    static ref LITIGATION_VENUE: Regex = Regex::new(r"人民法院").unwrap();
    static ref LITIGATION_ACTION: Regex = Regex::new(r"(行政诉讼|行政诉)").unwrap();

    static ref LITIGATION_TEMPLATE: Regex = Regex::new(
        r"(六个月内|6个月内|半年内).{0,30}(直接向|依法向).{0,15}人民法院.{0,15}(提起|提出)行政诉讼"
    )
    .unwrap();
}

/// Presence and template conformance of one remedy channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseAnalysis {
    pub present: bool,
    /// Present AND phrased in the canonical token order
    pub template_like: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemedyAnalysis {
    pub review: ClauseAnalysis,
    pub litigation: ClauseAnalysis,
}

/// Analyze the administrative-review and litigation notices in the tail
/// paragraphs of the document.
pub fn analyze_remedy_section(content: &DocumentContent) -> RemedyAnalysis {
    let tail = tail_paragraph_text(content, REMEDY_TAIL_PARAGRAPHS);
    let normalized = normalize_text(&tail);
    let sentences = split_sentences(&normalized);

    let review_present = REVIEW_TRIGGER.is_match(&normalized)
        && REVIEW_DEADLINE.is_match(&normalized)
        && REVIEW_ACTION.is_match(&normalized)
        && REVIEW_VENUE.is_match(&normalized);

    let review_template_like = review_present && {
        let sentence = sentences
            .iter()
            .find(|s| s.contains("行政复议"))
            .map(|s| s.as_str())
            .unwrap_or(&normalized);
        REVIEW_TEMPLATE.is_match(sentence)
    };

    let litigation_present = LITIGATION_DEADLINE.is_match(&normalized)
        && LITIGATION_VENUE.is_match(&normalized)
        && LITIGATION_ACTION.is_match(&normalized);

    let litigation_template_like = litigation_present && {
        let sentence = sentences
            .iter()
            .find(|s| LITIGATION_ACTION.is_match(s))
            .map(|s| s.as_str())
            .unwrap_or(&normalized);
        LITIGATION_TEMPLATE.is_match(sentence)
    };

    RemedyAnalysis {
        review: ClauseAnalysis {
            present: review_present,
            template_like: review_template_like,
        },
        litigation: ClauseAnalysis {
            present: litigation_present,
            template_like: litigation_template_like,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL_TAIL: &str = "如不服本处罚决定，可以在收到本决定书之日起六十日内向杭州市人民政府申请行政复议；也可以在六个月内直接向杭州市临安区人民法院提起行政诉讼。";

    fn content_with_tail(tail: &str) -> DocumentContent {
        let mut body: Vec<String> = (0..10).map(|i| format!("正文第{}段。", i + 1)).collect();
        body.push(tail.to_string());
        DocumentContent::from_text(body.join("\n"))
    }

    #[test]
    fn canonical_clauses_are_present_and_template_like() {
        let remedy = analyze_remedy_section(&content_with_tail(CANONICAL_TAIL));
        assert!(remedy.review.present);
        assert!(remedy.review.template_like);
        assert!(remedy.litigation.present);
        assert!(remedy.litigation.template_like);
    }

    #[test]
    fn reordered_review_clause_is_present_but_not_template_like() {
        let tail = "可以申请行政复议，向杭州市人民政府提出，如不服本处罚决定，期限为收到本决定书之日起六十日内。";
        let remedy = analyze_remedy_section(&content_with_tail(tail));
        assert!(remedy.review.present);
        assert!(!remedy.review.template_like);
    }

    #[test]
    fn keywords_outside_the_tail_window_do_not_count() {
        // Remedy wording buried in the body, tail holds unrelated closing text
        let mut paragraphs = vec![CANONICAL_TAIL.to_string()];
        paragraphs.extend((0..10).map(|i| format!("正文第{}段。", i + 1)));
        let content = DocumentContent::from_text(paragraphs.join("\n"));

        let remedy = analyze_remedy_section(&content);
        assert!(!remedy.review.present);
        assert!(!remedy.litigation.present);
    }

    #[test]
    fn missing_litigation_channel_detected() {
        let tail = "如不服本处罚决定，可以在收到本决定书之日起六十日内向杭州市人民政府申请行政复议。";
        let remedy = analyze_remedy_section(&content_with_tail(tail));
        assert!(remedy.review.present);
        assert!(!remedy.litigation.present);
    }

    #[test]
    fn clause_split_across_lines_still_matches() {
        let tail = "如不服本处罚决定，可以在收到本决定书之日起\n六十日内向杭州市人民政府申请行政复议。";
        let remedy = analyze_remedy_section(&content_with_tail(tail));
        assert!(remedy.review.present);
    }
}
