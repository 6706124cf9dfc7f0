//! The review rule catalog
//!
//! One module per review stage, mirroring the physical structure of an
//! administrative penalty decision. Each rule is a named pure function over
//! the extracted content and structure; the catalog is plain data so that
//! callers can filter, reorder or subset it without touching rule logic.

pub mod case_number;
pub mod consistency;
pub mod fixed_content;
pub mod format;
pub mod fulfillment;
pub mod main_content;
pub mod signature;
pub mod title;

use shared_types::{DocumentContent, DocumentStructure, Issue, ReviewCategory, Severity};

/// A compliance check: pure, no I/O, no mutation of its inputs
pub type CheckFn = fn(&DocumentContent, &DocumentStructure) -> Vec<Issue>;

/// One entry of the rule catalog
#[derive(Clone)]
pub struct Rule {
    /// Globally unique id, stable across releases
    pub id: &'static str,
    pub name: &'static str,
    pub category: ReviewCategory,
    /// Default severity; individual issues may report lower
    pub severity: Severity,
    pub description: &'static str,
    pub check: CheckFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .finish()
    }
}

/// The full catalog in evaluation order (stage 1 through stage 8)
pub fn catalog() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(format::rules());
    rules.extend(title::rules());
    rules.extend(case_number::rules());
    rules.extend(main_content::rules());
    rules.extend(fulfillment::rules());
    rules.extend(signature::rules());
    rules.extend(fixed_content::rules());
    rules.extend(consistency::rules());
    rules
}

/// Rule ids of the quick pre-check subset used by the simplified review
pub const SIMPLIFIED_RULE_IDS: &[&str] = &[
    "format_title_presence",
    "format_content_length",
    "title_keyword_check",
    "document_number_presence",
    "party_information_completeness",
    "violation_facts_specificity",
    "remedy_notice",
    "decision_date",
];

/// The quick-check subset, in catalog order
pub fn simplified_catalog() -> Vec<Rule> {
    catalog()
        .into_iter()
        .filter(|rule| SIMPLIFIED_RULE_IDS.contains(&rule.id))
        .collect()
}

pub fn rules_by_category(category: ReviewCategory) -> Vec<Rule> {
    catalog()
        .into_iter()
        .filter(|rule| rule.category == category)
        .collect()
}
