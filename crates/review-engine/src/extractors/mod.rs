pub mod amount;
pub mod layout;
pub mod remedy;

pub use amount::{
    extract_fine_amount, hearing_right_assessment, party_type, HearingAssessment, PartyType,
};
pub use remedy::{analyze_remedy_section, ClauseAnalysis, RemedyAnalysis};
