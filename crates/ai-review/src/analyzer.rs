//! Full-document semantic analysis

use shared_types::DocumentContent;
use tracing::debug;

use crate::client::{ChatCompletion, ChatRequest};
use crate::error::AiReviewError;
use crate::parser::{parse_analysis_response, AiIssue, AiSummary, ParsedAnalysis};
use crate::prompts::{build_analysis_prompt, AnalysisOptions, ANALYSIS_SYSTEM_PROMPT};

const ANALYSIS_TEMPERATURE: f32 = 0.5;
const ANALYSIS_MAX_TOKENS: u32 = 4096;
const ANALYSIS_TOP_P: f32 = 0.95;

/// Outcome of one semantic analysis call
#[derive(Debug, Clone)]
pub struct SemanticAnalysis {
    pub issues: Vec<AiIssue>,
    pub summary: AiSummary,
    pub model_used: String,
}

/// Ask the model to review the document and parse whatever comes back.
///
/// An unparseable reply is not an error: it degrades to zero AI issues so
/// the surrounding review can still complete.
pub async fn analyze(
    client: &dyn ChatCompletion,
    content: &DocumentContent,
    options: &AnalysisOptions,
) -> Result<SemanticAnalysis, AiReviewError> {
    let request = ChatRequest {
        system: ANALYSIS_SYSTEM_PROMPT.to_string(),
        user: build_analysis_prompt(content, options),
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: ANALYSIS_MAX_TOKENS,
        top_p: ANALYSIS_TOP_P,
    };

    let reply = client.complete(&request).await?;
    debug!(reply_chars = reply.chars().count(), "analysis reply received");

    let analysis = match parse_analysis_response(&reply) {
        ParsedAnalysis::Json(analysis) => analysis,
        ParsedAnalysis::Heuristic(analysis) => {
            debug!("analysis reply had no JSON; heuristic extraction used");
            analysis
        }
        ParsedAnalysis::Unparseable => {
            debug!("analysis reply unparseable; treating as zero AI issues");
            crate::parser::AiAnalysis {
                issues: Vec::new(),
                summary: AiSummary {
                    language_score: 85,
                    logic_score: 85,
                    overall_assessment: "AI返回内容无法解析，已按无AI问题处理。".to_string(),
                },
            }
        }
    };

    Ok(SemanticAnalysis {
        issues: analysis.issues,
        summary: analysis.summary,
        model_used: client.model_label(),
    })
}
