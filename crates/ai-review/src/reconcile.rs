//! Rule-verdict reconciliation
//!
//! Rule findings are shipped to the semantic analyzer in small batches for
//! a keep/discard verdict. The policy is default-keep: an issue is only
//! dropped on an explicit, parseable `discard` — a missing id, an unknown
//! verdict string or a failed batch call all keep the issue. Filtering may
//! narrow the result, never corrupt it.

use serde_json::Value;
use shared_types::{DocumentContent, ReviewFinding, Verdict, VerdictDecision};
use tracing::{debug, warn};

use crate::client::{ChatCompletion, ChatRequest};
use crate::error::AiReviewError;
use crate::parser::{extract_json_payload, sanitize_text};
use crate::prompts::{build_validation_prompt, VALIDATION_SYSTEM_PROMPT};

/// Findings per validation call, bounding prompt size
pub const VALIDATION_BATCH_SIZE: usize = 3;

const VALIDATION_TEMPERATURE: f32 = 0.3;
const VALIDATION_MAX_TOKENS: u32 = 2048;
const VALIDATION_TOP_P: f32 = 0.9;

/// Result of reconciling one finding set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Surviving findings, in their original order
    pub kept: Vec<ReviewFinding>,
    /// Ids explicitly discarded by the analyzer
    pub discarded_ids: Vec<String>,
}

/// Parse `{"validatedIssues": [{id, verdict, reason}]}` into verdicts.
///
/// Entries without an id are dropped; verdict strings other than
/// `"discard"` count as keep.
pub fn parse_validation_response(text: &str) -> Result<Vec<Verdict>, AiReviewError> {
    let payload = extract_json_payload(text)
        .ok_or_else(|| AiReviewError::Unparseable("no JSON payload in verdict reply".into()))?;
    let value: Value = serde_json::from_str(&payload)
        .map_err(|err| AiReviewError::Unparseable(err.to_string()))?;

    let items = value
        .get("validatedIssues")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let verdicts = items
        .iter()
        .filter_map(|item| {
            let id = item.get("id").and_then(Value::as_str)?;
            if id.is_empty() {
                return None;
            }
            let decision = match item.get("verdict").and_then(Value::as_str) {
                Some("discard") => VerdictDecision::Discard,
                _ => VerdictDecision::Keep,
            };
            let reason = item
                .get("reason")
                .and_then(Value::as_str)
                .map(sanitize_text)
                .filter(|r| *r != "内容待补充");
            Some(Verdict {
                issue_id: id.to_string(),
                decision,
                reason,
            })
        })
        .collect();

    Ok(verdicts)
}

/// Reconcile rule findings against the analyzer, batch by batch.
pub async fn reconcile(
    client: &dyn ChatCompletion,
    content: &DocumentContent,
    findings: Vec<ReviewFinding>,
) -> ReconcileOutcome {
    if findings.is_empty() {
        return ReconcileOutcome {
            kept: Vec::new(),
            discarded_ids: Vec::new(),
        };
    }

    let mut kept = Vec::new();
    let mut discarded_ids = Vec::new();

    // Sequential batches keep discard ordering deterministic
    for batch in findings.chunks(VALIDATION_BATCH_SIZE) {
        let request = ChatRequest {
            system: VALIDATION_SYSTEM_PROMPT.to_string(),
            user: build_validation_prompt(content, batch),
            temperature: VALIDATION_TEMPERATURE,
            max_tokens: VALIDATION_MAX_TOKENS,
            top_p: VALIDATION_TOP_P,
        };

        let verdicts = match client.complete(&request).await {
            Ok(reply) => match parse_validation_response(&reply) {
                Ok(verdicts) => verdicts,
                Err(err) => {
                    warn!(error = %err, "verdict reply unparseable; keeping batch");
                    kept.extend(batch.iter().cloned());
                    continue;
                }
            },
            Err(err) => {
                warn!(error = %err, "validation call failed; keeping batch");
                kept.extend(batch.iter().cloned());
                continue;
            }
        };

        for finding in batch {
            let verdict = verdicts.iter().find(|v| v.issue_id == finding.id);
            match verdict.map(|v| v.decision) {
                Some(VerdictDecision::Discard) => {
                    debug!(
                        id = %finding.id,
                        reason = verdict.and_then(|v| v.reason.as_deref()).unwrap_or(""),
                        "discarding rule finding"
                    );
                    discarded_ids.push(finding.id.clone());
                }
                // Explicit keep, or no verdict for this id at all
                _ => kept.push(finding.clone()),
            }
        }
    }

    debug!(
        kept = kept.len(),
        discarded = discarded_ids.len(),
        total = kept.len() + discarded_ids.len(),
        "reconciliation finished"
    );

    ReconcileOutcome { kept, discarded_ids }
}
