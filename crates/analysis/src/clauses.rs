use std::sync::Arc;

use tracing::{debug, warn};

use redline_core::config::LlmConfig;
use redline_core::{validate, ClauseSet};
use redline_llm::{CompletionRequest, LlmProvider, Message};

/// System instruction for structured clause extraction. The twelve keys are
/// fixed; a clause the document lacks must come back as an empty string so
/// the response always has the full shape.
const CLAUSE_SYSTEM_PROMPT: &str = "\
You are a contract analysis engine. Extract the following clauses from the \
contract text the user provides and respond with a single JSON object with \
exactly these keys: parties, term, termination, payment, confidentiality, \
liability, governingLaw, disputeResolution, specialConditions, riders, \
signatories, language.

Rules:
- Every key must be present. If the contract does not contain a clause, set \
its value to an empty string — never omit the key and never use null.
- Each value is the clause's text or a faithful short summary of it.
- Detect the document's natural language and report it in the \"language\" key.
- Respond with the JSON object only, no commentary outside it.";

/// Appended to the user prompt on the second attempt.
const RETRY_DIRECTIVE: &str =
    "Return ONLY the JSON object. No markdown, no explanation, nothing outside the JSON.";

/// The clause set plus the structural-completeness warnings derived from it.
#[derive(Debug, Clone)]
pub struct ClauseExtraction {
    pub clauses: ClauseSet,
    pub issues: Vec<String>,
}

/// Derives a structured clause model from extracted contract text.
///
/// Clause extraction is best-effort: a missing credential, a failed
/// completion, or a response that will not parse after one retry all degrade
/// to the all-empty clause set. The caller always gets a usable result.
pub struct ClauseExtractor {
    provider: Option<Arc<dyn LlmProvider>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl ClauseExtractor {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, llm: &LlmConfig) -> Self {
        Self {
            provider,
            temperature: llm.temperature,
            top_p: llm.top_p,
            max_tokens: llm.max_tokens,
        }
    }

    /// Extract clauses from `text` and validate the result.
    pub async fn extract_clauses(&self, text: &str) -> ClauseExtraction {
        let clauses = self.request_clauses(text).await.unwrap_or_default();
        let issues = validate(&clauses);
        ClauseExtraction { clauses, issues }
    }

    /// Two-attempt completion/parse loop. `None` means both attempts failed;
    /// giving up is not an error — the caller substitutes the empty set.
    async fn request_clauses(&self, text: &str) -> Option<ClauseSet> {
        let provider = match &self.provider {
            Some(p) => p,
            None => {
                warn!("no generation provider; clause extraction degraded to empty result");
                return None;
            }
        };

        for attempt in 0..2u8 {
            let retry = attempt > 0;
            let user_prompt = if retry {
                format!("Extract the clauses from this contract:\n\n{text}\n\n{RETRY_DIRECTIVE}")
            } else {
                format!("Extract the clauses from this contract:\n\n{text}")
            };

            let request = CompletionRequest {
                messages: vec![
                    Message::system(CLAUSE_SYSTEM_PROMPT),
                    Message::user(user_prompt),
                ],
                temperature: self.temperature,
                top_p: self.top_p,
                max_tokens: self.max_tokens,
                // The retry leans on the emphasized prompt alone.
                json_mode: !retry,
            };

            match provider.complete(request).await {
                Ok(response) => {
                    debug!(attempt, chars = response.len(), "clause response received");
                    match parse_clauses(&response) {
                        Ok(clauses) => return Some(clauses),
                        Err(e) => warn!(error = %e, attempt, "clause response did not parse"),
                    }
                }
                Err(e) => warn!(error = %e, attempt, "clause completion failed"),
            }
        }

        warn!("clause extraction exhausted retries; returning empty clause set");
        None
    }
}

fn parse_clauses(response: &str) -> Result<ClauseSet, serde_json::Error> {
    serde_json::from_str(extract_json(response))
}

/// Extract JSON from a model response, handling markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        let json_start = start + 3;
        // Skip past any language identifier on the same line
        let after_tick = &trimmed[json_start..];
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    // Try raw JSON (starts with {)
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::ClauseKind;
    use redline_llm::MockProvider;

    fn llm_config() -> LlmConfig {
        LlmConfig {
            provider: "openai".to_string(),
            openai_api_key: Some("sk-test".to_string()),
            openai_model: "gpt-4o".to_string(),
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_model: "claude-sonnet-4-5-20250929".to_string(),
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 4096,
        }
    }

    fn extractor_with(mock: Arc<MockProvider>) -> ClauseExtractor {
        ClauseExtractor::new(Some(mock as Arc<dyn LlmProvider>), &llm_config())
    }

    const FULL_RESPONSE: &str = r#"{
        "parties": "Acme Corp and Beta LLC",
        "term": "24 months",
        "termination": "30 days written notice",
        "payment": "Net 30",
        "confidentiality": "Mutual",
        "liability": "Capped at fees paid",
        "governingLaw": "State of Delaware",
        "disputeResolution": "AAA arbitration",
        "specialConditions": "",
        "riders": "",
        "signatories": "CEO of each party",
        "language": "English"
    }"#;

    #[tokio::test]
    async fn valid_response_parses_on_first_attempt() {
        let mock = Arc::new(MockProvider::new(FULL_RESPONSE));
        let extractor = extractor_with(mock.clone());

        let result = extractor.extract_clauses("some contract text").await;
        assert_eq!(result.clauses.parties, "Acme Corp and Beta LLC");
        assert_eq!(result.clauses.governing_law, "State of Delaware");
        assert!(result.issues.is_empty());
        assert_eq!(mock.call_count(), 1);
        assert!(mock.requests()[0].json_mode);
    }

    #[tokio::test]
    async fn markdown_fenced_response_parses() {
        let fenced = format!("Here you go:\n```json\n{FULL_RESPONSE}\n```\nDone.");
        let mock = Arc::new(MockProvider::new(fenced));
        let extractor = extractor_with(mock);

        let result = extractor.extract_clauses("text").await;
        assert_eq!(result.clauses.term, "24 months");
    }

    #[tokio::test]
    async fn malformed_then_valid_succeeds_on_retry() {
        let mock = Arc::new(MockProvider::new(FULL_RESPONSE));
        mock.push_response("I'm sorry, I can't produce JSON");
        let extractor = extractor_with(mock.clone());

        let result = extractor.extract_clauses("text").await;
        assert_eq!(result.clauses.signatories, "CEO of each party");
        assert_eq!(mock.call_count(), 2);

        let requests = mock.requests();
        assert!(requests[0].json_mode);
        assert!(!requests[1].json_mode);
        assert!(requests[1].messages[1].content.contains("ONLY the JSON object"));
    }

    #[tokio::test]
    async fn two_malformed_responses_degrade_to_empty_set() {
        let mock = Arc::new(MockProvider::new("still not json"));
        let extractor = extractor_with(mock.clone());

        let result = extractor.extract_clauses("text").await;
        assert_eq!(result.clauses, ClauseSet::default());
        assert_eq!(result.issues.len(), 4);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn completion_errors_degrade_to_empty_set() {
        let mock = Arc::new(MockProvider::new("unused"));
        mock.push_error("service unreachable");
        mock.push_error("service unreachable");
        let extractor = extractor_with(mock.clone());

        let result = extractor.extract_clauses("text").await;
        assert_eq!(result.clauses, ClauseSet::default());
        assert_eq!(result.issues.len(), 4);
    }

    #[tokio::test]
    async fn no_provider_degrades_without_calling_out() {
        let extractor = ClauseExtractor::new(None, &llm_config());

        let result = extractor.extract_clauses("text").await;
        assert_eq!(result.clauses, ClauseSet::default());
        assert_eq!(
            result.issues,
            vec![
                "Missing parties information",
                "Missing signatures/signatory information",
                "Missing term clause",
                "Missing governing law clause",
            ]
        );
    }

    #[tokio::test]
    async fn partial_response_validates_missing_required_clauses() {
        // Parties and governing law present, liability present; the rest of
        // the analyzed clauses blank.
        let mock = Arc::new(MockProvider::new(
            r#"{
                "parties": "Acme Corp and Beta LLC",
                "governingLaw": "State of Delaware",
                "liability": "Capped at fees paid",
                "language": "English"
            }"#,
        ));
        let extractor = extractor_with(mock);

        let result = extractor.extract_clauses("text").await;
        assert_eq!(
            result.issues,
            vec!["Missing signatures/signatory information", "Missing term clause"]
        );

        let risk = redline_core::classify(&result.clauses);
        let names: Vec<ClauseKind> = risk.missing.iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                ClauseKind::Signatories,
                ClauseKind::Termination,
                ClauseKind::Confidentiality,
                ClauseKind::Payment,
                ClauseKind::DisputeResolution,
                ClauseKind::Term,
            ]
        );
        assert_eq!(risk.overall, redline_core::Severity::Red);
    }

    #[test]
    fn extract_json_raw() {
        let input = r#"{"parties": ""}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn extract_json_with_prefix() {
        let input = r#"Sure! Here are the clauses: {"parties": "A and B"}"#;
        assert_eq!(extract_json(input), r#"{"parties": "A and B"}"#);
    }

    #[test]
    fn extract_json_plain_code_block() {
        let input = "```\n{\"parties\": \"A\"}\n```";
        assert_eq!(extract_json(input), r#"{"parties": "A"}"#);
    }
}
