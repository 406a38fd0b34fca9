use std::sync::Arc;

use tracing::warn;

use redline_core::config::LlmConfig;
use redline_llm::{CompletionRequest, LlmProvider, Message};

const TITLE_PROMPT: &str = "\
Suggest a short descriptive title (3-5 words) for a conversation about the \
following document. Respond with the title only — no quotes, no trailing \
punctuation.";

/// Titles are clamped to this many whitespace-separated tokens on every
/// path, model-generated or fallback.
const MAX_TITLE_TOKENS: usize = 5;

const DEFAULT_TITLE: &str = "New Chat";

/// Only the head of the document is needed to title it.
const TITLE_EXCERPT_CHARS: usize = 2000;

/// Derives a short chat title from extracted document text. Never fails:
/// with no provider, or when the provider errors, the title falls back to
/// the leading words of the document itself.
pub struct ChatNamer {
    provider: Option<Arc<dyn LlmProvider>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl ChatNamer {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, llm: &LlmConfig) -> Self {
        Self {
            provider,
            temperature: llm.temperature,
            top_p: llm.top_p,
            max_tokens: llm.max_tokens,
        }
    }

    pub async fn name_from(&self, text: &str) -> String {
        let provider = match &self.provider {
            Some(p) => p,
            None => return fallback_title(text),
        };

        let excerpt: String = text.chars().take(TITLE_EXCERPT_CHARS).collect();
        let request = CompletionRequest {
            messages: vec![Message::user(format!("{TITLE_PROMPT}\n\n{excerpt}"))],
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            json_mode: false,
        };

        match provider.complete(request).await {
            Ok(response) => {
                let flattened = response.replace(['\n', '\r'], " ");
                clamp_title(flattened.split_whitespace())
            }
            Err(e) => {
                warn!(error = %e, "title generation failed; falling back to document words");
                fallback_title(text)
            }
        }
    }
}

/// The single truncation rule shared by the model path and the fallback:
/// keep at most five tokens, join with single spaces, default when nothing
/// remains.
fn clamp_title<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let title = tokens.take(MAX_TITLE_TOKENS).collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

fn fallback_title(text: &str) -> String {
    clamp_title(
        text.split_whitespace()
            .filter(|token| token.chars().any(|c| c.is_ascii_alphabetic())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn namer_with(mock: Arc<MockProvider>) -> ChatNamer {
        ChatNamer::new(Some(mock as Arc<dyn LlmProvider>), &llm_config())
    }

    #[tokio::test]
    async fn model_title_is_used() {
        let namer = namer_with(Arc::new(MockProvider::new("Acme Beta Services Agreement")));
        assert_eq!(namer.name_from("whatever").await, "Acme Beta Services Agreement");
    }

    #[tokio::test]
    async fn embedded_newlines_are_flattened() {
        let namer = namer_with(Arc::new(MockProvider::new("Acme Beta\nServices Agreement\n")));
        let title = namer.name_from("whatever").await;
        assert_eq!(title, "Acme Beta Services Agreement");
        assert!(!title.contains('\n'));
    }

    #[tokio::test]
    async fn long_model_titles_are_clamped_to_five_tokens() {
        let namer = namer_with(Arc::new(MockProvider::new(
            "A Very Long And Overly Detailed Title For This Chat",
        )));
        assert_eq!(namer.name_from("whatever").await, "A Very Long And Overly");
    }

    #[tokio::test]
    async fn empty_model_output_falls_back_to_default() {
        let namer = namer_with(Arc::new(MockProvider::new("   ")));
        assert_eq!(namer.name_from("whatever").await, "New Chat");
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_document_words() {
        let mock = Arc::new(MockProvider::new("unused"));
        mock.push_error("service down");
        let namer = namer_with(mock);
        assert_eq!(
            namer.name_from("Master Services Agreement between Acme Corp and Beta").await,
            "Master Services Agreement between Acme"
        );
    }

    #[tokio::test]
    async fn no_provider_uses_fallback() {
        let namer = ChatNamer::new(None, &llm_config());
        assert_eq!(
            namer.name_from("Consulting Agreement dated 2026").await,
            "Consulting Agreement dated"
        );
    }

    #[tokio::test]
    async fn empty_input_without_provider_is_default_title() {
        let namer = ChatNamer::new(None, &llm_config());
        assert_eq!(namer.name_from("").await, "New Chat");
    }

    #[test]
    fn fallback_skips_tokens_without_letters() {
        assert_eq!(
            fallback_title("2026-01-01 §4.2 -- Lease Agreement for 99 Main St"),
            "Lease Agreement for Main St"
        );
    }

    #[test]
    fn fallback_on_digits_only_is_default_title() {
        assert_eq!(fallback_title("123 456 --- 789"), "New Chat");
    }

    #[test]
    fn clamp_never_exceeds_five_tokens() {
        let title = clamp_title("one two three four five six seven".split_whitespace());
        assert_eq!(title.split_whitespace().count(), 5);
    }
}
