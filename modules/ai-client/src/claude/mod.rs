mod client;
pub(crate) mod types;

use crate::error::AiError;
use crate::retry::with_retry;

use client::ClaudeClient;
use types::*;

// =============================================================================
// Claude Agent
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

/// Options for a single completion call. `retries` counts extra attempts
/// beyond the first.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub retries: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.2,
            retries: 2,
        }
    }
}

/// A completed generation: the first text block plus usage counters for
/// caller-side cost accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AiError::Config("ANTHROPIC_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Send a system instruction and task prompt, with bounded retry on
    /// transient failures. This client knows nothing about what the prompt
    /// asks for; response interpretation belongs to the caller.
    pub async fn complete(
        &self,
        system: &str,
        task: &str,
        options: &CompletionOptions,
    ) -> Result<Completion, AiError> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .message(WireMessage::user(task))
            .max_tokens(options.max_tokens)
            .temperature(options.temperature);
        let client = self.client();

        with_retry(options.retries, || {
            let client = &client;
            let request = &request;
            async move {
                let response = client.chat(request).await?;
                let content = response.text().ok_or(AiError::EmptyResponse)?;
                Ok(Completion {
                    content,
                    input_tokens: response.usage.input_tokens,
                    output_tokens: response.usage.output_tokens,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_new() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514");
        assert_eq!(ai.model(), "claude-sonnet-4-20250514");
        assert_eq!(ai.api_key, "sk-ant-test");
    }

    #[test]
    fn test_claude_with_base_url() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514")
            .with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[test]
    fn test_default_options() {
        let options = CompletionOptions::default();
        assert_eq!(options.retries, 2);
        assert_eq!(options.max_tokens, 4096);
    }
}
