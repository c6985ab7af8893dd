//! Scoped Q&A forwarder.
//!
//! Wraps a question and the dataset in the scoped prompt, submits it to the
//! completion service and hands back the reply text untouched.

use salesqa_core::{AppConfig, AppError, AppResult, Dataset};
use salesqa_llm::{create_client, LlmClient, LlmRequest};
use salesqa_prompt::{build_prompt, default_prompt, load_prompt, PromptDefinition};
use std::sync::Arc;

/// Forwards questions to the completion service.
pub struct Forwarder {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
}

impl Forwarder {
    /// Create a forwarder around an existing client.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, prompt: PromptDefinition) -> Self {
        Self {
            client,
            model: model.into(),
            prompt,
        }
    }

    /// Create a forwarder from configuration: provider client via the
    /// factory, prompt from `prompt_file` or the built-in default.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
        )
        .map_err(AppError::Config)?;

        let prompt = match config.prompt_file {
            Some(ref path) => load_prompt(path)?,
            None => default_prompt()?,
        };

        tracing::info!(
            "Forwarding to {} ({}) with prompt {}",
            client.provider_name(),
            config.model,
            prompt.id
        );

        Ok(Self::new(client, config.model.clone(), prompt))
    }

    /// Answer `question` using only `dataset`.
    ///
    /// The reply text is returned exactly as the service produced it.
    /// Completion failures propagate unchanged; there is no retry.
    pub async fn answer(&self, question: &str, dataset: &Dataset) -> AppResult<String> {
        tracing::info!("Forwarding question ({} chars)", question.chars().count());
        tracing::debug!("Question: {}", question);

        let built = build_prompt(&self.prompt, &dataset.canonical_text(), question)?;
        tracing::debug!(
            "Built prompt {} - {} bytes, dataset {} bytes",
            built.metadata.source_prompt_id,
            built.text.len(),
            built.metadata.dataset_bytes
        );

        let request = LlmRequest::new(built.text, &self.model);
        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Completion used {} tokens",
            response.usage.total_tokens
        );

        Ok(response.content)
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesqa_llm::LlmResponse;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and replies with a fixed text.
    struct RecordingClient {
        reply: String,
        seen: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingClient {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(LlmResponse::text(self.reply.clone(), request.model.clone()))
        }
    }

    struct FailingClient;

    #[async_trait::async_trait]
    impl LlmClient for FailingClient {
        fn provider_name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            Err(AppError::Llm("quota exceeded".to_string()))
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_value(json!([{"id": 1, "name": "John Doe", "sales": 500}]))
    }

    #[tokio::test]
    async fn test_answer_is_verbatim_and_prompt_embeds_dataset() {
        let reply = "  Mock AI response\n\nwith *markdown* and trailing space ";
        let client = Arc::new(RecordingClient {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let forwarder = Forwarder::new(client.clone(), "gemini-2.0-flash", default_prompt().unwrap());
        let data = dataset();

        let answer = forwarder
            .answer("What is the sales data for John Doe?", &data)
            .await
            .unwrap();
        assert_eq!(answer, reply);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gemini-2.0-flash");
        assert!(seen[0].prompt.contains(&data.canonical_text()));
        assert!(seen[0].prompt.contains("What is the sales data for John Doe?"));
    }

    #[tokio::test]
    async fn test_prompt_is_deterministic() {
        let client = Arc::new(RecordingClient {
            reply: "ok".to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let forwarder = Forwarder::new(client.clone(), "m", default_prompt().unwrap());
        let data = dataset();

        forwarder.answer("same question", &data).await.unwrap();
        forwarder.answer("same question", &data).await.unwrap();

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].prompt, seen[1].prompt);
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let forwarder = Forwarder::new(Arc::new(FailingClient), "m", default_prompt().unwrap());
        let result = forwarder.answer("q", &dataset()).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[test]
    fn test_from_config_requires_key_for_gemini() {
        let config = AppConfig::default();
        let result = Forwarder::from_config(&config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_config_ollama() {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        config.model = "llama3.2".to_string();

        let forwarder = Forwarder::from_config(&config).unwrap();
        assert_eq!(forwarder.model(), "llama3.2");
    }
}
