//! Gemini LLM provider implementation.
//!
//! Uses the `generateContent` REST endpoint of the Generative Language API.
//! API: https://ai.google.dev/api/generate-content

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use salesqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default base URL for the Generative Language API.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl UsageMetadata {
    /// Prefer the service's own total; fall back to a saturating sum.
    fn into_usage(self) -> LlmUsage {
        let mut usage = LlmUsage::new(self.prompt_token_count, self.candidates_token_count);
        if let Some(total) = self.total_token_count {
            usage.total_tokens = total;
        }
        usage
    }
}

/// Gemini LLM client.
pub struct GeminiClient {
    /// Base URL for the API
    base_url: String,

    /// API key sent in the `x-goog-api-key` header
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_GEMINI_URL, api_key)
    }

    /// Create a new Gemini client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Convert LlmRequest to Gemini format.
    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
        }
    }

    /// Convert Gemini response to LlmResponse.
    ///
    /// The answer text is the concatenation of the text parts of the first
    /// candidate. A reply without any candidate text is an error.
    fn convert_response(&self, response: GeminiResponse, model: &str) -> AppResult<LlmResponse> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            AppError::Llm("Gemini returned no candidates".to_string())
        })?;

        let parts = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default();

        if parts.iter().all(|part| part.text.is_none()) {
            return Err(AppError::Llm(format!(
                "Gemini candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let content: String = parts.into_iter().filter_map(|part| part.text).collect();

        let usage = response
            .usage_metadata
            .map(UsageMetadata::into_usage)
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            usage,
            done: true,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini ({})", request.model);
        tracing::debug!("Prompt length: {} bytes", request.prompt.len());

        let gemini_request = self.to_gemini_request(request);
        let url = self.generate_url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        tracing::info!("Received completion from Gemini");
        tracing::debug!("Response: {:?}", gemini_response);

        self.convert_response(gemini_response, &request.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("key");
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.base_url, DEFAULT_GEMINI_URL);
        assert_eq!(
            client.generate_url("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_gemini_request_conversion() {
        let client = GeminiClient::with_base_url("http://localhost:1/", "key");
        assert_eq!(client.base_url, "http://localhost:1");

        let request = LlmRequest::new("Hello", "gemini-2.0-flash");
        let body = serde_json::to_value(client.to_gemini_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "Hello"}]}]})
        );
    }

    #[test]
    fn test_usage_prefers_service_total() {
        let usage: UsageMetadata = serde_json::from_value(json!({
            "promptTokenCount": u32::MAX,
            "candidatesTokenCount": 10,
            "totalTokenCount": 1234
        }))
        .unwrap();
        assert_eq!(usage.into_usage().total_tokens, 1234);

        let usage: UsageMetadata = serde_json::from_value(json!({
            "promptTokenCount": u32::MAX,
            "candidatesTokenCount": 10
        }))
        .unwrap();
        assert_eq!(usage.into_usage().total_tokens, u32::MAX);
    }

    #[test]
    fn test_convert_response_concatenates_parts() {
        let client = GeminiClient::new("key");
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "John Doe "}, {"text": "sold 500."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16}
        }))
        .unwrap();

        let converted = client.convert_response(response, "gemini-2.0-flash").unwrap();
        assert_eq!(converted.content, "John Doe sold 500.");
        assert_eq!(converted.model, "gemini-2.0-flash");
        assert_eq!(converted.usage.total_tokens, 16);
    }

    #[test]
    fn test_convert_response_without_candidates() {
        let client = GeminiClient::new("key");
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        let result = client.convert_response(response, "gemini-2.0-flash");
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[test]
    fn test_convert_response_empty_candidate() {
        let client = GeminiClient::new("key");
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();

        match client.convert_response(response, "gemini-2.0-flash") {
            Err(AppError::Llm(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("Expected LLM error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_against_stub_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::Json(json!({
                "contents": [{"role": "user", "parts": [{"text": "What is the sales data for John Doe?"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"candidates": [{"content": {"parts": [{"text": "Mock AI response"}]}}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = GeminiClient::with_base_url(server.url(), "test-key");
        let request = LlmRequest::new("What is the sales data for John Doe?", "gemini-2.0-flash");
        let response = client.complete(&request).await.unwrap();

        assert_eq!(response.content, "Mock AI response");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error": {"status": "RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::with_base_url(server.url(), "test-key");
        let request = LlmRequest::new("hi", "gemini-2.0-flash");

        match client.complete(&request).await {
            Err(AppError::Llm(msg)) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("RESOURCE_EXHAUSTED"));
            }
            other => panic!("Expected LLM error, got {:?}", other),
        }
    }
}
