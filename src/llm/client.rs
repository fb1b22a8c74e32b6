//! HTTP client for generative text services.
//!
//! Speaks two wire protocols: the Gemini `generateContent` REST API and
//! any OpenAI-compatible chat completions endpoint. The model is chosen
//! per call so one client can probe several candidate models.

use crate::config::{LlmConfig, Provider};
use crate::error::{EvalError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prompt used to probe a candidate model.
pub const CONNECTION_TEST_PROMPT: &str = "Test connection";

/// A chat message. Prompts are always sent as a single user turn.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Request body for Gemini `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// API error envelope. Both protocols wrap failures as `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Response from an LLM call including metadata.
#[derive(Debug)]
pub struct LlmResponse {
    /// The generated content.
    pub content: String,
    /// Reason the model stopped generating.
    pub finish_reason: Option<String>,
    /// Token usage (if available).
    pub usage: Option<TokenUsage>,
}

#[derive(Debug)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Generative text client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// OpenAI-compatible chat completions URL.
    fn chat_endpoint(&self) -> String {
        let base = self.config.effective_api_base().trim_end_matches('/');
        format!("{}/v1/chat/completions", base)
    }

    /// Gemini `generateContent` URL for a model. Accepts ids with or without
    /// the `models/` prefix.
    fn gemini_endpoint(&self, model: &str) -> String {
        let base = self.config.effective_api_base().trim_end_matches('/');
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", base, model)
    }

    /// Send a single prompt to `model` and return the full response.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<LlmResponse> {
        debug!(provider = %self.config.provider, model, prompt_len = prompt.len(), "sending prompt");
        match self.config.provider {
            Provider::Gemini => self.generate_gemini(model, prompt).await,
            Provider::OpenAi => self.generate_chat(model, prompt).await,
        }
    }

    /// Convenience method: generated text only.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let response = self.generate(model, prompt).await?;
        debug!(
            model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "response received"
        );
        Ok(response.content)
    }

    /// Probe `model` with a trivial prompt. Any successful response counts.
    pub async fn test_connection(&self, model: &str) -> Result<()> {
        self.generate(model, CONNECTION_TEST_PROMPT).await.map(|_| ())
    }

    async fn generate_gemini(&self, model: &str, prompt: &str) -> Result<LlmResponse> {
        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiRequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.gemini_endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let body = Self::check_response(response).await?;
        let generation: GenerateContentResponse = serde_json::from_str(&body)?;

        let Some(candidate) = generation.candidates.into_iter().next() else {
            let reason = generation
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("No candidates in response (blocked: {})", r))
                .unwrap_or_else(|| "No candidates in response".to_string());
            return Err(EvalError::LlmApi(reason));
        };

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(EvalError::LlmApi(format!(
                "Empty response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(LlmResponse {
            content,
            finish_reason: candidate.finish_reason,
            usage: generation.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
        })
    }

    async fn generate_chat(&self, model: &str, prompt: &str) -> Result<LlmResponse> {
        let request = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        let response = self
            .client
            .post(self.chat_endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let body = Self::check_response(response).await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EvalError::LlmApi("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    /// Read the body, turning non-2xx statuses into `LlmApi` errors.
    async fn check_response(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return Err(EvalError::LlmApi(format!(
                    "API error ({}): {}",
                    status, api_error.error.message
                )));
            }
            return Err(EvalError::LlmApi(format!(
                "Request failed ({}): {}",
                status, body
            )));
        }

        Ok(body)
    }
}
