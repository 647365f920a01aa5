//! Gemini provider implementation using the `generateContent` API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    check_http_response, with_timeout, CompletionRequest, CompletionResponse, GroundingHint,
    LlmProvider, ProviderError, Role, StopReason, UsageStats,
};

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns.
    pub contents: Vec<GeminiContent>,
    /// Optional system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    /// Sampling and output configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
    /// Grounding tools.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
}

/// A content turn in Gemini format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role: "user" or "model". Absent for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A single content part.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Text payload; non-text parts deserialize with `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Generation config.
#[doc(hidden)]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// `application/json` when a schema is supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// OpenAPI-style response schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

/// `generateContent` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate answers.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token usage.
    pub usage_metadata: Option<GeminiUsage>,
    /// Model version that served the response.
    pub model_version: Option<String>,
    /// Prompt-level feedback (block reasons).
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

/// A response candidate.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Candidate content.
    pub content: Option<GeminiContent>,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Usage metadata.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    /// Prompt tokens.
    pub prompt_token_count: Option<u32>,
    /// Candidate tokens.
    pub candidates_token_count: Option<u32>,
}

/// Prompt feedback.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    /// Block reason when the prompt was rejected.
    pub block_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Gemini `generateContent` provider.
#[derive(Clone)]
pub struct GeminiProvider {
    model_spec: String,
    model_name: String,
    api_key: String,
    /// Base URL for the API (overridable for tests and proxies).
    #[doc(hidden)]
    pub base_url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model_spec", &self.model_spec)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance.
    pub fn new(model_spec: String, model_name: String, api_key: String) -> Self {
        Self {
            model_spec,
            model_name,
            api_key,
            base_url: DEFAULT_GEMINI_URL.to_owned(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full `generateContent` endpoint for this model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_name)
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a Gemini API request from a completion request.
#[doc(hidden)]
pub fn build_request(request: &CompletionRequest) -> GeminiRequest {
    let contents = request
        .messages
        .iter()
        .map(|msg| GeminiContent {
            role: Some(
                match msg.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_owned(),
            ),
            parts: vec![GeminiPart {
                text: Some(msg.content.clone()),
            }],
        })
        .collect();

    let system_instruction = request.system.as_ref().map(|system| GeminiContent {
        role: None,
        parts: vec![GeminiPart {
            text: Some(system.clone()),
        }],
    });

    let response_schema = request.response_schema.as_ref().map(to_gemini_schema);
    let generation_config = GeminiGenerationConfig {
        temperature: request.temperature,
        max_output_tokens: request.max_tokens,
        response_mime_type: response_schema
            .as_ref()
            .map(|_| "application/json".to_owned()),
        response_schema,
    };
    let has_config = generation_config.temperature.is_some()
        || generation_config.max_output_tokens.is_some()
        || generation_config.response_schema.is_some();

    let tools = request
        .grounding
        .iter()
        .map(|hint| match hint {
            GroundingHint::Maps => serde_json::json!({"googleMaps": {}}),
            GroundingHint::Search => serde_json::json!({"googleSearch": {}}),
        })
        .collect();

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: has_config.then_some(generation_config),
        tools,
    }
}

/// Convert a JSON Schema document into Gemini's OpenAPI subset.
///
/// Gemini expects upper-case `type` names (`OBJECT`, `STRING`, ...).
#[doc(hidden)]
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(kind)) => Value::String(kind.to_uppercase()),
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

/// Parse a Gemini API response into a completion response.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the response cannot be deserialized, and
/// `ProviderError::Unavailable` when the prompt was blocked.
#[doc(hidden)]
pub fn parse_response(body: &str, fallback_model: &str) -> Result<CompletionResponse, ProviderError> {
    let resp: GeminiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if resp.candidates.is_empty() {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::Unavailable(format!("prompt blocked: {reason}")));
        }
    }

    let first = resp.candidates.into_iter().next();
    let finish_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
    let text = first
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let stop_reason = match finish_reason.as_deref() {
        Some("STOP") | None => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY") | Some("PROHIBITED_CONTENT") => StopReason::Safety,
        Some(other) => StopReason::Other(other.to_owned()),
    };

    let usage = resp
        .usage_metadata
        .map(|u| UsageStats {
            input_tokens: u.prompt_token_count.unwrap_or(0),
            output_tokens: u.candidates_token_count.unwrap_or(0),
        })
        .unwrap_or_default();

    Ok(CompletionResponse {
        text,
        stop_reason,
        usage,
        model: resp
            .model_version
            .unwrap_or_else(|| fallback_model.to_owned()),
    })
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_request = build_request(&request);

        let builder = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&api_request);

        let response = with_timeout(builder, self.timeout).send().await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload, &self.model_name)
    }

    fn supports_structured_output(&self) -> bool {
        true
    }

    fn supports_grounding(&self, _hint: GroundingHint) -> bool {
        true
    }

    fn model_id(&self) -> &str {
        &self.model_spec
    }
}
