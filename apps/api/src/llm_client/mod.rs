//! LLM gateway client — the single point of entry for all completion calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the gateway directly.
//! All LLM interactions go through `CompletionGateway`, and the client is
//! strictly single-shot: exactly one outbound HTTPS call per invocation.
//! Retries live in `generation::retry`, never here.
//!
//! Configuration is by-value per call (`GatewayConfig`) — the credential
//! arrives with each request, so no shared client state ever mixes
//! credentials between callers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::GenerationError;

/// Low temperature for tool-forced structured output — consistency over
/// variety.
pub const STRUCTURED_TEMPERATURE: f32 = 0.3;
/// Token ceiling sized for a full résumé payload.
pub const STRUCTURED_MAX_TOKENS: u32 = 8000;
/// Higher temperature for prose so letters read naturally.
pub const PROSE_TEMPERATURE: f32 = 0.7;
/// Token ceiling sized for a multi-paragraph letter.
pub const PROSE_MAX_TOKENS: u32 = 2000;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Per-call gateway configuration. Passed by value into each attempt; the
/// pipeline fills `api_key` from the caller's request.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    /// Sent as `HTTP-Referer` — identifies the calling application.
    pub referrer: String,
    /// Sent as `X-Title`.
    pub app_title: String,
}

impl GatewayConfig {
    pub fn with_api_key(&self, api_key: String) -> GatewayConfig {
        GatewayConfig {
            api_key,
            ..self.clone()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request wire types (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

impl ToolSpec {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        ToolSpec {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// `tool_choice` value that forces the model to call exactly this
    /// function instead of replying with prose.
    pub fn forced_choice(&self) -> Value {
        json!({
            "type": "function",
            "function": { "name": self.function.name }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Reply wire types
// ────────────────────────────────────────────────────────────────────────────

/// Raw gateway reply. Treated as untrusted input everywhere: the extractor
/// (`generation::extract`) resolves it into a tagged payload before any
/// field access.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ReplyMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub call_type: Option<String>,
    pub function: ToolCallFunction,
}

/// `arguments` is a JSON-encoded string per the OpenAI protocol — parsing
/// it is the extractor's job.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway trait and HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// Seam for the completion transport. Production uses `HttpGateway`; tests
/// swap in a scripted mock to assert exact call counts.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        config: &GatewayConfig,
        request: ChatRequest,
    ) -> Result<ChatReply, GenerationError>;
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
}

impl HttpGateway {
    pub fn new() -> Self {
        HttpGateway {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionGateway for HttpGateway {
    async fn complete(
        &self,
        config: &GatewayConfig,
        request: ChatRequest,
    ) -> Result<ChatReply, GenerationError> {
        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .header("HTTP-Referer", &config.referrer)
            .header("X-Title", &config.app_title)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GatewayErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        status_hint(status.as_u16()).to_string()
                    } else {
                        body
                    }
                });
            return Err(GenerationError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        debug!(
            "Gateway call succeeded: model={}, choices={}",
            request.model,
            reply.choices.len()
        );

        Ok(reply)
    }
}

/// Fallback message when the gateway returns a non-success status with an
/// unparseable or empty body. The wording feeds the error classifier.
fn status_hint(status: u16) -> &'static str {
    match status {
        401 | 403 => "authentication failed — check your API key",
        402 => "insufficient credits",
        404 => "model not found",
        429 => "rate limit exceeded",
        500..=599 => "the provider reported a temporary server error",
        _ => "the gateway rejected the request",
    }
}
