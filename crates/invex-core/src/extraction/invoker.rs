//! Schema-constrained calls to an OpenAI-compatible chat endpoint.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::prompt::{ChatMessage, Prompt};
use crate::error::ExtractionError;
use crate::models::config::ModelConfig;
use crate::models::schema::SchemaContract;

/// Sends one prompt to a model and returns its raw answer.
///
/// Implementations must not assume the schema constraint was honored;
/// the answer is checked separately by the normalizer.
pub trait ModelInvoker {
    fn invoke(
        &self,
        model: &str,
        prompt: &Prompt,
        schema: &SchemaContract,
    ) -> Result<String, ExtractionError>;
}

impl<M: ModelInvoker + ?Sized> ModelInvoker for &M {
    fn invoke(
        &self,
        model: &str,
        prompt: &Prompt,
        schema: &SchemaContract,
    ) -> Result<String, ExtractionError> {
        (**self).invoke(model, prompt, schema)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking chat-completion client.
#[derive(Clone)]
pub struct ChatCompletionClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ChatCompletionClient {
    /// Create a client for `base_url` (e.g. `http://localhost:1234/v1`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> crate::Result<Self> {
        Self::build(base_url.into(), api_key.into(), None)
    }

    /// Create a client from the model section of the configuration.
    pub fn from_config(config: &ModelConfig) -> crate::Result<Self> {
        Self::build(
            config.base_url.clone(),
            config.api_key.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(base_url: String, api_key: String, timeout: Option<Duration>) -> crate::Result<Self> {
        // Blocking clients default to 30s; `None` removes the limit.
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::InvexError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ModelInvoker for ChatCompletionClient {
    fn invoke(
        &self,
        model: &str,
        prompt: &Prompt,
        schema: &SchemaContract,
    ) -> Result<String, ExtractionError> {
        let start = Instant::now();
        let request = ChatRequest {
            model,
            messages: prompt.messages(),
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema.name(),
                    strict: true,
                    schema: schema.as_json(),
                },
            },
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                ExtractionError::EmptyModelResponse(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion endpoint error");
            return Err(ExtractionError::EmptyModelResponse(format!(
                "endpoint returned {}",
                status
            )));
        }

        let body = response.text().map_err(|e| {
            ExtractionError::EmptyModelResponse(format!("failed to read body: {}", e))
        })?;
        if body.trim().is_empty() {
            return Err(ExtractionError::EmptyModelResponse("empty body".to_string()));
        }

        let raw: ChatResponseRaw =
            serde_json::from_str(&body).map_err(ExtractionError::MalformedResponse)?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExtractionError::EmptyModelResponse("no message content".to_string()))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Chat completion"
        );

        Ok(content)
    }
}
