// ABOUTME: Language model adapter for local OpenAI-compatible servers
// ABOUTME: Supports Ollama, vLLM, LocalAI, and any endpoint with JSON schema output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! # `OpenAI`-Compatible Model
//!
//! Summaries are requested from a chat completions endpoint with a JSON
//! schema response format, so the answer can be decoded straight into a
//! [`SummaryResponse`].
//!
//! ## Configuration
//!
//! - `LOCAL_LLM_ENABLED`: set to `false` to turn model summaries off
//! - `LOCAL_LLM_BASE_URL`: Base URL (default: <http://localhost:11434/v1> for Ollama)
//! - `LOCAL_LLM_MODEL`: Model to use (default: `qwen2.5:7b-instruct`)
//! - `LOCAL_LLM_API_KEY`: API key (optional, empty for local servers)
//!
//! ## Supported Backends
//!
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **`LocalAI`**: <http://localhost:8080/v1>

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatMessage, LanguageModel, ModelAvailability, ResponseSchema, SummaryResponse};
use crate::config::LocalModelConfig;
use crate::constants::service_names::LOCAL_LLM;
use crate::constants::timeouts::{DEFAULT_MODEL_TIMEOUT_SECS, MODEL_AVAILABILITY_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};

/// Connection timeout for local servers
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Low temperature keeps summaries close to the numbers
const SUMMARY_TEMPERATURE: f32 = 0.2;

/// Upper bound on generated tokens for one summary
const SUMMARY_MAX_TOKENS: u32 = 400;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'static str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible model
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Model to request
    pub model: String,
    /// Display name for logs and error messages
    pub display_name: String,
    /// User-level switch for model summaries
    pub enabled: bool,
    /// Request timeout
    pub request_timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Build from the engine's local model settings
    #[must_use]
    pub fn from_local(config: &LocalModelConfig, request_timeout: Duration) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            display_name: display_name_for(&config.base_url).to_owned(),
            enabled: config.enabled,
            request_timeout,
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::from_local(
            &LocalModelConfig::default(),
            Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
        )
    }
}

/// Detect the server type from its port for friendlier messages
fn display_name_for(base_url: &str) -> &'static str {
    if base_url.contains(":11434") {
        "Ollama (Local)"
    } else if base_url.contains(":8000") {
        "vLLM (Local)"
    } else if base_url.contains(":8080") {
        "LocalAI"
    } else {
        "Local LLM"
    }
}

// ============================================================================
// Model Implementation
// ============================================================================

/// Language model served by an `OpenAI`-compatible endpoint
pub struct OpenAiCompatibleModel {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleModel {
    /// Create a new model client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} model: base_url={}, model={}, enabled={}",
            config.display_name, config.base_url, config.model, config.enabled
        );

        Ok(Self { client, config })
    }

    /// Create a model client from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is invalid or the HTTP client cannot be created.
    pub fn from_env() -> AppResult<Self> {
        let local = LocalModelConfig::from_env()?;
        Self::new(OpenAiCompatibleConfig::from_local(
            &local,
            Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
        ))
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    fn connection_error(&self, e: &reqwest::Error) -> AppError {
        if e.is_connect() {
            AppError::external_service(
                LOCAL_LLM,
                format!(
                    "Cannot connect to {}. Is the server running at {}?",
                    self.config.display_name, self.config.base_url
                ),
            )
        } else if e.is_timeout() {
            AppError::timeout(
                format!("{} request", self.config.display_name),
                self.config.request_timeout.as_secs(),
            )
        } else {
            AppError::external_service(LOCAL_LLM, format!("Failed to connect: {e}"))
        }
    }

    /// Parse error response from API
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                400 => AppError::invalid_input(format!(
                    "API validation error: {}",
                    error_response.error.message
                )),
                404 => AppError::not_found(format!(
                    "Model or endpoint ({})",
                    error_response.error.message
                )),
                503 => AppError::external_unavailable(LOCAL_LLM),
                _ => AppError::external_service(
                    LOCAL_LLM,
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            // Local servers often answer with plain text
            match status.as_u16() {
                502..=504 => AppError::external_service(
                    LOCAL_LLM,
                    "Local LLM server is not responding. Is Ollama/vLLM running?",
                ),
                _ => AppError::external_service(
                    LOCAL_LLM,
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Decode the assistant content into a summary, tolerating markdown fences
    fn parse_summary_content(content: &str) -> AppResult<SummaryResponse> {
        let trimmed = content.trim();
        let json = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .map_or(trimmed, str::trim);

        let response: SummaryResponse = serde_json::from_str(json).map_err(|e| {
            AppError::external_service(LOCAL_LLM, format!("Model returned malformed summary: {e}"))
        })?;

        if response.is_complete() {
            Ok(response)
        } else {
            Err(AppError::external_service(
                LOCAL_LLM,
                "Model returned an empty summary",
            ))
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    #[instrument(skip(self), fields(model = %self.config.model))]
    async fn check_availability(&self) -> ModelAvailability {
        if !self.config.enabled {
            return ModelAvailability::DisabledByUser;
        }

        debug!(
            "Checking {} availability at {}",
            self.config.display_name, self.config.base_url
        );

        // The models endpoint is the lightest request every server supports
        let request = self
            .client
            .get(self.api_url("models"))
            .timeout(Duration::from_secs(MODEL_AVAILABILITY_TIMEOUT_SECS));

        match self.add_auth_header(request).send().await {
            Ok(response) if response.status().is_success() => ModelAvailability::Available,
            Ok(response) => {
                warn!(
                    "{} availability check failed with status: {}",
                    self.config.display_name,
                    response.status()
                );
                ModelAvailability::UnavailableDevice(format!(
                    "{} answered with status {}",
                    self.config.display_name,
                    response.status()
                ))
            }
            Err(e) => {
                warn!("{} availability check failed: {}", self.config.display_name, e);
                ModelAvailability::UnavailableDevice(self.connection_error(&e).message)
            }
        }
    }

    #[instrument(skip(self, messages, schema), fields(model = %self.config.model, schema = schema.name))]
    async fn respond(
        &self,
        messages: &[ChatMessage],
        schema: &ResponseSchema,
    ) -> AppResult<SummaryResponse> {
        let request = OpenAiRequest {
            model: &self.config.model,
            messages: messages.iter().map(OpenAiMessage::from).collect(),
            temperature: SUMMARY_TEMPERATURE,
            max_tokens: SUMMARY_MAX_TOKENS,
            stream: false,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema.name,
                    schema: &schema.schema,
                    strict: true,
                },
            },
        };

        debug!(
            "Sending summary request to {} with {} messages",
            self.config.display_name,
            messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", self.config.display_name, e);
                self.connection_error(&e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(LOCAL_LLM, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let api_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            AppError::external_service(LOCAL_LLM, format!("Failed to parse response: {e}"))
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(LOCAL_LLM, "API returned no choices"))?;

        debug!(
            "Received response from {}: model={}, finish_reason={:?}",
            self.config.display_name, api_response.model, choice.finish_reason
        );

        let content = choice
            .message
            .content
            .ok_or_else(|| AppError::external_service(LOCAL_LLM, "API returned no content"))?;

        Self::parse_summary_content(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_display_name_detection() {
        assert_eq!(display_name_for("http://localhost:11434/v1"), "Ollama (Local)");
        assert_eq!(display_name_for("http://localhost:8000/v1"), "vLLM (Local)");
        assert_eq!(display_name_for("https://example.org/v1"), "Local LLM");
    }

    #[test]
    fn test_parse_summary_content_accepts_fenced_json() {
        let content = "```json\n{\"short_text\":\"Sleep improved.\",\"detailed_text\":\"You slept longer.\"}\n```";
        let summary = OpenAiCompatibleModel::parse_summary_content(content).unwrap();
        assert_eq!(summary.short_text, "Sleep improved.");
        assert_eq!(summary.detailed_text, "You slept longer.");
    }

    #[test]
    fn test_parse_summary_content_rejects_empty_fields() {
        let content = r#"{"short_text":"","detailed_text":"Something"}"#;
        let err = OpenAiCompatibleModel::parse_summary_content(content).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_plain_text_gateway_errors() {
        let err = OpenAiCompatibleModel::parse_error_response(StatusCode::BAD_GATEWAY, "oops");
        assert_eq!(err.code, ErrorCode::ExternalServiceError);

        let err = OpenAiCompatibleModel::parse_error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":{"message":"loading model","type":"server_error"}}"#,
        );
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[tokio::test]
    async fn test_disabled_model_reports_disabled_by_user() {
        let config = OpenAiCompatibleConfig {
            enabled: false,
            ..OpenAiCompatibleConfig::default()
        };
        let model = OpenAiCompatibleModel::new(config).unwrap();
        assert_eq!(
            model.check_availability().await,
            ModelAvailability::DisabledByUser
        );
    }
}
