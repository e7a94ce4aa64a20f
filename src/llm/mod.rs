// ABOUTME: Language model abstraction used to phrase health summaries
// ABOUTME: Defines availability states, chat messages, the response schema and the model trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! # Language Model Interface
//!
//! The summary generator only needs two things from a model: whether it can
//! be used right now, and a structured `{short_text, detailed_text}` answer to
//! a prompt. Anything that satisfies [`LanguageModel`] can be plugged in; the
//! crate ships [`OpenAiCompatibleModel`] for local `OpenAI`-compatible servers
//! such as Ollama, vLLM or `LocalAI`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pulsewise::llm::{ChatMessage, LanguageModel, ModelAvailability, ResponseSchema};
//!
//! async fn example(model: &dyn LanguageModel) {
//!     if model.check_availability().await == ModelAvailability::Available {
//!         let messages = vec![
//!             ChatMessage::system("Summarize the metrics."),
//!             ChatMessage::user("Category: Sleep"),
//!         ];
//!         let response = model.respond(&messages, &ResponseSchema::summary()).await;
//!     }
//! }
//! ```

mod openai_compatible;
pub mod prompts;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleModel};

use crate::errors::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

// ============================================================================
// Availability
// ============================================================================

/// Whether a language model can be used right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelAvailability {
    /// Ready to answer prompts
    Available,
    /// The device or server cannot run the model
    UnavailableDevice(String),
    /// The user turned model summaries off
    DisabledByUser,
}

impl ModelAvailability {
    /// Whether prompts may be sent
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for ModelAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::UnavailableDevice(reason) => write!(f, "unavailable ({reason})"),
            Self::DisabledByUser => f.write_str("disabled by user"),
        }
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions
    System,
    /// Content to summarize
    User,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single prompt message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

// ============================================================================
// Structured Response
// ============================================================================

/// JSON schema the model's answer must follow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSchema {
    /// Schema name reported to the server
    pub name: &'static str,
    /// JSON schema document
    pub schema: Value,
}

impl ResponseSchema {
    /// Schema of [`SummaryResponse`]
    #[must_use]
    pub fn summary() -> Self {
        Self {
            name: "health_summary",
            schema: json!({
                "type": "object",
                "properties": {
                    "short_text": {
                        "type": "string",
                        "description": "One sentence overview of the trend"
                    },
                    "detailed_text": {
                        "type": "string",
                        "description": "Two to four sentences covering the notable metrics"
                    }
                },
                "required": ["short_text", "detailed_text"],
                "additionalProperties": false
            }),
        }
    }
}

/// Structured summary text produced by a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// One-line summary
    pub short_text: String,
    /// Paragraph summary
    pub detailed_text: String,
}

impl SummaryResponse {
    /// Both fields carry text
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.short_text.trim().is_empty() && !self.detailed_text.trim().is_empty()
    }
}

// ============================================================================
// Model Trait
// ============================================================================

/// Language model used to phrase summaries
///
/// Implementations must be cheap to share across tasks; the generator holds
/// them behind an `Arc`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Current availability; never fails, problems map to a non-available state
    async fn check_availability(&self) -> ModelAvailability;

    /// Answer `messages` with text following `schema`
    async fn respond(
        &self,
        messages: &[ChatMessage],
        schema: &ResponseSchema,
    ) -> AppResult<SummaryResponse>;
}
