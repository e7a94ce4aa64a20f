// ABOUTME: Turns a period comparison into a timespan summary, with or without a language model
// ABOUTME: Model output only supplies text; trends and metric listings always come from the comparison
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use crate::constants::timeouts::DEFAULT_MODEL_TIMEOUT_SECS;
use crate::llm::prompts::{build_summary_prompt, get_summary_system_prompt};
use crate::llm::{ChatMessage, LanguageModel, ModelAvailability, ResponseSchema, SummaryResponse};
use crate::models::{Timespan, TimespanSummary};
use chrono::Utc;
use pulsewise_intelligence::{CategoryComparison, Comparison};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Produces [`TimespanSummary`] values from comparisons
///
/// Generation never fails: whenever the model cannot be used, or returns
/// something unusable, deterministic text derived from the comparison is
/// used instead.
#[derive(Clone)]
pub struct SummaryGenerator {
    model: Option<Arc<dyn LanguageModel>>,
    model_timeout: Duration,
}

impl SummaryGenerator {
    /// Generator backed by `model`, bounding each model call by `model_timeout`
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, model_timeout: Duration) -> Self {
        Self {
            model: Some(model),
            model_timeout,
        }
    }

    /// Generator that always uses deterministic text
    #[must_use]
    pub const fn without_model() -> Self {
        Self {
            model: None,
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
        }
    }

    /// Summarize `comparison` for `timespan`
    #[instrument(skip(self, comparison), fields(category = %comparison.category(), timespan = %timespan))]
    pub async fn generate(&self, comparison: &Comparison, timespan: Timespan) -> TimespanSummary {
        if !comparison.has_data() {
            debug!("No current data, using no-data summary");
            return TimespanSummary::no_data(timespan);
        }

        let text = if comparison.missing_critical() {
            debug!("Critical metric missing, skipping model");
            None
        } else {
            self.model_text(comparison, timespan).await
        };

        let (short_text, long_text) = text.map_or_else(
            || {
                (
                    comparison.fallback_short_summary(),
                    comparison.fallback_summary(),
                )
            },
            |response| (response.short_text, response.detailed_text),
        );

        TimespanSummary {
            timespan,
            trend: comparison.trend(),
            short_text,
            long_text,
            metrics_display: comparison.display_text(),
            metric_trends: comparison.metric_trends(),
            generated_at: Utc::now(),
        }
    }

    /// Ask the model for text; `None` means the fallback should be used
    async fn model_text(
        &self,
        comparison: &Comparison,
        timespan: Timespan,
    ) -> Option<SummaryResponse> {
        let model = self.model.as_ref()?;

        let availability = match timeout(self.model_timeout, model.check_availability()).await {
            Ok(availability) => availability,
            Err(_) => {
                warn!("Model availability check timed out");
                return None;
            }
        };
        if availability != ModelAvailability::Available {
            debug!(availability = %availability, "Model not usable, using fallback text");
            return None;
        }

        let messages = [
            ChatMessage::system(get_summary_system_prompt()),
            ChatMessage::user(build_summary_prompt(timespan, &comparison.prompt_text())),
        ];
        let schema = ResponseSchema::summary();

        match timeout(self.model_timeout, model.respond(&messages, &schema)).await {
            Ok(Ok(response)) if response.is_complete() => Some(response),
            Ok(Ok(_)) => {
                warn!("Model returned empty summary text, using fallback text");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Model summary failed, using fallback text");
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.model_timeout.as_secs(),
                    "Model summary timed out, using fallback text"
                );
                None
            }
        }
    }
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::without_model()
    }
}
