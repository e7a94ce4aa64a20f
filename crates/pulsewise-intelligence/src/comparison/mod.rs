// ABOUTME: Category comparison capability trait and the exhaustive Comparison sum type
// ABOUTME: Shared rendering of trends, display strings, prompts and fallback summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

mod heart;
mod mindfulness;
mod performance;
mod sleep;
mod vitality;

pub use heart::HeartComparison;
pub use mindfulness::MindfulnessComparison;
pub use performance::PerformanceComparison;
pub use sleep::SleepComparison;
pub use vitality::VitalityComparison;

use crate::change::aggregate_trend;
use crate::delta::MetricDelta;
use pulsewise_core::errors::{AppError, AppResult};
use pulsewise_core::models::{HealthCategory, MetricRecord, MetricTrend, TrendDirection};

/// Capabilities every category comparison provides
///
/// Implementors supply the per-metric deltas and data flags; trend
/// aggregation and all text rendering are derived from those.
pub trait CategoryComparison {
    /// Category being compared
    fn category(&self) -> HealthCategory;

    /// Deltas for every metric present in the current period, in display order
    fn deltas(&self) -> Vec<MetricDelta>;

    /// Current period holds at least one value
    fn has_data(&self) -> bool;

    /// Current period holds data but not the category's critical metric
    fn missing_critical(&self) -> bool;

    /// Human name of the critical metric, if the category has one
    fn critical_metric(&self) -> Option<&'static str> {
        None
    }

    /// Majority vote over the per-metric directions
    fn trend(&self) -> TrendDirection {
        aggregate_trend(self.deltas().iter().map(|delta| delta.direction))
    }

    /// Per-metric trend entries for the detail view
    fn metric_trends(&self) -> Vec<MetricTrend> {
        self.deltas().iter().map(MetricDelta::metric_trend).collect()
    }

    /// Compact one-line listing ("Resting Heart Rate: 58 bpm (-10.8%) · ...")
    fn display_text(&self) -> String {
        self.deltas()
            .iter()
            .map(|delta| format!("{}: {}", delta.name, delta.formatted_value()))
            .collect::<Vec<_>>()
            .join(" · ")
    }

    /// Metric block handed to the language model
    fn prompt_text(&self) -> String {
        let category = self.category();
        let deltas = self.deltas();
        let mut prompt = format!(
            "Category: {}\nMetrics (previous period -> current period):\n",
            category.display_name()
        );
        if deltas.is_empty() {
            prompt.push_str("- no comparable metrics\n");
        }
        for delta in &deltas {
            prompt.push_str(&delta.prompt_line());
            prompt.push('\n');
        }
        if let Some(metric) = self.critical_metric().filter(|_| self.missing_critical()) {
            prompt.push_str(&format!("Note: no {metric} data was recorded.\n"));
        }
        prompt.push_str(&format!("Overall trend: {}", self.trend()));
        prompt
    }

    /// One-sentence summary that does not need a language model
    fn fallback_short_summary(&self) -> String {
        let subject = self.category().subject();
        match self.trend() {
            TrendDirection::Improving => format!("Your {subject} is improving."),
            TrendDirection::Stable => format!("Your {subject} is holding steady."),
            TrendDirection::Declining => format!("Your {subject} needs some attention."),
        }
    }

    /// Paragraph summary that does not need a language model
    fn fallback_summary(&self) -> String {
        let mut sentences = vec![self.fallback_short_summary()];
        sentences.extend(self.deltas().iter().map(MetricDelta::sentence));
        if let Some(metric) = self.critical_metric().filter(|_| self.missing_critical()) {
            sentences.push(format!("No {metric} data was recorded for this period."));
        }
        sentences.join(" ")
    }
}

/// Comparison of two same-category records from adjacent periods
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Heart metrics
    Heart(HeartComparison),
    /// Sleep metrics
    Sleep(SleepComparison),
    /// Mindfulness metrics
    Mindfulness(MindfulnessComparison),
    /// Activity metrics
    Performance(PerformanceComparison),
    /// Vital sign metrics
    Vitality(VitalityComparison),
}

impl Comparison {
    /// Pair a previous and current record
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the records belong to different categories
    pub fn new(previous: &MetricRecord, current: &MetricRecord) -> AppResult<Self> {
        match (previous, current) {
            (MetricRecord::Heart(prev), MetricRecord::Heart(curr)) => {
                Ok(Self::Heart(HeartComparison::new(*prev, *curr)))
            }
            (MetricRecord::Sleep(prev), MetricRecord::Sleep(curr)) => {
                Ok(Self::Sleep(SleepComparison::new(*prev, *curr)))
            }
            (MetricRecord::Mindfulness(prev), MetricRecord::Mindfulness(curr)) => {
                Ok(Self::Mindfulness(MindfulnessComparison::new(*prev, *curr)))
            }
            (MetricRecord::Performance(prev), MetricRecord::Performance(curr)) => {
                Ok(Self::Performance(PerformanceComparison::new(*prev, *curr)))
            }
            (MetricRecord::Vitality(prev), MetricRecord::Vitality(curr)) => {
                Ok(Self::Vitality(VitalityComparison::new(*prev, *curr)))
            }
            _ => Err(AppError::invalid_input(format!(
                "Cannot compare {} data with {} data",
                previous.category(),
                current.category()
            ))),
        }
    }

    fn inner(&self) -> &dyn CategoryComparison {
        match self {
            Self::Heart(c) => c,
            Self::Sleep(c) => c,
            Self::Mindfulness(c) => c,
            Self::Performance(c) => c,
            Self::Vitality(c) => c,
        }
    }
}

impl CategoryComparison for Comparison {
    fn category(&self) -> HealthCategory {
        self.inner().category()
    }

    fn deltas(&self) -> Vec<MetricDelta> {
        self.inner().deltas()
    }

    fn has_data(&self) -> bool {
        self.inner().has_data()
    }

    fn missing_critical(&self) -> bool {
        self.inner().missing_critical()
    }

    fn critical_metric(&self) -> Option<&'static str> {
        self.inner().critical_metric()
    }
}
