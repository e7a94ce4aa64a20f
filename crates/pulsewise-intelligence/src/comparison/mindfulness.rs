// ABOUTME: Mindfulness comparison over total minutes, session count and session length
// ABOUTME: Every metric is higher-is-better against a 10% threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::CategoryComparison;
use crate::change::Polarity;
use crate::delta::{MetricDelta, Unit};
use pulsewise_core::constants::thresholds::MINDFULNESS_PCT;
use pulsewise_core::models::{HealthCategory, MindfulnessData};

/// Mindfulness data for two adjacent periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MindfulnessComparison {
    /// Earlier period
    pub previous: MindfulnessData,
    /// Most recent period
    pub current: MindfulnessData,
}

impl MindfulnessComparison {
    /// Pair two periods
    #[must_use]
    pub const fn new(previous: MindfulnessData, current: MindfulnessData) -> Self {
        Self { previous, current }
    }
}

impl CategoryComparison for MindfulnessComparison {
    fn category(&self) -> HealthCategory {
        HealthCategory::Mindfulness
    }

    fn deltas(&self) -> Vec<MetricDelta> {
        let (prev, curr) = (&self.previous, &self.current);
        let metric = |name, unit, previous, current| {
            MetricDelta::relative(
                name,
                unit,
                previous,
                current,
                MINDFULNESS_PCT,
                Polarity::HigherIsBetter,
            )
        };
        [
            metric(
                "Mindful Minutes",
                Unit::Minutes,
                prev.mindful_minutes,
                curr.mindful_minutes,
            ),
            metric(
                "Sessions",
                Unit::Sessions,
                prev.session_count.map(f64::from),
                curr.session_count.map(f64::from),
            ),
            metric(
                "Average Session",
                Unit::Minutes,
                prev.average_session_minutes,
                curr.average_session_minutes,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn has_data(&self) -> bool {
        self.current.has_any_data()
    }

    // No single mindfulness metric is required for a summary
    fn missing_critical(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewise_core::models::TrendDirection;

    #[test]
    fn test_more_practice_improves() {
        let comparison = MindfulnessComparison::new(
            MindfulnessData {
                mindful_minutes: Some(30.0),
                session_count: Some(3),
                average_session_minutes: Some(10.0),
            },
            MindfulnessData {
                mindful_minutes: Some(50.0),
                session_count: Some(5),
                average_session_minutes: Some(10.0),
            },
        );
        let deltas = comparison.deltas();
        assert_eq!(deltas[0].direction, TrendDirection::Improving);
        assert_eq!(deltas[1].formatted_value(), "5 sessions (+66.7%)");
        assert_eq!(deltas[2].direction, TrendDirection::Stable);
        assert_eq!(comparison.trend(), TrendDirection::Improving);
    }
}
