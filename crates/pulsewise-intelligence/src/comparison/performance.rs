// ABOUTME: Activity comparison over steps, active energy, exercise time and distance
// ABOUTME: Every metric is higher-is-better against a 5% threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::CategoryComparison;
use crate::change::Polarity;
use crate::delta::{MetricDelta, Unit};
use pulsewise_core::constants::thresholds::PERFORMANCE_PCT;
use pulsewise_core::models::{HealthCategory, PerformanceData};

/// Activity data for two adjacent periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceComparison {
    /// Earlier period
    pub previous: PerformanceData,
    /// Most recent period
    pub current: PerformanceData,
}

impl PerformanceComparison {
    /// Pair two periods
    #[must_use]
    pub const fn new(previous: PerformanceData, current: PerformanceData) -> Self {
        Self { previous, current }
    }
}

impl CategoryComparison for PerformanceComparison {
    fn category(&self) -> HealthCategory {
        HealthCategory::Performance
    }

    fn deltas(&self) -> Vec<MetricDelta> {
        let (prev, curr) = (&self.previous, &self.current);
        let metric = |name, unit, previous, current| {
            MetricDelta::relative(
                name,
                unit,
                previous,
                current,
                PERFORMANCE_PCT,
                Polarity::HigherIsBetter,
            )
        };
        [
            metric(
                "Steps",
                Unit::Steps,
                prev.step_count.map(|steps| steps as f64),
                curr.step_count.map(|steps| steps as f64),
            ),
            metric(
                "Active Energy",
                Unit::Kilocalories,
                prev.active_energy,
                curr.active_energy,
            ),
            metric(
                "Exercise",
                Unit::Minutes,
                prev.exercise_minutes,
                curr.exercise_minutes,
            ),
            metric("Distance", Unit::Kilometers, prev.distance_km, curr.distance_km),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn has_data(&self) -> bool {
        self.current.has_any_data()
    }

    fn missing_critical(&self) -> bool {
        self.current.has_any_data() && self.current.step_count.is_none()
    }

    fn critical_metric(&self) -> Option<&'static str> {
        Some("step count")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewise_core::models::TrendDirection;

    #[test]
    fn test_more_steps_improve() {
        let comparison = PerformanceComparison::new(
            PerformanceData {
                step_count: Some(5000),
                ..PerformanceData::default()
            },
            PerformanceData {
                step_count: Some(8432),
                ..PerformanceData::default()
            },
        );
        let deltas = comparison.deltas();
        assert_eq!(deltas[0].direction, TrendDirection::Improving);
        assert_eq!(deltas[0].formatted_value(), "8,432 steps (+68.6%)");
        assert_eq!(
            comparison.fallback_short_summary(),
            "Your activity level is improving."
        );
    }

    #[test]
    fn test_zero_previous_steps_is_unknown_change() {
        let comparison = PerformanceComparison::new(
            PerformanceData {
                step_count: Some(0),
                ..PerformanceData::default()
            },
            PerformanceData {
                step_count: Some(4000),
                ..PerformanceData::default()
            },
        );
        assert_eq!(comparison.trend(), TrendDirection::Stable);
        assert!(comparison.fallback_summary().contains("Steps was 4,000 steps."));
    }
}
