// ABOUTME: Heart comparison over resting, walking and variability heart rate plus VO2 max
// ABOUTME: Lower heart rates and higher variability or fitness count as improvements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::CategoryComparison;
use crate::change::Polarity;
use crate::delta::{MetricDelta, Unit};
use pulsewise_core::constants::thresholds::{
    HEART_RATE_VARIABILITY_PCT, RESTING_HEART_RATE_PCT, VO2_MAX_PCT, WALKING_HEART_RATE_PCT,
};
use pulsewise_core::models::{HealthCategory, HeartData};

/// Heart data for two adjacent periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartComparison {
    /// Earlier period
    pub previous: HeartData,
    /// Most recent period
    pub current: HeartData,
}

impl HeartComparison {
    /// Pair two periods
    #[must_use]
    pub const fn new(previous: HeartData, current: HeartData) -> Self {
        Self { previous, current }
    }
}

impl CategoryComparison for HeartComparison {
    fn category(&self) -> HealthCategory {
        HealthCategory::Heart
    }

    fn deltas(&self) -> Vec<MetricDelta> {
        let (prev, curr) = (&self.previous, &self.current);
        [
            MetricDelta::relative(
                "Resting Heart Rate",
                Unit::Bpm,
                prev.resting_heart_rate,
                curr.resting_heart_rate,
                RESTING_HEART_RATE_PCT,
                Polarity::LowerIsBetter,
            ),
            MetricDelta::relative(
                "Heart Rate Variability",
                Unit::Milliseconds,
                prev.heart_rate_variability,
                curr.heart_rate_variability,
                HEART_RATE_VARIABILITY_PCT,
                Polarity::HigherIsBetter,
            ),
            MetricDelta::relative(
                "Walking Heart Rate",
                Unit::Bpm,
                prev.walking_heart_rate,
                curr.walking_heart_rate,
                WALKING_HEART_RATE_PCT,
                Polarity::LowerIsBetter,
            ),
            MetricDelta::relative(
                "VO2 Max",
                Unit::Vo2,
                prev.vo2_max,
                curr.vo2_max,
                VO2_MAX_PCT,
                Polarity::HigherIsBetter,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn has_data(&self) -> bool {
        self.current.has_any_data()
    }

    fn missing_critical(&self) -> bool {
        self.current.has_any_data() && self.current.resting_heart_rate.is_none()
    }

    fn critical_metric(&self) -> Option<&'static str> {
        Some("resting heart rate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::Change;
    use pulsewise_core::models::TrendDirection;

    #[test]
    fn test_lower_resting_heart_rate_improves() {
        let comparison = HeartComparison::new(
            HeartData {
                resting_heart_rate: Some(65.0),
                ..HeartData::default()
            },
            HeartData {
                resting_heart_rate: Some(58.0),
                ..HeartData::default()
            },
        );
        let deltas = comparison.deltas();

        assert_eq!(deltas.len(), 1);
        assert!(matches!(
            deltas[0].change,
            Change::Percent(pct) if (pct + 10.769).abs() < 0.01
        ));
        assert_eq!(deltas[0].direction, TrendDirection::Improving);
        assert_eq!(comparison.trend(), TrendDirection::Improving);
        assert_eq!(deltas[0].formatted_value(), "58 bpm (-10.8%)");
    }

    #[test]
    fn test_small_changes_are_stable() {
        let comparison = HeartComparison::new(
            HeartData {
                resting_heart_rate: Some(60.0),
                heart_rate_variability: Some(50.0),
                ..HeartData::default()
            },
            HeartData {
                resting_heart_rate: Some(61.0),
                heart_rate_variability: Some(51.0),
                ..HeartData::default()
            },
        );
        assert!(comparison
            .deltas()
            .iter()
            .all(|delta| delta.direction == TrendDirection::Stable));
        assert_eq!(
            comparison.fallback_short_summary(),
            "Your heart health is holding steady."
        );
    }

    #[test]
    fn test_rising_walking_heart_rate_declines() {
        let comparison = HeartComparison::new(
            HeartData {
                resting_heart_rate: Some(60.0),
                walking_heart_rate: Some(100.0),
                ..HeartData::default()
            },
            HeartData {
                resting_heart_rate: Some(60.0),
                walking_heart_rate: Some(110.0),
                ..HeartData::default()
            },
        );
        let deltas = comparison.deltas();
        assert_eq!(deltas[1].name, "Walking Heart Rate");
        assert_eq!(deltas[1].direction, TrendDirection::Declining);
        assert_eq!(comparison.trend(), TrendDirection::Declining);
    }
}
