// ABOUTME: Sleep comparison over total sleep, deep and REM stages and time awake
// ABOUTME: More sleep and deeper stages improve; more awake time declines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::CategoryComparison;
use crate::change::Polarity;
use crate::delta::{MetricDelta, Unit};
use pulsewise_core::constants::thresholds::{AWAKE_TIME_PCT, SLEEP_STAGE_PCT, TOTAL_SLEEP_PCT};
use pulsewise_core::models::{HealthCategory, SleepData};

/// Sleep data for two adjacent periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepComparison {
    /// Earlier period
    pub previous: SleepData,
    /// Most recent period
    pub current: SleepData,
}

impl SleepComparison {
    /// Pair two periods
    #[must_use]
    pub const fn new(previous: SleepData, current: SleepData) -> Self {
        Self { previous, current }
    }
}

impl CategoryComparison for SleepComparison {
    fn category(&self) -> HealthCategory {
        HealthCategory::Sleep
    }

    fn deltas(&self) -> Vec<MetricDelta> {
        let (prev, curr) = (&self.previous, &self.current);
        [
            MetricDelta::relative(
                "Total Sleep",
                Unit::Hours,
                prev.total_sleep_hours,
                curr.total_sleep_hours,
                TOTAL_SLEEP_PCT,
                Polarity::HigherIsBetter,
            ),
            MetricDelta::relative(
                "Deep Sleep",
                Unit::Hours,
                prev.deep_sleep_hours,
                curr.deep_sleep_hours,
                SLEEP_STAGE_PCT,
                Polarity::HigherIsBetter,
            ),
            MetricDelta::relative(
                "REM Sleep",
                Unit::Hours,
                prev.rem_sleep_hours,
                curr.rem_sleep_hours,
                SLEEP_STAGE_PCT,
                Polarity::HigherIsBetter,
            ),
            MetricDelta::relative(
                "Time Awake",
                Unit::Minutes,
                prev.awake_minutes,
                curr.awake_minutes,
                AWAKE_TIME_PCT,
                Polarity::LowerIsBetter,
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
        self.current.has_any_data() && self.current.total_sleep_hours.is_none()
    }

    fn critical_metric(&self) -> Option<&'static str> {
        Some("total sleep")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewise_core::models::TrendDirection;

    #[test]
    fn test_stage_thresholds_are_wider_than_total() {
        let comparison = SleepComparison::new(
            SleepData {
                total_sleep_hours: Some(7.0),
                deep_sleep_hours: Some(1.0),
                ..SleepData::default()
            },
            SleepData {
                total_sleep_hours: Some(7.42),
                deep_sleep_hours: Some(1.06),
                ..SleepData::default()
            },
        );
        let deltas = comparison.deltas();
        assert_eq!(deltas[0].direction, TrendDirection::Improving);
        assert_eq!(deltas[1].direction, TrendDirection::Stable);
    }

    #[test]
    fn test_more_time_awake_declines() {
        let comparison = SleepComparison::new(
            SleepData {
                total_sleep_hours: Some(7.0),
                awake_minutes: Some(20.0),
                ..SleepData::default()
            },
            SleepData {
                total_sleep_hours: Some(7.0),
                awake_minutes: Some(35.0),
                ..SleepData::default()
            },
        );
        let deltas = comparison.deltas();
        assert_eq!(deltas[1].name, "Time Awake");
        assert_eq!(deltas[1].direction, TrendDirection::Declining);
        assert_eq!(comparison.fallback_short_summary(), "Your sleep needs some attention.");
    }
}
