// ABOUTME: The fixed set of health categories summarized on the home screen
// ABOUTME: Each category knows its display names and the health data types it reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::health_data::{EventKind, HealthDataType, QuantityMetric};
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five health domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCategory {
    /// Resting, walking and variability of heart rate, cardio fitness
    Heart,
    /// Nightly sleep duration and stages
    Sleep,
    /// Mindful sessions
    Mindfulness,
    /// Steps, energy, exercise and distance
    Performance,
    /// Oxygen saturation, body composition, respiratory rate
    Vitality,
}

const HEART_TYPES: &[HealthDataType] = &[
    HealthDataType::Quantity(QuantityMetric::RestingHeartRate),
    HealthDataType::Quantity(QuantityMetric::HeartRateVariability),
    HealthDataType::Quantity(QuantityMetric::WalkingHeartRate),
    HealthDataType::Quantity(QuantityMetric::Vo2Max),
];

const SLEEP_TYPES: &[HealthDataType] = &[HealthDataType::Event(EventKind::SleepAnalysis)];

const MINDFULNESS_TYPES: &[HealthDataType] = &[HealthDataType::Event(EventKind::MindfulSession)];

const PERFORMANCE_TYPES: &[HealthDataType] = &[
    HealthDataType::Quantity(QuantityMetric::StepCount),
    HealthDataType::Quantity(QuantityMetric::ActiveEnergy),
    HealthDataType::Quantity(QuantityMetric::ExerciseMinutes),
    HealthDataType::Quantity(QuantityMetric::WalkingRunningDistance),
];

const VITALITY_TYPES: &[HealthDataType] = &[
    HealthDataType::Quantity(QuantityMetric::OxygenSaturation),
    HealthDataType::Quantity(QuantityMetric::BodyMassIndex),
    HealthDataType::Quantity(QuantityMetric::BodyMass),
    HealthDataType::Quantity(QuantityMetric::RespiratoryRate),
];

impl HealthCategory {
    /// Every category, in home-screen order
    pub const ALL: [Self; 5] = [
        Self::Heart,
        Self::Sleep,
        Self::Mindfulness,
        Self::Performance,
        Self::Vitality,
    ];

    /// Stable identifier used in storage keys and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heart => "heart",
            Self::Sleep => "sleep",
            Self::Mindfulness => "mindfulness",
            Self::Performance => "performance",
            Self::Vitality => "vitality",
        }
    }

    /// Title-cased name for tiles and placeholder text
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Heart => "Heart",
            Self::Sleep => "Sleep",
            Self::Mindfulness => "Mindfulness",
            Self::Performance => "Performance",
            Self::Vitality => "Vitality",
        }
    }

    /// Noun phrase used inside generated sentences ("your heart health is ...")
    #[must_use]
    pub const fn subject(&self) -> &'static str {
        match self {
            Self::Heart => "heart health",
            Self::Sleep => "sleep",
            Self::Mindfulness => "mindfulness practice",
            Self::Performance => "activity level",
            Self::Vitality => "vitality",
        }
    }

    /// Health data types that must be readable for this category
    #[must_use]
    pub const fn read_types(&self) -> &'static [HealthDataType] {
        match self {
            Self::Heart => HEART_TYPES,
            Self::Sleep => SLEEP_TYPES,
            Self::Mindfulness => MINDFULNESS_TYPES,
            Self::Performance => PERFORMANCE_TYPES,
            Self::Vitality => VITALITY_TYPES,
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heart" => Ok(Self::Heart),
            "sleep" => Ok(Self::Sleep),
            "mindfulness" => Ok(Self::Mindfulness),
            "performance" => Ok(Self::Performance),
            "vitality" => Ok(Self::Vitality),
            other => Err(AppError::invalid_input(format!(
                "Unknown health category: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for category in HealthCategory::ALL {
            assert_eq!(category.as_str().parse::<HealthCategory>().ok(), Some(category));
        }
        assert!("cardio".parse::<HealthCategory>().is_err());
    }

    #[test]
    fn test_every_category_reads_something() {
        for category in HealthCategory::ALL {
            assert!(!category.read_types().is_empty(), "{category}");
        }
    }
}
