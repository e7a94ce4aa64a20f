// ABOUTME: Per-category metric records produced by one fetch over one date interval
// ABOUTME: Every field is optional because the health store may hold no samples for it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::category::HealthCategory;
use serde::{Deserialize, Serialize};

/// Heart metrics for one interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartData {
    /// Average resting heart rate (bpm)
    pub resting_heart_rate: Option<f64>,
    /// Average heart rate variability SDNN (ms)
    pub heart_rate_variability: Option<f64>,
    /// Average walking heart rate (bpm)
    pub walking_heart_rate: Option<f64>,
    /// Average cardio fitness estimate (mL/kg/min)
    pub vo2_max: Option<f64>,
}

impl HeartData {
    /// Whether at least one field is present
    #[must_use]
    pub const fn has_any_data(&self) -> bool {
        self.resting_heart_rate.is_some()
            || self.heart_rate_variability.is_some()
            || self.walking_heart_rate.is_some()
            || self.vo2_max.is_some()
    }
}

/// Sleep metrics aggregated from sleep analysis events
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepData {
    /// Total time asleep (hours)
    pub total_sleep_hours: Option<f64>,
    /// Time in deep sleep (hours)
    pub deep_sleep_hours: Option<f64>,
    /// Time in REM sleep (hours)
    pub rem_sleep_hours: Option<f64>,
    /// Time awake between sleep samples (minutes)
    pub awake_minutes: Option<f64>,
}

impl SleepData {
    /// Whether at least one field is present
    #[must_use]
    pub const fn has_any_data(&self) -> bool {
        self.total_sleep_hours.is_some()
            || self.deep_sleep_hours.is_some()
            || self.rem_sleep_hours.is_some()
            || self.awake_minutes.is_some()
    }
}

/// Mindfulness metrics aggregated from mindful session events
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessData {
    /// Total mindful minutes
    pub mindful_minutes: Option<f64>,
    /// Number of sessions
    pub session_count: Option<u32>,
    /// Mean session length (minutes)
    pub average_session_minutes: Option<f64>,
}

impl MindfulnessData {
    /// Whether at least one field is present
    #[must_use]
    pub const fn has_any_data(&self) -> bool {
        self.mindful_minutes.is_some()
            || self.session_count.is_some()
            || self.average_session_minutes.is_some()
    }
}

/// Activity metrics summed over one interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    /// Steps taken
    pub step_count: Option<u64>,
    /// Active energy burned (kcal)
    pub active_energy: Option<f64>,
    /// Exercise minutes
    pub exercise_minutes: Option<f64>,
    /// Walking and running distance (km)
    pub distance_km: Option<f64>,
}

impl PerformanceData {
    /// Whether at least one field is present
    #[must_use]
    pub const fn has_any_data(&self) -> bool {
        self.step_count.is_some()
            || self.active_energy.is_some()
            || self.exercise_minutes.is_some()
            || self.distance_km.is_some()
    }
}

/// Vital sign and body composition averages for one interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalityData {
    /// Blood oxygen saturation (percent)
    pub oxygen_saturation: Option<f64>,
    /// Body mass index
    pub body_mass_index: Option<f64>,
    /// Body mass (kg)
    pub body_mass: Option<f64>,
    /// Respiratory rate (breaths per minute)
    pub respiratory_rate: Option<f64>,
}

impl VitalityData {
    /// Whether at least one field is present
    #[must_use]
    pub const fn has_any_data(&self) -> bool {
        self.oxygen_saturation.is_some()
            || self.body_mass_index.is_some()
            || self.body_mass.is_some()
            || self.respiratory_rate.is_some()
    }
}

/// A category's data for one interval
///
/// Constructed fresh for every fetch and never mutated afterwards. Records are
/// not persisted; only the summaries derived from them are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "data", rename_all = "lowercase")]
pub enum MetricRecord {
    /// Heart metrics
    Heart(HeartData),
    /// Sleep metrics
    Sleep(SleepData),
    /// Mindfulness metrics
    Mindfulness(MindfulnessData),
    /// Activity metrics
    Performance(PerformanceData),
    /// Vital sign metrics
    Vitality(VitalityData),
}

impl MetricRecord {
    /// Record with every field absent
    #[must_use]
    pub fn empty(category: HealthCategory) -> Self {
        match category {
            HealthCategory::Heart => Self::Heart(HeartData::default()),
            HealthCategory::Sleep => Self::Sleep(SleepData::default()),
            HealthCategory::Mindfulness => Self::Mindfulness(MindfulnessData::default()),
            HealthCategory::Performance => Self::Performance(PerformanceData::default()),
            HealthCategory::Vitality => Self::Vitality(VitalityData::default()),
        }
    }

    /// Category this record belongs to
    #[must_use]
    pub const fn category(&self) -> HealthCategory {
        match self {
            Self::Heart(_) => HealthCategory::Heart,
            Self::Sleep(_) => HealthCategory::Sleep,
            Self::Mindfulness(_) => HealthCategory::Mindfulness,
            Self::Performance(_) => HealthCategory::Performance,
            Self::Vitality(_) => HealthCategory::Vitality,
        }
    }

    /// Whether at least one field is present
    #[must_use]
    pub const fn has_any_data(&self) -> bool {
        match self {
            Self::Heart(data) => data.has_any_data(),
            Self::Sleep(data) => data.has_any_data(),
            Self::Mindfulness(data) => data.has_any_data(),
            Self::Performance(data) => data.has_any_data(),
            Self::Vitality(data) => data.has_any_data(),
        }
    }

    /// Name of the metric without which the category cannot be summarized
    #[must_use]
    pub const fn critical_metric(&self) -> Option<&'static str> {
        match self {
            Self::Heart(_) => Some("resting heart rate"),
            Self::Sleep(_) => Some("total sleep"),
            Self::Performance(_) => Some("step count"),
            Self::Mindfulness(_) | Self::Vitality(_) => None,
        }
    }

    /// Record holds data, but not for its critical metric
    #[must_use]
    pub const fn missing_critical(&self) -> bool {
        let critical_present = match self {
            Self::Heart(data) => data.resting_heart_rate.is_some(),
            Self::Sleep(data) => data.total_sleep_hours.is_some(),
            Self::Performance(data) => data.step_count.is_some(),
            Self::Mindfulness(_) | Self::Vitality(_) => true,
        };
        self.has_any_data() && !critical_present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_records_have_no_data() {
        for category in HealthCategory::ALL {
            let record = MetricRecord::empty(category);
            assert_eq!(record.category(), category);
            assert!(!record.has_any_data());
            assert!(!record.missing_critical());
        }
    }

    #[test]
    fn test_missing_critical_metric() {
        let record = MetricRecord::Heart(HeartData {
            heart_rate_variability: Some(42.0),
            ..HeartData::default()
        });
        assert!(record.has_any_data());
        assert!(record.missing_critical());

        let complete = MetricRecord::Heart(HeartData {
            resting_heart_rate: Some(60.0),
            ..HeartData::default()
        });
        assert!(!complete.missing_critical());
    }
}
