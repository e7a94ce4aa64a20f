// ABOUTME: Vocabulary spoken with the platform health store
// ABOUTME: Quantity metrics, event kinds, aggregation modes, intervals and event samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar metrics the health store can aggregate over an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityMetric {
    /// Resting heart rate (bpm)
    RestingHeartRate,
    /// Heart rate variability SDNN (ms)
    HeartRateVariability,
    /// Walking heart rate average (bpm)
    WalkingHeartRate,
    /// Cardio fitness estimate (mL/kg/min)
    Vo2Max,
    /// Steps
    StepCount,
    /// Active energy burned (kcal)
    ActiveEnergy,
    /// Exercise minutes
    ExerciseMinutes,
    /// Walking and running distance (km)
    WalkingRunningDistance,
    /// Blood oxygen saturation (percent or fraction, source dependent)
    OxygenSaturation,
    /// Body mass index
    BodyMassIndex,
    /// Body mass (kg)
    BodyMass,
    /// Respiratory rate (breaths per minute)
    RespiratoryRate,
}

impl QuantityMetric {
    /// Stable identifier used in logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RestingHeartRate => "resting_heart_rate",
            Self::HeartRateVariability => "heart_rate_variability",
            Self::WalkingHeartRate => "walking_heart_rate",
            Self::Vo2Max => "vo2_max",
            Self::StepCount => "step_count",
            Self::ActiveEnergy => "active_energy",
            Self::ExerciseMinutes => "exercise_minutes",
            Self::WalkingRunningDistance => "walking_running_distance",
            Self::OxygenSaturation => "oxygen_saturation",
            Self::BodyMassIndex => "body_mass_index",
            Self::BodyMass => "body_mass",
            Self::RespiratoryRate => "respiratory_rate",
        }
    }

    /// How samples of this metric combine over an interval
    #[must_use]
    pub const fn aggregation(&self) -> Aggregation {
        match self {
            Self::StepCount
            | Self::ActiveEnergy
            | Self::ExerciseMinutes
            | Self::WalkingRunningDistance => Aggregation::Sum,
            Self::RestingHeartRate
            | Self::HeartRateVariability
            | Self::WalkingHeartRate
            | Self::Vo2Max
            | Self::OxygenSaturation
            | Self::BodyMassIndex
            | Self::BodyMass
            | Self::RespiratoryRate => Aggregation::Average,
        }
    }
}

impl fmt::Display for QuantityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete event samples (start, end, value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Sleep analysis samples, value is a [`SleepStage`] code
    SleepAnalysis,
    /// Mindful sessions, value unused
    MindfulSession,
}

/// Any type whose read access may need to be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum HealthDataType {
    /// Aggregatable scalar metric
    Quantity(QuantityMetric),
    /// Event samples
    Event(EventKind),
}

/// Aggregation requested for a quantity query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Mean of discrete samples
    Average,
    /// Cumulative total
    Sum,
}

/// Half-open date interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

impl DateInterval {
    /// Create an interval; `start` must not be after `end`
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Interval of `length` ending at `end`
    #[must_use]
    pub fn ending_at(end: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: end - length,
            end,
        }
    }

    /// Length of the interval
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` falls inside the interval
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Portion of `[start, end)` overlapping this interval
    #[must_use]
    pub fn overlap(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let lower = start.max(self.start);
        let upper = end.min(self.end);
        if upper > lower {
            upper - lower
        } else {
            Duration::zero()
        }
    }
}

/// One event sample returned by the health store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthEvent {
    /// Sample start
    pub start: DateTime<Utc>,
    /// Sample end
    pub end: DateTime<Utc>,
    /// Category value (meaning depends on the event kind)
    pub value: i64,
}

impl HealthEvent {
    /// Sample length, zero for malformed samples
    #[must_use]
    pub fn duration(&self) -> Duration {
        if self.end > self.start {
            self.end - self.start
        } else {
            Duration::zero()
        }
    }
}

/// Sleep analysis stage codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    /// In bed, not necessarily asleep
    InBed,
    /// Asleep, stage unknown
    AsleepUnspecified,
    /// Awake during the night
    Awake,
    /// Core (light) sleep
    Core,
    /// Deep sleep
    Deep,
    /// REM sleep
    Rem,
}

impl SleepStage {
    /// Decode a raw sleep analysis value
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::InBed),
            1 => Some(Self::AsleepUnspecified),
            2 => Some(Self::Awake),
            3 => Some(Self::Core),
            4 => Some(Self::Deep),
            5 => Some(Self::Rem),
            _ => None,
        }
    }

    /// Raw value used by the health store
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::InBed => 0,
            Self::AsleepUnspecified => 1,
            Self::Awake => 2,
            Self::Core => 3,
            Self::Deep => 4,
            Self::Rem => 5,
        }
    }

    /// Whether the stage counts toward total sleep
    #[must_use]
    pub const fn is_asleep(&self) -> bool {
        matches!(
            self,
            Self::AsleepUnspecified | Self::Core | Self::Deep | Self::Rem
        )
    }
}
