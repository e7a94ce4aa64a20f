// ABOUTME: Significance thresholds and healthy ranges used by the comparison engine
// ABOUTME: Relative thresholds are percentages, band limits are absolute values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

// Heart
/// Resting heart rate change considered significant (percent, lower is better)
pub const RESTING_HEART_RATE_PCT: f64 = 3.0;
/// Heart rate variability change considered significant (percent, higher is better)
pub const HEART_RATE_VARIABILITY_PCT: f64 = 5.0;
/// Walking heart rate change considered significant (percent, lower is better)
pub const WALKING_HEART_RATE_PCT: f64 = 3.0;
/// Cardio fitness (VO2 max) change considered significant (percent, higher is better)
pub const VO2_MAX_PCT: f64 = 3.0;

// Sleep
/// Total sleep change considered significant (percent)
pub const TOTAL_SLEEP_PCT: f64 = 5.0;
/// Deep and REM sleep change considered significant (percent)
pub const SLEEP_STAGE_PCT: f64 = 10.0;
/// Awake time change considered significant (percent, lower is better)
pub const AWAKE_TIME_PCT: f64 = 10.0;

// Mindfulness
/// Any mindfulness metric change considered significant (percent)
pub const MINDFULNESS_PCT: f64 = 10.0;

// Performance
/// Any activity metric change considered significant (percent)
pub const PERFORMANCE_PCT: f64 = 5.0;

// Vitality
/// Oxygen saturation at or above this value is healthy (percent)
pub const OXYGEN_SATURATION_HEALTHY: f64 = 95.0;
/// Oxygen saturation below this value is concerning (percent)
pub const OXYGEN_SATURATION_LOW: f64 = 90.0;
/// Absolute oxygen saturation change considered significant (percentage points)
pub const OXYGEN_SATURATION_POINTS: f64 = 1.0;
/// Lower bound of the healthy body mass index band
pub const BMI_HEALTHY_MIN: f64 = 18.5;
/// Upper bound of the healthy body mass index band
pub const BMI_HEALTHY_MAX: f64 = 24.9;
/// Absolute BMI movement toward or away from the band considered significant
pub const BMI_POINTS: f64 = 0.5;
/// Body mass change considered significant (percent)
pub const BODY_MASS_PCT: f64 = 2.0;
/// Lower bound of the normal resting respiratory rate (breaths per minute)
pub const RESPIRATORY_RATE_MIN: f64 = 12.0;
/// Upper bound of the normal resting respiratory rate (breaths per minute)
pub const RESPIRATORY_RATE_MAX: f64 = 20.0;
