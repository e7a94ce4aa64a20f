// ABOUTME: Change math shared by every category comparison
// ABOUTME: Percentage change, polarity-aware threshold classification, majority-vote aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use pulsewise_core::models::TrendDirection;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which way a metric should move to be considered healthier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Increases are improvements (steps, HRV)
    HigherIsBetter,
    /// Decreases are improvements (resting heart rate)
    LowerIsBetter,
}

/// Percentage change from `previous` to `current`
///
/// Only defined when both values are present and `previous` is positive.
/// An undefined change is unknown, not zero.
#[must_use]
pub fn percent_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (previous, current) {
        (Some(prev), Some(curr)) if prev > 0.0 => Some((curr - prev) / prev * 100.0),
        _ => None,
    }
}

/// Classify a percentage change against a significance threshold
///
/// Changes smaller than `threshold_pct` in magnitude are stable.
#[must_use]
pub fn classify_relative(change_pct: f64, threshold_pct: f64, polarity: Polarity) -> TrendDirection {
    if change_pct.abs() < threshold_pct {
        return TrendDirection::Stable;
    }
    let increased = change_pct > 0.0;
    match (polarity, increased) {
        (Polarity::HigherIsBetter, true) | (Polarity::LowerIsBetter, false) => {
            TrendDirection::Improving
        }
        (Polarity::HigherIsBetter, false) | (Polarity::LowerIsBetter, true) => {
            TrendDirection::Declining
        }
    }
}

/// Majority vote of improving against declining; ties and empty input are stable
#[must_use]
pub fn aggregate_trend<I>(directions: I) -> TrendDirection
where
    I: IntoIterator<Item = TrendDirection>,
{
    let (improving, declining) =
        directions
            .into_iter()
            .fold((0_usize, 0_usize), |(up, down), direction| match direction {
                TrendDirection::Improving => (up + 1, down),
                TrendDirection::Declining => (up, down + 1),
                TrendDirection::Stable => (up, down),
            });

    match improving.cmp(&declining) {
        Ordering::Greater => TrendDirection::Improving,
        Ordering::Less => TrendDirection::Declining,
        Ordering::Equal => TrendDirection::Stable,
    }
}
