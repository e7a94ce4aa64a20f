// ABOUTME: Per-metric delta between two periods with unit-aware formatting
// ABOUTME: Produces the value strings, prompt lines and fallback sentences for one metric
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use crate::change::{classify_relative, percent_change, Polarity};
use pulsewise_core::models::{MetricTrend, TrendDirection};
use serde::{Deserialize, Serialize};

/// Unit a metric is displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Beats per minute
    Bpm,
    /// Milliseconds
    Milliseconds,
    /// mL/kg/min
    Vo2,
    /// Hours
    Hours,
    /// Minutes
    Minutes,
    /// Steps
    Steps,
    /// Sessions
    Sessions,
    /// Kilocalories
    Kilocalories,
    /// Kilometers
    Kilometers,
    /// Percent
    Percent,
    /// Unitless index (BMI)
    Index,
    /// Kilograms
    Kilograms,
    /// Breaths per minute
    BreathsPerMinute,
}

impl Unit {
    const fn decimals(self) -> usize {
        match self {
            Self::Bpm
            | Self::Milliseconds
            | Self::Minutes
            | Self::Steps
            | Self::Sessions
            | Self::Kilocalories => 0,
            Self::Vo2
            | Self::Hours
            | Self::Kilometers
            | Self::Percent
            | Self::Index
            | Self::Kilograms
            | Self::BreathsPerMinute => 1,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Bpm => " bpm",
            Self::Milliseconds => " ms",
            Self::Vo2 => " mL/kg/min",
            Self::Hours => " h",
            Self::Minutes => " min",
            Self::Steps => " steps",
            Self::Sessions => " sessions",
            Self::Kilocalories => " kcal",
            Self::Kilometers => " km",
            Self::Percent => "%",
            Self::Index => "",
            Self::Kilograms => " kg",
            Self::BreathsPerMinute => " breaths/min",
        }
    }

    /// Render a value with this unit's precision and suffix
    #[must_use]
    pub fn format(self, value: f64) -> String {
        let number = if self.decimals() == 0 {
            group_thousands(value.round())
        } else {
            format!("{value:.prec$}", prec = self.decimals())
        };
        format!("{number}{}", self.suffix())
    }
}

fn group_thousands(value: f64) -> String {
    let raw = format!("{value:.0}");
    let (sign, digits) = raw
        .strip_prefix('-')
        .map_or(("", raw.as_str()), |rest| ("-", rest));
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}")
}

/// How a metric moved between periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// Relative change in percent
    Percent(f64),
    /// Absolute change in the metric's unit
    Absolute(f64),
    /// Previous value missing or not positive
    Unknown,
}

/// One metric compared across two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// Display name
    pub name: &'static str,
    /// Display unit
    pub unit: Unit,
    /// Value in the previous period
    pub previous: Option<f64>,
    /// Value in the current period
    pub current: f64,
    /// Computed change
    pub change: Change,
    /// Health-judged direction
    pub direction: TrendDirection,
}

impl MetricDelta {
    /// Relative comparison against a percentage threshold
    ///
    /// Returns `None` when the current period has no value for the metric.
    #[must_use]
    pub fn relative(
        name: &'static str,
        unit: Unit,
        previous: Option<f64>,
        current: Option<f64>,
        threshold_pct: f64,
        polarity: Polarity,
    ) -> Option<Self> {
        let current_value = current?;
        let (change, direction) = percent_change(previous, current).map_or(
            (Change::Unknown, TrendDirection::Stable),
            |pct| {
                (
                    Change::Percent(pct),
                    classify_relative(pct, threshold_pct, polarity),
                )
            },
        );
        Some(Self {
            name,
            unit,
            previous,
            current: current_value,
            change,
            direction,
        })
    }

    /// Comparison whose direction was decided by the caller (banded metrics)
    #[must_use]
    pub const fn judged(
        name: &'static str,
        unit: Unit,
        previous: Option<f64>,
        current: f64,
        change: Change,
        direction: TrendDirection,
    ) -> Self {
        Self {
            name,
            unit,
            previous,
            current,
            change,
            direction,
        }
    }

    /// Parenthesized change, empty when unknown ("(-10.8%)")
    #[must_use]
    pub fn change_label(&self) -> String {
        match self.change {
            Change::Percent(pct) => format!("({pct:+.1}%)"),
            Change::Absolute(diff) => {
                let prec = self.unit.decimals().max(1);
                format!("({diff:+.prec$})")
            }
            Change::Unknown => String::new(),
        }
    }

    /// Current value with change ("58 bpm (-10.8%)")
    #[must_use]
    pub fn formatted_value(&self) -> String {
        let value = self.unit.format(self.current);
        let label = self.change_label();
        if label.is_empty() {
            value
        } else {
            format!("{value} {label}")
        }
    }

    /// Entry for the metric trend list
    #[must_use]
    pub fn metric_trend(&self) -> MetricTrend {
        MetricTrend::new(self.name, self.formatted_value(), self.direction)
    }

    /// Line describing both periods for the language model
    #[must_use]
    pub fn prompt_line(&self) -> String {
        let previous = self
            .previous
            .map_or_else(|| "no data".to_owned(), |value| self.unit.format(value));
        let current = self.unit.format(self.current);
        let change = match self.change {
            Change::Percent(pct) => format!("{pct:+.1}%"),
            Change::Absolute(diff) => format!("{diff:+.1} absolute"),
            Change::Unknown => "change unknown".to_owned(),
        };
        format!(
            "- {}: {previous} -> {current} ({change}, {})",
            self.name, self.direction
        )
    }

    /// Plain sentence used by the deterministic summaries
    #[must_use]
    pub fn sentence(&self) -> String {
        if matches!(self.change, Change::Unknown) {
            return format!("{} was {}.", self.name, self.unit.format(self.current));
        }
        let verb = match self.direction {
            TrendDirection::Improving => "improved to",
            TrendDirection::Stable => "held steady at",
            TrendDirection::Declining => "worsened to",
        };
        format!("{} {verb} {}.", self.name, self.formatted_value())
    }
}
