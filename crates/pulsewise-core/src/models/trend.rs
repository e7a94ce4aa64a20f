// ABOUTME: Trend direction and per-metric trend entries shown in detail views
// ABOUTME: Metric trends are persisted alongside summaries so they must serialize losslessly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of change between two periods, judged by health impact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Change in the healthy direction beyond the significance threshold
    Improving,
    /// No significant change, or change cannot be determined
    #[default]
    Stable,
    /// Change in the unhealthy direction beyond the significance threshold
    Declining,
}

impl TrendDirection {
    /// Stable identifier used in storage rows
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "improving" => Ok(Self::Improving),
            "stable" => Ok(Self::Stable),
            "declining" => Ok(Self::Declining),
            other => Err(AppError::invalid_input(format!(
                "Unknown trend direction: {other}"
            ))),
        }
    }
}

/// One metric's trend within a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTrend {
    /// Metric display name ("Resting Heart Rate")
    pub name: String,
    /// Formatted current value with change ("58 bpm (-10.8%)")
    pub value: String,
    /// Health-judged direction
    pub direction: TrendDirection,
}

impl MetricTrend {
    /// Create a metric trend entry
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, direction: TrendDirection) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            direction,
        }
    }
}
