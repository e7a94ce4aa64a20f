// ABOUTME: Comparison granularities (daily, weekly, monthly) and their period windows
// ABOUTME: Each timespan defines a current and an adjacent previous period plus a staleness window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::health_data::DateInterval;
use crate::constants::cache::{
    DAILY_STALE_AFTER_HOURS, MONTHLY_STALE_AFTER_HOURS, WEEKLY_STALE_AFTER_HOURS,
};
use crate::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    /// Last day against the day before
    Daily,
    /// Last week against the week before
    Weekly,
    /// Last month against the month before
    Monthly,
}

/// Current and previous windows for one comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPeriods {
    /// Window ending now
    pub current: DateInterval,
    /// Window immediately before `current`, same length
    pub previous: DateInterval,
}

impl Timespan {
    /// Every timespan, shortest first
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Stable identifier used in storage keys and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Length of one comparison period
    #[must_use]
    pub fn period_length(&self) -> Duration {
        match self {
            Self::Daily => Duration::days(1),
            Self::Weekly => Duration::days(7),
            Self::Monthly => Duration::days(30),
        }
    }

    /// Default age after which a cached summary for this timespan is stale
    #[must_use]
    pub fn stale_after(&self) -> Duration {
        match self {
            Self::Daily => Duration::hours(DAILY_STALE_AFTER_HOURS),
            Self::Weekly => Duration::hours(WEEKLY_STALE_AFTER_HOURS),
            Self::Monthly => Duration::hours(MONTHLY_STALE_AFTER_HOURS),
        }
    }

    /// Trailing current period ending at `now` and the adjacent previous period
    #[must_use]
    pub fn periods(&self, now: DateTime<Utc>) -> ComparisonPeriods {
        let length = self.period_length();
        let current = DateInterval::ending_at(now, length);
        let previous = DateInterval::ending_at(current.start, length);
        ComparisonPeriods { current, previous }
    }

    /// Phrase placed in prompts ("this week compared to the previous week")
    #[must_use]
    pub const fn framing(&self) -> &'static str {
        match self {
            Self::Daily => "the last 24 hours compared to the 24 hours before",
            Self::Weekly => "the last 7 days compared to the 7 days before",
            Self::Monthly => "the last 30 days compared to the 30 days before",
        }
    }

    /// Short label for period references in text ("day", "week", "month")
    #[must_use]
    pub const fn period_noun(&self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timespan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(AppError::invalid_input(format!("Unknown timespan: {other}"))),
        }
    }
}
