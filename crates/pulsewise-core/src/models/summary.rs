// ABOUTME: Category tile summaries and per-timespan detail summaries
// ABOUTME: Includes canonical no-data and missing-data placeholders and staleness checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::category::HealthCategory;
use super::timespan::Timespan;
use super::trend::{MetricTrend, TrendDirection};
use crate::constants::cache::CATEGORY_STALE_AFTER_HOURS;
use crate::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State of a category tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    /// Nothing could be fetched for the category
    NoData,
    /// Some data exists but the category's critical metric is absent
    MissingCritical,
    /// A summary was generated
    Ready,
}

impl SummaryStatus {
    /// Stable identifier used in storage rows
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::MissingCritical => "missing_critical",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_data" => Ok(Self::NoData),
            "missing_critical" => Ok(Self::MissingCritical),
            "ready" => Ok(Self::Ready),
            other => Err(AppError::invalid_input(format!(
                "Unknown summary status: {other}"
            ))),
        }
    }
}

/// Summary shown on a category's home-screen tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category the tile belongs to
    pub category: HealthCategory,
    /// Tile state
    pub status: SummaryStatus,
    /// One-line text
    pub short_text: String,
    /// Paragraph text
    pub long_text: String,
    /// When the summary was produced
    pub last_updated: DateTime<Utc>,
}

impl CategorySummary {
    /// Placeholder for a category with no fetchable data
    #[must_use]
    pub fn no_data(category: HealthCategory) -> Self {
        let name = category.display_name();
        Self {
            category,
            status: SummaryStatus::NoData,
            short_text: format!("No {name} data"),
            long_text: format!(
                "No {name} data was found for this period. Check that your devices are syncing {name} data to Health."
            ),
            last_updated: Utc::now(),
        }
    }

    /// Placeholder for a category whose critical metric is absent
    #[must_use]
    pub fn missing_critical(category: HealthCategory) -> Self {
        let name = category.display_name();
        Self {
            category,
            status: SummaryStatus::MissingCritical,
            short_text: format!("Missing {name} data"),
            long_text: format!(
                "Some {name} data is available, but key measurements are missing, so a {name} summary can't be generated yet."
            ),
            last_updated: Utc::now(),
        }
    }

    /// Tile summary built from a generated timespan summary
    #[must_use]
    pub fn ready(category: HealthCategory, summary: &TimespanSummary) -> Self {
        Self {
            category,
            status: SummaryStatus::Ready,
            short_text: summary.short_text.clone(),
            long_text: summary.long_text.clone(),
            last_updated: summary.generated_at,
        }
    }

    /// Older than the fixed 24 hour tile window
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.last_updated > Duration::hours(CATEGORY_STALE_AFTER_HOURS)
    }
}

/// Summary for one (category, timespan) detail card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimespanSummary {
    /// Granularity of the comparison
    pub timespan: Timespan,
    /// Aggregate trend across metrics
    pub trend: TrendDirection,
    /// One-line text
    pub short_text: String,
    /// Paragraph text
    pub long_text: String,
    /// Compact metric listing
    pub metrics_display: String,
    /// Per-metric trends in display order
    pub metric_trends: Vec<MetricTrend>,
    /// When the summary was produced
    pub generated_at: DateTime<Utc>,
}

impl TimespanSummary {
    /// Canonical summary for a timespan without current data
    #[must_use]
    pub fn no_data(timespan: Timespan) -> Self {
        let period = timespan.period_noun();
        Self {
            timespan,
            trend: TrendDirection::Stable,
            short_text: "No data available".to_owned(),
            long_text: format!(
                "There is no data for the last {period} yet. Summaries appear once your devices sync new measurements."
            ),
            metrics_display: String::new(),
            metric_trends: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Whether this is the canonical no-data summary
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.metric_trends.is_empty() && self.metrics_display.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_distinct_and_name_the_category() {
        let no_data = CategorySummary::no_data(HealthCategory::Sleep);
        let missing = CategorySummary::missing_critical(HealthCategory::Sleep);

        assert_eq!(no_data.status, SummaryStatus::NoData);
        assert_eq!(missing.status, SummaryStatus::MissingCritical);
        assert_ne!(no_data.short_text, missing.short_text);
        assert_ne!(no_data.long_text, missing.long_text);
        assert!(no_data.short_text.contains("Sleep"));
        assert!(missing.short_text.contains("Sleep"));
    }

    #[test]
    fn test_category_staleness_is_fixed_at_24_hours() {
        let now = Utc::now();
        let mut summary = CategorySummary::no_data(HealthCategory::Heart);

        summary.last_updated = now - Duration::hours(23);
        assert!(!summary.is_stale(now));

        summary.last_updated = now - Duration::hours(25);
        assert!(summary.is_stale(now));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            SummaryStatus::NoData,
            SummaryStatus::MissingCritical,
            SummaryStatus::Ready,
        ] {
            assert_eq!(status.as_str().parse::<SummaryStatus>().ok(), Some(status));
        }
    }
}
