// ABOUTME: Summary cache with pluggable persistent stores keyed by (category, timespan)
// ABOUTME: Serves cached summaries of any age and decides staleness at read time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

/// Store factory selecting a backend from configuration
pub mod factory;
/// In-memory LRU store
pub mod memory;
/// `SQLite` store
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::config::StalenessConfig;
use crate::errors::AppResult;
use crate::models::{
    CategorySummary, HealthCategory, MetricTrend, SummaryStatus, Timespan, TimespanSummary,
    TrendDirection,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub use factory::SummaryStoreBackend;
pub use memory::InMemorySummaryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSummaryStore;

/// Composite cache key; `timespan` is `None` for the category tile summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    /// Health category
    pub category: HealthCategory,
    /// Detail timespan, absent for the tile summary
    pub timespan: Option<Timespan>,
}

impl SummaryKey {
    /// Key of a category's tile summary
    #[must_use]
    pub const fn for_category(category: HealthCategory) -> Self {
        Self {
            category,
            timespan: None,
        }
    }

    /// Key of a category's summary for one timespan
    #[must_use]
    pub const fn for_timespan(category: HealthCategory, timespan: Timespan) -> Self {
        Self {
            category,
            timespan: Some(timespan),
        }
    }

    /// Column value for the timespan part; tile rows use `"category"`
    #[must_use]
    pub const fn timespan_column(&self) -> &'static str {
        match self.timespan {
            Some(timespan) => timespan.as_str(),
            None => "category",
        }
    }
}

impl fmt::Display for SummaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "summary:{}:{}", self.category, self.timespan_column())
    }
}

/// Persisted row for either kind of summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Tile state
    pub status: SummaryStatus,
    /// One-line text
    pub short_text: String,
    /// Paragraph text
    pub long_text: String,
    /// Aggregate trend
    pub trend: TrendDirection,
    /// Compact metric listing
    pub metrics_display: String,
    /// Per-metric trends
    pub metric_trends: Vec<MetricTrend>,
    /// When the summary was produced
    pub last_updated: DateTime<Utc>,
}

impl SummaryRecord {
    /// Rebuild a tile summary
    #[must_use]
    pub fn into_category_summary(self, category: HealthCategory) -> CategorySummary {
        CategorySummary {
            category,
            status: self.status,
            short_text: self.short_text,
            long_text: self.long_text,
            last_updated: self.last_updated,
        }
    }

    /// Rebuild a timespan summary
    #[must_use]
    pub fn into_timespan_summary(self, timespan: Timespan) -> TimespanSummary {
        TimespanSummary {
            timespan,
            trend: self.trend,
            short_text: self.short_text,
            long_text: self.long_text,
            metrics_display: self.metrics_display,
            metric_trends: self.metric_trends,
            generated_at: self.last_updated,
        }
    }
}

impl From<&CategorySummary> for SummaryRecord {
    fn from(summary: &CategorySummary) -> Self {
        Self {
            status: summary.status,
            short_text: summary.short_text.clone(),
            long_text: summary.long_text.clone(),
            trend: TrendDirection::Stable,
            metrics_display: String::new(),
            metric_trends: Vec::new(),
            last_updated: summary.last_updated,
        }
    }
}

impl From<&TimespanSummary> for SummaryRecord {
    fn from(summary: &TimespanSummary) -> Self {
        Self {
            status: if summary.is_no_data() {
                SummaryStatus::NoData
            } else {
                SummaryStatus::Ready
            },
            short_text: summary.short_text.clone(),
            long_text: summary.long_text.clone(),
            trend: summary.trend,
            metrics_display: summary.metrics_display.clone(),
            metric_trends: summary.metric_trends.clone(),
            last_updated: summary.generated_at,
        }
    }
}

/// Persistent key-value storage for summary rows
///
/// Each write touches exactly one key and must be atomic: a reader sees
/// either the previous row or the complete new one.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Load the row stored under `key`
    async fn load(&self, key: &SummaryKey) -> AppResult<Option<SummaryRecord>>;

    /// Insert or replace the row stored under `key`
    async fn upsert(&self, key: &SummaryKey, record: &SummaryRecord) -> AppResult<()>;

    /// Remove the row stored under `key`
    async fn remove(&self, key: &SummaryKey) -> AppResult<()>;

    /// Remove every row
    async fn clear(&self) -> AppResult<()>;

    /// Verify the backend is usable
    async fn health_check(&self) -> AppResult<()>;
}

/// Read/write facade over a [`SummaryStore`] with staleness rules
///
/// # Examples
///
/// ```rust,no_run
/// use pulsewise::cache::{InMemorySummaryStore, SummaryCache};
/// use pulsewise::config::StalenessConfig;
/// use pulsewise::models::{HealthCategory, Timespan, TimespanSummary};
/// use std::sync::Arc;
/// # async fn example() -> Result<(), pulsewise::errors::AppError> {
///
/// let cache = SummaryCache::new(
///     Arc::new(InMemorySummaryStore::new(64)),
///     StalenessConfig::default(),
/// );
///
/// let summary = TimespanSummary::no_data(Timespan::Weekly);
/// cache.save_timespan_summary(&summary, HealthCategory::Sleep).await?;
///
/// assert!(!cache.needs_refresh(HealthCategory::Sleep, Timespan::Weekly).await);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SummaryCache {
    store: Arc<dyn SummaryStore>,
    staleness: StalenessConfig,
}

impl SummaryCache {
    /// Create a cache over `store`
    #[must_use]
    pub fn new(store: Arc<dyn SummaryStore>, staleness: StalenessConfig) -> Self {
        Self { store, staleness }
    }

    /// Staleness windows in effect
    #[must_use]
    pub const fn staleness(&self) -> &StalenessConfig {
        &self.staleness
    }

    /// Cached tile summary for `category`
    ///
    /// # Errors
    ///
    /// Returns an error if the store read or row decoding fails
    pub async fn get_summary(&self, category: HealthCategory) -> AppResult<Option<CategorySummary>> {
        let record = self.store.load(&SummaryKey::for_category(category)).await?;
        Ok(record.map(|record| record.into_category_summary(category)))
    }

    /// Persist a tile summary
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails
    pub async fn save_summary(&self, summary: &CategorySummary) -> AppResult<()> {
        let key = SummaryKey::for_category(summary.category);
        self.store.upsert(&key, &SummaryRecord::from(summary)).await?;
        debug!(key = %key, status = %summary.status, "Saved category summary");
        Ok(())
    }

    /// Cached summary for one timespan, regardless of age
    ///
    /// # Errors
    ///
    /// Returns an error if the store read or row decoding fails
    pub async fn get_timespan_summary(
        &self,
        category: HealthCategory,
        timespan: Timespan,
    ) -> AppResult<Option<TimespanSummary>> {
        let record = self
            .store
            .load(&SummaryKey::for_timespan(category, timespan))
            .await?;
        Ok(record.map(|record| record.into_timespan_summary(timespan)))
    }

    /// Persist a timespan summary, replacing any previous one for the key
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails
    pub async fn save_timespan_summary(
        &self,
        summary: &TimespanSummary,
        category: HealthCategory,
    ) -> AppResult<()> {
        let key = SummaryKey::for_timespan(category, summary.timespan);
        self.store.upsert(&key, &SummaryRecord::from(summary)).await?;
        debug!(key = %key, trend = %summary.trend, "Saved timespan summary");
        Ok(())
    }

    /// Whether the timespan summary is missing or stale now
    ///
    /// Store errors count as needing a refresh.
    pub async fn needs_refresh(&self, category: HealthCategory, timespan: Timespan) -> bool {
        self.needs_refresh_at(category, timespan, Utc::now()).await
    }

    /// Whether the timespan summary is missing or stale at `now`
    pub async fn needs_refresh_at(
        &self,
        category: HealthCategory,
        timespan: Timespan,
        now: DateTime<Utc>,
    ) -> bool {
        match self.get_timespan_summary(category, timespan).await {
            Ok(Some(summary)) => self.is_stale(&summary, now),
            Ok(None) => true,
            Err(e) => {
                warn!(
                    category = %category,
                    timespan = %timespan,
                    error = %e,
                    "Summary cache read failed, treating as stale"
                );
                true
            }
        }
    }

    /// Whether a timespan summary has outlived its window at `now`
    #[must_use]
    pub fn is_stale(&self, summary: &TimespanSummary, now: DateTime<Utc>) -> bool {
        now - summary.generated_at > self.staleness.stale_after(summary.timespan)
    }

    /// Whether a tile summary has outlived the tile window at `now`
    #[must_use]
    pub fn is_category_stale(&self, summary: &CategorySummary, now: DateTime<Utc>) -> bool {
        now - summary.last_updated > self.staleness.category_stale_after()
    }

    /// Verify the underlying store is usable
    ///
    /// # Errors
    ///
    /// Returns the store's health check error
    pub async fn health_check(&self) -> AppResult<()> {
        self.store.health_check().await
    }

    /// Drop every cached summary
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared
    pub async fn clear_all(&self) -> AppResult<()> {
        self.store.clear().await
    }
}
