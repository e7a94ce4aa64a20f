// ABOUTME: SQLite-backed summary store keyed by (category, timespan)
// ABOUTME: One row per key, replaced atomically through an upsert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::{SummaryKey, SummaryRecord, SummaryStore};
use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

/// Summary store persisted in a `SQLite` database
#[derive(Clone)]
pub struct SqliteSummaryStore {
    pool: SqlitePool,
}

impl SqliteSummaryStore {
    /// Wrap an existing pool; call [`Self::migrate`] before use
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `url` and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema creation fails
    pub async fn connect(url: &DatabaseUrl) -> AppResult<Self> {
        let pool = if url.is_memory() {
            // Every connection to :memory: opens a fresh database
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&url.to_connection_string())
                .await
        } else {
            SqlitePool::connect(&format!("{}?mode=rwc", url.to_connection_string())).await
        }
        .map_err(|e| AppError::storage(format!("Failed to open summary database {url}: {e}")))?;

        let store = Self::new(pool);
        store.migrate().await?;
        info!(database = %url, "Summary store ready");
        Ok(store)
    }

    /// Create the summaries table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS summaries (
                category TEXT NOT NULL,
                timespan TEXT NOT NULL,
                status TEXT NOT NULL,
                short_text TEXT NOT NULL,
                long_text TEXT NOT NULL,
                trend TEXT NOT NULL,
                metrics_display TEXT NOT NULL DEFAULT '',
                metric_trends TEXT NOT NULL DEFAULT '[]',
                last_updated TEXT NOT NULL,
                PRIMARY KEY (category, timespan)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create summaries table: {e}")))?;

        Ok(())
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<SummaryRecord> {
        let status: String = row.try_get("status")?;
        let trend: String = row.try_get("trend")?;
        let metric_trends: String = row.try_get("metric_trends")?;
        let last_updated: String = row.try_get("last_updated")?;

        let last_updated = DateTime::parse_from_rfc3339(&last_updated)
            .map_err(|e| AppError::serialization(format!("Invalid last_updated timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(SummaryRecord {
            status: status.parse()?,
            short_text: row.try_get("short_text")?,
            long_text: row.try_get("long_text")?,
            trend: trend.parse()?,
            metrics_display: row.try_get("metrics_display")?,
            metric_trends: serde_json::from_str(&metric_trends)?,
            last_updated,
        })
    }
}

#[async_trait]
impl SummaryStore for SqliteSummaryStore {
    async fn load(&self, key: &SummaryKey) -> AppResult<Option<SummaryRecord>> {
        let row = sqlx::query(
            r"
            SELECT status, short_text, long_text, trend, metrics_display, metric_trends, last_updated
            FROM summaries
            WHERE category = $1 AND timespan = $2
            ",
        )
        .bind(key.category.as_str())
        .bind(key.timespan_column())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to load summary {key}: {e}")))?;

        row.map(|r| Self::row_to_record(&r)).transpose()
    }

    async fn upsert(&self, key: &SummaryKey, record: &SummaryRecord) -> AppResult<()> {
        let metric_trends = serde_json::to_string(&record.metric_trends)?;

        sqlx::query(
            r"
            INSERT INTO summaries (
                category, timespan, status, short_text, long_text, trend,
                metrics_display, metric_trends, last_updated
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(category, timespan) DO UPDATE SET
                status = excluded.status,
                short_text = excluded.short_text,
                long_text = excluded.long_text,
                trend = excluded.trend,
                metrics_display = excluded.metrics_display,
                metric_trends = excluded.metric_trends,
                last_updated = excluded.last_updated
            ",
        )
        .bind(key.category.as_str())
        .bind(key.timespan_column())
        .bind(record.status.as_str())
        .bind(&record.short_text)
        .bind(&record.long_text)
        .bind(record.trend.as_str())
        .bind(&record.metrics_display)
        .bind(metric_trends)
        .bind(record.last_updated.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to upsert summary {key}: {e}")))?;

        debug!(key = %key, "Upserted summary row");
        Ok(())
    }

    async fn remove(&self, key: &SummaryKey) -> AppResult<()> {
        sqlx::query("DELETE FROM summaries WHERE category = $1 AND timespan = $2")
            .bind(key.category.as_str())
            .bind(key.timespan_column())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to remove summary {key}: {e}")))?;
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM summaries")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to clear summaries: {e}")))?;
        debug!(rows = result.rows_affected(), "Cleared summary store");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Summary store health check failed: {e}")))?;
        Ok(())
    }
}
