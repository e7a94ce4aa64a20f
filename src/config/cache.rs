// ABOUTME: Summary store backend selection and per-timespan staleness windows
// ABOUTME: Parses PULSEWISE_STORE, PULSEWISE_DATABASE_URL and the PULSEWISE_STALE_* variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::environment::parse_env;
use crate::constants::cache::{
    CATEGORY_STALE_AFTER_HOURS, DAILY_STALE_AFTER_HOURS, DEFAULT_CACHE_MAX_ENTRIES,
    DEFAULT_DATABASE_URL, MONTHLY_STALE_AFTER_HOURS, WEEKLY_STALE_AFTER_HOURS,
};
use crate::errors::{AppError, AppResult};
use crate::models::Timespan;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Which [`SummaryStore`](crate::cache::SummaryStore) implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Bounded in-process LRU store, lost on restart
    Memory,
    /// `SQLite` database
    #[default]
    Sqlite,
}

impl StoreBackend {
    /// Parse a backend name
    ///
    /// # Errors
    ///
    /// Returns a config error for unknown names
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(AppError::config(format!(
                "Invalid PULSEWISE_STORE value '{other}' (expected memory or sqlite)"
            ))),
        }
    }
}

/// Type-safe `SQLite` location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL or bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s
            .strip_prefix("sqlite://")
            .or_else(|| s.strip_prefix("sqlite:"))
            .unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Persistent summary store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StoreBackend,
    /// Database location for the `SQLite` backend
    pub database_url: DatabaseUrl,
    /// Capacity of the in-memory backend
    pub max_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: DatabaseUrl::default(),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl StorageConfig {
    /// Load storage configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a config error when a variable is set to an unparseable value
    pub fn from_env() -> AppResult<Self> {
        let backend = match env::var("PULSEWISE_STORE") {
            Ok(value) => StoreBackend::parse(&value)?,
            Err(_) => StoreBackend::default(),
        };
        Ok(Self {
            backend,
            database_url: env::var("PULSEWISE_DATABASE_URL")
                .map_or_else(|_| DatabaseUrl::default(), |url| DatabaseUrl::parse_url(&url)),
            max_entries: parse_env("PULSEWISE_CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?,
        })
    }

    /// In-memory store with default capacity
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }
}

/// How long cached summaries stay fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessConfig {
    /// Daily summaries
    pub daily_hours: i64,
    /// Weekly summaries
    pub weekly_hours: i64,
    /// Monthly summaries
    pub monthly_hours: i64,
    /// Home-screen tile summaries
    pub category_hours: i64,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            daily_hours: DAILY_STALE_AFTER_HOURS,
            weekly_hours: WEEKLY_STALE_AFTER_HOURS,
            monthly_hours: MONTHLY_STALE_AFTER_HOURS,
            category_hours: CATEGORY_STALE_AFTER_HOURS,
        }
    }
}

impl StalenessConfig {
    /// Load staleness windows from environment
    ///
    /// # Errors
    ///
    /// Returns a config error for unparseable or non-positive values
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            daily_hours: parse_env("PULSEWISE_STALE_DAILY_HOURS", DAILY_STALE_AFTER_HOURS)?,
            weekly_hours: parse_env("PULSEWISE_STALE_WEEKLY_HOURS", WEEKLY_STALE_AFTER_HOURS)?,
            monthly_hours: parse_env("PULSEWISE_STALE_MONTHLY_HOURS", MONTHLY_STALE_AFTER_HOURS)?,
            category_hours: parse_env(
                "PULSEWISE_STALE_CATEGORY_HOURS",
                CATEGORY_STALE_AFTER_HOURS,
            )?,
        };
        if [
            config.daily_hours,
            config.weekly_hours,
            config.monthly_hours,
            config.category_hours,
        ]
        .iter()
        .any(|hours| *hours <= 0)
        {
            return Err(AppError::config("Staleness windows must be positive hours"));
        }
        Ok(config)
    }

    /// Window after which a timespan summary needs refreshing
    #[must_use]
    pub fn stale_after(&self, timespan: Timespan) -> Duration {
        match timespan {
            Timespan::Daily => Duration::hours(self.daily_hours),
            Timespan::Weekly => Duration::hours(self.weekly_hours),
            Timespan::Monthly => Duration::hours(self.monthly_hours),
        }
    }

    /// Window after which a tile summary is no longer served from memory
    #[must_use]
    pub fn category_stale_after(&self) -> Duration {
        Duration::hours(self.category_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/summaries.db").to_connection_string(),
            "sqlite:./data/summaries.db"
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/x.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/tmp/x.db")
            }
        );
    }

    #[test]
    fn test_default_staleness_matches_timespans() {
        let staleness = StalenessConfig::default();
        for timespan in Timespan::ALL {
            assert_eq!(staleness.stale_after(timespan), timespan.stale_after());
        }
    }

    #[test]
    fn test_store_backend_names() {
        assert_eq!(StoreBackend::parse("Memory").ok(), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("sqlite").ok(), Some(StoreBackend::Sqlite));
        assert!(StoreBackend::parse("redis").is_err());
    }
}
