// ABOUTME: Summary store factory for configuration-based backend selection
// ABOUTME: Builds either the in-memory LRU store or the SQLite store behind one trait object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::{InMemorySummaryStore, SummaryCache, SummaryStore};
#[cfg(feature = "sqlite")]
use super::SqliteSummaryStore;
use crate::config::{StalenessConfig, StorageConfig, StoreBackend};
#[cfg(not(feature = "sqlite"))]
use crate::errors::AppError;
use crate::errors::AppResult;
use std::sync::Arc;
use tracing::info;

/// Concrete summary store chosen from configuration
#[derive(Clone)]
pub enum SummaryStoreBackend {
    /// Process-local LRU store
    Memory(InMemorySummaryStore),
    /// `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteSummaryStore),
}

impl SummaryStoreBackend {
    /// Build the backend named in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the `SQLite` database cannot be opened or migrated,
    /// or if `SQLite` was requested in a build without the `sqlite` feature
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        match config.backend {
            StoreBackend::Memory => {
                info!(
                    "Initializing in-memory summary store (max entries: {})",
                    config.max_entries
                );
                Ok(Self::Memory(InMemorySummaryStore::new(config.max_entries)))
            }
            #[cfg(feature = "sqlite")]
            StoreBackend::Sqlite => {
                info!("Initializing SQLite summary store at {}", config.database_url);
                let store = SqliteSummaryStore::connect(&config.database_url).await?;
                Ok(Self::Sqlite(store))
            }
            #[cfg(not(feature = "sqlite"))]
            StoreBackend::Sqlite => Err(AppError::config(
                "SQLite summary store requested but the sqlite feature is disabled",
            )),
        }
    }

    /// Build the backend from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is invalid or the store fails to open
    pub async fn from_env() -> AppResult<Self> {
        let config = StorageConfig::from_env()?;
        Self::new(&config).await
    }

    /// Backend as a shareable trait object
    #[must_use]
    pub fn into_store(self) -> Arc<dyn SummaryStore> {
        match self {
            Self::Memory(store) => Arc::new(store),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => Arc::new(store),
        }
    }

    /// Wrap the backend in a [`SummaryCache`]
    #[must_use]
    pub fn into_cache(self, staleness: StalenessConfig) -> SummaryCache {
        SummaryCache::new(self.into_store(), staleness)
    }
}
