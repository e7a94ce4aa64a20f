// ABOUTME: Refresh orchestrator coordinating authorization, cache-first display and background recompute
// ABOUTME: Drives full refreshes, single-category refreshes and detail-view timespan loads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! # Refresh Orchestration
//!
//! Every entry point follows the same contract: anything already cached is
//! emitted before any fetch starts, and recomputation happens afterwards.
//!
//! - [`RefreshOrchestrator::refresh_all`] walks the five categories
//!   concurrently, guarded so that only one full refresh runs at a time.
//! - [`RefreshOrchestrator::refresh_category`] refreshes one category,
//!   sharing the computation with any concurrent refresh of that category.
//! - [`RefreshOrchestrator::load_timespans`] feeds an open detail view with
//!   per-timespan [`LoadState`] changes.
//!
//! Tile updates are broadcast to every [`RefreshOrchestrator::subscribe`]r;
//! detail updates go to the channel handed to `load_timespans`.

use super::detail::{LoadState, TimespanUpdate};
use super::in_flight::{Claim, InFlightRegistry};
use super::summary::SummaryGenerator;
use crate::cache::{SummaryCache, SummaryStoreBackend};
use crate::config::{PulsewiseConfig, TimeoutConfig};
use crate::constants::cache::CATEGORY_UPDATE_BUFFER;
use crate::errors::{AppError, AppResult};
use crate::llm::LanguageModel;
use crate::models::{
    CategorySummary, DateInterval, HealthCategory, MetricRecord, SummaryStatus, Timespan,
    TimespanSummary,
};
use chrono::Utc;
use futures_util::future::join_all;
use pulsewise_intelligence::{CategoryComparison, Comparison};
use pulsewise_providers::{AuthorizationGate, HealthDataSource, MetricFetcher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, info_span, instrument, warn, Instrument};
use uuid::Uuid;

/// Where an emitted tile summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrigin {
    /// Served from a cache before any fetch
    Cache,
    /// Produced by a completed refresh pipeline
    Refresh,
}

/// Tile summary emitted to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    /// Category of the tile
    pub category: HealthCategory,
    /// Summary to display
    pub summary: CategorySummary,
    /// Cache or refresh
    pub origin: UpdateOrigin,
}

/// What happened to one category during a full refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRefresh {
    /// Not authorized; nothing was emitted
    Skipped,
    /// Every timespan was fresh; only the cached tile was emitted
    UpToDate,
    /// The tile pipeline ran (here or in a concurrent single-category refresh)
    Refreshed,
}

/// Per-category results of a completed full refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Identifier of the refresh cycle, as logged
    pub cycle_id: Uuid,
    /// Result per category in [`HealthCategory::ALL`] order
    pub categories: Vec<(HealthCategory, CategoryRefresh)>,
}

impl RefreshReport {
    /// Categories that ended with `outcome`
    #[must_use]
    pub fn with_outcome(&self, outcome: CategoryRefresh) -> Vec<HealthCategory> {
        self.categories
            .iter()
            .filter(|(_, result)| *result == outcome)
            .map(|(category, _)| *category)
            .collect()
    }
}

/// Result of [`RefreshOrchestrator::refresh_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The refresh ran to completion
    Completed(RefreshReport),
    /// Another full refresh was already running; nothing was done
    AlreadyRunning,
}

/// Clears the full-refresh flag when the refresh finishes or is cancelled
struct FullRefreshGuard {
    flag: Arc<AtomicBool>,
}

impl FullRefreshGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for FullRefreshGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A generated timespan summary with the tile state its comparison implies
///
/// This is what a computation publishes for its (category, timespan) key, so
/// the tile pipeline can build a tile from a monthly summary computed by a
/// detail view and the other way around.
#[derive(Debug, Clone)]
struct Computed {
    summary: TimespanSummary,
    status: SummaryStatus,
}

impl Computed {
    fn no_data(timespan: Timespan) -> Self {
        Self {
            summary: TimespanSummary::no_data(timespan),
            status: SummaryStatus::NoData,
        }
    }

    fn tile(&self, category: HealthCategory) -> CategorySummary {
        match self.status {
            SummaryStatus::NoData => CategorySummary::no_data(category),
            SummaryStatus::MissingCritical => CategorySummary::missing_critical(category),
            SummaryStatus::Ready => CategorySummary::ready(category, &self.summary),
        }
    }
}

/// Coordinates fetch, comparison, generation and caching for every category
///
/// Cloning is cheap; clones share caches, guards and observers.
#[derive(Clone)]
pub struct RefreshOrchestrator {
    fetcher: MetricFetcher,
    generator: SummaryGenerator,
    cache: SummaryCache,
    gate: AuthorizationGate,
    timeouts: TimeoutConfig,
    summaries: Arc<RwLock<HashMap<HealthCategory, CategorySummary>>>,
    full_refresh_running: Arc<AtomicBool>,
    category_flights: InFlightRegistry<HealthCategory, CategorySummary>,
    timespan_flights: InFlightRegistry<(HealthCategory, Timespan), Computed>,
    updates: broadcast::Sender<CategoryUpdate>,
}

impl RefreshOrchestrator {
    /// Assemble an orchestrator from its collaborators
    #[must_use]
    pub fn new(
        fetcher: MetricFetcher,
        generator: SummaryGenerator,
        cache: SummaryCache,
        gate: AuthorizationGate,
        timeouts: TimeoutConfig,
    ) -> Self {
        let (updates, _) = broadcast::channel(CATEGORY_UPDATE_BUFFER);
        Self {
            fetcher,
            generator,
            cache,
            gate,
            timeouts,
            summaries: Arc::new(RwLock::new(HashMap::new())),
            full_refresh_running: Arc::new(AtomicBool::new(false)),
            category_flights: InFlightRegistry::new(),
            timespan_flights: InFlightRegistry::new(),
            updates,
        }
    }

    /// Build every collaborator from configuration around a health source
    ///
    /// Without a model, summaries always use deterministic text.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured summary store cannot be opened
    pub async fn from_config(
        config: &PulsewiseConfig,
        source: Arc<dyn HealthDataSource>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> AppResult<Self> {
        let cache = SummaryStoreBackend::new(&config.storage)
            .await?
            .into_cache(config.staleness);
        let generator = model.map_or_else(SummaryGenerator::without_model, |model| {
            SummaryGenerator::new(model, config.timeouts.model_timeout())
        });

        Ok(Self::new(
            MetricFetcher::new(Arc::clone(&source)),
            generator,
            cache,
            AuthorizationGate::new(source),
            config.timeouts,
        ))
    }

    /// Receive every tile summary emitted from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CategoryUpdate> {
        self.updates.subscribe()
    }

    /// Whether a full refresh is running
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.full_refresh_running.load(Ordering::Acquire)
    }

    /// Underlying summary cache
    #[must_use]
    pub const fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    /// Authorization gate consulted before any fetch
    #[must_use]
    pub const fn authorization(&self) -> &AuthorizationGate {
        &self.gate
    }

    // ------------------------------------------------------------------------
    // Full refresh
    // ------------------------------------------------------------------------

    /// Refresh every authorized category concurrently
    ///
    /// Cached tiles are emitted first; the tile pipeline only runs for
    /// categories with a stale or missing timespan summary. A call made while
    /// another full refresh runs returns [`RefreshOutcome::AlreadyRunning`].
    pub async fn refresh_all(&self) -> RefreshOutcome {
        let Some(_guard) = FullRefreshGuard::acquire(&self.full_refresh_running) else {
            debug!("Full refresh already running, ignoring trigger");
            return RefreshOutcome::AlreadyRunning;
        };

        let cycle_id = Uuid::new_v4();
        let span = info_span!("full_refresh", cycle = %cycle_id);
        async {
            info!("Starting full refresh");
            let results = join_all(
                HealthCategory::ALL
                    .into_iter()
                    .map(|category| self.refresh_in_cycle(category)),
            )
            .await;
            let categories: Vec<_> = HealthCategory::ALL.into_iter().zip(results).collect();
            info!(
                refreshed = categories
                    .iter()
                    .filter(|(_, r)| *r == CategoryRefresh::Refreshed)
                    .count(),
                "Full refresh finished"
            );
            RefreshOutcome::Completed(RefreshReport {
                cycle_id,
                categories,
            })
        }
        .instrument(span)
        .await
    }

    async fn refresh_in_cycle(&self, category: HealthCategory) -> CategoryRefresh {
        let status = self.gate.status(category).await;
        if !status.is_authorized() {
            debug!(category = %category, status = %status, "Skipping unauthorized category");
            return CategoryRefresh::Skipped;
        }

        let cached = self.cached_summary(category).await;
        let has_cached = cached.is_some();
        if let Some(summary) = cached {
            self.emit(category, summary, UpdateOrigin::Cache);
        }

        if has_cached && !self.any_timespan_stale(category).await {
            debug!(category = %category, "All timespans fresh");
            return CategoryRefresh::UpToDate;
        }

        self.refresh_shared(category).await;
        CategoryRefresh::Refreshed
    }

    async fn any_timespan_stale(&self, category: HealthCategory) -> bool {
        let now = Utc::now();
        join_all(
            Timespan::ALL
                .into_iter()
                .map(|timespan| self.cache.needs_refresh_at(category, timespan, now)),
        )
        .await
        .into_iter()
        .any(|stale| stale)
    }

    // ------------------------------------------------------------------------
    // Single-category refresh
    // ------------------------------------------------------------------------

    /// Refresh one category outside of a full refresh
    ///
    /// If the category is already refreshing, no second fetch is started:
    /// the cached tile is returned, or the running refresh's result when
    /// nothing is cached. Returns `None` for unauthorized categories.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn refresh_category(&self, category: HealthCategory) -> Option<CategorySummary> {
        let status = self.gate.status(category).await;
        if !status.is_authorized() {
            debug!(status = %status, "Category not authorized");
            return None;
        }

        match self.category_flights.claim(category) {
            Claim::Leader(guard) => {
                let summary = self.run_tile_pipeline(category).await;
                guard.complete(summary.clone());
                Some(summary)
            }
            Claim::Follower(waiter) => {
                debug!("Refresh already in flight");
                match self.cached_summary(category).await {
                    Some(cached) => Some(cached),
                    None => waiter.wait().await,
                }
            }
        }
    }

    /// Run the tile pipeline unless one is running, in which case await it
    async fn refresh_shared(&self, category: HealthCategory) -> Option<CategorySummary> {
        match self.category_flights.claim(category) {
            Claim::Leader(guard) => {
                let summary = self.run_tile_pipeline(category).await;
                guard.complete(summary.clone());
                Some(summary)
            }
            Claim::Follower(waiter) => waiter.wait().await,
        }
    }

    /// Build the tile from the monthly summary, then persist and emit it
    ///
    /// The monthly key is shared with detail views: when one is already
    /// computing it, its result is reused instead of fetching again.
    #[instrument(skip(self), fields(category = %category))]
    async fn run_tile_pipeline(&self, category: HealthCategory) -> CategorySummary {
        let computed = loop {
            match self.timespan_flights.claim((category, Timespan::Monthly)) {
                Claim::Leader(guard) => {
                    let computed = self.compute_tile_timespan(category).await;
                    guard.complete(computed.clone());
                    break computed;
                }
                Claim::Follower(waiter) => {
                    debug!("Monthly summary already in flight, reusing it");
                    if let Some(computed) = waiter.wait().await {
                        break computed;
                    }
                }
            }
        };

        let summary = computed.tile(category);
        self.store_category(&summary).await;
        info!(status = %summary.status, trend = %computed.summary.trend, "Category refreshed");
        self.emit(category, summary.clone(), UpdateOrigin::Refresh);
        summary
    }

    /// Monthly summary for the tile; fetch failures count as empty periods
    async fn compute_tile_timespan(&self, category: HealthCategory) -> Computed {
        let periods = Timespan::Monthly.periods(Utc::now());
        let (previous, current) = tokio::join!(
            self.fetch_or_empty(category, periods.previous),
            self.fetch_or_empty(category, periods.current),
        );

        let computed = match Comparison::new(&previous, &current) {
            Ok(comparison) => self.summarize(&comparison, Timespan::Monthly).await,
            Err(e) => {
                warn!(error = %e, "Comparison failed, using no-data summary");
                Computed::no_data(Timespan::Monthly)
            }
        };
        self.store_timespan(category, &computed.summary).await;
        computed
    }

    async fn summarize(&self, comparison: &Comparison, timespan: Timespan) -> Computed {
        let summary = self.generator.generate(comparison, timespan).await;
        let status = if comparison.missing_critical() {
            SummaryStatus::MissingCritical
        } else if comparison.has_data() {
            SummaryStatus::Ready
        } else {
            SummaryStatus::NoData
        };
        Computed { summary, status }
    }

    async fn store_timespan(&self, category: HealthCategory, summary: &TimespanSummary) {
        if let Err(e) = self.cache.save_timespan_summary(summary, category).await {
            warn!(
                category = %category,
                timespan = %summary.timespan,
                error = %e,
                "Failed to cache timespan summary"
            );
        }
    }

    /// Persistent cache first, then the in-memory map
    async fn store_category(&self, summary: &CategorySummary) {
        let category = summary.category;
        if let Err(e) = self.cache.save_summary(summary).await {
            warn!(category = %category, error = %e, "Failed to cache category summary");
        }
        self.summaries.write().await.insert(category, summary.clone());
    }

    /// Tile summary for display: fresh in-memory entry, else the persistent cache
    ///
    /// Returns entries of any age; staleness only decides where to look.
    pub async fn cached_summary(&self, category: HealthCategory) -> Option<CategorySummary> {
        let in_memory = self.summaries.read().await.get(&category).cloned();
        if let Some(summary) = &in_memory {
            if !self.cache.is_category_stale(summary, Utc::now()) {
                return in_memory;
            }
        }

        match self.cache.get_summary(category).await {
            Ok(Some(persisted)) => {
                self.summaries
                    .write()
                    .await
                    .insert(category, persisted.clone());
                Some(persisted)
            }
            Ok(None) => in_memory,
            Err(e) => {
                warn!(category = %category, error = %e, "Failed to read cached category summary");
                in_memory
            }
        }
    }

    fn emit(&self, category: HealthCategory, summary: CategorySummary, origin: UpdateOrigin) {
        let update = CategoryUpdate {
            category,
            summary,
            origin,
        };
        // No subscribers is not an error
        if self.updates.send(update).is_err() {
            debug!(category = %category, "No tile observers");
        }
    }

    // ------------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------------

    /// Load every timespan of `category` into a detail view
    ///
    /// Each timespan emits `Loading`, then the cached summary straight away
    /// if one exists. Stale cached summaries are recomputed in a background
    /// task that emits a second `Loaded` on success. Without a cached summary
    /// the computation runs inline and ends in `Loaded` or `Failed`.
    #[instrument(skip(self, sink), fields(category = %category))]
    pub async fn load_timespans(
        &self,
        category: HealthCategory,
        sink: &mpsc::UnboundedSender<TimespanUpdate>,
    ) {
        join_all(
            Timespan::ALL
                .into_iter()
                .map(|timespan| self.load_timespan(category, timespan, sink.clone())),
        )
        .await;
    }

    async fn load_timespan(
        &self,
        category: HealthCategory,
        timespan: Timespan,
        sink: mpsc::UnboundedSender<TimespanUpdate>,
    ) {
        send_state(&sink, category, timespan, LoadState::Loading);

        let cached = match self.cache.get_timespan_summary(category, timespan).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(timespan = %timespan, error = %e, "Failed to read cached timespan summary");
                None
            }
        };

        let Some(cached) = cached else {
            let state = self
                .recompute_shared(category, timespan)
                .await
                .map_or(LoadState::Failed, LoadState::Loaded);
            send_state(&sink, category, timespan, state);
            return;
        };

        let stale = self.cache.is_stale(&cached, Utc::now());
        send_state(&sink, category, timespan, LoadState::Loaded(cached));
        if !stale {
            return;
        }

        debug!(timespan = %timespan, "Cached summary stale, refreshing in background");
        let this = self.clone();
        tokio::spawn(
            async move {
                if let Some(fresh) = this.recompute_shared(category, timespan).await {
                    send_state(&sink, category, timespan, LoadState::Loaded(fresh));
                }
            }
            .in_current_span(),
        );
    }

    /// One computation per (category, timespan); followers share the leader's result
    ///
    /// For the monthly key the leader may be a running tile refresh.
    async fn recompute_shared(
        &self,
        category: HealthCategory,
        timespan: Timespan,
    ) -> Option<TimespanSummary> {
        match self.timespan_flights.claim((category, timespan)) {
            Claim::Leader(guard) => match self.compute_timespan(category, timespan).await {
                Ok(computed) => {
                    let summary = computed.summary.clone();
                    guard.complete(computed);
                    Some(summary)
                }
                Err(e) => {
                    warn!(timespan = %timespan, error = %e, "Timespan refresh failed");
                    None
                }
            },
            Claim::Follower(waiter) => waiter.wait().await.map(|computed| computed.summary),
        }
    }

    /// Fetch both periods, compare, generate and cache one timespan summary
    ///
    /// # Errors
    ///
    /// Returns the fetch error or timeout of either period
    async fn compute_timespan(
        &self,
        category: HealthCategory,
        timespan: Timespan,
    ) -> AppResult<Computed> {
        let periods = timespan.periods(Utc::now());
        let (previous, current) = tokio::join!(
            self.fetch_bounded(category, periods.previous),
            self.fetch_bounded(category, periods.current),
        );
        let comparison = Comparison::new(&previous?, &current?)?;
        let computed = self.summarize(&comparison, timespan).await;
        self.store_timespan(category, &computed.summary).await;
        Ok(computed)
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    async fn fetch_bounded(
        &self,
        category: HealthCategory,
        interval: DateInterval,
    ) -> AppResult<MetricRecord> {
        let limit = self.timeouts.fetch_timeout();
        timeout(limit, self.fetcher.fetch(category, interval))
            .await
            .map_err(|_| AppError::timeout(format!("{category} fetch"), limit.as_secs()))?
    }

    /// Tile path: failures degrade to an empty record
    async fn fetch_or_empty(&self, category: HealthCategory, interval: DateInterval) -> MetricRecord {
        match self.fetch_bounded(category, interval).await {
            Ok(record) => record,
            Err(e) => {
                warn!(category = %category, error = %e, "Fetch failed, treating period as empty");
                MetricRecord::empty(category)
            }
        }
    }
}

fn send_state(
    sink: &mpsc::UnboundedSender<TimespanUpdate>,
    category: HealthCategory,
    timespan: Timespan,
    state: LoadState,
) {
    if sink.send(TimespanUpdate::new(category, timespan, state)).is_err() {
        debug!(category = %category, timespan = %timespan, "Detail view closed");
    }
}
