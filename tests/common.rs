// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Scriptable health source and language model stubs plus orchestrator builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used
)]
//! Shared test utilities for `pulsewise`
//!
//! The stub health source answers "previous period" queries and "current
//! period" queries from separate tables, so one stub can back a complete
//! comparison regardless of which timespan asked.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use pulsewise::cache::{InMemorySummaryStore, SummaryCache};
use pulsewise::config::{StalenessConfig, TimeoutConfig};
use pulsewise::errors::{AppError, AppResult};
use pulsewise::llm::{ChatMessage, LanguageModel, ModelAvailability, ResponseSchema, SummaryResponse};
use pulsewise::models::{
    Aggregation, CategorySummary, DateInterval, EventKind, HealthCategory, HealthDataType,
    HealthEvent, MetricTrend, QuantityMetric, SummaryStatus, Timespan, TimespanSummary,
    TrendDirection,
};
use pulsewise::providers::{AccessRequestState, AuthorizationGate, HealthDataSource, MetricFetcher};
use pulsewise::services::{RefreshOrchestrator, SummaryGenerator};
use std::collections::{HashMap, HashSet};
use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            Ok("WARN" | "ERROR") | _ => Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Health source stub
// ============================================================================

/// Scriptable in-process health store
pub struct StubHealthSource {
    available: AtomicBool,
    denied: Mutex<HashSet<HealthCategory>>,
    previous: Mutex<HashMap<QuantityMetric, f64>>,
    current: Mutex<HashMap<QuantityMetric, f64>>,
    failing: Mutex<HashSet<QuantityMetric>>,
    events: Mutex<Vec<(EventKind, HealthEvent)>>,
    open: watch::Sender<bool>,
    aggregate_calls: Mutex<HashMap<QuantityMetric, usize>>,
    event_calls: AtomicUsize,
    access_requests: AtomicUsize,
}

impl StubHealthSource {
    /// Available, fully authorized, empty store
    pub fn new() -> Arc<Self> {
        let (open, _) = watch::channel(true);
        Arc::new(Self {
            available: AtomicBool::new(true),
            denied: Mutex::new(HashSet::new()),
            previous: Mutex::new(HashMap::new()),
            current: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            events: Mutex::new(Vec::new()),
            open,
            aggregate_calls: Mutex::new(HashMap::new()),
            event_calls: AtomicUsize::new(0),
            access_requests: AtomicUsize::new(0),
        })
    }

    /// Heart data that improved: resting 65 -> 58 bpm, HRV 40 -> 46 ms
    pub fn with_improving_heart() -> Arc<Self> {
        let source = Self::new();
        source.set_metric(QuantityMetric::RestingHeartRate, Some(65.0), Some(58.0));
        source.set_metric(QuantityMetric::HeartRateVariability, Some(40.0), Some(46.0));
        source
    }

    /// Values returned for the previous and current period of `metric`
    pub fn set_metric(&self, metric: QuantityMetric, previous: Option<f64>, current: Option<f64>) {
        for (table, value) in [(&self.previous, previous), (&self.current, current)] {
            let mut table = table.lock().unwrap();
            match value {
                Some(value) => table.insert(metric, value),
                None => table.remove(&metric),
            };
        }
    }

    /// Make every query for `metric` fail
    pub fn fail_metric(&self, metric: QuantityMetric) {
        self.failing.lock().unwrap().insert(metric);
    }

    /// Record an event sample
    pub fn add_event(&self, kind: EventKind, start: DateTime<Utc>, end: DateTime<Utc>, value: i64) {
        self.events
            .lock()
            .unwrap()
            .push((kind, HealthEvent { start, end, value }));
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Report `category` as never having been asked for access
    pub fn deny(&self, category: HealthCategory) {
        self.denied.lock().unwrap().insert(category);
    }

    /// Block every data query until [`Self::release`]
    pub fn hold(&self) {
        self.open.send_replace(false);
    }

    pub fn release(&self) {
        self.open.send_replace(true);
    }

    /// Aggregate queries issued for `metric` so far, held ones included
    pub fn calls(&self, metric: QuantityMetric) -> usize {
        self.aggregate_calls
            .lock()
            .unwrap()
            .get(&metric)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.aggregate_calls.lock().unwrap().values().sum::<usize>()
            + self.event_calls.load(Ordering::SeqCst)
    }

    pub fn access_requests(&self) -> usize {
        self.access_requests.load(Ordering::SeqCst)
    }

    /// Queries ending within the last minute ask for the current period
    fn is_current(interval: DateInterval) -> bool {
        interval.end > Utc::now() - ChronoDuration::minutes(1)
    }

    async fn wait_until_open(&self) -> AppResult<()> {
        let mut rx = self.open.subscribe();
        rx.wait_for(|open| *open)
            .await
            .map(|_| ())
            .map_err(|_| AppError::internal("stub gate dropped"))
    }
}

#[async_trait]
impl HealthDataSource for StubHealthSource {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn query_aggregate(
        &self,
        metric: QuantityMetric,
        interval: DateInterval,
        _aggregation: Aggregation,
    ) -> AppResult<Option<f64>> {
        *self
            .aggregate_calls
            .lock()
            .unwrap()
            .entry(metric)
            .or_insert(0) += 1;
        self.wait_until_open().await?;

        if self.failing.lock().unwrap().contains(&metric) {
            return Err(AppError::external_service("HealthStore", "query failed"));
        }
        let table = if Self::is_current(interval) {
            &self.current
        } else {
            &self.previous
        };
        Ok(table.lock().unwrap().get(&metric).copied())
    }

    async fn query_events(
        &self,
        kind: EventKind,
        interval: DateInterval,
    ) -> AppResult<Vec<HealthEvent>> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_until_open().await?;

        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, event)| {
                *k == kind && event.start < interval.end && event.end > interval.start
            })
            .map(|(_, event)| *event)
            .collect())
    }

    async fn request_access(&self, read_types: &[HealthDataType]) -> AppResult<bool> {
        self.access_requests.fetch_add(1, Ordering::SeqCst);
        let mut denied = self.denied.lock().unwrap();
        denied.retain(|category| category.read_types() != read_types);
        Ok(true)
    }

    async fn authorization_state(
        &self,
        read_types: &[HealthDataType],
    ) -> AppResult<AccessRequestState> {
        let denied = self.denied.lock().unwrap();
        let asked_for_denied = denied
            .iter()
            .any(|category| category.read_types() == read_types);
        Ok(if asked_for_denied {
            AccessRequestState::ShouldRequest
        } else {
            AccessRequestState::Unnecessary
        })
    }
}

// ============================================================================
// Language model stub
// ============================================================================

/// Scriptable language model
pub struct StubModel {
    availability: ModelAvailability,
    response: Option<SummaryResponse>,
    delay: Option<Duration>,
    availability_checks: AtomicUsize,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubModel {
    /// Available model answering every prompt with the given text
    pub fn answering(short_text: &str, detailed_text: &str) -> Arc<Self> {
        Arc::new(Self::build(
            ModelAvailability::Available,
            Some(SummaryResponse {
                short_text: short_text.to_owned(),
                detailed_text: detailed_text.to_owned(),
            }),
            None,
        ))
    }

    /// Available model whose every call fails
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::build(ModelAvailability::Available, None, None))
    }

    /// Model reporting `availability`; answers if ever asked
    pub fn with_availability(availability: ModelAvailability) -> Arc<Self> {
        Arc::new(Self::build(
            availability,
            Some(SummaryResponse {
                short_text: "unused".to_owned(),
                detailed_text: "unused".to_owned(),
            }),
            None,
        ))
    }

    /// Available model that takes `delay` to answer
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(
            ModelAvailability::Available,
            Some(SummaryResponse {
                short_text: "late".to_owned(),
                detailed_text: "late".to_owned(),
            }),
            Some(delay),
        ))
    }

    fn build(
        availability: ModelAvailability,
        response: Option<SummaryResponse>,
        delay: Option<Duration>,
    ) -> Self {
        Self {
            availability,
            response,
            delay,
            availability_checks: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generation calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn availability_checks(&self) -> usize {
        self.availability_checks.load(Ordering::SeqCst)
    }

    /// Messages of the most recent generation call
    pub fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn check_availability(&self) -> ModelAvailability {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.availability.clone()
    }

    async fn respond(
        &self,
        messages: &[ChatMessage],
        _schema: &ResponseSchema,
    ) -> AppResult<SummaryResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        self.response
            .clone()
            .ok_or_else(|| AppError::external_service("LocalLLM", "generation failed"))
    }
}

// ============================================================================
// Builders and fixtures
// ============================================================================

/// Short bounds so failing tests fail fast
pub const fn test_timeouts() -> TimeoutConfig {
    TimeoutConfig {
        fetch_timeout_secs: 2,
        model_timeout_secs: 2,
    }
}

/// Summary cache over a fresh in-memory store with default windows
pub fn memory_cache() -> SummaryCache {
    SummaryCache::new(
        Arc::new(InMemorySummaryStore::new(64)),
        StalenessConfig::default(),
    )
}

/// Orchestrator over `source`, an optional model and `cache`
pub fn build_orchestrator(
    source: &Arc<StubHealthSource>,
    model: Option<Arc<StubModel>>,
    cache: SummaryCache,
) -> RefreshOrchestrator {
    init_test_logging();
    let source: Arc<dyn HealthDataSource> = Arc::clone(source) as Arc<dyn HealthDataSource>;
    let timeouts = test_timeouts();
    let generator = model.map_or_else(SummaryGenerator::without_model, |model| {
        SummaryGenerator::new(model, timeouts.model_timeout())
    });
    RefreshOrchestrator::new(
        MetricFetcher::new(Arc::clone(&source)),
        generator,
        cache,
        AuthorizationGate::new(source),
        timeouts,
    )
}

/// Ready timespan summary produced at `generated_at`
pub fn timespan_summary(
    timespan: Timespan,
    text: &str,
    generated_at: DateTime<Utc>,
) -> TimespanSummary {
    TimespanSummary {
        timespan,
        trend: TrendDirection::Improving,
        short_text: text.to_owned(),
        long_text: format!("{text} in more detail."),
        metrics_display: "Resting Heart Rate: 58 bpm (-10.8%)".to_owned(),
        metric_trends: vec![MetricTrend::new(
            "Resting Heart Rate",
            "58 bpm (-10.8%)",
            TrendDirection::Improving,
        )],
        generated_at,
    }
}

/// Ready tile summary produced at `last_updated`
pub fn category_summary(
    category: HealthCategory,
    text: &str,
    last_updated: DateTime<Utc>,
) -> CategorySummary {
    CategorySummary {
        category,
        status: SummaryStatus::Ready,
        short_text: text.to_owned(),
        long_text: format!("{text} in more detail."),
        last_updated,
    }
}

/// Cache a tile and all three timespans for `category`, produced at `at`
pub async fn seed_category(
    cache: &SummaryCache,
    category: HealthCategory,
    text: &str,
    at: DateTime<Utc>,
) -> AppResult<()> {
    cache
        .save_summary(&category_summary(category, text, at))
        .await?;
    for timespan in Timespan::ALL {
        cache
            .save_timespan_summary(&timespan_summary(timespan, text, at), category)
            .await?;
    }
    Ok(())
}

/// Poll `condition` until it holds or two seconds pass
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}
