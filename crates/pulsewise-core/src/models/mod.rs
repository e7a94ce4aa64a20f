// ABOUTME: Core data models shared by fetchers, comparisons, caches and the orchestrator
// ABOUTME: Re-exports categories, timespans, health data types, records, trends and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

/// Health categories and their read types
pub mod category;
/// Health data source vocabulary (metrics, events, intervals)
pub mod health_data;
/// Per-category metric records
pub mod records;
/// Category and timespan summaries
pub mod summary;
/// Comparison timespans and their periods
pub mod timespan;
/// Trend directions and per-metric trends
pub mod trend;

pub use category::HealthCategory;
pub use health_data::{
    Aggregation, DateInterval, EventKind, HealthDataType, HealthEvent, QuantityMetric, SleepStage,
};
pub use records::{
    HeartData, MetricRecord, MindfulnessData, PerformanceData, SleepData, VitalityData,
};
pub use summary::{CategorySummary, SummaryStatus, TimespanSummary};
pub use timespan::{ComparisonPeriods, Timespan};
pub use trend::{MetricTrend, TrendDirection};
