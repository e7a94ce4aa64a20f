// ABOUTME: Integration tests for per-category metric fetching from a health source
// ABOUTME: Concurrent sub-queries, partial failures, unit normalization and event aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{init_test_logging, StubHealthSource};
use pulsewise::errors::ErrorCode;
use pulsewise::models::{
    DateInterval, EventKind, HealthCategory, MetricRecord, QuantityMetric, SleepStage, Timespan,
};
use pulsewise::providers::{HealthDataSource, MetricFetcher};
use std::sync::Arc;

fn fetcher(source: &Arc<StubHealthSource>) -> MetricFetcher {
    init_test_logging();
    MetricFetcher::new(Arc::clone(source) as Arc<dyn HealthDataSource>)
}

fn current_week() -> DateInterval {
    Timespan::Weekly.periods(Utc::now()).current
}

#[tokio::test]
async fn test_heart_record_collects_every_metric() -> Result<()> {
    let source = StubHealthSource::with_improving_heart();
    source.set_metric(QuantityMetric::WalkingHeartRate, Some(100.0), Some(96.0));
    source.set_metric(QuantityMetric::Vo2Max, Some(41.0), Some(42.5));

    let record = fetcher(&source)
        .fetch(HealthCategory::Heart, current_week())
        .await?;

    let MetricRecord::Heart(heart) = record else {
        panic!("expected a heart record, got {record:?}");
    };
    assert_eq!(heart.resting_heart_rate, Some(58.0));
    assert_eq!(heart.heart_rate_variability, Some(46.0));
    assert_eq!(heart.walking_heart_rate, Some(96.0));
    assert_eq!(heart.vo2_max, Some(42.5));
    Ok(())
}

#[tokio::test]
async fn test_previous_period_reads_previous_values() -> Result<()> {
    let source = StubHealthSource::with_improving_heart();
    let previous = Timespan::Weekly.periods(Utc::now()).previous;

    let record = fetcher(&source).fetch(HealthCategory::Heart, previous).await?;

    let MetricRecord::Heart(heart) = record else {
        panic!("expected a heart record");
    };
    assert_eq!(heart.resting_heart_rate, Some(65.0));
    Ok(())
}

#[tokio::test]
async fn test_failed_sub_query_only_blanks_its_field() -> Result<()> {
    let source = StubHealthSource::with_improving_heart();
    source.fail_metric(QuantityMetric::HeartRateVariability);

    let record = fetcher(&source)
        .fetch(HealthCategory::Heart, current_week())
        .await?;

    let MetricRecord::Heart(heart) = record else {
        panic!("expected a heart record");
    };
    assert_eq!(heart.resting_heart_rate, Some(58.0));
    assert_eq!(heart.heart_rate_variability, None);
    assert!(!record.missing_critical());
    Ok(())
}

#[tokio::test]
async fn test_unavailable_store_is_an_error() {
    let source = StubHealthSource::with_improving_heart();
    source.set_available(false);

    let err = fetcher(&source)
        .fetch(HealthCategory::Heart, current_week())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(source.total_calls(), 0);
}

#[tokio::test]
async fn test_performance_steps_are_whole_numbers() -> Result<()> {
    let source = StubHealthSource::new();
    source.set_metric(QuantityMetric::StepCount, None, Some(8431.6));
    source.set_metric(QuantityMetric::ActiveEnergy, None, Some(520.0));

    let record = fetcher(&source)
        .fetch(HealthCategory::Performance, current_week())
        .await?;

    let MetricRecord::Performance(performance) = record else {
        panic!("expected a performance record");
    };
    assert_eq!(performance.step_count, Some(8432));
    assert_eq!(performance.active_energy, Some(520.0));
    assert_eq!(performance.exercise_minutes, None);
    Ok(())
}

#[tokio::test]
async fn test_fractional_oxygen_saturation_is_normalized() -> Result<()> {
    let source = StubHealthSource::new();
    source.set_metric(QuantityMetric::OxygenSaturation, None, Some(0.97));
    source.set_metric(QuantityMetric::RespiratoryRate, None, Some(14.0));

    let record = fetcher(&source)
        .fetch(HealthCategory::Vitality, current_week())
        .await?;

    let MetricRecord::Vitality(vitality) = record else {
        panic!("expected a vitality record");
    };
    assert!((vitality.oxygen_saturation.unwrap() - 97.0).abs() < 1e-9);
    assert_eq!(vitality.respiratory_rate, Some(14.0));
    Ok(())
}

#[tokio::test]
async fn test_sleep_events_are_summarized_by_stage() -> Result<()> {
    let source = StubHealthSource::new();
    let night = Utc::now() - Duration::hours(10);
    let stages = [
        (0, 3, SleepStage::Core),
        (3, 5, SleepStage::Deep),
        (5, 6, SleepStage::Awake),
        (6, 8, SleepStage::Rem),
    ];
    for (from, to, stage) in stages {
        source.add_event(
            EventKind::SleepAnalysis,
            night + Duration::hours(from),
            night + Duration::hours(to),
            stage.code(),
        );
    }

    let record = fetcher(&source)
        .fetch(HealthCategory::Sleep, current_week())
        .await?;

    let MetricRecord::Sleep(sleep) = record else {
        panic!("expected a sleep record");
    };
    assert!((sleep.total_sleep_hours.unwrap() - 7.0).abs() < 1e-9);
    assert!((sleep.deep_sleep_hours.unwrap() - 2.0).abs() < 1e-9);
    assert!((sleep.rem_sleep_hours.unwrap() - 2.0).abs() < 1e-9);
    assert!((sleep.awake_minutes.unwrap() - 60.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_asleep_only_source_reports_no_awake_time() -> Result<()> {
    let source = StubHealthSource::new();
    let night = Utc::now() - Duration::hours(9);
    source.add_event(
        EventKind::SleepAnalysis,
        night,
        night + Duration::hours(7),
        SleepStage::AsleepUnspecified.code(),
    );

    let record = fetcher(&source)
        .fetch(HealthCategory::Sleep, current_week())
        .await?;

    let MetricRecord::Sleep(sleep) = record else {
        panic!("expected a sleep record");
    };
    assert!((sleep.total_sleep_hours.unwrap() - 7.0).abs() < 1e-9);
    assert_eq!(sleep.awake_minutes, None);
    assert_eq!(sleep.deep_sleep_hours, None);
    Ok(())
}

#[tokio::test]
async fn test_mindful_sessions_are_counted() -> Result<()> {
    let source = StubHealthSource::new();
    let morning = Utc::now() - Duration::days(2);
    for day in 0..3 {
        let start = morning + Duration::days(i64::from(day)) - Duration::hours(1);
        source.add_event(
            EventKind::MindfulSession,
            start,
            start + Duration::minutes(10),
            0,
        );
    }

    let record = fetcher(&source)
        .fetch(HealthCategory::Mindfulness, current_week())
        .await?;

    let MetricRecord::Mindfulness(mindfulness) = record else {
        panic!("expected a mindfulness record");
    };
    assert_eq!(mindfulness.session_count, Some(3));
    assert!((mindfulness.mindful_minutes.unwrap() - 30.0).abs() < 1e-9);
    assert!((mindfulness.average_session_minutes.unwrap() - 10.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_empty_store_yields_empty_records() -> Result<()> {
    let source = StubHealthSource::new();
    let fetcher = fetcher(&source);

    for category in HealthCategory::ALL {
        let record = fetcher.fetch(category, current_week()).await?;
        assert_eq!(record.category(), category);
        assert!(!record.has_any_data(), "{category} should be empty");
    }
    Ok(())
}
