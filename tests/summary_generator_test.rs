// ABOUTME: Integration tests for summary generation with and without a language model
// ABOUTME: Model text is optional; trends and metric listings always come from the comparison
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{init_test_logging, StubModel};
use pulsewise::intelligence::{CategoryComparison, Comparison};
use pulsewise::llm::{MessageRole, ModelAvailability};
use pulsewise::models::{HeartData, MetricRecord, Timespan, TimespanSummary, TrendDirection};
use pulsewise::services::SummaryGenerator;
use std::sync::Arc;
use std::time::Duration;

fn heart_comparison(previous: HeartData, current: HeartData) -> Result<Comparison> {
    Ok(Comparison::new(
        &MetricRecord::Heart(previous),
        &MetricRecord::Heart(current),
    )?)
}

fn improving_heart() -> Result<Comparison> {
    heart_comparison(
        HeartData {
            resting_heart_rate: Some(65.0),
            ..HeartData::default()
        },
        HeartData {
            resting_heart_rate: Some(58.0),
            ..HeartData::default()
        },
    )
}

fn generator(model: &Arc<StubModel>) -> SummaryGenerator {
    init_test_logging();
    SummaryGenerator::new(model.clone(), Duration::from_secs(2))
}

#[tokio::test]
async fn test_no_data_never_calls_model() -> Result<()> {
    let model = StubModel::answering("Great week", "Everything improved.");
    let comparison = heart_comparison(HeartData::default(), HeartData::default())?;

    let summary = generator(&model).generate(&comparison, Timespan::Daily).await;

    let expected = TimespanSummary::no_data(Timespan::Daily);
    assert!(summary.is_no_data());
    assert_eq!(summary.short_text, expected.short_text);
    assert_eq!(summary.long_text, expected.long_text);
    assert_eq!(summary.trend, TrendDirection::Stable);
    assert_eq!(model.availability_checks(), 0);
    assert_eq!(model.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_critical_uses_fallback_without_model() -> Result<()> {
    let model = StubModel::answering("Great week", "Everything improved.");
    let comparison = heart_comparison(
        HeartData {
            heart_rate_variability: Some(40.0),
            ..HeartData::default()
        },
        HeartData {
            heart_rate_variability: Some(46.0),
            ..HeartData::default()
        },
    )?;

    let summary = generator(&model).generate(&comparison, Timespan::Weekly).await;

    assert_eq!(model.calls(), 0);
    assert_eq!(summary.short_text, comparison.fallback_short_summary());
    assert!(summary.long_text.contains("No resting heart rate data"));
    assert_eq!(summary.metric_trends, comparison.metric_trends());
    Ok(())
}

#[tokio::test]
async fn test_model_text_is_used_but_trend_comes_from_comparison() -> Result<()> {
    let model = StubModel::answering("Heart getting stronger", "Your resting rate dropped.");
    let comparison = improving_heart()?;

    let summary = generator(&model).generate(&comparison, Timespan::Weekly).await;

    assert_eq!(model.calls(), 1);
    assert_eq!(summary.short_text, "Heart getting stronger");
    assert_eq!(summary.long_text, "Your resting rate dropped.");
    assert_eq!(summary.trend, TrendDirection::Improving);
    assert_eq!(summary.metrics_display, comparison.display_text());
    assert_eq!(summary.metric_trends, comparison.metric_trends());
    assert_eq!(summary.timespan, Timespan::Weekly);
    Ok(())
}

#[tokio::test]
async fn test_prompt_carries_system_and_metric_messages() -> Result<()> {
    let model = StubModel::answering("Short", "Long");
    let comparison = improving_heart()?;

    generator(&model).generate(&comparison, Timespan::Monthly).await;

    let prompt = model.last_prompt().unwrap();
    assert_eq!(prompt.len(), 2);
    assert_eq!(prompt[0].role, MessageRole::System);
    assert_eq!(prompt[1].role, MessageRole::User);
    assert!(prompt[1]
        .content
        .contains("Resting Heart Rate: 65 bpm -> 58 bpm"));
    Ok(())
}

#[tokio::test]
async fn test_model_failure_falls_back_to_deterministic_text() -> Result<()> {
    let model = StubModel::failing();
    let comparison = improving_heart()?;

    let summary = generator(&model).generate(&comparison, Timespan::Daily).await;

    assert_eq!(model.calls(), 1);
    assert!(!summary.short_text.is_empty());
    assert_eq!(summary.short_text, comparison.fallback_short_summary());
    assert_eq!(summary.long_text, comparison.fallback_summary());
    assert_eq!(summary.trend, TrendDirection::Improving);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_model_is_not_asked() -> Result<()> {
    let comparison = improving_heart()?;
    for availability in [
        ModelAvailability::DisabledByUser,
        ModelAvailability::UnavailableDevice("no accelerator".to_owned()),
    ] {
        let model = StubModel::with_availability(availability);
        let summary = generator(&model).generate(&comparison, Timespan::Daily).await;

        assert_eq!(model.availability_checks(), 1);
        assert_eq!(model.calls(), 0);
        assert_eq!(summary.short_text, comparison.fallback_short_summary());
    }
    Ok(())
}

#[tokio::test]
async fn test_slow_model_times_out_to_fallback() -> Result<()> {
    init_test_logging();
    let model = StubModel::slow(Duration::from_secs(5));
    let generator = SummaryGenerator::new(model, Duration::from_millis(100));
    let comparison = improving_heart()?;

    let summary = generator.generate(&comparison, Timespan::Weekly).await;

    assert_eq!(summary.short_text, comparison.fallback_short_summary());
    Ok(())
}

#[tokio::test]
async fn test_generator_without_model_uses_fallback() -> Result<()> {
    let comparison = improving_heart()?;
    let summary = SummaryGenerator::without_model()
        .generate(&comparison, Timespan::Monthly)
        .await;

    assert_eq!(summary.short_text, "Your heart health is improving.");
    assert!(summary
        .long_text
        .contains("Resting Heart Rate improved to 58 bpm (-10.8%)."));
    Ok(())
}
