// ABOUTME: Fetches one category's metric record for one date interval from the health source
// ABOUTME: Sub-queries run concurrently and a failed sub-query only blanks its own field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use crate::aggregation::{summarize_mindfulness, summarize_sleep};
use crate::source::HealthDataSource;
use pulsewise_core::constants::service_names;
use pulsewise_core::errors::{AppError, AppResult};
use pulsewise_core::models::{
    DateInterval, EventKind, HealthCategory, HealthEvent, HeartData, MetricRecord,
    PerformanceData, QuantityMetric, VitalityData,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads metric records from a [`HealthDataSource`]
#[derive(Clone)]
pub struct MetricFetcher {
    source: Arc<dyn HealthDataSource>,
}

impl MetricFetcher {
    /// Create a fetcher over a health source
    #[must_use]
    pub fn new(source: Arc<dyn HealthDataSource>) -> Self {
        Self { source }
    }

    /// Underlying health source
    #[must_use]
    pub fn source(&self) -> &Arc<dyn HealthDataSource> {
        &self.source
    }

    /// Fetch a category's record for `interval`
    ///
    /// No retries are attempted. Individual sub-query failures are logged
    /// and leave the corresponding field empty.
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` when the health store is not
    /// available on this device
    pub async fn fetch(
        &self,
        category: HealthCategory,
        interval: DateInterval,
    ) -> AppResult<MetricRecord> {
        if !self.source.is_available().await {
            return Err(AppError::external_unavailable(service_names::HEALTH_STORE));
        }
        let record = match category {
            HealthCategory::Heart => MetricRecord::Heart(self.fetch_heart(interval).await),
            HealthCategory::Sleep => MetricRecord::Sleep(summarize_sleep(
                &self.events(EventKind::SleepAnalysis, interval).await,
                interval,
            )),
            HealthCategory::Mindfulness => MetricRecord::Mindfulness(summarize_mindfulness(
                &self.events(EventKind::MindfulSession, interval).await,
                interval,
            )),
            HealthCategory::Performance => {
                MetricRecord::Performance(self.fetch_performance(interval).await)
            }
            HealthCategory::Vitality => MetricRecord::Vitality(self.fetch_vitality(interval).await),
        };
        debug!(
            category = %category,
            has_data = record.has_any_data(),
            "Fetched metric record"
        );
        Ok(record)
    }

    async fn fetch_heart(&self, interval: DateInterval) -> HeartData {
        let (resting, variability, walking, vo2) = tokio::join!(
            self.quantity(QuantityMetric::RestingHeartRate, interval),
            self.quantity(QuantityMetric::HeartRateVariability, interval),
            self.quantity(QuantityMetric::WalkingHeartRate, interval),
            self.quantity(QuantityMetric::Vo2Max, interval),
        );
        HeartData {
            resting_heart_rate: resting,
            heart_rate_variability: variability,
            walking_heart_rate: walking,
            vo2_max: vo2,
        }
    }

    async fn fetch_performance(&self, interval: DateInterval) -> PerformanceData {
        let (steps, energy, exercise, distance) = tokio::join!(
            self.quantity(QuantityMetric::StepCount, interval),
            self.quantity(QuantityMetric::ActiveEnergy, interval),
            self.quantity(QuantityMetric::ExerciseMinutes, interval),
            self.quantity(QuantityMetric::WalkingRunningDistance, interval),
        );
        PerformanceData {
            step_count: steps.map(|value| value.max(0.0).round() as u64),
            active_energy: energy,
            exercise_minutes: exercise,
            distance_km: distance,
        }
    }

    async fn fetch_vitality(&self, interval: DateInterval) -> VitalityData {
        let (oxygen, bmi, mass, respiratory) = tokio::join!(
            self.quantity(QuantityMetric::OxygenSaturation, interval),
            self.quantity(QuantityMetric::BodyMassIndex, interval),
            self.quantity(QuantityMetric::BodyMass, interval),
            self.quantity(QuantityMetric::RespiratoryRate, interval),
        );
        VitalityData {
            // Some stores report saturation as a fraction
            oxygen_saturation: oxygen.map(|value| if value <= 1.0 { value * 100.0 } else { value }),
            body_mass_index: bmi,
            body_mass: mass,
            respiratory_rate: respiratory,
        }
    }

    async fn quantity(&self, metric: QuantityMetric, interval: DateInterval) -> Option<f64> {
        match self
            .source
            .query_aggregate(metric, interval, metric.aggregation())
            .await
        {
            Ok(value) => value,
            Err(e) => {
                warn!(metric = metric.as_str(), error = %e, "Quantity query failed");
                None
            }
        }
    }

    async fn events(&self, kind: EventKind, interval: DateInterval) -> Vec<HealthEvent> {
        match self.source.query_events(kind, interval).await {
            Ok(events) => events,
            Err(e) => {
                warn!(kind = ?kind, error = %e, "Event query failed");
                Vec::new()
            }
        }
    }
}
