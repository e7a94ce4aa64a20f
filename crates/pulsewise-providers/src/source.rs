// ABOUTME: Abstraction over the platform health store consumed by fetchers and the authorization gate
// ABOUTME: Aggregate quantity queries, event sample queries and read-access state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use async_trait::async_trait;
use pulsewise_core::errors::AppResult;
use pulsewise_core::models::{
    Aggregation, DateInterval, EventKind, HealthDataType, HealthEvent, QuantityMetric,
};
use serde::{Deserialize, Serialize};

/// Whether the platform would show an access prompt for a set of types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequestState {
    /// Access has not been asked for yet
    ShouldRequest,
    /// Access was already asked for
    Unnecessary,
    /// The platform cannot tell
    Unknown,
}

/// Platform health store
///
/// Implementations must be safe to query concurrently. Reads report only
/// whether a prompt was shown, never whether a read type was granted, so
/// an empty result is not evidence of denied access.
#[async_trait]
pub trait HealthDataSource: Send + Sync {
    /// Whether a health store exists on this device
    async fn is_available(&self) -> bool;

    /// Aggregate one quantity over an interval
    ///
    /// Returns `Ok(None)` when no samples exist in the interval.
    async fn query_aggregate(
        &self,
        metric: QuantityMetric,
        interval: DateInterval,
        aggregation: Aggregation,
    ) -> AppResult<Option<f64>>;

    /// Event samples of one kind overlapping an interval
    async fn query_events(
        &self,
        kind: EventKind,
        interval: DateInterval,
    ) -> AppResult<Vec<HealthEvent>>;

    /// Ask for read access, returning whether the request completed
    async fn request_access(&self, read_types: &[HealthDataType]) -> AppResult<bool>;

    /// Whether a read-access prompt would still be shown for `read_types`
    async fn authorization_state(
        &self,
        read_types: &[HealthDataType],
    ) -> AppResult<AccessRequestState>;
}
