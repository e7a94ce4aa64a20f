// ABOUTME: Service layer turning health data into cached, observable summaries
// ABOUTME: Holds the summary generator, refresh orchestrator, detail-view states and in-flight tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! Summary services
//!
//! The orchestrator is the only writer of summaries; callers read through it
//! or through the [`SummaryCache`](crate::cache::SummaryCache).

/// Detail-view loading states
pub mod detail;

/// Per-key deduplication of concurrent refreshes
pub mod in_flight;

/// Full, single-category and detail-view refresh coordination
pub mod refresh;

/// Comparison to summary text, with model or deterministic fallback
pub mod summary;

pub use detail::{LoadState, TimespanUpdate};
pub use in_flight::{Claim, InFlightGuard, InFlightRegistry, InFlightWaiter};
pub use refresh::{
    CategoryRefresh, CategoryUpdate, RefreshOrchestrator, RefreshOutcome, RefreshReport,
    UpdateOrigin,
};
pub use summary::SummaryGenerator;
