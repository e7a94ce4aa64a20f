// ABOUTME: Health data source integration for the Pulsewise summary engine
// ABOUTME: Source trait, per-category metric fetching, event aggregation and authorization status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! Health data source integration.
//!
//! The platform health store is reached only through the [`HealthDataSource`]
//! trait. [`MetricFetcher`] turns a category and a date interval into a
//! [`MetricRecord`](pulsewise_core::models::MetricRecord), and
//! [`AuthorizationGate`] reports per-category read access.

pub use pulsewise_core::constants;
pub use pulsewise_core::errors;
pub use pulsewise_core::models;

/// Sleep and mindfulness aggregation over event samples
pub mod aggregation;
/// Per-category read authorization status
pub mod authorization;
/// Per-category metric fetching
pub mod fetcher;
/// Health data source trait
pub mod source;

pub use aggregation::{summarize_mindfulness, summarize_sleep};
pub use authorization::{AuthorizationGate, AuthorizationStatus};
pub use fetcher::MetricFetcher;
pub use source::{AccessRequestState, HealthDataSource};
