// ABOUTME: Comparison engine for period-over-period health metric analysis
// ABOUTME: Computes deltas, per-metric trends, aggregate trends, prompts and fallback text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

#![deny(unsafe_code)]

//! # Pulsewise Intelligence
//!
//! Given two metric records for adjacent periods of one category, this crate
//! builds a [`Comparison`]: per-metric changes judged against category-specific
//! significance thresholds and polarities, an aggregate trend, a language model
//! prompt, and deterministic fallback summaries.
//!
//! Everything here is pure and synchronous. Identical inputs always produce
//! identical comparisons, text included.

/// Percentage change, threshold classification and trend aggregation
pub mod change;
/// Category comparisons and the `Comparison` sum type
pub mod comparison;
/// Per-metric deltas and value formatting
pub mod delta;

pub use change::{aggregate_trend, classify_relative, percent_change, Polarity};
pub use comparison::{
    CategoryComparison, Comparison, HeartComparison, MindfulnessComparison,
    PerformanceComparison, SleepComparison, VitalityComparison,
};
pub use delta::{Change, MetricDelta, Unit};
