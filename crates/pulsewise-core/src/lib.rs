// ABOUTME: Core types and constants for the Pulsewise wellness summary engine
// ABOUTME: Foundation crate with error handling, staleness constants, and health data models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

#![deny(unsafe_code)]

//! # Pulsewise Core
//!
//! Foundation crate providing shared types and constants for the Pulsewise
//! wellness summary engine. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Staleness windows, significance thresholds, and timeouts
//! - **models**: Health categories, timespans, metric records, trends, and summaries

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (categories, timespans, records, summaries)
pub mod models;
