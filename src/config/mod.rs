// ABOUTME: Configuration management for the summary engine, loaded from environment variables only
// ABOUTME: Groups storage, staleness, timeout, local model and logging settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! Configuration module for Pulsewise
//!
//! - **Environment**: top-level [`PulsewiseConfig`], timeouts and local model settings
//! - **Cache**: summary store backend selection and staleness windows

/// Summary store and staleness configuration
pub mod cache;
/// Environment-driven top-level configuration
pub mod environment;

pub use cache::{DatabaseUrl, StalenessConfig, StorageConfig, StoreBackend};
pub use environment::{LocalModelConfig, PulsewiseConfig, TimeoutConfig};
