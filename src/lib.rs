// ABOUTME: Main library entry point for the Pulsewise health summary engine
// ABOUTME: Wires metric fetching, comparison, summary generation, caching and refresh orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Pulsewise
//!
//! An in-process engine that keeps per-category health summaries fresh.
//! Metrics are read from a platform health store, compared period over
//! period, phrased by an optional language model, cached, and streamed to
//! observers cache-first.
//!
//! ## Architecture
//!
//! - **Providers** (`pulsewise-providers`): health source trait, metric fetcher, authorization gate
//! - **Intelligence** (`pulsewise-intelligence`): pure comparison engine and trend rules
//! - **Cache**: summary store trait with in-memory and `SQLite` backends
//! - **LLM**: language model trait and a local `OpenAI`-compatible adapter
//! - **Services**: summary generator and refresh orchestrator
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pulsewise::config::PulsewiseConfig;
//! use pulsewise::errors::AppResult;
//! use pulsewise::providers::HealthDataSource;
//! use pulsewise::services::{RefreshOrchestrator, RefreshOutcome};
//! use std::sync::Arc;
//!
//! async fn run(source: Arc<dyn HealthDataSource>) -> AppResult<()> {
//!     let config = PulsewiseConfig::from_env()?;
//!     config.logging.init()?;
//!
//!     let orchestrator = RefreshOrchestrator::from_config(&config, source, None).await?;
//!     let mut updates = orchestrator.subscribe();
//!
//!     if let RefreshOutcome::Completed(report) = orchestrator.refresh_all().await {
//!         println!("refreshed {} categories", report.categories.len());
//!     }
//!     while let Ok(update) = updates.try_recv() {
//!         println!("{}: {}", update.category, update.summary.short_text);
//!     }
//!     Ok(())
//! }
//! ```

/// Summary cache and its persistent stores
pub mod cache;

/// Environment-driven configuration
pub mod config;

/// Language model interface and adapters
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Summary generation and refresh orchestration
pub mod services;

// Re-export foundation types so callers depend on a single crate
pub use pulsewise_core::constants;
pub use pulsewise_core::errors;
pub use pulsewise_core::models;

/// Comparison engine
pub use pulsewise_intelligence as intelligence;

/// Health source, fetcher and authorization gate
pub use pulsewise_providers as providers;
