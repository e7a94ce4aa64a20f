// ABOUTME: Application constants organized by domain for the summary engine
// ABOUTME: Groups staleness windows, significance thresholds, and call timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

/// Cache capacity and staleness windows
pub mod cache;

/// Per-metric significance thresholds and healthy bands
pub mod thresholds;

/// Bounded timeouts for external collaborator calls
pub mod timeouts;

/// Service identification used in structured logs
pub mod service_names {
    /// Service name reported by the logging subscriber
    pub const PULSEWISE: &str = "pulsewise";
    /// Platform health store, as named in errors
    pub const HEALTH_STORE: &str = "HealthStore";
    /// Local language model server, as named in errors
    pub const LOCAL_LLM: &str = "LocalLLM";
}
