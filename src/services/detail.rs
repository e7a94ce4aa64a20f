// ABOUTME: Loading states emitted to an open category detail view, one stream entry per timespan change
// ABOUTME: Mirrors idle -> loading -> loaded | failed for each (category, timespan) card
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use crate::models::{HealthCategory, Timespan, TimespanSummary};
use serde::{Deserialize, Serialize};

/// State of one timespan card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "summary", rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A load is under way and nothing is cached
    Loading,
    /// A summary is available; may be replaced by a fresher one later
    Loaded(TimespanSummary),
    /// The summary could not be computed; the view should offer a retry
    Failed,
}

impl LoadState {
    /// Summary carried by a loaded state
    #[must_use]
    pub const fn summary(&self) -> Option<&TimespanSummary> {
        match self {
            Self::Loaded(summary) => Some(summary),
            Self::Idle | Self::Loading | Self::Failed => None,
        }
    }

    /// Whether this state ends a load
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed)
    }
}

/// One state change for a detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimespanUpdate {
    /// Category the view shows
    pub category: HealthCategory,
    /// Card that changed
    pub timespan: Timespan,
    /// New state
    pub state: LoadState,
}

impl TimespanUpdate {
    /// Create an update
    #[must_use]
    pub const fn new(category: HealthCategory, timespan: Timespan, state: LoadState) -> Self {
        Self {
            category,
            timespan,
            state,
        }
    }
}
