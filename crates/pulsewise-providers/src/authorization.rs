// ABOUTME: Per-category read authorization status derived from the health source on every call
// ABOUTME: Status is never cached because the user can change access in system settings at any time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use crate::source::{AccessRequestState, HealthDataSource};
use pulsewise_core::errors::AppResult;
use pulsewise_core::models::{HealthCategory, HealthDataType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Read-access state of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// Access has not been requested, or the platform cannot tell
    NotDetermined,
    /// Access was requested, or nothing needs to be read
    Authorized,
    /// No health store on this device
    Unavailable,
}

impl AuthorizationStatus {
    /// Whether the category may be refreshed
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    /// Map the source's prompt state to a status
    #[must_use]
    pub const fn from_request_state(state: AccessRequestState) -> Self {
        match state {
            AccessRequestState::Unnecessary => Self::Authorized,
            AccessRequestState::ShouldRequest | AccessRequestState::Unknown => Self::NotDetermined,
        }
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDetermined => f.write_str("not_determined"),
            Self::Authorized => f.write_str("authorized"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Answers "may this category be read?" against the health source
#[derive(Clone)]
pub struct AuthorizationGate {
    source: Arc<dyn HealthDataSource>,
}

impl AuthorizationGate {
    /// Create a gate over a health source
    #[must_use]
    pub fn new(source: Arc<dyn HealthDataSource>) -> Self {
        Self { source }
    }

    /// Current status of `category`
    pub async fn status(&self, category: HealthCategory) -> AuthorizationStatus {
        self.status_for_types(category.read_types()).await
    }

    /// Status for an explicit set of read types
    ///
    /// An empty set is trivially authorized. Source errors are reported as
    /// not determined.
    pub async fn status_for_types(&self, read_types: &[HealthDataType]) -> AuthorizationStatus {
        if !self.source.is_available().await {
            return AuthorizationStatus::Unavailable;
        }
        if read_types.is_empty() {
            return AuthorizationStatus::Authorized;
        }
        match self.source.authorization_state(read_types).await {
            Ok(state) => AuthorizationStatus::from_request_state(state),
            Err(e) => {
                warn!(error = %e, "Failed to read authorization state");
                AuthorizationStatus::NotDetermined
            }
        }
    }

    /// Ask the platform for read access to `category`
    ///
    /// Returns whether the request completed; it does not imply the user
    /// granted every type.
    ///
    /// # Errors
    ///
    /// Propagates errors from the health source
    pub async fn request(&self, category: HealthCategory) -> AppResult<bool> {
        let read_types = category.read_types();
        if read_types.is_empty() {
            debug!(category = %category, "No read types, nothing to request");
            return Ok(true);
        }
        if !self.source.is_available().await {
            return Ok(false);
        }
        let shown = self.source.request_access(read_types).await?;
        info!(category = %category, shown, "Requested health data access");
        Ok(shown)
    }
}
