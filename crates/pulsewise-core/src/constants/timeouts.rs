// ABOUTME: Timeout constants for health store queries and language model calls
// ABOUTME: A hung collaborator must never strand a detail row in the loading state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

/// Upper bound for one category fetch (all sub-queries of one period)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Upper bound for one language model invocation
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

/// Upper bound for the language model availability probe
pub const MODEL_AVAILABILITY_TIMEOUT_SECS: u64 = 3;
