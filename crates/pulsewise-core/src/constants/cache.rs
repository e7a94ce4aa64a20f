// ABOUTME: Cache-related constants for staleness windows and in-memory capacity
// ABOUTME: Staleness is evaluated at read time, there are no background timers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

/// Daily timespan summaries go stale after 24 hours
pub const DAILY_STALE_AFTER_HOURS: i64 = 24;

/// Weekly timespan summaries go stale after 72 hours
pub const WEEKLY_STALE_AFTER_HOURS: i64 = 72;

/// Monthly timespan summaries go stale after 168 hours (one week)
pub const MONTHLY_STALE_AFTER_HOURS: i64 = 168;

/// Category tile summaries go stale after 24 hours regardless of timespan
pub const CATEGORY_STALE_AFTER_HOURS: i64 = 24;

/// Default maximum rows held by the in-memory summary store
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 64;

/// Buffer size for the category update broadcast channel
pub const CATEGORY_UPDATE_BUFFER: usize = 64;

/// Default SQLite location for the persistent summary store
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/pulsewise.db";
