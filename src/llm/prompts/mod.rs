// ABOUTME: System prompts for summary generation loaded at compile time
// ABOUTME: Provides the health summary instructions sent ahead of every metric block
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

use crate::models::Timespan;

/// Health summary system prompt
///
/// Covers tone, length limits for both text fields, and the rule that the
/// model must not contradict the trend it is given.
pub const SUMMARY_SYSTEM_PROMPT: &str = include_str!("summary_system.md");

/// Get the system prompt for summary generation
#[must_use]
pub const fn get_summary_system_prompt() -> &'static str {
    SUMMARY_SYSTEM_PROMPT
}

/// User prompt for one comparison: framing line followed by the metric block
#[must_use]
pub fn build_summary_prompt(timespan: Timespan, metrics: &str) -> String {
    format!(
        "Compare {}.\n\n{metrics}\n\nRespond with JSON containing short_text and detailed_text.",
        timespan.framing()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_includes_framing_and_metrics() {
        let prompt = build_summary_prompt(Timespan::Weekly, "Category: Sleep");
        assert!(prompt.contains(Timespan::Weekly.framing()));
        assert!(prompt.contains("Category: Sleep"));
        assert!(!get_summary_system_prompt().is_empty());
    }
}
