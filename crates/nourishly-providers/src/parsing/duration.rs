// ABOUTME: Duration parsing for schema.org ISO 8601 values and free-text cook times
// ABOUTME: Converts PT1H30M, "45", or "1 hour 15 minutes" into whole minutes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::conversions::positive_minutes;

static ISO_DURATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .ok()
});

static TEXT_DURATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hours?|hrs?|h|minutes?|mins?|m)\b").ok()
});

fn capture_f64(captures: &regex::Captures<'_>, index: usize) -> f64 {
    captures
        .get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

fn parse_iso(value: &str) -> Option<f64> {
    let captures = ISO_DURATION.as_ref()?.captures(value)?;
    let days = capture_f64(&captures, 1);
    let hours = capture_f64(&captures, 2);
    let minutes = capture_f64(&captures, 3);
    let seconds = capture_f64(&captures, 4);
    Some(days * 1440.0 + hours * 60.0 + minutes + seconds / 60.0)
}

fn parse_text(value: &str) -> Option<f64> {
    let pattern = TEXT_DURATION.as_ref()?;
    let mut total = None;
    for captures in pattern.captures_iter(value) {
        let amount = capture_f64(&captures, 1);
        let unit = captures.get(2).map_or("", |m| m.as_str()).to_lowercase();
        let minutes = if unit.starts_with('h') { amount * 60.0 } else { amount };
        total = Some(total.unwrap_or(0.0) + minutes);
    }
    total
}

/// Parse a duration into whole minutes
///
/// `"PT1H30M"` and `"1 hour 30 minutes"` both yield 90; a bare number is
/// taken as minutes. Zero and unparseable values yield `None`.
#[must_use]
pub fn parse_duration_minutes(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let minutes = parse_iso(value)
        .or_else(|| value.parse::<f64>().ok())
        .or_else(|| parse_text(value))?;
    positive_minutes(minutes)
}
