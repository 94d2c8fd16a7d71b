// ABOUTME: Text cleanup helpers for scraped and API-provided recipe fields
// ABOUTME: HTML entity decoding, whitespace collapsing, price stripping, and number extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use regex::Regex;
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

static NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").ok());

static PARENTHETICAL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").ok());

/// Decode HTML entities, drop tags, and collapse whitespace
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let stripped = TAG_PATTERN.as_ref().map_or_else(
        || decoded.to_string(),
        |pattern| pattern.replace_all(&decoded, " ").into_owned(),
    );
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text, `None` when absent or blank after cleaning
#[must_use]
pub fn clean_optional(raw: Option<&str>) -> Option<String> {
    raw.map(clean_text).filter(|s| !s.is_empty())
}

/// First decimal number in a string, ignoring thousands separators
///
/// `"1,250 kcal"` yields `1250.0`, `"12.5 g"` yields `12.5`.
#[must_use]
pub fn extract_numeric(raw: &str) -> Option<f64> {
    let without_separators = raw.replace(',', "");
    let pattern = NUMBER_PATTERN.as_ref()?;
    pattern
        .captures(&without_separators)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Bring a rating onto a 0-5 scale; values above 5 are assumed to be out of 10
#[must_use]
pub fn normalize_rating(value: f64) -> f64 {
    let scaled = if value > 5.0 { value / 2.0 } else { value };
    scaled.clamp(0.0, 5.0)
}

/// Rating parsed from text and normalized to 0-5
#[must_use]
pub fn extract_rating(raw: &str) -> Option<f64> {
    extract_numeric(raw).map(normalize_rating)
}

/// Strip price annotations from parenthesised ingredient notes
///
/// `"2 tomatoes (vine ripe, $1.28)"` becomes `"2 tomatoes (vine ripe)"` and
/// `"1 cup rice ($0.43)"` becomes `"1 cup rice"`.
#[must_use]
pub fn remove_cost_info(line: &str) -> String {
    let without_cost = PARENTHETICAL_PATTERN.as_ref().map_or_else(
        || line.to_owned(),
        |pattern| {
            pattern
                .replace_all(line, |caps: &regex::Captures<'_>| {
                    let inner = caps.get(1).map_or("", |m| m.as_str());
                    if !inner.contains('$') {
                        return caps.get(0).map_or("", |m| m.as_str()).to_owned();
                    }
                    let kept: Vec<&str> = inner
                        .split(',')
                        .map(str::trim)
                        .filter(|part| !part.is_empty() && !part.contains('$'))
                        .collect();
                    if kept.is_empty() {
                        String::new()
                    } else {
                        format!("({})", kept.join(", "))
                    }
                })
                .into_owned()
        },
    );
    let collapsed = without_cost.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
        .to_owned()
}

/// Truncate to `max_chars` characters, appending `...` when shortened
#[must_use]
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_owned();
    }
    let head: String = name.chars().take(max_chars).collect();
    format!("{head}...")
}
