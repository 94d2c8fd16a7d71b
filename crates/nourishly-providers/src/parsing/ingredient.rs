// ABOUTME: Ingredient line parsing into quantity, unit, name, and notes
// ABOUTME: Understands mixed numbers, slash fractions, decimals, and unicode vulgar fractions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use regex::Regex;
use std::sync::LazyLock;

use super::text::clean_text;
use crate::constants::units::{COMMON_UNITS, UNICODE_FRACTIONS};
use crate::models::IngredientData;

// Matches: 1 1/2, 3/4, 2.5, 1½, 1 ½, ½, optionally followed by a range tail like -3
static LEADING_QUANTITY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*((?:\d+\s+)?\d+/\d+|\d+(?:\.\d+)?(?:\s*[¼½¾⅐⅑⅒⅓⅔⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])?|[¼½¾⅐⅑⅒⅓⅔⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])(?:\s*(?:-|to)\s*[\d/.]+)?",
    )
    .ok()
});

static PARENTHETICAL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").ok());

fn unicode_fraction(c: char) -> Option<f64> {
    UNICODE_FRACTIONS
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, value)| *value)
}

fn parse_token(token: &str) -> Option<f64> {
    let token = token.trim();
    let mut chars = token.chars();
    let last = chars.next_back()?;

    if let Some(fraction) = unicode_fraction(last) {
        let whole = chars.as_str().trim();
        return if whole.is_empty() {
            Some(fraction)
        } else {
            whole.parse::<f64>().ok().map(|w| w + fraction)
        };
    }

    if let Some((numerator, denominator)) = token.split_once('/') {
        let numerator: f64 = numerator.trim().parse().ok()?;
        let denominator: f64 = denominator.trim().parse().ok()?;
        return (denominator != 0.0).then(|| numerator / denominator);
    }

    token.parse().ok()
}

/// Parse a quantity such as `"1 1/2"`, `"3/4"`, `"2.5"`, `"1½"`, or `"½"`
///
/// Returns `None` for text that does not start with a number.
#[must_use]
pub fn parse_quantity(text: &str) -> Option<f64> {
    let mut tokens = text.split_whitespace();
    let first = parse_token(tokens.next()?)?;

    // A second token only counts when it is the fractional part of a mixed number.
    let fractional = tokens
        .next()
        .filter(|t| t.contains('/') || t.chars().all(|c| unicode_fraction(c).is_some()))
        .and_then(parse_token)
        .filter(|f| *f < 1.0);

    Some(first + fractional.unwrap_or(0.0))
}

fn split_notes(text: &str) -> (String, Vec<String>) {
    let mut notes = Vec::new();
    let without_parens = PARENTHETICAL.as_ref().map_or_else(
        || text.to_owned(),
        |pattern| {
            for capture in pattern.captures_iter(text) {
                if let Some(note) = capture.get(1) {
                    let note = note.as_str().trim();
                    if !note.is_empty() {
                        notes.push(note.to_owned());
                    }
                }
            }
            pattern.replace_all(text, " ").into_owned()
        },
    );

    match without_parens.split_once(',') {
        Some((head, tail)) => {
            let tail = tail.trim();
            if !tail.is_empty() {
                notes.push(tail.to_owned());
            }
            (head.to_owned(), notes)
        }
        None => (without_parens, notes),
    }
}

/// Parse one ingredient line
///
/// `"1 1/2 cups flour (sifted)"` yields quantity 1.5, unit `cups`, name
/// `flour`, notes `sifted`. Returns `None` when no name remains.
#[must_use]
pub fn parse_ingredient(line: &str) -> Option<IngredientData> {
    let original = clean_text(line);
    if original.is_empty() {
        return None;
    }

    let (body, notes) = split_notes(&original);
    let mut rest = body.trim();
    let mut quantity = None;

    if let Some(found) = LEADING_QUANTITY
        .as_ref()
        .and_then(|pattern| pattern.captures(rest))
    {
        if let (Some(whole), Some(amount)) = (found.get(0), found.get(1)) {
            quantity = parse_quantity(amount.as_str());
            rest = rest[whole.end()..].trim_start();
        }
    }

    let mut unit = None;
    if quantity.is_some() {
        if let Some((word, remainder)) = rest.split_once(char::is_whitespace) {
            let candidate = word.trim_end_matches('.').to_lowercase();
            if COMMON_UNITS.contains(&candidate.as_str()) {
                unit = Some(candidate);
                rest = remainder.trim_start();
            }
        }
    }

    let name = rest.strip_prefix("of ").unwrap_or(rest).trim();
    if name.is_empty() {
        return None;
    }

    Some(IngredientData {
        name: name.to_owned(),
        quantity,
        unit,
        notes: (!notes.is_empty()).then(|| notes.join("; ")),
        original_text: Some(original.clone()),
    })
}
