// ABOUTME: Parsing helpers shared by recipe and macro providers
// ABOUTME: Text cleanup, ingredient lines, ISO durations, and weight estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// Quantity and unit to gram estimation
pub mod conversion;
/// ISO 8601 and free-text durations
pub mod duration;
/// Ingredient line parsing
pub mod ingredient;
/// Text cleanup and number extraction
pub mod text;

pub use conversion::estimate_grams;
pub use duration::parse_duration_minutes;
pub use ingredient::{parse_ingredient, parse_quantity};
pub use text::{
    clean_optional, clean_text, extract_numeric, extract_rating, normalize_rating, remove_cost_info,
    truncate_name,
};
