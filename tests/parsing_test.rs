// ABOUTME: Unit tests for ingredient, duration, text, and weight parsing helpers
// ABOUTME: Covers fractions, unit detection, ISO durations, price stripping, and density estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nourishly_providers::parsing::{
    clean_optional, clean_text, estimate_grams, extract_numeric, extract_rating, normalize_rating,
    parse_duration_minutes, parse_ingredient, parse_quantity, remove_cost_info, truncate_name,
};

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-9)
}

// ============================================================================
// Quantities
// ============================================================================

#[test]
fn test_parse_quantity_forms() {
    assert!(close(parse_quantity("2"), 2.0));
    assert!(close(parse_quantity("2.5"), 2.5));
    assert!(close(parse_quantity("3/4"), 0.75));
    assert!(close(parse_quantity("1 1/2"), 1.5));
    assert!(close(parse_quantity("½"), 0.5));
    assert!(close(parse_quantity("1½"), 1.5));
    assert!(close(parse_quantity("1 ½"), 1.5));
    assert!(parse_quantity("a pinch").is_none());
    assert!(parse_quantity("1/0").is_none());
}

// ============================================================================
// Ingredient lines
// ============================================================================

#[test]
fn test_parse_ingredient_with_unit_and_notes() {
    let parsed = parse_ingredient("1 1/2 cups flour (sifted)").unwrap();

    assert!(close(parsed.quantity, 1.5));
    assert_eq!(parsed.unit.as_deref(), Some("cups"));
    assert_eq!(parsed.name, "flour");
    assert_eq!(parsed.notes.as_deref(), Some("sifted"));
    assert_eq!(
        parsed.original_text.as_deref(),
        Some("1 1/2 cups flour (sifted)")
    );
}

#[test]
fn test_parse_ingredient_comma_tail_becomes_notes() {
    let parsed = parse_ingredient("2 cloves garlic, minced").unwrap();

    assert!(close(parsed.quantity, 2.0));
    assert_eq!(parsed.unit.as_deref(), Some("cloves"));
    assert_eq!(parsed.name, "garlic");
    assert_eq!(parsed.notes.as_deref(), Some("minced"));
}

#[test]
fn test_parse_ingredient_range_takes_lower_bound() {
    let parsed = parse_ingredient("2-3 tbsp olive oil").unwrap();

    assert!(close(parsed.quantity, 2.0));
    assert_eq!(parsed.unit.as_deref(), Some("tbsp"));
    assert_eq!(parsed.name, "olive oil");
}

#[test]
fn test_parse_ingredient_without_quantity_keeps_whole_name() {
    let parsed = parse_ingredient("salt and pepper to taste").unwrap();

    assert!(parsed.quantity.is_none());
    assert!(parsed.unit.is_none());
    assert_eq!(parsed.name, "salt and pepper to taste");
}

#[test]
fn test_parse_ingredient_count_without_unit() {
    let parsed = parse_ingredient("3 large eggs").unwrap();

    assert!(close(parsed.quantity, 3.0));
    assert!(parsed.unit.is_none());
    assert_eq!(parsed.name, "large eggs");
}

#[test]
fn test_parse_ingredient_strips_of() {
    let parsed = parse_ingredient("1 pinch of salt").unwrap();

    assert_eq!(parsed.unit.as_deref(), Some("pinch"));
    assert_eq!(parsed.name, "salt");
}

#[test]
fn test_parse_ingredient_rejects_blank_and_bare_numbers() {
    assert!(parse_ingredient("   ").is_none());
    assert!(parse_ingredient("2").is_none());
}

// ============================================================================
// Durations
// ============================================================================

#[test]
fn test_parse_duration_iso() {
    assert_eq!(parse_duration_minutes("PT1H30M"), Some(90));
    assert_eq!(parse_duration_minutes("PT45M"), Some(45));
    assert_eq!(parse_duration_minutes("P1DT2H"), Some(1560));
    assert_eq!(parse_duration_minutes("pt20m"), Some(20));
}

#[test]
fn test_parse_duration_text_and_bare_numbers() {
    assert_eq!(parse_duration_minutes("45"), Some(45));
    assert_eq!(parse_duration_minutes("1 hour 15 minutes"), Some(75));
    assert_eq!(parse_duration_minutes("2 hrs"), Some(120));
}

#[test]
fn test_parse_duration_rejects_zero_and_garbage() {
    assert_eq!(parse_duration_minutes("PT0M"), None);
    assert_eq!(parse_duration_minutes(""), None);
    assert_eq!(parse_duration_minutes("overnight"), None);
}

// ============================================================================
// Text cleanup
// ============================================================================

#[test]
fn test_clean_text_decodes_entities_and_strips_tags() {
    assert_eq!(
        clean_text("  Mac &amp; <b>Cheese</b>\n  bake "),
        "Mac & Cheese bake"
    );
    assert_eq!(clean_optional(Some("  <br/> ")), None);
    assert_eq!(clean_optional(None), None);
    assert_eq!(clean_optional(Some(" Soup ")).as_deref(), Some("Soup"));
}

#[test]
fn test_extract_numeric_handles_separators_and_units() {
    assert!(close(extract_numeric("1,250 kcal"), 1250.0));
    assert!(close(extract_numeric("12.5 g"), 12.5));
    assert!(extract_numeric("none").is_none());
}

#[test]
fn test_ratings_are_normalized_to_five() {
    assert!((normalize_rating(4.5) - 4.5).abs() < f64::EPSILON);
    assert!((normalize_rating(9.0) - 4.5).abs() < f64::EPSILON);
    assert!((normalize_rating(42.0) - 5.0).abs() < f64::EPSILON);
    assert!(close(extract_rating("8 out of 10"), 4.0));
}

#[test]
fn test_remove_cost_info() {
    assert_eq!(
        remove_cost_info("2 tomatoes (vine ripe, $1.28)"),
        "2 tomatoes (vine ripe)"
    );
    assert_eq!(remove_cost_info("1 cup rice ($0.43)"), "1 cup rice");
    assert_eq!(remove_cost_info("1 onion (diced)"), "1 onion (diced)");
}

#[test]
fn test_truncate_name() {
    assert_eq!(truncate_name("short", 10), "short");
    assert_eq!(truncate_name("abcdefghij", 4), "abcd...");
    assert_eq!(truncate_name("crème brûlée", 5), "crème...");
}

// ============================================================================
// Weight estimation
// ============================================================================

#[test]
fn test_estimate_grams_mass_units_always_convert() {
    assert!(close(estimate_grams(2.0, Some("kg"), "anything"), 2000.0));
    assert!(close(estimate_grams(1.0, Some("lb"), "unknown food"), 453.6));
    assert!(close(estimate_grams(150.0, Some("g"), "x"), 150.0));
}

#[test]
fn test_estimate_grams_volume_uses_density() {
    assert!(close(estimate_grams(1.0, Some("cup"), "all-purpose flour"), 120.0));
    assert!(close(estimate_grams(2.0, Some("tbsp"), "olive oil"), 27.6));
    assert!(estimate_grams(1.0, Some("cup"), "mystery powder").is_none());
}

#[test]
fn test_estimate_grams_counts_use_piece_weight() {
    assert!(close(estimate_grams(2.0, None, "large eggs"), 100.0));
    assert!(close(estimate_grams(3.0, Some("cloves"), "garlic"), 9.0));
    assert!(estimate_grams(2.0, None, "saffron").is_none());
    assert!(estimate_grams(-1.0, Some("g"), "rice").is_none());
}
