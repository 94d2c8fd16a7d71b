// ABOUTME: Unit tests for the normalized recipe, nutrition, and classification records
// ABOUTME: Confidence tiers, serde defaults for list fields, macro arithmetic, and search filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nourishly_core::models::{
    AnalysisType, ClassificationResult, ConfidenceLevel, Cuisine, CuisineAlternative,
    FailureStatus, IngredientData, IngredientMacros, MacroAnalysisReport, MacroAnalysisResult,
    MacroNutrition, RecipeData, SearchFilters,
};
use nourishly_providers::render_classification_text;
use serde_json::json;

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_confidence_tier_boundaries() {
    assert_eq!(ConfidenceLevel::from_confidence(0.0), ConfidenceLevel::Low);
    assert_eq!(ConfidenceLevel::from_confidence(0.599), ConfidenceLevel::Low);
    assert_eq!(ConfidenceLevel::from_confidence(0.6), ConfidenceLevel::Medium);
    assert_eq!(ConfidenceLevel::from_confidence(0.799), ConfidenceLevel::Medium);
    assert_eq!(ConfidenceLevel::from_confidence(0.8), ConfidenceLevel::High);
    assert_eq!(ConfidenceLevel::from_confidence(1.0), ConfidenceLevel::High);
}

#[test]
fn test_classification_clamps_confidence_and_derives_tier() {
    let over = ClassificationResult::new(Cuisine::Thai, 1.7, "test");
    let nan = ClassificationResult::new(Cuisine::Thai, f64::NAN, "test");

    assert!((over.confidence - 1.0).abs() < f64::EPSILON);
    assert!(over.is_high_confidence());
    assert!(nan.confidence.abs() < f64::EPSILON);
    assert_eq!(nan.confidence_level, ConfidenceLevel::Low);
}

#[test]
fn test_alternatives_are_sorted_and_capped() {
    let alternatives = vec![
        CuisineAlternative::new(Cuisine::Greek, 0.05),
        CuisineAlternative::new(Cuisine::French, 0.2),
        CuisineAlternative::new(Cuisine::Spanish, 0.1),
        CuisineAlternative::new(Cuisine::Mexican, 0.01),
        CuisineAlternative::new(Cuisine::Korean, 0.02),
        CuisineAlternative::new(Cuisine::Indian, 0.03),
        CuisineAlternative::new(Cuisine::German, 0.04),
    ];
    let result =
        ClassificationResult::new(Cuisine::Italian, 0.5, "test").with_alternatives(alternatives);

    assert_eq!(result.alternatives.len(), 5);
    assert_eq!(result.alternatives[0].cuisine, Cuisine::French);
    assert_eq!(result.alternatives[4].cuisine, Cuisine::Indian);
}

#[test]
fn test_cuisine_labels_parse_case_insensitively() {
    assert_eq!(Cuisine::from_label("italian"), Cuisine::Italian);
    assert_eq!(Cuisine::from_label(" Middle Eastern "), Cuisine::MiddleEastern);
    assert_eq!(Cuisine::from_label("Atlantean"), Cuisine::Other);
    assert_eq!("thai".parse::<Cuisine>().unwrap(), Cuisine::Thai);
    assert_eq!(Cuisine::MiddleEastern.to_string(), "Middle Eastern");
    assert!(Cuisine::candidate_labels().contains(&"Other"));
}

#[test]
fn test_deserialized_classification_recomputes_tier() {
    let result: ClassificationResult = serde_json::from_value(json!({
        "primary_cuisine": "Japanese",
        "confidence": 0.65,
        "confidence_level": "HIGH",
        "alternatives": null,
        "provider": "cache"
    }))
    .unwrap();

    assert_eq!(result.primary_cuisine, Cuisine::Japanese);
    assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
    assert!(result.alternatives.is_empty());
}

#[test]
fn test_classification_serializes_tier_and_label() {
    let json = serde_json::to_value(ClassificationResult::new(Cuisine::MiddleEastern, 0.9, "hf"))
        .unwrap();

    assert_eq!(json["primary_cuisine"], "Middle Eastern");
    assert_eq!(json["confidence_level"], "HIGH");
    assert!(json.get("reasoning").is_none());
}

#[test]
fn test_render_classification_text() {
    let ingredients = vec!["pasta".to_owned(), " ".to_owned(), "basil".to_owned()];

    assert_eq!(
        render_classification_text(" Pesto Pasta ", &ingredients),
        "Pesto Pasta. Ingredients: pasta, basil"
    );
    assert_eq!(render_classification_text("Pesto", &[]), "Pesto");
    assert_eq!(
        render_classification_text("", &ingredients),
        "Ingredients: pasta, basil"
    );

    let many: Vec<String> = (0..20).map(|i| format!("item{i}")).collect();
    let rendered = render_classification_text("Stew", &many);
    assert!(rendered.ends_with("item14"));
}

// ============================================================================
// Recipes
// ============================================================================

#[test]
fn test_recipe_null_lists_deserialize_as_empty() {
    let recipe: RecipeData = serde_json::from_value(json!({
        "title": "Toast",
        "provider": "test",
        "ingredients": null,
        "instructions": null,
        "tags": null
    }))
    .unwrap();

    assert!(recipe.ingredients.is_empty());
    assert!(recipe.instructions.is_empty());
    assert!(recipe.tags.is_empty());
    assert!(recipe.dietary_restrictions.is_empty());
    assert!(recipe.servings.is_none());
}

#[test]
fn test_recipe_serialization_omits_absent_fields() {
    let json = serde_json::to_value(RecipeData::new("Toast", "test")).unwrap();

    assert_eq!(json["title"], "Toast");
    assert!(json.get("servings").is_none());
    assert!(json.get("nutrition").is_none());
    assert_eq!(json["ingredients"], json!([]));
}

#[test]
fn test_ingredient_text_prefers_original_lines() {
    let mut recipe = RecipeData::new("Omelette", "test");
    recipe.ingredients = vec![
        IngredientData {
            quantity: Some(2.0),
            ..IngredientData::named("eggs")
        },
        IngredientData {
            original_text: Some("1 tbsp butter, softened".into()),
            ..IngredientData::named("butter")
        },
    ];

    assert_eq!(recipe.ingredient_text(), "2 eggs\n1 tbsp butter, softened");
    assert_eq!(recipe.ingredient_names(), vec!["eggs", "butter"]);
}

#[test]
fn test_has_nutrition_requires_core_macros() {
    let mut recipe = RecipeData::new("Tea", "test");
    assert!(!recipe.has_nutrition());

    recipe.nutrition = Some(MacroNutrition {
        sodium: Some(5.0),
        ..MacroNutrition::default()
    });
    assert!(!recipe.has_nutrition());

    recipe.nutrition = Some(MacroNutrition {
        calories: Some(0.0),
        ..MacroNutrition::default()
    });
    assert!(recipe.has_nutrition());
}

// ============================================================================
// Nutrition
// ============================================================================

#[test]
fn test_accumulate_keeps_unknown_fields_absent() {
    let mut total = MacroNutrition {
        calories: Some(100.0),
        ..MacroNutrition::default()
    };
    total.accumulate(&MacroNutrition {
        calories: Some(50.0),
        protein: Some(3.0),
        ..MacroNutrition::default()
    });

    assert_eq!(total.calories, Some(150.0));
    assert_eq!(total.protein, Some(3.0));
    assert!(total.fat.is_none());
}

#[test]
fn test_calories_from_macros_needs_all_three() {
    let partial = MacroNutrition {
        protein: Some(10.0),
        carbohydrates: Some(20.0),
        ..MacroNutrition::default()
    };
    let complete = MacroNutrition {
        fat: Some(5.0),
        ..partial
    };

    assert!(partial.calories_from_macros().is_none());
    assert_eq!(complete.calories_from_macros(), Some(165.0));
}

#[test]
fn test_recipe_report_sums_items_and_splits_servings() {
    let item = |name: &str, kcal: f64, grams: Option<f64>| IngredientMacros {
        food_name: name.into(),
        weight_g: grams,
        macros: MacroNutrition {
            calories: Some(kcal),
            ..MacroNutrition::default()
        },
    };
    let report = MacroAnalysisReport::recipe(
        "soup",
        vec![item("onion", 40.0, Some(110.0)), item("stock", 20.0, None)],
        Some(4),
        "test",
        1.3,
    );

    assert_eq!(report.analysis_type, AnalysisType::Recipe);
    assert_eq!(report.macros.calories, Some(60.0));
    assert_eq!(report.total_weight_g, Some(110.0));
    assert!((report.confidence - 1.0).abs() < f64::EPSILON);
    assert_eq!(report.per_serving().unwrap().calories, Some(15.0));

    let no_servings = MacroAnalysisReport::recipe("soup", vec![], Some(0), "test", 0.5);
    assert!(no_servings.per_serving().is_none());
}

#[test]
fn test_analysis_result_is_tagged_by_outcome() {
    let failure = MacroAnalysisResult::failure(
        "kale",
        AnalysisType::Ingredient,
        FailureStatus::NotFound,
        "no match",
    );
    let json = serde_json::to_value(&failure).unwrap();

    assert_eq!(json["outcome"], "failure");
    assert_eq!(json["status"], "not_found");
    assert!(!failure.is_success());
    assert!(failure.report().is_none());
    assert_eq!(failure.error_message(), Some("no match"));

    let success = MacroAnalysisResult::Success(MacroAnalysisReport::ingredient(
        "kale",
        MacroNutrition::default(),
        "test",
        0.8,
    ));
    assert_eq!(serde_json::to_value(&success).unwrap()["outcome"], "success");
    assert!(success.error_message().is_none());
}

// ============================================================================
// Search filters
// ============================================================================

#[test]
fn test_filters_from_pairs_skip_unknown_and_invalid() {
    let filters = SearchFilters::from_pairs([
        ("cuisine", "Italian"),
        ("max_cook_time", "abc"),
        ("max_prep_time", "15"),
        ("colour", "red"),
        ("diet", "  "),
    ]);

    assert_eq!(filters.cuisine.as_deref(), Some("Italian"));
    assert_eq!(filters.max_prep_time, Some(15));
    assert!(filters.max_cook_time.is_none());
    assert!(filters.diet.is_none());
    assert!(!filters.is_empty());
    assert!(SearchFilters::default().is_empty());
}

#[test]
fn test_filters_match_only_checkable_fields() {
    let mut recipe = RecipeData::new("Salad", "test");
    recipe.cuisine_type = Some("greek".into());
    recipe.prep_time_minutes = Some(10);
    recipe.dietary_restrictions = vec!["vegetarian".into()];

    let matching = SearchFilters {
        cuisine: Some("Greek".into()),
        diet: Some("Vegetarian".into()),
        max_prep_time: Some(10),
        max_cook_time: Some(5),
        ..SearchFilters::default()
    };
    let too_slow = SearchFilters {
        max_prep_time: Some(5),
        ..SearchFilters::default()
    };
    let wrong_diet = SearchFilters {
        diet: Some("vegan".into()),
        ..SearchFilters::default()
    };

    assert!(matching.matches(&recipe));
    assert!(!too_slow.matches(&recipe));
    assert!(!wrong_diet.matches(&recipe));
}
