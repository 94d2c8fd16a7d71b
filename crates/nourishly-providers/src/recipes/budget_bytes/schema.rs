// ABOUTME: schema.org Recipe extraction from JSON-LD blocks and normalization into RecipeData
// ABOUTME: Handles @graph wrappers, HowToSection instructions, ISO durations, and price-annotated ingredients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use scraper::{Html, Selector};
use serde_json::Value;

use super::discovery::slug_of;
use crate::constants::provider_ids::BUDGET_BYTES;
use crate::errors::NormalizationError;
use crate::models::{IngredientData, MacroNutrition, RecipeData};
use crate::parsing::{
    clean_optional, clean_text, extract_numeric, normalize_rating, parse_duration_minutes,
    parse_ingredient, remove_cost_info,
};
use crate::utils::conversions::f64_to_u32;

/// First schema.org `Recipe` object found in the page's JSON-LD scripts
///
/// Blocks that fail to parse are skipped.
#[must_use]
pub fn extract_recipe_json_ld(html: &str) -> Option<Value> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|script| {
            let text: String = script.text().collect();
            serde_json::from_str::<Value>(text.trim()).ok()
        })
        .find_map(|block| find_recipe(&block).cloned())
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            map.get("@graph").and_then(find_recipe)
        }
        _ => None,
    }
}

/// Strings from a value that may be a string, an array of strings, or absent
fn text_values(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(clean_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(clean_text)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn collect_instructions(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            let text = clean_text(text);
            if !text.is_empty() {
                steps.push(text);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_instructions(item, steps);
            }
        }
        Value::Object(map) => {
            if let Some(nested) = map.get("itemListElement") {
                collect_instructions(nested, steps);
            } else if let Some(text) = map.get("text").or_else(|| map.get("name")) {
                collect_instructions(text, steps);
            }
        }
        _ => {}
    }
}

fn image_url(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(url) => Some(url.clone()),
        Value::Array(items) => items.iter().find_map(|item| image_url(Some(item))),
        Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

fn author_name(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(name) => clean_optional(Some(name)),
        Value::Array(items) => items.iter().find_map(|item| author_name(Some(item))),
        Value::Object(map) => clean_optional(map.get("name").and_then(Value::as_str)),
        _ => None,
    }
}

fn first_integer(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| *v >= 1.0).map(f64_to_u32),
        Value::String(s) => extract_numeric(s)
            .filter(|v| *v >= 1.0)
            .map(|v| f64_to_u32(v.trunc())),
        Value::Array(items) => items.iter().find_map(|item| first_integer(Some(item))),
        _ => None,
    }
}

fn duration(raw: &Value, key: &str) -> Option<u32> {
    raw.get(key)
        .and_then(Value::as_str)
        .and_then(parse_duration_minutes)
}

fn rating(raw: &Value) -> Option<f64> {
    let value = raw.get("aggregateRating")?.get("ratingValue")?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => extract_numeric(s),
        _ => None,
    }?;
    Some(normalize_rating(number))
}

/// `https://schema.org/GlutenFreeDiet` becomes `glutenfree`
fn diet_label(value: &str) -> Option<String> {
    let name = value.rsplit('/').next().unwrap_or(value);
    let name = name.strip_suffix("Diet").unwrap_or(name);
    let label = clean_text(name).to_lowercase();
    (!label.is_empty()).then_some(label)
}

fn dietary_restrictions(raw: &Value) -> Vec<String> {
    let labels: Vec<String> = match raw.get("suitableForDiet") {
        Some(Value::String(s)) => s
            .split([',', ';', '&', '|'])
            .filter_map(diet_label)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(diet_label)
            .collect(),
        _ => Vec::new(),
    };
    let mut unique = Vec::with_capacity(labels.len());
    for label in labels {
        if !unique.contains(&label) {
            unique.push(label);
        }
    }
    unique
}

fn nutrition(raw: &Value) -> Option<MacroNutrition> {
    let info = raw.get("nutrition")?;
    let field = |key: &str| match info.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => extract_numeric(s),
        _ => None,
    };
    let macros = MacroNutrition {
        calories: field("calories"),
        protein: field("proteinContent"),
        carbohydrates: field("carbohydrateContent"),
        fat: field("fatContent"),
        fiber: field("fiberContent"),
        sugar: field("sugarContent"),
        sodium: field("sodiumContent"),
        saturated_fat: field("saturatedFatContent"),
        cholesterol: field("cholesterolContent"),
    };
    macros.has_core_macros().then_some(macros)
}

fn ingredient(line: &str) -> Option<IngredientData> {
    let cleaned = remove_cost_info(&clean_text(line));
    if cleaned.is_empty() {
        return None;
    }
    parse_ingredient(&cleaned).or_else(|| {
        Some(IngredientData {
            original_text: Some(cleaned.clone()),
            ..IngredientData::named(cleaned)
        })
    })
}

/// Map a schema.org `Recipe` object onto a [`RecipeData`]
///
/// # Errors
///
/// Returns a [`NormalizationError`] when `name`, `recipeIngredient`, or
/// `recipeInstructions` is missing or empty
pub fn normalize_recipe(raw: &Value) -> Result<RecipeData, NormalizationError> {
    let title = clean_optional(raw.get("name").and_then(Value::as_str))
        .ok_or_else(|| NormalizationError::missing_field(BUDGET_BYTES, "name", raw))?;

    let ingredients: Vec<IngredientData> = raw
        .get("recipeIngredient")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .filter_map(ingredient)
                .collect()
        })
        .unwrap_or_default();
    if ingredients.is_empty() {
        return Err(NormalizationError::missing_field(
            BUDGET_BYTES,
            "recipeIngredient",
            raw,
        ));
    }

    let mut instructions = Vec::new();
    if let Some(value) = raw.get("recipeInstructions") {
        collect_instructions(value, &mut instructions);
    }
    if instructions.is_empty() {
        return Err(NormalizationError::missing_field(
            BUDGET_BYTES,
            "recipeInstructions",
            raw,
        ));
    }

    let mut recipe = RecipeData::new(title, BUDGET_BYTES);
    recipe.source_url = raw.get("url").and_then(Value::as_str).map(str::to_owned);
    recipe.external_id = recipe.source_url.as_deref().and_then(slug_of);
    recipe.description = clean_optional(raw.get("description").and_then(Value::as_str));
    recipe.ingredients = ingredients;
    recipe.instructions = instructions;
    recipe.prep_time_minutes = duration(raw, "prepTime");
    recipe.cook_time_minutes = duration(raw, "cookTime");
    recipe.total_time_minutes = duration(raw, "totalTime");
    recipe.servings = first_integer(raw.get("recipeYield"));
    recipe.image_url = image_url(raw.get("image"));
    recipe.author = author_name(raw.get("author"));
    recipe.rating = rating(raw);

    let cuisines = text_values(raw.get("recipeCuisine"));
    recipe.cuisine_type = cuisines.first().cloned();
    let mut tags = text_values(raw.get("recipeCategory"));
    tags.extend(cuisines);
    tags.dedup();
    recipe.tags = tags;
    recipe.dietary_restrictions = dietary_restrictions(raw);
    recipe.nutrition = nutrition(raw);

    Ok(recipe)
}
