// ABOUTME: Normalized recipe and ingredient records produced by recipe providers
// ABOUTME: Optional descriptive fields stay absent rather than defaulting to zero or empty text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use serde::{Deserialize, Serialize};

use super::nutrition::MacroNutrition;

/// A single ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientData {
    /// Ingredient name without quantity, unit, or notes
    pub name: String,
    /// Numeric quantity when one could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Measure (cup, tbsp, g, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Parenthetical or trailing preparation notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Line exactly as the source presented it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl IngredientData {
    /// Ingredient with only a name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            notes: None,
            original_text: None,
        }
    }

    /// Original line when present, otherwise a rendering of the parsed parts
    #[must_use]
    pub fn display_text(&self) -> String {
        if let Some(original) = &self.original_text {
            return original.clone();
        }
        let mut parts = Vec::with_capacity(3);
        if let Some(quantity) = self.quantity {
            parts.push(format!("{quantity}"));
        }
        if let Some(unit) = &self.unit {
            parts.push(unit.clone());
        }
        parts.push(self.name.clone());
        parts.join(" ")
    }
}

/// Provider-agnostic recipe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeData {
    /// Recipe title
    pub title: String,
    /// Identifier of the provider that produced this record
    pub provider: String,
    /// Provider-native identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Canonical URL of the recipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ingredient lines in source order
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub ingredients: Vec<IngredientData>,
    /// Instruction steps in source order
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub instructions: Vec<String>,
    /// Preparation time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    /// Cooking time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    /// Total time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_minutes: Option<u32>,
    /// Number of servings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    /// Cuisine label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    /// Difficulty label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    /// Hero image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Nutrition per serving, or for the whole recipe when servings are unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<MacroNutrition>,
    /// Free-form tags (category, cuisine, labels)
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub tags: Vec<String>,
    /// Lowercase dietary restriction labels
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub dietary_restrictions: Vec<String>,
    /// Author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Rating on a 0-5 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl RecipeData {
    /// Record with the required fields set and everything else absent
    #[must_use]
    pub fn new(title: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            provider: provider.into(),
            external_id: None,
            source_url: None,
            description: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time_minutes: None,
            cook_time_minutes: None,
            total_time_minutes: None,
            servings: None,
            cuisine_type: None,
            difficulty_level: None,
            image_url: None,
            nutrition: None,
            tags: Vec::new(),
            dietary_restrictions: Vec::new(),
            author: None,
            rating: None,
        }
    }

    /// Ingredient names, in order, for classification prompts
    #[must_use]
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.name.clone()).collect()
    }

    /// Ingredient lines as text, one per line, for macro analysis
    #[must_use]
    pub fn ingredient_text(&self) -> String {
        self.ingredients
            .iter()
            .map(IngredientData::display_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the source published usable nutrition
    #[must_use]
    pub fn has_nutrition(&self) -> bool {
        self.nutrition
            .as_ref()
            .is_some_and(MacroNutrition::has_core_macros)
    }
}
