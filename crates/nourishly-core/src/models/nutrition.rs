// ABOUTME: Macro nutrition values and the result type returned by macro analysis
// ABOUTME: Absent values mean unknown; zero is a measured value and is kept distinct
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use serde::{Deserialize, Serialize};

use crate::constants::macros::{
    CARBOHYDRATE_KCAL_PER_GRAM, FAT_KCAL_PER_GRAM, PROTEIN_KCAL_PER_GRAM,
};

/// Macro and selected micro nutrients
///
/// Calories are kcal, sodium and cholesterol are milligrams, everything else
/// is grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroNutrition {
    /// Energy (kcal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Protein (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    /// Total carbohydrates (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    /// Total fat (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    /// Dietary fiber (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    /// Total sugars (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    /// Sodium (mg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    /// Saturated fat (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<f64>,
    /// Cholesterol (mg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<f64>,
}

impl MacroNutrition {
    /// Whether any of calories, protein, carbohydrates, or fat is known
    #[must_use]
    pub const fn has_core_macros(&self) -> bool {
        self.calories.is_some()
            || self.protein.is_some()
            || self.carbohydrates.is_some()
            || self.fat.is_some()
    }

    /// Whether no field is known at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.has_core_macros()
            && self.fiber.is_none()
            && self.sugar.is_none()
            && self.sodium.is_none()
            && self.saturated_fat.is_none()
            && self.cholesterol.is_none()
    }

    /// Energy implied by protein, carbohydrates, and fat; `None` unless all three are known
    #[must_use]
    pub fn calories_from_macros(&self) -> Option<f64> {
        Some(
            self.protein? * PROTEIN_KCAL_PER_GRAM
                + self.carbohydrates? * CARBOHYDRATE_KCAL_PER_GRAM
                + self.fat? * FAT_KCAL_PER_GRAM,
        )
    }

    /// Multiply every known value by `factor`
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |v: Option<f64>| v.map(|x| x * factor);
        Self {
            calories: scale(self.calories),
            protein: scale(self.protein),
            carbohydrates: scale(self.carbohydrates),
            fat: scale(self.fat),
            fiber: scale(self.fiber),
            sugar: scale(self.sugar),
            sodium: scale(self.sodium),
            saturated_fat: scale(self.saturated_fat),
            cholesterol: scale(self.cholesterol),
        }
    }

    /// Add `other` into `self` field by field
    ///
    /// A field stays `None` only while neither side has reported it.
    pub fn accumulate(&mut self, other: &Self) {
        fn add(total: &mut Option<f64>, value: Option<f64>) {
            if let Some(v) = value {
                *total = Some(total.unwrap_or(0.0) + v);
            }
        }
        add(&mut self.calories, other.calories);
        add(&mut self.protein, other.protein);
        add(&mut self.carbohydrates, other.carbohydrates);
        add(&mut self.fat, other.fat);
        add(&mut self.fiber, other.fiber);
        add(&mut self.sugar, other.sugar);
        add(&mut self.sodium, other.sodium);
        add(&mut self.saturated_fat, other.saturated_fat);
        add(&mut self.cholesterol, other.cholesterol);
    }
}

/// What was analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// A single ingredient with a quantity
    Ingredient,
    /// A multi-line recipe
    Recipe,
}

/// Nutrition of one item inside a recipe analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientMacros {
    /// Food name as resolved by the provider
    pub food_name: String,
    /// Weight the values refer to, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_g: Option<f64>,
    /// Nutrition for that weight
    pub macros: MacroNutrition,
}

/// Successful macro analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroAnalysisReport {
    /// Ingredient or recipe name analyzed
    pub food_name: String,
    /// Ingredient or recipe
    pub analysis_type: AnalysisType,
    /// Totals for the analyzed quantity
    pub macros: MacroNutrition,
    /// Provider that produced the values
    pub provider: String,
    /// Provider confidence in [0, 1]
    pub confidence: f64,
    /// Serving size the values refer to, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size_g: Option<f64>,
    /// Summed weight of all recipe items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight_g: Option<f64>,
    /// Servings the recipe yields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    /// Per-item breakdown for recipe analyses
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub ingredients: Vec<IngredientMacros>,
}

impl MacroAnalysisReport {
    /// Report for a single ingredient
    #[must_use]
    pub fn ingredient(
        food_name: impl Into<String>,
        macros: MacroNutrition,
        provider: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            food_name: food_name.into(),
            analysis_type: AnalysisType::Ingredient,
            macros,
            provider: provider.into(),
            confidence: clamp_unit(confidence),
            serving_size_g: None,
            total_weight_g: None,
            servings: None,
            ingredients: Vec::new(),
        }
    }

    /// Report for a whole recipe built from per-item results
    #[must_use]
    pub fn recipe(
        food_name: impl Into<String>,
        ingredients: Vec<IngredientMacros>,
        servings: Option<u32>,
        provider: impl Into<String>,
        confidence: f64,
    ) -> Self {
        let mut macros = MacroNutrition::default();
        let mut total_weight: Option<f64> = None;
        for item in &ingredients {
            macros.accumulate(&item.macros);
            if let Some(w) = item.weight_g {
                total_weight = Some(total_weight.unwrap_or(0.0) + w);
            }
        }
        Self {
            food_name: food_name.into(),
            analysis_type: AnalysisType::Recipe,
            macros,
            provider: provider.into(),
            confidence: clamp_unit(confidence),
            serving_size_g: None,
            total_weight_g: total_weight,
            servings,
            ingredients,
        }
    }

    /// Totals divided by the serving count, when one is known and positive
    #[must_use]
    pub fn per_serving(&self) -> Option<MacroNutrition> {
        match self.servings {
            Some(servings) if servings > 0 => Some(self.macros.scaled(1.0 / f64::from(servings))),
            _ => None,
        }
    }
}

/// Why a macro analysis failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStatus {
    /// The provider call or every fallback failed
    Failed,
    /// The food or recipe was not recognized
    NotFound,
}

/// Failed macro analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroAnalysisFailure {
    /// Ingredient or recipe name that was requested
    pub food_name: String,
    /// Ingredient or recipe
    pub analysis_type: AnalysisType,
    /// Failure category
    pub status: FailureStatus,
    /// Human readable explanation
    pub error_message: String,
}

/// Outcome of a macro analysis
///
/// Nutrition values exist only on the `Success` branch, so callers must match
/// before reading them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MacroAnalysisResult {
    /// Analysis succeeded
    Success(MacroAnalysisReport),
    /// Analysis failed
    Failure(MacroAnalysisFailure),
}

impl MacroAnalysisResult {
    /// Failure with the given status and message
    #[must_use]
    pub fn failure(
        food_name: impl Into<String>,
        analysis_type: AnalysisType,
        status: FailureStatus,
        error_message: impl Into<String>,
    ) -> Self {
        Self::Failure(MacroAnalysisFailure {
            food_name: food_name.into(),
            analysis_type,
            status,
            error_message: error_message.into(),
        })
    }

    /// Success flag
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Report when successful
    #[must_use]
    pub const fn report(&self) -> Option<&MacroAnalysisReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    /// Error message when failed
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(&failure.error_message),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
