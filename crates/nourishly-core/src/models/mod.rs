// ABOUTME: Normalized record types shared by every provider and the orchestration layer
// ABOUTME: Recipe, nutrition, macro analysis, classification, and search filter definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! Provider-agnostic records.
//!
//! List-typed fields deserialize `null` as an empty sequence and every record
//! carries the identifier of the provider that produced it.

use serde::{Deserialize, Deserializer};

/// Cuisine labels and classification results
pub mod classification;
/// Search filters recognized by recipe providers
pub mod filters;
/// Macro nutrition values and analysis results
pub mod nutrition;
/// Recipe and ingredient records
pub mod recipe;

pub use classification::{ClassificationResult, ConfidenceLevel, Cuisine, CuisineAlternative};
pub use filters::SearchFilters;
pub use nutrition::{
    AnalysisType, FailureStatus, IngredientMacros, MacroAnalysisFailure, MacroAnalysisReport,
    MacroAnalysisResult, MacroNutrition,
};
pub use recipe::{IngredientData, RecipeData};

/// Deserialize a list field, treating `null` the same as an absent field
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
