// ABOUTME: Search filters recognized by recipe providers
// ABOUTME: Unrecognized keys are ignored and unknown record values never exclude a recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use serde::{Deserialize, Serialize};

use super::recipe::RecipeData;

/// Optional constraints applied to a recipe search
///
/// Deserializing ignores keys outside the recognized set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Cuisine label, compared case-insensitively
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Diet label (vegan, low-carb, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    /// Upper bound on preparation minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prep_time: Option<u32>,
    /// Upper bound on cooking minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cook_time: Option<u32>,
    /// Difficulty label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl SearchFilters {
    /// Build filters from loose key/value pairs
    ///
    /// Unknown keys and unparseable numbers are skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "cuisine" => filters.cuisine = Some(value.to_owned()),
                "diet" => filters.diet = Some(value.to_owned()),
                "max_prep_time" => filters.max_prep_time = value.parse().ok(),
                "max_cook_time" => filters.max_cook_time = value.parse().ok(),
                "difficulty" => filters.difficulty = Some(value.to_owned()),
                _ => {}
            }
        }
        filters
    }

    /// Whether no constraint is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cuisine.is_none()
            && self.diet.is_none()
            && self.max_prep_time.is_none()
            && self.max_cook_time.is_none()
            && self.difficulty.is_none()
    }

    /// Whether a record satisfies every constraint that can be checked
    ///
    /// A field the record does not carry is treated as compatible.
    #[must_use]
    pub fn matches(&self, recipe: &RecipeData) -> bool {
        let label_ok = |wanted: Option<&String>, actual: Option<&String>| match (wanted, actual) {
            (Some(w), Some(a)) => w.eq_ignore_ascii_case(a),
            _ => true,
        };
        let bound_ok = |max: Option<u32>, actual: Option<u32>| match (max, actual) {
            (Some(m), Some(a)) => a <= m,
            _ => true,
        };
        let diet_ok = self.diet.as_ref().is_none_or(|diet| {
            let listed: Vec<&String> = recipe
                .dietary_restrictions
                .iter()
                .chain(recipe.tags.iter())
                .collect();
            listed.is_empty() || listed.iter().any(|l| l.eq_ignore_ascii_case(diet))
        });

        label_ok(self.cuisine.as_ref(), recipe.cuisine_type.as_ref())
            && label_ok(self.difficulty.as_ref(), recipe.difficulty_level.as_ref())
            && bound_ok(self.max_prep_time, recipe.prep_time_minutes)
            && bound_ok(self.max_cook_time, recipe.cook_time_minutes)
            && diet_ok
    }
}
