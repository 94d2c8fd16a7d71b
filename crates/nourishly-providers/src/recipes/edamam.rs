// ABOUTME: Edamam Recipe Search API provider
// ABOUTME: Keyword search with server-side filters and normalization of Edamam recipe objects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! # Edamam Recipe Search
//!
//! Wraps `GET /api/recipes/v2` (public recipes). Credentials are the account
//! `app_key` (the provider API key) and the `app_id` option. Edamam only knows
//! a recipe's total time, so `time` is sent as the sum of both time bounds when
//! both are set. The time bounds and `difficulty` are always applied to the
//! normalized records as well.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument, Span};

use crate::constants::endpoints::EDAMAM_BASE_URL;
use crate::constants::provider_ids::EDAMAM;
use crate::core::{Provider, ProviderConfig, RecipeProvider};
use crate::errors::{NormalizationError, ProviderResult};
use crate::http_client::shared_client;
use crate::models::{IngredientData, MacroNutrition, RecipeData, SearchFilters};
use crate::parsing::{clean_optional, clean_text, parse_ingredient};
use crate::rate_limiter::RateLimiter;
use crate::utils::conversions::{f64_to_u32, positive_minutes};
use crate::utils::{ensure_success, read_json};

/// Option key holding the Edamam application id
pub const APP_ID_OPTION: &str = "app_id";

// Edamam uses this placeholder when an ingredient has no measure
const NO_MEASURE: &str = "<unit>";

/// Edamam recipe search provider
pub struct EdamamProvider {
    config: ProviderConfig,
    base_url: String,
    client: Client,
    limiter: RateLimiter,
    span: Span,
}

impl EdamamProvider {
    /// Build the provider; performs no I/O
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let base_url = config.base_url_or(EDAMAM_BASE_URL);
        let limiter = RateLimiter::new(config.min_interval);
        Self {
            span: info_span!("provider", provider = EDAMAM),
            client: shared_client().clone(),
            base_url,
            limiter,
            config,
        }
    }

    fn credentials(&self) -> Vec<(&'static str, String)> {
        vec![
            ("type", "public".to_owned()),
            (
                "app_id",
                self.config.option(APP_ID_OPTION).unwrap_or_default().to_owned(),
            ),
            ("app_key", self.config.api_key().unwrap_or_default().to_owned()),
        ]
    }

    fn search_params(query: &str, filters: &SearchFilters) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", query.to_owned())];
        if let Some(cuisine) = &filters.cuisine {
            params.push(("cuisineType", cuisine.clone()));
        }
        if let Some(diet) = &filters.diet {
            params.push(("diet", diet.to_lowercase()));
        }
        if let (Some(max_prep), Some(max_cook)) = (filters.max_prep_time, filters.max_cook_time) {
            let max_total = max_prep.saturating_add(max_cook);
            params.push(("time", format!("1-{max_total}")));
        }
        params
    }
}

/// Registry constructor
///
/// # Errors
///
/// Never fails; the signature matches the registry factory type
pub fn create(config: ProviderConfig) -> ProviderResult<Arc<dyn RecipeProvider>> {
    Ok(Arc::new(EdamamProvider::new(config)))
}

#[async_trait]
impl Provider for EdamamProvider {
    fn name(&self) -> &str {
        EDAMAM
    }

    fn validate_config(&self) -> bool {
        self.config.api_key().is_some() && self.config.option(APP_ID_OPTION).is_some()
    }
}

#[async_trait]
impl RecipeProvider for EdamamProvider {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> ProviderResult<Vec<RecipeData>> {
        async {
            if limit == 0 {
                return Ok(Vec::new());
            }
            self.limiter.acquire().await;

            let mut params = self.credentials();
            params.extend(Self::search_params(query, filters));
            let response = self.client.get(&self.base_url).query(&params).send().await?;
            let body: Value = read_json(ensure_success(response, EDAMAM).await?, EDAMAM, "search response").await?;

            let hits = body
                .get("hits")
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice);
            debug!(query, hits = hits.len(), "Edamam search returned");

            let mut recipes = Vec::with_capacity(limit.min(hits.len()));
            for hit in hits {
                let Some(raw) = hit.get("recipe") else {
                    continue;
                };
                let recipe = self.normalize(raw)?;
                if filters.matches(&recipe) {
                    recipes.push(recipe);
                }
                if recipes.len() >= limit {
                    break;
                }
            }
            Ok(recipes)
        }
        .instrument(self.span.clone())
        .await
    }

    async fn fetch_by_id(&self, id: &str) -> ProviderResult<Option<RecipeData>> {
        async {
            self.limiter.acquire().await;
            let url = format!("{}/{}", self.base_url, id.trim());
            let response = self.client.get(&url).query(&self.credentials()).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                debug!(id, "Edamam recipe not found");
                return Ok(None);
            }
            let body: Value = read_json(ensure_success(response, EDAMAM).await?, EDAMAM, "recipe").await?;
            match body.get("recipe") {
                Some(raw) => Ok(Some(self.normalize(raw)?)),
                None => Ok(None),
            }
        }
        .instrument(self.span.clone())
        .await
    }

    fn normalize(&self, raw: &Value) -> Result<RecipeData, NormalizationError> {
        normalize_recipe(raw)
    }
}

fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

fn string_list(raw: &Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(clean_text)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn ingredient(raw: &Value) -> Option<IngredientData> {
    let text = str_field(raw, "text").map(clean_text).filter(|t| !t.is_empty());
    let food = str_field(raw, "food").map(clean_text).filter(|f| !f.is_empty());
    let name = food.or_else(|| text.clone())?;
    Some(IngredientData {
        name,
        quantity: raw
            .get("quantity")
            .and_then(Value::as_f64)
            .filter(|q| *q > 0.0),
        unit: str_field(raw, "measure")
            .filter(|m| *m != NO_MEASURE && !m.trim().is_empty())
            .map(str::to_owned),
        notes: None,
        original_text: text,
    })
}

fn nutrient(totals: &Value, code: &str) -> Option<f64> {
    totals.get(code)?.get("quantity")?.as_f64()
}

fn nutrition(raw: &Value) -> Option<MacroNutrition> {
    let totals = raw.get("totalNutrients")?;
    let macros = MacroNutrition {
        calories: nutrient(totals, "ENERC_KCAL"),
        protein: nutrient(totals, "PROCNT"),
        carbohydrates: nutrient(totals, "CHOCDF"),
        fat: nutrient(totals, "FAT"),
        fiber: nutrient(totals, "FIBTG"),
        sugar: nutrient(totals, "SUGAR"),
        sodium: nutrient(totals, "NA"),
        saturated_fat: nutrient(totals, "FASAT"),
        cholesterol: nutrient(totals, "CHOLE"),
    };
    (!macros.is_empty()).then_some(macros)
}

/// Map one Edamam `recipe` object onto a [`RecipeData`]
///
/// # Errors
///
/// Returns a [`NormalizationError`] when `label` is missing or blank
pub fn normalize_recipe(raw: &Value) -> Result<RecipeData, NormalizationError> {
    let title = clean_optional(str_field(raw, "label"))
        .ok_or_else(|| NormalizationError::missing_field(EDAMAM, "label", raw))?;

    let mut recipe = RecipeData::new(title, EDAMAM);
    recipe.description = clean_optional(str_field(raw, "source"));
    recipe.external_id = str_field(raw, "uri")
        .and_then(|uri| uri.rsplit('_').next())
        .filter(|id| !id.is_empty())
        .map(str::to_owned);
    recipe.source_url = str_field(raw, "url").map(str::to_owned);
    recipe.image_url = str_field(raw, "image").map(str::to_owned);

    recipe.ingredients = match raw.get("ingredients").and_then(Value::as_array) {
        Some(items) => items.iter().filter_map(ingredient).collect(),
        None => string_list(raw, "ingredientLines")
            .iter()
            .filter_map(|line| parse_ingredient(line))
            .collect(),
    };
    recipe.instructions = string_list(raw, "instructionLines");

    recipe.total_time_minutes = raw
        .get("totalTime")
        .and_then(Value::as_f64)
        .and_then(positive_minutes);
    recipe.servings = raw
        .get("yield")
        .and_then(Value::as_f64)
        .filter(|y| *y > 0.0)
        .map(f64_to_u32);
    recipe.cuisine_type = string_list(raw, "cuisineType").into_iter().next();

    let health_labels = string_list(raw, "healthLabels");
    recipe.tags = string_list(raw, "dietLabels");
    recipe.tags.extend(health_labels.iter().cloned());
    recipe.dietary_restrictions = health_labels.iter().map(|l| l.to_lowercase()).collect();

    // Edamam reports whole-recipe totals.
    recipe.nutrition = nutrition(raw).map(|totals| match recipe.servings {
        Some(servings) if servings > 0 => totals.scaled(1.0 / f64::from(servings)),
        _ => totals,
    });
    Ok(recipe)
}
