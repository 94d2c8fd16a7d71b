// ABOUTME: API Ninjas nutrition analyzer for single ingredients and free-text recipes
// ABOUTME: Premium-only fields arrive as strings on the free tier and are reported as unknown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use crate::constants::endpoints::API_NINJAS_BASE_URL;
use crate::constants::macros::{
    API_NINJAS_CONFIDENCE, API_NINJAS_FREE_TIER_CONFIDENCE, MAX_FOOD_NAME_LENGTH,
};
use crate::constants::provider_ids::API_NINJAS;
use crate::core::{MacroAnalyzer, Provider, ProviderConfig};
use crate::errors::{NormalizationError, ProviderError, ProviderResult};
use crate::http_client::{health_check_client, shared_client};
use crate::models::{IngredientMacros, MacroAnalysisReport, MacroNutrition};
use crate::parsing::truncate_name;
use crate::rate_limiter::RateLimiter;
use crate::utils::{ensure_success, read_json};

const API_KEY_HEADER: &str = "X-Api-Key";
const HEALTH_CHECK_QUERY: &str = "apple";

/// API Ninjas nutrition analyzer
pub struct ApiNinjasAnalyzer {
    config: ProviderConfig,
    endpoint: String,
    client: Client,
    limiter: RateLimiter,
    span: Span,
}

impl ApiNinjasAnalyzer {
    /// Build the analyzer; performs no I/O
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let endpoint = format!("{}/nutrition", config.base_url_or(API_NINJAS_BASE_URL));
        Self {
            limiter: RateLimiter::new(config.min_interval),
            span: info_span!("provider", provider = API_NINJAS),
            client: shared_client().clone(),
            endpoint,
            config,
        }
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.config
            .api_key()
            .ok_or_else(|| ProviderError::configuration(API_NINJAS, "API key is not set"))
    }

    /// Items recognized in `query`; an empty list when nothing matched
    async fn query(&self, query: &str) -> ProviderResult<Vec<Value>> {
        let api_key = self.api_key()?;
        self.limiter.acquire().await;
        debug!(query = %truncate_name(query, 100), "Querying nutrition endpoint");

        let response = self
            .client
            .get(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .query(&[("query", query)])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        read_json(ensure_success(response, API_NINJAS).await?, API_NINJAS, "nutrition response").await
    }

    async fn ingredient(&self, name: &str, quantity_g: f64) -> ProviderResult<MacroAnalysisReport> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProviderError::invalid_input(API_NINJAS, "ingredient name is empty"));
        }
        if !quantity_g.is_finite() || quantity_g <= 0.0 {
            return Err(ProviderError::invalid_input(
                API_NINJAS,
                format!("quantity must be positive, got {quantity_g}"),
            ));
        }

        let items = self.query(&format!("{quantity_g}g {name}")).await?;
        let item = items
            .first()
            .ok_or_else(|| ProviderError::not_found(API_NINJAS, "food", name))?;
        let macros = self.normalize(item)?;

        let mut report = MacroAnalysisReport::ingredient(name, macros, API_NINJAS, confidence(item));
        report.serving_size_g = number(item, "serving_size_g");
        info!(food = name, confidence = report.confidence, "Ingredient analyzed");
        Ok(report)
    }

    async fn recipe(&self, recipe_text: &str, servings: Option<u32>) -> ProviderResult<MacroAnalysisReport> {
        let text = recipe_text.trim();
        if text.is_empty() {
            return Err(ProviderError::invalid_input(API_NINJAS, "recipe text is empty"));
        }

        let items = self.query(text).await?;
        let mut breakdown = Vec::with_capacity(items.len());
        let mut premium = false;
        for item in &items {
            match self.normalize(item) {
                Ok(macros) => {
                    premium |= confidence(item) >= API_NINJAS_CONFIDENCE;
                    let food = item.get("name").and_then(Value::as_str).unwrap_or("unknown");
                    breakdown.push(IngredientMacros {
                        food_name: truncate_name(food, MAX_FOOD_NAME_LENGTH),
                        weight_g: number(item, "serving_size_g"),
                        macros,
                    });
                }
                Err(err) => warn!(error = %err.message, "Skipping item without nutrition"),
            }
        }
        if breakdown.is_empty() {
            return Err(ProviderError::not_found(
                API_NINJAS,
                "recipe",
                truncate_name(text, MAX_FOOD_NAME_LENGTH),
            ));
        }

        let confidence = if premium {
            API_NINJAS_CONFIDENCE
        } else {
            API_NINJAS_FREE_TIER_CONFIDENCE
        };
        let report = MacroAnalysisReport::recipe(
            truncate_name(text, MAX_FOOD_NAME_LENGTH),
            breakdown,
            servings,
            API_NINJAS,
            confidence,
        );
        info!(items = report.ingredients.len(), confidence, "Recipe analyzed");
        Ok(report)
    }
}

/// Registry constructor
///
/// # Errors
///
/// Never fails; the signature matches the registry factory type
pub fn create(config: ProviderConfig) -> ProviderResult<Arc<dyn MacroAnalyzer>> {
    Ok(Arc::new(ApiNinjasAnalyzer::new(config)))
}

/// Numeric field, `None` for premium placeholders and absent keys
fn number(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

/// 0.8 when the premium calorie and protein fields are numeric, else 0.5
fn confidence(item: &Value) -> f64 {
    if number(item, "calories").is_some() && number(item, "protein_g").is_some() {
        API_NINJAS_CONFIDENCE
    } else {
        API_NINJAS_FREE_TIER_CONFIDENCE
    }
}

#[async_trait]
impl Provider for ApiNinjasAnalyzer {
    fn name(&self) -> &str {
        API_NINJAS
    }

    fn validate_config(&self) -> bool {
        self.config.api_key().is_some()
    }

    async fn is_available(&self) -> bool {
        let Ok(api_key) = self.api_key() else {
            return false;
        };
        let check = health_check_client()
            .get(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .query(&[("query", HEALTH_CHECK_QUERY)])
            .send()
            .instrument(self.span.clone())
            .await;
        match check {
            Ok(response) => {
                let status = response.status();
                debug!(parent: &self.span, status = status.as_u16(), "Availability check");
                status == StatusCode::OK || status == StatusCode::NOT_FOUND
            }
            Err(err) => {
                warn!(parent: &self.span, error = %err, "Availability check failed");
                false
            }
        }
    }
}

#[async_trait]
impl MacroAnalyzer for ApiNinjasAnalyzer {
    async fn analyze_ingredient(
        &self,
        name: &str,
        quantity_g: f64,
    ) -> ProviderResult<MacroAnalysisReport> {
        self.ingredient(name, quantity_g)
            .instrument(self.span.clone())
            .await
    }

    async fn analyze_recipe(
        &self,
        recipe_text: &str,
        servings: Option<u32>,
    ) -> ProviderResult<MacroAnalysisReport> {
        self.recipe(recipe_text, servings)
            .instrument(self.span.clone())
            .await
    }

    async fn search_foods(&self, query: &str, limit: usize) -> ProviderResult<Vec<String>> {
        async {
            if limit == 0 || query.trim().is_empty() {
                return Ok(Vec::new());
            }
            let items = self.query(query.trim()).await?;
            Ok(items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .take(limit)
                .collect())
        }
        .instrument(self.span.clone())
        .await
    }

    fn normalize(&self, raw: &Value) -> Result<MacroNutrition, NormalizationError> {
        if !raw.is_object() {
            return Err(NormalizationError::new(API_NINJAS, "item is not an object", raw));
        }
        let macros = MacroNutrition {
            calories: number(raw, "calories"),
            protein: number(raw, "protein_g"),
            carbohydrates: number(raw, "carbohydrates_total_g"),
            fat: number(raw, "fat_total_g"),
            fiber: number(raw, "fiber_g"),
            sugar: number(raw, "sugar_g"),
            sodium: number(raw, "sodium_mg"),
            saturated_fat: number(raw, "fat_saturated_g"),
            cholesterol: number(raw, "cholesterol_mg"),
        };
        if macros.is_empty() {
            return Err(NormalizationError::new(API_NINJAS, "item carries no nutrient values", raw));
        }
        Ok(macros)
    }
}
