// ABOUTME: USDA FoodData Central analyzer for food search, detail retrieval, and recipe totals
// ABOUTME: Nutrients are reported per 100 g and scaled to the requested weight; responses are cached
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! USDA `FoodData` Central analyzer
//!
//! Lookups go through two endpoints:
//! - `GET {base}/foods/search` resolves a name to an FDC id
//! - `GET {base}/food/{fdc_id}` returns nutrients per 100 g
//!
//! Both responses are cached for `cache_ttl_secs` (24 hours unless configured),
//! so repeated ingredients inside one recipe cost a single round trip. Each
//! cache holds at most `cache_capacity` entries and evicts the least recently
//! used one when full.
//!
//! API Reference: <https://fdc.nal.usda.gov/api-guide.html>

use async_trait::async_trait;
use lru::LruCache;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use crate::constants::endpoints::USDA_BASE_URL;
use crate::constants::macros::{
    DEFAULT_INGREDIENT_GRAMS, MAX_FOOD_NAME_LENGTH, USDA_CACHE_CAPACITY, USDA_CONFIDENCE,
    USDA_ESTIMATED_CONFIDENCE,
};
use crate::constants::provider_ids::USDA;
use crate::constants::usda_nutrients;
use crate::core::{MacroAnalyzer, Provider, ProviderConfig};
use crate::errors::{NormalizationError, ProviderError, ProviderResult};
use crate::http_client::{health_check_client, shared_client};
use crate::models::{IngredientMacros, MacroAnalysisReport, MacroNutrition};
use crate::parsing::{estimate_grams, parse_ingredient, truncate_name};
use crate::rate_limiter::RateLimiter;
use crate::utils::{ensure_success, read_json};

/// Option overriding the response cache lifetime
pub const CACHE_TTL_OPTION: &str = "cache_ttl_secs";
/// Option overriding how many entries each response cache keeps
pub const CACHE_CAPACITY_OPTION: &str = "cache_capacity";

const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;
const MAX_PAGE_SIZE: usize = 200;
const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(USDA_CACHE_CAPACITY) {
    Some(n) => n,
    None => unreachable!(),
};

/// One hit from `/foods/search`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchResult {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type (e.g., "Foundation", "SR Legacy", "Branded")
    #[serde(default)]
    pub data_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodSearchResult>,
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

type Cache<K, V> = Mutex<LruCache<K, CacheEntry<V>>>;

async fn cached<K, V>(cache: &Cache<K, V>, key: &K) -> Option<V>
where
    K: std::hash::Hash + Eq,
    V: Clone,
{
    let mut cache = cache.lock().await;
    let entry = cache.get(key)?;
    if Instant::now() < entry.expires_at {
        return Some(entry.data.clone());
    }
    cache.pop(key);
    None
}

/// USDA `FoodData` Central analyzer
pub struct UsdaAnalyzer {
    config: ProviderConfig,
    base_url: String,
    cache_ttl: Duration,
    client: Client,
    limiter: RateLimiter,
    search_cache: Cache<String, Vec<FoodSearchResult>>,
    details_cache: Cache<u64, Arc<Value>>,
    span: Span,
}

impl UsdaAnalyzer {
    /// Build the analyzer; performs no I/O
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let ttl_secs = config
            .option(CACHE_TTL_OPTION)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        let capacity = config
            .option(CACHE_CAPACITY_OPTION)
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroUsize::new)
            .unwrap_or(FALLBACK_CAPACITY);
        Self {
            base_url: config.base_url_or(USDA_BASE_URL),
            cache_ttl: Duration::from_secs(ttl_secs),
            client: shared_client().clone(),
            limiter: RateLimiter::new(config.min_interval),
            search_cache: Mutex::new(LruCache::new(capacity)),
            details_cache: Mutex::new(LruCache::new(capacity)),
            span: info_span!("provider", provider = USDA),
            config,
        }
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.config
            .api_key()
            .ok_or_else(|| ProviderError::configuration(USDA, "API key is not set"))
    }

    /// Foods matching `query`, at most `page_size` (1-200)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty query, or a call error
    pub async fn search(&self, query: &str, page_size: usize) -> ProviderResult<Vec<FoodSearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ProviderError::invalid_input(USDA, "search query is empty"));
        }
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let cache_key = format!("{}:{page_size}", query.to_lowercase());
        if let Some(foods) = cached(&self.search_cache, &cache_key).await {
            debug!(query, "Search cache hit");
            return Ok(foods);
        }

        let api_key = self.api_key()?;
        let page_size = page_size.to_string();
        self.limiter.acquire().await;
        let response = self
            .client
            .get(format!("{}/foods/search", self.base_url))
            .query(&[
                ("query", query),
                ("pageSize", page_size.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await?;
        let body: SearchResponse =
            read_json(ensure_success(response, USDA).await?, USDA, "search response").await?;

        self.search_cache.lock().await.put(
            cache_key,
            CacheEntry {
                data: body.foods.clone(),
                expires_at: Instant::now() + self.cache_ttl,
            },
        );
        Ok(body.foods)
    }

    /// Raw food details for one FDC id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on 404, or a call error
    pub async fn food_details(&self, fdc_id: u64) -> ProviderResult<Arc<Value>> {
        if let Some(details) = cached(&self.details_cache, &fdc_id).await {
            debug!(fdc_id, "Details cache hit");
            return Ok(details);
        }

        let api_key = self.api_key()?;
        self.limiter.acquire().await;
        let response = self
            .client
            .get(format!("{}/food/{fdc_id}", self.base_url))
            .query(&[("api_key", api_key)])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(USDA, "food", fdc_id.to_string()));
        }
        let details: Value =
            read_json(ensure_success(response, USDA).await?, USDA, "food details").await?;
        let details = Arc::new(details);

        self.details_cache.lock().await.put(
            fdc_id,
            CacheEntry {
                data: Arc::clone(&details),
                expires_at: Instant::now() + self.cache_ttl,
            },
        );
        Ok(details)
    }

    /// Best match for `name` with its nutrients per 100 g
    async fn resolve(&self, name: &str) -> ProviderResult<(String, MacroNutrition)> {
        let food = self
            .search(name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::not_found(USDA, "food", name))?;
        let details = self.food_details(food.fdc_id).await?;
        let per_100g = self.normalize(&details)?;
        debug!(query = name, fdc_id = food.fdc_id, description = %food.description, "Resolved food");
        Ok((food.description, per_100g))
    }

    async fn ingredient(&self, name: &str, quantity_g: f64) -> ProviderResult<MacroAnalysisReport> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProviderError::invalid_input(USDA, "ingredient name is empty"));
        }
        if !quantity_g.is_finite() || quantity_g <= 0.0 {
            return Err(ProviderError::invalid_input(
                USDA,
                format!("quantity must be positive, got {quantity_g}"),
            ));
        }

        let (_, per_100g) = self.resolve(name).await?;
        let mut report = MacroAnalysisReport::ingredient(
            name,
            per_100g.scaled(quantity_g / 100.0),
            USDA,
            USDA_CONFIDENCE,
        );
        report.serving_size_g = Some(quantity_g);
        info!(food = name, grams = quantity_g, "Ingredient analyzed");
        Ok(report)
    }

    async fn recipe(&self, recipe_text: &str, servings: Option<u32>) -> ProviderResult<MacroAnalysisReport> {
        let lines: Vec<&str> = recipe_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(ProviderError::invalid_input(USDA, "recipe text is empty"));
        }

        let mut breakdown = Vec::with_capacity(lines.len());
        let mut assumed_weight = false;
        for line in &lines {
            let Some(parsed) = parse_ingredient(line) else {
                debug!(line, "Skipping line without an ingredient");
                continue;
            };
            let grams = parsed
                .quantity
                .and_then(|q| estimate_grams(q, parsed.unit.as_deref(), &parsed.name));
            let grams = grams.unwrap_or_else(|| {
                assumed_weight = true;
                DEFAULT_INGREDIENT_GRAMS
            });

            match self.resolve(&parsed.name).await {
                Ok((description, per_100g)) => breakdown.push(IngredientMacros {
                    food_name: truncate_name(&description, MAX_FOOD_NAME_LENGTH),
                    weight_g: Some(grams),
                    macros: per_100g.scaled(grams / 100.0),
                }),
                Err(ProviderError::NotFound { .. }) => {
                    warn!(ingredient = %parsed.name, "No USDA match, skipping line");
                }
                Err(err) => return Err(err),
            }
        }
        if breakdown.is_empty() {
            return Err(ProviderError::not_found(
                USDA,
                "recipe",
                truncate_name(recipe_text.trim(), MAX_FOOD_NAME_LENGTH),
            ));
        }

        let confidence = if assumed_weight {
            USDA_ESTIMATED_CONFIDENCE
        } else {
            USDA_CONFIDENCE
        };
        let name = truncate_name(lines.first().copied().unwrap_or_default(), MAX_FOOD_NAME_LENGTH);
        let report = MacroAnalysisReport::recipe(name, breakdown, servings, USDA, confidence);
        info!(items = report.ingredients.len(), confidence, "Recipe analyzed");
        Ok(report)
    }
}

impl std::fmt::Debug for UsdaAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsdaAnalyzer")
            .field("base_url", &self.base_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("has_api_key", &self.config.api_key().is_some())
            .finish_non_exhaustive()
    }
}

/// Registry constructor
///
/// # Errors
///
/// Never fails; the signature matches the registry factory type
pub fn create(config: ProviderConfig) -> ProviderResult<Arc<dyn MacroAnalyzer>> {
    Ok(Arc::new(UsdaAnalyzer::new(config)))
}

/// Nutrient id and amount from either the details (`nutrient.id`, `amount`)
/// or the search (`nutrientId`, `value`) layout
fn nutrient_entry(entry: &Value) -> Option<(u64, f64)> {
    let id = entry
        .get("nutrient")
        .and_then(|n| n.get("id"))
        .or_else(|| entry.get("nutrientId"))
        .and_then(Value::as_u64)?;
    let amount = entry
        .get("amount")
        .or_else(|| entry.get("value"))
        .and_then(Value::as_f64)?;
    Some((id, amount))
}

#[async_trait]
impl Provider for UsdaAnalyzer {
    fn name(&self) -> &str {
        USDA
    }

    fn validate_config(&self) -> bool {
        self.config.api_key().is_some()
    }

    async fn is_available(&self) -> bool {
        let Ok(api_key) = self.api_key() else {
            return false;
        };
        let check = health_check_client()
            .get(format!("{}/foods/search", self.base_url))
            .query(&[("query", "apple"), ("pageSize", "1"), ("api_key", api_key)])
            .send()
            .instrument(self.span.clone())
            .await;
        match check {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(parent: &self.span, error = %err, "Availability check failed");
                false
            }
        }
    }
}

#[async_trait]
impl MacroAnalyzer for UsdaAnalyzer {
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
            let foods = self.search(query, limit).await?;
            Ok(foods
                .into_iter()
                .map(|f| f.description)
                .take(limit)
                .collect())
        }
        .instrument(self.span.clone())
        .await
    }

    fn normalize(&self, raw: &Value) -> Result<MacroNutrition, NormalizationError> {
        let entries = raw
            .get("foodNutrients")
            .and_then(Value::as_array)
            .ok_or_else(|| NormalizationError::missing_field(USDA, "foodNutrients", raw))?;

        let mut macros = MacroNutrition::default();
        for (id, amount) in entries.iter().filter_map(nutrient_entry) {
            let slot = match u32::try_from(id).unwrap_or(u32::MAX) {
                usda_nutrients::ENERGY_KCAL => &mut macros.calories,
                usda_nutrients::PROTEIN => &mut macros.protein,
                usda_nutrients::CARBOHYDRATE => &mut macros.carbohydrates,
                usda_nutrients::FAT => &mut macros.fat,
                usda_nutrients::FIBER => &mut macros.fiber,
                usda_nutrients::SUGAR => &mut macros.sugar,
                usda_nutrients::SODIUM => &mut macros.sodium,
                usda_nutrients::SATURATED_FAT => &mut macros.saturated_fat,
                usda_nutrients::CHOLESTEROL => &mut macros.cholesterol,
                _ => continue,
            };
            slot.get_or_insert(amount);
        }
        if macros.is_empty() {
            return Err(NormalizationError::new(USDA, "no recognized nutrients", raw));
        }
        Ok(macros)
    }
}
