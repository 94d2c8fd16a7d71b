// ABOUTME: Scripted in-memory provider implementing the recipe, macro, and classifier traits
// ABOUTME: Counts calls and fails on demand so fallback behavior can be asserted without HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use nourishly_core::errors::{NormalizationError, ProviderError, ProviderResult};
use nourishly_core::models::{
    ClassificationResult, Cuisine, IngredientData, IngredientMacros, MacroAnalysisReport,
    MacroNutrition, RecipeData, SearchFilters,
};
use nourishly_providers::{
    CuisineClassifier, MacroAnalyzer, Provider, RecipeDiscovery, RecipeProvider,
};

/// How a scripted call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Upstream returned a 500
    Api,
    /// Request timed out
    Timeout,
    /// Input did not resolve
    NotFound,
    /// Payload could not be normalized
    Normalization,
}

/// In-memory provider for all three domains
///
/// Every task succeeds unless `failure` is set. With `fail_on` set, only
/// inputs containing that marker fail.
pub struct MockProvider {
    name: String,
    valid: bool,
    available: AtomicBool,
    failure: Option<MockFailure>,
    fail_on: Option<String>,
    cuisine: Cuisine,
    confidence: f64,
    discovery: bool,
    urls: Vec<String>,
    pages: HashMap<String, RecipeData>,
    calls: AtomicUsize,
    availability_checks: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            valid: true,
            available: AtomicBool::new(true),
            failure: None,
            fail_on: None,
            cuisine: Cuisine::Italian,
            confidence: 0.9,
            discovery: false,
            urls: Vec::new(),
            pages: HashMap::new(),
            calls: AtomicUsize::new(0),
            availability_checks: AtomicUsize::new(0),
        }
    }

    pub fn misconfigured(mut self) -> Self {
        self.valid = false;
        self.available = AtomicBool::new(false);
        self
    }

    pub fn unavailable(self) -> Self {
        self.available.store(false, Ordering::SeqCst);
        self
    }

    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn failing_on(mut self, marker: &str, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self.fail_on = Some(marker.to_owned());
        self
    }

    pub fn with_cuisine(mut self, cuisine: Cuisine, confidence: f64) -> Self {
        self.cuisine = cuisine;
        self.confidence = confidence;
        self
    }

    /// Enable discovery over `urls`; URLs without a page hold no recipe
    pub fn with_site(mut self, urls: &[&str], pages: Vec<(&str, RecipeData)>) -> Self {
        self.discovery = true;
        self.urls = urls.iter().map(|u| (*u).to_owned()).collect();
        self.pages = pages
            .into_iter()
            .map(|(url, recipe)| (url.to_owned(), recipe))
            .collect();
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn availability_checks(&self) -> usize {
        self.availability_checks.load(Ordering::SeqCst)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn call(&self, input: &str) -> ProviderResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(failure) = self.failure else {
            return Ok(());
        };
        if let Some(marker) = &self.fail_on {
            if !input.contains(marker.as_str()) {
                return Ok(());
            }
        }
        Err(match failure {
            MockFailure::Api => ProviderError::ApiError {
                provider: self.name.clone(),
                status_code: 500,
                message: "internal error".into(),
                retryable: true,
            },
            MockFailure::Timeout => ProviderError::Timeout(format!("{} timed out", self.name)),
            MockFailure::NotFound => ProviderError::not_found(&self.name, "food", input),
            MockFailure::Normalization => NormalizationError::new(
                &self.name,
                "title missing",
                &serde_json::json!({ "input": input }),
            )
            .into(),
        })
    }

    fn recipe(&self, title: &str) -> RecipeData {
        let mut recipe = RecipeData::new(title, &self.name);
        recipe.ingredients = vec![IngredientData::named("flour"), IngredientData::named("water")];
        recipe
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate_config(&self) -> bool {
        self.valid
    }

    async fn is_available(&self) -> bool {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.available.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeProvider for MockProvider {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> ProviderResult<Vec<RecipeData>> {
        self.call(query)?;
        let mut recipe = self.recipe(&format!("{query} by {}", self.name));
        recipe.cuisine_type.clone_from(&filters.cuisine);
        Ok(vec![recipe; limit])
    }

    async fn fetch_by_id(&self, id: &str) -> ProviderResult<Option<RecipeData>> {
        self.call(id)?;
        if id == "missing" {
            return Ok(None);
        }
        let mut recipe = self.recipe("Fetched");
        recipe.external_id = Some(id.to_owned());
        Ok(Some(recipe))
    }

    fn normalize(&self, raw: &Value) -> Result<RecipeData, NormalizationError> {
        let title = raw
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| NormalizationError::missing_field(&self.name, "title", raw))?;
        Ok(RecipeData::new(title, &self.name))
    }

    fn as_discovery(&self) -> Option<&dyn RecipeDiscovery> {
        if self.discovery {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl RecipeDiscovery for MockProvider {
    async fn discover_urls(&self, start_url: &str, limit: usize) -> ProviderResult<Vec<String>> {
        self.call(start_url)?;
        Ok(self.urls.iter().take(limit).cloned().collect())
    }

    async fn process_from_url(&self, url: &str) -> ProviderResult<Option<RecipeData>> {
        self.call(url)?;
        Ok(self.pages.get(url).cloned())
    }
}

#[async_trait]
impl MacroAnalyzer for MockProvider {
    async fn analyze_ingredient(
        &self,
        name: &str,
        quantity_g: f64,
    ) -> ProviderResult<MacroAnalysisReport> {
        self.call(name)?;
        let macros = MacroNutrition {
            calories: Some(quantity_g),
            protein: Some(quantity_g / 10.0),
            ..MacroNutrition::default()
        };
        Ok(MacroAnalysisReport::ingredient(name, macros, &self.name, 0.8))
    }

    async fn analyze_recipe(
        &self,
        recipe_text: &str,
        servings: Option<u32>,
    ) -> ProviderResult<MacroAnalysisReport> {
        self.call(recipe_text)?;
        let items = recipe_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| IngredientMacros {
                food_name: line.trim().to_owned(),
                weight_g: Some(100.0),
                macros: MacroNutrition {
                    calories: Some(100.0),
                    ..MacroNutrition::default()
                },
            })
            .collect();
        Ok(MacroAnalysisReport::recipe("recipe", items, servings, &self.name, 0.8))
    }

    async fn search_foods(&self, query: &str, limit: usize) -> ProviderResult<Vec<String>> {
        self.call(query)?;
        Ok((1..=limit).map(|i| format!("{query} {i}")).collect())
    }

    fn normalize(&self, _raw: &Value) -> Result<MacroNutrition, NormalizationError> {
        Ok(MacroNutrition::default())
    }
}

#[async_trait]
impl CuisineClassifier for MockProvider {
    async fn classify(&self, text: &str) -> ProviderResult<ClassificationResult> {
        self.call(text)?;
        Ok(ClassificationResult::new(self.cuisine, self.confidence, &self.name)
            .with_reasoning(format!("classified: {text}")))
    }

    fn normalize(&self, _raw: &Value) -> Result<ClassificationResult, NormalizationError> {
        Ok(ClassificationResult::unclassified(&self.name, "mock"))
    }
}
