// ABOUTME: Capability traits every recipe, macro, and classification provider implements
// ABOUTME: Defines provider configuration and the shared structured-text rendering for classifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! # Provider Capabilities
//!
//! A provider is a strategy wrapping one external source. Every provider
//! implements [`Provider`] plus exactly one domain trait:
//!
//! - [`RecipeProvider`] (optionally [`RecipeDiscovery`] for scrapers)
//! - [`MacroAnalyzer`]
//! - [`CuisineClassifier`]
//!
//! Every fallible operation returns [`ProviderResult`]; nothing a provider does
//! panics or lets a transport error escape unconverted. `normalize` is pure and
//! reports unusable payloads as [`NormalizationError`].

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::constants::classification::MAX_PROMPT_INGREDIENTS;
use crate::errors::{NormalizationError, ProviderResult};
use crate::models::{
    ClassificationResult, MacroAnalysisReport, MacroNutrition, RecipeData, SearchFilters,
};

/// Static configuration for one provider instance
///
/// `min_interval` has no default: every provider must be told how fast it may
/// call its upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider identifier
    pub name: String,
    /// Credential for the upstream API
    pub api_key: Option<String>,
    /// Override for the upstream base URL
    pub base_url: Option<String>,
    /// Minimum time between two outbound calls
    pub min_interval: Duration,
    /// Free-form provider options
    pub options: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// Configuration with no credential and no options
    #[must_use]
    pub fn new(name: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            name: name.into(),
            api_key: None,
            base_url: None,
            min_interval,
            options: BTreeMap::new(),
        }
    }

    /// Set the credential
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set one option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Credential if set and non-blank
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Option value if set and non-blank
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Option parsed as an unsigned integer
    #[must_use]
    pub fn usize_option(&self, key: &str) -> Option<usize> {
        self.option(key).and_then(|v| v.parse().ok())
    }

    /// Base URL override or the given default, without a trailing slash
    #[must_use]
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_owned()
    }
}

/// Behaviour shared by every provider
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier used for selection, logging, and record provenance
    fn name(&self) -> &str;

    /// Whether static configuration is sufficient to attempt calls
    ///
    /// Performs no network I/O.
    fn validate_config(&self) -> bool;

    /// Whether the provider is usable right now
    ///
    /// May call the upstream service, so callers should cache the answer.
    async fn is_available(&self) -> bool {
        self.validate_config()
    }
}

/// Recipe search and lookup
#[async_trait]
pub trait RecipeProvider: Provider {
    /// Search for recipes, returning at most `limit` records
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call fails or a payload cannot be normalized
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> ProviderResult<Vec<RecipeData>>;

    /// Fetch one recipe by provider-native identifier, `None` when it does not resolve
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call fails or the payload cannot be normalized
    async fn fetch_by_id(&self, id: &str) -> ProviderResult<Option<RecipeData>>;

    /// Map a raw upstream payload onto a [`RecipeData`]
    ///
    /// # Errors
    ///
    /// Returns a [`NormalizationError`] carrying `raw` when a required field is missing
    fn normalize(&self, raw: &Value) -> Result<RecipeData, NormalizationError>;

    /// Discovery capability, for providers that crawl a site
    fn as_discovery(&self) -> Option<&dyn RecipeDiscovery> {
        None
    }
}

/// Two-phase crawl: cheap URL discovery, then rate-limited fetch per URL
#[async_trait]
pub trait RecipeDiscovery: RecipeProvider {
    /// Enumerate candidate recipe URLs without fetching their content
    ///
    /// # Errors
    ///
    /// Returns an error if the start page or sitemap cannot be fetched
    async fn discover_urls(&self, start_url: &str, limit: usize) -> ProviderResult<Vec<String>>;

    /// Fetch and normalize one recipe page, `None` when it holds no recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the URL belongs to another site, the fetch fails,
    /// or the recipe markup cannot be normalized
    async fn process_from_url(&self, url: &str) -> ProviderResult<Option<RecipeData>>;
}

/// Macro nutrition analysis
#[async_trait]
pub trait MacroAnalyzer: Provider {
    /// Analyze `quantity_g` grams of one ingredient
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the food is not recognized, or a call error
    async fn analyze_ingredient(
        &self,
        name: &str,
        quantity_g: f64,
    ) -> ProviderResult<MacroAnalysisReport>;

    /// Analyze a recipe given as ingredient lines
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing in the text is recognized, or a call error
    async fn analyze_recipe(
        &self,
        recipe_text: &str,
        servings: Option<u32>,
    ) -> ProviderResult<MacroAnalysisReport>;

    /// Food names matching a query, at most `limit`
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call fails
    async fn search_foods(&self, query: &str, limit: usize) -> ProviderResult<Vec<String>>;

    /// Map one raw food item onto [`MacroNutrition`]
    ///
    /// # Errors
    ///
    /// Returns a [`NormalizationError`] when the item carries no nutrition at all
    fn normalize(&self, raw: &Value) -> Result<MacroNutrition, NormalizationError>;
}

/// Cuisine classification
#[async_trait]
pub trait CuisineClassifier: Provider {
    /// Classify free text describing a dish
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unusable text, or a call error
    async fn classify(&self, text: &str) -> ProviderResult<ClassificationResult>;

    /// Classify a title and ingredient list through the same model call as [`classify`]
    ///
    /// [`classify`]: CuisineClassifier::classify
    ///
    /// # Errors
    ///
    /// Same as [`CuisineClassifier::classify`]
    async fn classify_from_structured(
        &self,
        title: &str,
        ingredients: &[String],
    ) -> ProviderResult<ClassificationResult> {
        let text = render_classification_text(title, ingredients);
        self.classify(&text).await
    }

    /// Classify several texts in order; each position succeeds or fails on its own
    async fn classify_batch(&self, texts: &[String]) -> Vec<ProviderResult<ClassificationResult>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await);
        }
        results
    }

    /// Map a raw model response onto a [`ClassificationResult`]
    ///
    /// # Errors
    ///
    /// Returns a [`NormalizationError`] when labels or scores are missing
    fn normalize(&self, raw: &Value) -> Result<ClassificationResult, NormalizationError>;
}

/// Render a title and ingredient names as `"{title}. Ingredients: a, b, c"`
///
/// Blank entries are dropped and at most fifteen ingredients are kept, so the
/// same dish always renders to the same text.
#[must_use]
pub fn render_classification_text(title: &str, ingredients: &[String]) -> String {
    let title = title.trim();
    let names: Vec<&str> = ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .take(MAX_PROMPT_INGREDIENTS)
        .collect();

    match (title.is_empty(), names.is_empty()) {
        (false, false) => format!("{title}. Ingredients: {}", names.join(", ")),
        (false, true) => title.to_owned(),
        (true, false) => format!("Ingredients: {}", names.join(", ")),
        (true, true) => String::new(),
    }
}
