// ABOUTME: Discovery enrichment pipeline: discover URLs, fetch recipes, fill cuisine and nutrition gaps
// ABOUTME: Every URL ends in its own outcome so one bad page never stops the run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

use nourishly_core::errors::DispatchError;
use nourishly_core::models::{Cuisine, MacroAnalysisResult, RecipeData};

use crate::services::ProviderServices;

/// Result of one discovered URL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// Recipe fetched, with whatever enrichment succeeded
    Enriched {
        /// Page URL
        url: String,
        /// Normalized and enriched recipe
        recipe: Box<RecipeData>,
        /// Whether a cuisine label was added
        classified: bool,
        /// Whether nutrition totals were added
        nutrition_added: bool,
        /// Enrichment steps that failed without failing the recipe
        warnings: Vec<String>,
    },
    /// Page holds no recipe
    Skipped {
        /// Page URL
        url: String,
    },
    /// Fetching or normalizing the page failed
    Failed {
        /// Page URL
        url: String,
        /// Why
        error: String,
    },
}

impl EnrichmentOutcome {
    /// Page URL
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Enriched { url, .. } | Self::Skipped { url } | Self::Failed { url, .. } => url,
        }
    }

    /// Enriched recipe, if any
    #[must_use]
    pub fn recipe(&self) -> Option<&RecipeData> {
        match self {
            Self::Enriched { recipe, .. } => Some(recipe.as_ref()),
            _ => None,
        }
    }
}

/// Outcome of a whole pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    /// URLs returned by discovery
    pub discovered: usize,
    /// Recipes fetched and enriched
    pub enriched: usize,
    /// Pages without a recipe
    pub skipped: usize,
    /// Pages that failed
    pub failed: usize,
    /// One outcome per processed URL, in discovery order
    pub outcomes: Vec<EnrichmentOutcome>,
}

impl EnrichmentSummary {
    fn new(discovered: usize, outcomes: Vec<EnrichmentOutcome>) -> Self {
        let mut summary = Self {
            discovered,
            enriched: 0,
            skipped: 0,
            failed: 0,
            outcomes: Vec::new(),
        };
        for outcome in &outcomes {
            match outcome {
                EnrichmentOutcome::Enriched { .. } => summary.enriched += 1,
                EnrichmentOutcome::Skipped { .. } => summary.skipped += 1,
                EnrichmentOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary.outcomes = outcomes;
        summary
    }
}

/// Discover, fetch, classify, and analyze recipes from one site
#[derive(Debug)]
pub struct RecipeEnrichmentPipeline<'a> {
    services: &'a ProviderServices,
    recipe_provider: Option<String>,
    macro_provider: Option<String>,
    classifier_provider: Option<String>,
}

impl<'a> RecipeEnrichmentPipeline<'a> {
    /// Pipeline using automatic fallback in every domain
    #[must_use]
    pub const fn new(services: &'a ProviderServices) -> Self {
        Self {
            services,
            recipe_provider: None,
            macro_provider: None,
            classifier_provider: None,
        }
    }

    /// Pin the provider used for discovery and fetching
    #[must_use]
    pub fn with_recipe_provider(mut self, provider: impl Into<String>) -> Self {
        self.recipe_provider = Some(provider.into());
        self
    }

    /// Pin the macro analyzer
    #[must_use]
    pub fn with_macro_provider(mut self, provider: impl Into<String>) -> Self {
        self.macro_provider = Some(provider.into());
        self
    }

    /// Pin the classifier
    #[must_use]
    pub fn with_classifier(mut self, provider: impl Into<String>) -> Self {
        self.classifier_provider = Some(provider.into());
        self
    }

    /// Discover up to `discovery_limit` URLs and process at most `fetch_budget` of them
    ///
    /// # Errors
    ///
    /// Returns the dispatch error when discovery itself fails; per-URL
    /// failures are reported as [`EnrichmentOutcome::Failed`]
    pub async fn run(
        &self,
        start_url: &str,
        discovery_limit: usize,
        fetch_budget: usize,
    ) -> Result<EnrichmentSummary, DispatchError> {
        let span = info_span!("enrichment", start_url, discovery_limit, fetch_budget);
        async move {
            let urls = self
                .services
                .recipes
                .discover_urls(start_url, discovery_limit, self.recipe_provider.as_deref())
                .await?;

            let mut outcomes = Vec::with_capacity(fetch_budget.min(urls.len()));
            for url in urls.iter().take(fetch_budget) {
                outcomes.push(self.process(url).await);
            }

            let summary = EnrichmentSummary::new(urls.len(), outcomes);
            info!(
                discovered = summary.discovered,
                enriched = summary.enriched,
                skipped = summary.skipped,
                failed = summary.failed,
                "Enrichment run completed"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    async fn process(&self, url: &str) -> EnrichmentOutcome {
        let fetched = self
            .services
            .recipes
            .process_from_url(url, self.recipe_provider.as_deref())
            .await;
        let mut recipe = match fetched {
            Ok(Some(recipe)) => recipe,
            Ok(None) => {
                info!(url, "No recipe on page");
                return EnrichmentOutcome::Skipped { url: url.to_owned() };
            }
            Err(err) => {
                warn!(url, error = %err, "Recipe fetch failed");
                return EnrichmentOutcome::Failed {
                    url: url.to_owned(),
                    error: err.to_string(),
                };
            }
        };

        let mut warnings = Vec::new();
        let classified = self.fill_cuisine(&mut recipe, &mut warnings).await;
        let nutrition_added = self.fill_nutrition(&mut recipe, &mut warnings).await;

        EnrichmentOutcome::Enriched {
            url: url.to_owned(),
            recipe: Box::new(recipe),
            classified,
            nutrition_added,
            warnings,
        }
    }

    async fn fill_cuisine(&self, recipe: &mut RecipeData, warnings: &mut Vec<String>) -> bool {
        if recipe.cuisine_type.is_some() {
            return false;
        }
        let result = self
            .services
            .classification
            .classify_from_structured(
                &recipe.title,
                &recipe.ingredient_names(),
                self.classifier_provider.as_deref(),
            )
            .await;
        match result {
            Ok(result) if result.primary_cuisine != Cuisine::Other => {
                recipe.cuisine_type = Some(result.primary_cuisine.as_str().to_owned());
                true
            }
            Ok(_) => false,
            Err(err) => {
                warn!(title = %recipe.title, error = %err, "Classification failed");
                warnings.push(format!("classification: {err}"));
                false
            }
        }
    }

    async fn fill_nutrition(&self, recipe: &mut RecipeData, warnings: &mut Vec<String>) -> bool {
        if recipe.has_nutrition() || recipe.ingredients.is_empty() {
            return false;
        }
        let result = self
            .services
            .macros
            .analyze_recipe(
                &recipe.ingredient_text(),
                recipe.servings,
                self.macro_provider.as_deref(),
            )
            .await;
        match result {
            MacroAnalysisResult::Success(report) => {
                recipe.nutrition = Some(report.per_serving().unwrap_or(report.macros));
                true
            }
            MacroAnalysisResult::Failure(failure) => {
                warnings.push(format!("nutrition: {}", failure.error_message));
                false
            }
        }
    }
}
