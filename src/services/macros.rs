// ABOUTME: Macro analysis service returning success-or-failure results instead of errors
// ABOUTME: Single and batch ingredient and recipe analysis, food search, and provider status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use nourishly_core::constants::macros::{DEFAULT_INGREDIENT_GRAMS, MAX_BATCH_SIZE, MAX_FOOD_NAME_LENGTH};
use nourishly_core::errors::{AttemptOutcome, DispatchError, ProviderError};
use nourishly_core::models::{AnalysisType, FailureStatus, MacroAnalysisResult};
use nourishly_providers::parsing::truncate_name;
use nourishly_providers::{MacroAnalyzer, ProviderDomain};

use super::{provider_status, ProviderStatus};
use crate::orchestration::ProviderChain;

/// One ingredient of a batch analysis
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientQuery {
    /// Ingredient name
    pub name: String,
    /// Grams to analyze; 100 when absent
    pub quantity_g: Option<f64>,
}

impl IngredientQuery {
    /// Query for the default 100 g
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity_g: None,
        }
    }

    /// Query for an explicit weight
    #[must_use]
    pub const fn with_quantity(mut self, grams: f64) -> Self {
        self.quantity_g = Some(grams);
        self
    }
}

/// Macro analysis with provider fallback
#[derive(Debug)]
pub struct MacroService {
    chain: ProviderChain<dyn MacroAnalyzer>,
}

impl MacroService {
    /// Service over `analyzers`, tried in the given order
    #[must_use]
    pub fn new(analyzers: Vec<Arc<dyn MacroAnalyzer>>, availability_ttl: Duration) -> Self {
        Self {
            chain: ProviderChain::new(ProviderDomain::Macro, analyzers, availability_ttl),
        }
    }

    /// Underlying chain
    #[must_use]
    pub const fn chain(&self) -> &ProviderChain<dyn MacroAnalyzer> {
        &self.chain
    }

    /// Analyze one ingredient; `quantity_g` defaults to 100 g
    pub async fn analyze_ingredient(
        &self,
        name: &str,
        quantity_g: Option<f64>,
        provider: Option<&str>,
    ) -> MacroAnalysisResult {
        let name = name.trim();
        let grams = quantity_g.unwrap_or(DEFAULT_INGREDIENT_GRAMS);
        if name.is_empty() {
            return invalid(name, AnalysisType::Ingredient, "ingredient name is empty");
        }
        if !grams.is_finite() || grams <= 0.0 {
            return invalid(
                name,
                AnalysisType::Ingredient,
                &format!("quantity must be positive, got {grams}"),
            );
        }

        match self
            .chain
            .run(provider, |p| p.analyze_ingredient(name, grams))
            .await
        {
            Ok(report) => MacroAnalysisResult::Success(report),
            Err(err) => failure(name, AnalysisType::Ingredient, &err),
        }
    }

    /// Analyze a recipe given as ingredient lines
    pub async fn analyze_recipe(
        &self,
        recipe_text: &str,
        servings: Option<u32>,
        provider: Option<&str>,
    ) -> MacroAnalysisResult {
        let text = recipe_text.trim();
        let label = truncate_name(text, MAX_FOOD_NAME_LENGTH);
        if text.is_empty() {
            return invalid(&label, AnalysisType::Recipe, "recipe text is empty");
        }

        match self
            .chain
            .run(provider, |p| p.analyze_recipe(text, servings))
            .await
        {
            Ok(report) => MacroAnalysisResult::Success(report),
            Err(err) => failure(&label, AnalysisType::Recipe, &err),
        }
    }

    /// Analyze several ingredients in order
    ///
    /// Items beyond the batch limit are answered with a failure without
    /// calling any provider.
    pub async fn analyze_ingredients(
        &self,
        queries: &[IngredientQuery],
        provider: Option<&str>,
    ) -> Vec<MacroAnalysisResult> {
        let mut results = Vec::with_capacity(queries.len());
        for (index, query) in queries.iter().enumerate() {
            let result = if index < MAX_BATCH_SIZE {
                self.analyze_ingredient(&query.name, query.quantity_g, provider)
                    .await
            } else {
                over_batch_limit(&query.name, AnalysisType::Ingredient)
            };
            results.push(result);
        }
        log_batch("ingredient", &results);
        results
    }

    /// Analyze several recipes in order; `servings` is unknown for each
    pub async fn analyze_recipes(
        &self,
        recipe_texts: &[String],
        provider: Option<&str>,
    ) -> Vec<MacroAnalysisResult> {
        let mut results = Vec::with_capacity(recipe_texts.len());
        for (index, text) in recipe_texts.iter().enumerate() {
            let result = if index < MAX_BATCH_SIZE {
                self.analyze_recipe(text, None, provider).await
            } else {
                let label = truncate_name(text.trim(), MAX_FOOD_NAME_LENGTH);
                over_batch_limit(&label, AnalysisType::Recipe)
            };
            results.push(result);
        }
        log_batch("recipe", &results);
        results
    }

    /// Food names matching `query`, at most `limit`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank query, otherwise the chain's dispatch error
    pub async fn search_foods(
        &self,
        query: &str,
        limit: usize,
        provider: Option<&str>,
    ) -> Result<Vec<String>, DispatchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DispatchError::InvalidInput("food query is empty".into()));
        }
        self.chain
            .run(provider, |p| p.search_foods(query, limit))
            .await
    }

    /// Configuration and live availability of every analyzer
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        provider_status(&self.chain).await
    }
}

fn invalid(name: &str, analysis_type: AnalysisType, message: &str) -> MacroAnalysisResult {
    MacroAnalysisResult::failure(name, analysis_type, FailureStatus::Failed, message)
}

fn over_batch_limit(name: &str, analysis_type: AnalysisType) -> MacroAnalysisResult {
    invalid(
        name,
        analysis_type,
        &format!("batch exceeds the maximum of {MAX_BATCH_SIZE} items"),
    )
}

fn is_not_found(err: &ProviderError) -> bool {
    matches!(err, ProviderError::NotFound { .. })
}

/// `NotFound` when every provider that was called reported the food unknown
fn failure_status(err: &DispatchError) -> FailureStatus {
    let not_found = match err {
        DispatchError::Provider { source, .. } => is_not_found(source),
        DispatchError::Exhausted { attempts, .. } => {
            let called: Vec<&ProviderError> = attempts
                .iter()
                .filter_map(|a| match &a.outcome {
                    AttemptOutcome::Failed(source) => Some(source),
                    _ => None,
                })
                .collect();
            !called.is_empty() && called.into_iter().all(is_not_found)
        }
        _ => false,
    };
    if not_found {
        FailureStatus::NotFound
    } else {
        FailureStatus::Failed
    }
}

fn failure(name: &str, analysis_type: AnalysisType, err: &DispatchError) -> MacroAnalysisResult {
    let status = failure_status(err);
    warn!(food = name, ?status, error = %err, "Macro analysis failed");
    MacroAnalysisResult::failure(name, analysis_type, status, err.to_string())
}

fn log_batch(kind: &str, results: &[MacroAnalysisResult]) {
    let successful = results.iter().filter(|r| r.is_success()).count();
    info!(kind, total = results.len(), successful, "Batch analysis completed");
}
