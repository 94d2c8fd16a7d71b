// ABOUTME: Service layer wiring configured providers into per-domain fallback chains
// ABOUTME: Recipes, macro analysis, and classification share one construction path and status report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! Domain services
//!
//! Each service owns one [`ProviderChain`] and adds input validation and
//! result shaping on top of it. [`ProviderServices::from_config`] builds all
//! three from a [`NourishlyConfig`].

/// Cuisine classification
pub mod classification;

/// Macro nutrition analysis
pub mod macros;

/// Recipe search, lookup, and discovery
pub mod recipes;

use serde::Serialize;
use tracing::info;

use nourishly_core::errors::DispatchError;
use nourishly_providers::http_client::initialize_shared_client;
use nourishly_providers::{Provider, ProviderConfig, ProviderDomain, ProviderRegistry};

use crate::config::NourishlyConfig;
use crate::orchestration::ProviderChain;

pub use classification::ClassificationService;
pub use macros::{IngredientQuery, MacroService};
pub use recipes::RecipeService;

/// Health of one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    /// Provider identifier
    pub name: String,
    /// Task domain
    pub domain: ProviderDomain,
    /// Whether static configuration is complete
    pub config_valid: bool,
    /// Fresh `is_available` answer
    pub available: bool,
    /// Circuit breaker state
    pub circuit: &'static str,
}

/// Check every provider of a chain, bypassing the availability cache
pub(crate) async fn provider_status<P: ?Sized + Provider>(
    chain: &ProviderChain<P>,
) -> Vec<ProviderStatus> {
    let mut statuses = Vec::new();
    for provider in chain.providers() {
        let name = provider.name();
        statuses.push(ProviderStatus {
            name: name.to_owned(),
            domain: chain.domain(),
            config_valid: provider.validate_config(),
            available: provider.is_available().await,
            circuit: chain.circuit_state(name).map_or("unknown", |s| s.as_str()),
        });
    }
    statuses
}

/// The three domain services built from one configuration
#[derive(Debug)]
pub struct ProviderServices {
    /// Recipe search, lookup, and discovery
    pub recipes: RecipeService,
    /// Macro analysis
    pub macros: MacroService,
    /// Cuisine classification
    pub classification: ClassificationService,
}

impl ProviderServices {
    /// Build every configured provider in its domain's fallback order
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` when a configured identifier was compiled out
    /// of `registry`, or a provider constructor's error
    pub fn from_config(
        config: &NourishlyConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self, DispatchError> {
        initialize_shared_client(config.http.timeout_secs, config.http.connect_timeout_secs);

        let mut recipe_providers = Vec::new();
        for settings in settings_in_order(config, ProviderDomain::Recipe) {
            recipe_providers.push(registry.create_recipe(settings)?);
        }
        let mut analyzers = Vec::new();
        for settings in settings_in_order(config, ProviderDomain::Macro) {
            analyzers.push(registry.create_macro(settings)?);
        }
        let mut classifiers = Vec::new();
        for settings in settings_in_order(config, ProviderDomain::Classifier) {
            classifiers.push(registry.create_classifier(settings)?);
        }

        let services = Self {
            recipes: RecipeService::new(recipe_providers, config.availability_ttl),
            macros: MacroService::new(analyzers, config.availability_ttl),
            classification: ClassificationService::new(classifiers, config.availability_ttl),
        };
        info!(
            recipe = ?services.recipes.chain().names(),
            macros = ?services.macros.chain().names(),
            classifiers = ?services.classification.chain().names(),
            "Provider chains ready"
        );
        Ok(services)
    }

    /// Assemble from already-built services
    #[must_use]
    pub const fn new(
        recipes: RecipeService,
        macros: MacroService,
        classification: ClassificationService,
    ) -> Self {
        Self {
            recipes,
            macros,
            classification,
        }
    }

    /// Status of every provider across the three domains
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        let mut statuses = self.recipes.provider_status().await;
        statuses.extend(self.macros.provider_status().await);
        statuses.extend(self.classification.provider_status().await);
        statuses
    }
}

/// Provider configurations of one domain in fallback order
fn settings_in_order(
    config: &NourishlyConfig,
    domain: ProviderDomain,
) -> Vec<ProviderConfig> {
    config
        .order(domain)
        .iter()
        .filter_map(|id| config.provider(*id))
        .map(|settings| settings.config.clone())
        .collect()
}
