// ABOUTME: Registry mapping provider identifiers to constructors, one table per domain
// ABOUTME: Built-ins register in declaration order, which is the default fallback order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use std::sync::Arc;
use tracing::info;

use crate::core::{CuisineClassifier, MacroAnalyzer, ProviderConfig, RecipeProvider};
use crate::errors::{DispatchError, ProviderResult};
use crate::spi::ProviderDomain;

#[cfg(feature = "provider-huggingface")]
use crate::classifiers::huggingface;
#[cfg(feature = "provider-api-ninjas")]
use crate::macros::api_ninjas;
#[cfg(feature = "provider-usda")]
use crate::macros::usda;
#[cfg(feature = "provider-budget-bytes")]
use crate::recipes::budget_bytes;
#[cfg(feature = "provider-edamam")]
use crate::recipes::edamam;
#[cfg(any(
    feature = "provider-edamam",
    feature = "provider-budget-bytes",
    feature = "provider-api-ninjas",
    feature = "provider-usda",
    feature = "provider-huggingface"
))]
use crate::spi::ProviderId;

/// Constructor for a recipe provider
pub type RecipeFactoryFn = fn(ProviderConfig) -> ProviderResult<Arc<dyn RecipeProvider>>;
/// Constructor for a macro analyzer
pub type MacroFactoryFn = fn(ProviderConfig) -> ProviderResult<Arc<dyn MacroAnalyzer>>;
/// Constructor for a cuisine classifier
pub type ClassifierFactoryFn = fn(ProviderConfig) -> ProviderResult<Arc<dyn CuisineClassifier>>;

/// Ordered `(name, constructor)` table
#[derive(Debug)]
struct FactoryTable<F> {
    entries: Vec<(String, F)>,
}

impl<F: Copy> FactoryTable<F> {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace an existing entry in place or append a new one
    fn register(&mut self, name: &str, factory: F) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = factory;
        } else {
            self.entries.push((name.to_owned(), factory));
        }
    }

    fn get(&self, name: &str) -> Option<F> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| *f)
    }

    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Identifier-to-constructor registry for all three provider domains
#[derive(Debug)]
pub struct ProviderRegistry {
    recipe: FactoryTable<RecipeFactoryFn>,
    macros: FactoryTable<MacroFactoryFn>,
    classifiers: FactoryTable<ClassifierFactoryFn>,
}

impl ProviderRegistry {
    /// Registry holding every built-in provider enabled at compile time
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();

        Self::register_edamam(&mut registry);
        Self::register_budget_bytes(&mut registry);
        Self::register_api_ninjas(&mut registry);
        Self::register_usda(&mut registry);
        Self::register_huggingface(&mut registry);

        info!(
            recipe = ?registry.names(ProviderDomain::Recipe),
            macros = ?registry.names(ProviderDomain::Macro),
            classifiers = ?registry.names(ProviderDomain::Classifier),
            "Provider registry initialized"
        );

        registry
    }

    /// Registry with nothing registered
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            recipe: FactoryTable::new(),
            macros: FactoryTable::new(),
            classifiers: FactoryTable::new(),
        }
    }

    #[cfg(feature = "provider-edamam")]
    fn register_edamam(registry: &mut Self) {
        registry.register_recipe(ProviderId::Edamam.as_str(), edamam::create);
    }

    #[cfg(not(feature = "provider-edamam"))]
    fn register_edamam(_registry: &mut Self) {}

    #[cfg(feature = "provider-budget-bytes")]
    fn register_budget_bytes(registry: &mut Self) {
        registry.register_recipe(ProviderId::BudgetBytes.as_str(), budget_bytes::create);
    }

    #[cfg(not(feature = "provider-budget-bytes"))]
    fn register_budget_bytes(_registry: &mut Self) {}

    #[cfg(feature = "provider-api-ninjas")]
    fn register_api_ninjas(registry: &mut Self) {
        registry.register_macro(ProviderId::ApiNinjas.as_str(), api_ninjas::create);
    }

    #[cfg(not(feature = "provider-api-ninjas"))]
    fn register_api_ninjas(_registry: &mut Self) {}

    #[cfg(feature = "provider-usda")]
    fn register_usda(registry: &mut Self) {
        registry.register_macro(ProviderId::Usda.as_str(), usda::create);
    }

    #[cfg(not(feature = "provider-usda"))]
    fn register_usda(_registry: &mut Self) {}

    #[cfg(feature = "provider-huggingface")]
    fn register_huggingface(registry: &mut Self) {
        registry.register_classifier(ProviderId::HuggingFace.as_str(), huggingface::create);
    }

    #[cfg(not(feature = "provider-huggingface"))]
    fn register_huggingface(_registry: &mut Self) {}

    /// Register or replace a recipe provider constructor
    pub fn register_recipe(&mut self, name: &str, factory: RecipeFactoryFn) {
        self.recipe.register(name, factory);
    }

    /// Register or replace a macro analyzer constructor
    pub fn register_macro(&mut self, name: &str, factory: MacroFactoryFn) {
        self.macros.register(name, factory);
    }

    /// Register or replace a classifier constructor
    pub fn register_classifier(&mut self, name: &str, factory: ClassifierFactoryFn) {
        self.classifiers.register(name, factory);
    }

    /// Registered identifiers of one domain, in registration order
    #[must_use]
    pub fn names(&self, domain: ProviderDomain) -> Vec<&str> {
        match domain {
            ProviderDomain::Recipe => self.recipe.names(),
            ProviderDomain::Macro => self.macros.names(),
            ProviderDomain::Classifier => self.classifiers.names(),
        }
    }

    /// Whether `name` is registered for `domain`
    #[must_use]
    pub fn is_supported(&self, domain: ProviderDomain, name: &str) -> bool {
        self.names(domain).contains(&name)
    }

    /// Build the recipe provider named by `config.name`
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` for an unregistered name, or the constructor's
    /// error wrapped in `DispatchError::Provider`.
    pub fn create_recipe(&self, config: ProviderConfig) -> Result<Arc<dyn RecipeProvider>, DispatchError> {
        let factory = self
            .recipe
            .get(&config.name)
            .ok_or_else(|| self.unknown(ProviderDomain::Recipe, &config.name))?;
        Self::construct(factory, config)
    }

    /// Build the macro analyzer named by `config.name`
    ///
    /// # Errors
    ///
    /// Same as [`ProviderRegistry::create_recipe`]
    pub fn create_macro(&self, config: ProviderConfig) -> Result<Arc<dyn MacroAnalyzer>, DispatchError> {
        let factory = self
            .macros
            .get(&config.name)
            .ok_or_else(|| self.unknown(ProviderDomain::Macro, &config.name))?;
        Self::construct(factory, config)
    }

    /// Build the classifier named by `config.name`
    ///
    /// # Errors
    ///
    /// Same as [`ProviderRegistry::create_recipe`]
    pub fn create_classifier(
        &self,
        config: ProviderConfig,
    ) -> Result<Arc<dyn CuisineClassifier>, DispatchError> {
        let factory = self
            .classifiers
            .get(&config.name)
            .ok_or_else(|| self.unknown(ProviderDomain::Classifier, &config.name))?;
        Self::construct(factory, config)
    }

    fn construct<T: ?Sized>(
        factory: fn(ProviderConfig) -> ProviderResult<Arc<T>>,
        config: ProviderConfig,
    ) -> Result<Arc<T>, DispatchError> {
        let provider = config.name.clone();
        factory(config).map_err(|source| DispatchError::Provider { provider, source })
    }

    fn unknown(&self, domain: ProviderDomain, name: &str) -> DispatchError {
        DispatchError::UnknownProvider {
            domain: domain.as_str().to_owned(),
            provider: name.to_owned(),
            available: self.names(domain).into_iter().map(str::to_owned).collect(),
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
