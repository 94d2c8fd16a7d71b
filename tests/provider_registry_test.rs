// ABOUTME: Tests for the provider registry mapping identifiers to constructors
// ABOUTME: Validates built-in registration order, lookups, custom factories, and constructor errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::mock_providers::MockProvider;
use nourishly_core::errors::{DispatchError, ProviderError, ProviderResult};
use nourishly_providers::{
    Provider, ProviderConfig, ProviderDomain, ProviderId, ProviderRegistry, RecipeProvider,
};

fn mock_recipe(config: ProviderConfig) -> ProviderResult<Arc<dyn RecipeProvider>> {
    let provider: Arc<dyn RecipeProvider> = MockProvider::new(&config.name).arc();
    Ok(provider)
}

fn broken_recipe(config: ProviderConfig) -> ProviderResult<Arc<dyn RecipeProvider>> {
    Err(ProviderError::configuration(&config.name, "always broken"))
}

#[test]
fn test_builtins_register_in_declaration_order() {
    let registry = ProviderRegistry::new();

    assert_eq!(
        registry.names(ProviderDomain::Recipe),
        vec!["edamam", "budget_bytes"]
    );
    assert_eq!(registry.names(ProviderDomain::Macro), vec!["api_ninjas", "usda"]);
    assert_eq!(
        registry.names(ProviderDomain::Classifier),
        vec!["huggingface"]
    );
}

#[test]
fn test_is_supported_is_scoped_to_domain() {
    let registry = ProviderRegistry::new();

    assert!(registry.is_supported(ProviderDomain::Recipe, "edamam"));
    assert!(!registry.is_supported(ProviderDomain::Macro, "edamam"));
    assert!(!registry.is_supported(ProviderDomain::Recipe, "nonexistent"));
}

#[test]
fn test_empty_registry_knows_nothing() {
    let registry = ProviderRegistry::empty();

    assert!(registry.names(ProviderDomain::Recipe).is_empty());
    assert!(registry.names(ProviderDomain::Classifier).is_empty());
}

#[test]
fn test_create_builtin_provider() {
    let registry = ProviderRegistry::new();
    let config = ProviderConfig::new(ProviderId::Edamam.as_str(), Duration::ZERO)
        .with_api_key("key")
        .with_option("app_id", "app");

    let provider = registry.create_recipe(config).unwrap();

    assert_eq!(provider.name(), "edamam");
}

#[test]
fn test_unknown_provider_lists_available_names() {
    let registry = ProviderRegistry::new();
    let config = ProviderConfig::new("spoonacular", Duration::ZERO);

    let err = registry.create_recipe(config).err().unwrap();

    match &err {
        DispatchError::UnknownProvider {
            domain,
            provider,
            available,
        } => {
            assert_eq!(domain, "recipe");
            assert_eq!(provider, "spoonacular");
            assert_eq!(available, &vec!["edamam".to_owned(), "budget_bytes".to_owned()]);
        }
        other => panic!("expected unknown provider, got {other:?}"),
    }
    assert!(err.to_string().contains("Unknown provider 'spoonacular'"));
}

#[test]
fn test_wrong_domain_is_unknown() {
    let registry = ProviderRegistry::new();
    let config = ProviderConfig::new("usda", Duration::ZERO);

    assert!(matches!(
        registry.create_classifier(config),
        Err(DispatchError::UnknownProvider { .. })
    ));
}

#[test]
fn test_constructor_errors_are_attributed_to_provider() {
    let registry = ProviderRegistry::new();
    let config = ProviderConfig::new(ProviderId::BudgetBytes.as_str(), Duration::ZERO);

    let err = registry.create_recipe(config).err().unwrap();

    match err {
        DispatchError::Provider { provider, source } => {
            assert_eq!(provider, "budget_bytes");
            assert!(matches!(source, ProviderError::ConfigurationError { .. }));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[test]
fn test_custom_factory_registers_and_replaces() {
    let mut registry = ProviderRegistry::empty();

    registry.register_recipe("local", broken_recipe);
    assert!(registry
        .create_recipe(ProviderConfig::new("local", Duration::ZERO))
        .is_err());

    registry.register_recipe("local", mock_recipe);
    let provider = registry
        .create_recipe(ProviderConfig::new("local", Duration::ZERO))
        .unwrap();

    assert_eq!(provider.name(), "local");
    assert_eq!(registry.names(ProviderDomain::Recipe), vec!["local"]);
}
