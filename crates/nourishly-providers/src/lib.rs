// ABOUTME: Recipe, macro analysis, and cuisine classification provider implementations
// ABOUTME: Core provider traits, rate limiting, circuit breaker, retry utilities, and registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! Provider implementations and core abstractions.
//!
//! This crate wraps every external data source behind one of three capability
//! traits (`RecipeProvider`, `MacroAnalyzer`, `CuisineClassifier`) and
//! normalizes its payloads into the records defined in `nourishly-core`.

pub use nourishly_core::constants;
pub use nourishly_core::errors;
pub use nourishly_core::models;

// Core provider infrastructure
/// Circuit breaker for provider resilience
pub mod circuit_breaker;
/// Capability traits and provider configuration
pub mod core;
/// Shared HTTP client for provider API calls
pub mod http_client;
/// Ingredient, duration, and text parsing helpers
pub mod parsing;
/// Minimum-interval rate limiter owned by each provider instance
pub mod rate_limiter;
/// Identifier-to-constructor registry
pub mod registry;
/// Provider descriptors and capability flags
pub mod spi;
/// Retry and response helpers
pub mod utils;

// Provider implementations grouped by domain
/// Cuisine classifiers
pub mod classifiers;
/// Macro nutrition analyzers
pub mod macros;
/// Recipe search and scraping providers
pub mod recipes;

pub use self::core::{
    render_classification_text, CuisineClassifier, MacroAnalyzer, Provider, ProviderConfig,
    RecipeDiscovery, RecipeProvider,
};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use rate_limiter::RateLimiter;
pub use registry::ProviderRegistry;
pub use spi::{ProviderCapabilities, ProviderDescriptor, ProviderDomain, ProviderId};
