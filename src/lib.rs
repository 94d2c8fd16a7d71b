// ABOUTME: Main library entry point for the Nourishly recipe provider layer
// ABOUTME: Configuration, logging, provider chains, domain services, and the enrichment pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

#![deny(unsafe_code)]

//! # Nourishly
//!
//! Aggregates heterogeneous recipe sources, nutrition APIs, and a cuisine
//! classifier behind one normalized schema.
//!
//! ## Architecture
//!
//! - **`nourishly-core`**: records, error taxonomy, constants
//! - **`nourishly-providers`**: provider traits, built-in providers, rate
//!   limiting, circuit breakers, and the provider registry
//! - **this crate**: environment configuration, logging, the ordered
//!   [`ProviderChain`](orchestration::ProviderChain), per-domain services and
//!   the [`RecipeEnrichmentPipeline`](pipeline::RecipeEnrichmentPipeline)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nourishly::config::NourishlyConfig;
//! use nourishly::services::ProviderServices;
//! use nourishly_providers::ProviderRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = NourishlyConfig::from_env()?;
//!     let services = ProviderServices::from_config(&config, &ProviderRegistry::new())?;
//!
//!     let result = services.classification.classify("Spaghetti carbonara", None).await?;
//!     println!("{} ({:.2})", result.primary_cuisine, result.confidence);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// Ordered provider chains with explicit and automatic selection
pub mod orchestration;

/// Discovery enrichment pipeline
pub mod pipeline;

/// Recipe, macro analysis, and classification services
pub mod services;

pub use config::NourishlyConfig;
pub use orchestration::ProviderChain;
pub use pipeline::{EnrichmentOutcome, EnrichmentSummary, RecipeEnrichmentPipeline};
pub use services::{
    ClassificationService, IngredientQuery, MacroService, ProviderServices, ProviderStatus,
    RecipeService,
};

pub use nourishly_core::{errors, models};
