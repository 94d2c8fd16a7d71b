// ABOUTME: Recipe provider implementations
// ABOUTME: Edamam API search and the Budget Bytes sitemap scraper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// Budget Bytes sitemap discovery and JSON-LD scraping
#[cfg(feature = "provider-budget-bytes")]
pub mod budget_bytes;
/// Edamam Recipe Search API v2
#[cfg(feature = "provider-edamam")]
pub mod edamam;

#[cfg(feature = "provider-budget-bytes")]
pub use budget_bytes::BudgetBytesProvider;
#[cfg(feature = "provider-edamam")]
pub use edamam::EdamamProvider;
