// ABOUTME: Recipe commands: search, fetch by id, URL discovery, and the enrichment pipeline
// ABOUTME: The global --provider flag pins the recipe provider for all of them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use anyhow::{bail, Result};
use nourishly::{ProviderServices, RecipeEnrichmentPipeline};
use nourishly_core::models::SearchFilters;

use crate::helpers::display::print_json;

pub async fn search(
    services: &ProviderServices,
    query: &str,
    limit: usize,
    filters: &SearchFilters,
    provider: Option<&str>,
) -> Result<()> {
    let recipes = services
        .recipes
        .search(query, limit, filters, provider)
        .await?;
    print_json(&recipes)
}

pub async fn fetch(services: &ProviderServices, id: &str, provider: Option<&str>) -> Result<()> {
    match services.recipes.fetch_by_id(id, provider).await? {
        Some(recipe) => print_json(&recipe),
        None => bail!("No recipe with id '{id}'"),
    }
}

pub async fn discover(
    services: &ProviderServices,
    start_url: &str,
    limit: usize,
    provider: Option<&str>,
) -> Result<()> {
    let urls = services
        .recipes
        .discover_urls(start_url, limit, provider)
        .await?;
    print_json(&urls)
}

pub async fn enrich(
    services: &ProviderServices,
    start_url: &str,
    discovery_limit: usize,
    fetch_budget: usize,
    provider: Option<&str>,
) -> Result<()> {
    let mut pipeline = RecipeEnrichmentPipeline::new(services);
    if let Some(provider) = provider {
        pipeline = pipeline.with_recipe_provider(provider);
    }
    let summary = pipeline
        .run(start_url, discovery_limit, fetch_budget)
        .await?;
    print_json(&summary)
}
