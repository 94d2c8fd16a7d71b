// ABOUTME: Recipe service routing search, lookup, and discovery through the recipe provider chain
// ABOUTME: Discovery tasks only consider providers that can crawl a site
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use futures_util::future::{self, BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use nourishly_core::errors::{DispatchError, ProviderError, ProviderResult};
use nourishly_core::models::{RecipeData, SearchFilters};
use nourishly_providers::{ProviderDomain, RecipeDiscovery, RecipeProvider};

use super::{provider_status, ProviderStatus};
use crate::orchestration::ProviderChain;

/// Recipe search, lookup, and discovery with provider fallback
#[derive(Debug)]
pub struct RecipeService {
    chain: ProviderChain<dyn RecipeProvider>,
}

impl RecipeService {
    /// Service over `providers`, tried in the given order
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn RecipeProvider>>, availability_ttl: Duration) -> Self {
        Self {
            chain: ProviderChain::new(ProviderDomain::Recipe, providers, availability_ttl),
        }
    }

    /// Underlying chain
    #[must_use]
    pub const fn chain(&self) -> &ProviderChain<dyn RecipeProvider> {
        &self.chain
    }

    /// Search for at most `limit` recipes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank query, otherwise the chain's dispatch error
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
        provider: Option<&str>,
    ) -> Result<Vec<RecipeData>, DispatchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DispatchError::InvalidInput("search query is empty".into()));
        }
        let recipes = self
            .chain
            .run(provider, |p| p.search(query, limit, filters))
            .await?;
        info!(query, count = recipes.len(), "Recipe search completed");
        Ok(recipes)
    }

    /// Run several searches; position `i` of the output answers `queries[i]`
    pub async fn search_batch(
        &self,
        queries: &[String],
        limit: usize,
        filters: &SearchFilters,
        provider: Option<&str>,
    ) -> Vec<Result<Vec<RecipeData>, DispatchError>> {
        self.chain
            .run_batch(queries, provider, |p, query| p.search(query.trim(), limit, filters))
            .await
    }

    /// Fetch one recipe by provider-native identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank id, otherwise the chain's dispatch error
    pub async fn fetch_by_id(
        &self,
        id: &str,
        provider: Option<&str>,
    ) -> Result<Option<RecipeData>, DispatchError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DispatchError::InvalidInput("recipe id is empty".into()));
        }
        self.chain.run(provider, |p| p.fetch_by_id(id)).await
    }

    /// Enumerate candidate recipe URLs without fetching them
    ///
    /// An empty `start_url` lets the provider pick its default entry points.
    ///
    /// # Errors
    ///
    /// Returns the chain's dispatch error; providers without discovery fail
    /// their attempt with `Unavailable`
    pub async fn discover_urls(
        &self,
        start_url: &str,
        limit: usize,
        provider: Option<&str>,
    ) -> Result<Vec<String>, DispatchError> {
        let urls = self
            .chain
            .run(provider, |p| {
                with_discovery(p, |d| d.discover_urls(start_url, limit))
            })
            .await?;
        info!(start_url, count = urls.len(), "Discovery completed");
        Ok(urls)
    }

    /// Fetch and normalize one recipe page
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank URL, otherwise the chain's dispatch error
    pub async fn process_from_url(
        &self,
        url: &str,
        provider: Option<&str>,
    ) -> Result<Option<RecipeData>, DispatchError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DispatchError::InvalidInput("recipe URL is empty".into()));
        }
        self.chain
            .run(provider, |p| with_discovery(p, |d| d.process_from_url(url)))
            .await
    }

    /// Configuration and live availability of every recipe provider
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        provider_status(&self.chain).await
    }
}

/// Call `op` on the provider's discovery capability, or fail the attempt
fn with_discovery<'a, T, F>(provider: &'a dyn RecipeProvider, op: F) -> BoxFuture<'a, ProviderResult<T>>
where
    F: FnOnce(&'a dyn RecipeDiscovery) -> BoxFuture<'a, ProviderResult<T>>,
    T: Send + 'a,
{
    match provider.as_discovery() {
        Some(discovery) => op(discovery),
        None => future::ready(Err(ProviderError::Unavailable {
            provider: provider.name().to_owned(),
            reason: "site discovery is not supported".into(),
        }))
        .boxed(),
    }
}
