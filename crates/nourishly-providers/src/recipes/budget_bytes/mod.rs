// ABOUTME: Budget Bytes recipe provider built on sitemap discovery and JSON-LD scraping
// ABOUTME: Discovery never fetches recipe pages; per-URL processing is rate limited
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! # Budget Bytes
//!
//! Budget Bytes has no API, so the provider works in two phases:
//!
//! 1. [`RecipeDiscovery::discover_urls`] walks post sitemaps (or an HTML page)
//!    and returns candidate recipe URLs without fetching them.
//! 2. [`RecipeDiscovery::process_from_url`] fetches one page, waits on the
//!    rate limiter first, and normalizes its schema.org `Recipe` JSON-LD.
//!
//! Sitemap index recursion is bounded by the required `max_sitemap_depth`
//! option.

/// Sitemap parsing and recipe URL filtering
pub mod discovery;
/// JSON-LD extraction and normalization
pub mod schema;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument, Span};
use url::Url;

use self::discovery::{parse_document, DiscoveryDocument, RecipeUrlFilter};
use crate::constants::budget_bytes::DEFAULT_SITEMAPS;
use crate::constants::endpoints::BUDGET_BYTES_BASE_URL;
use crate::constants::http::SCRAPER_USER_AGENT;
use crate::constants::provider_ids::BUDGET_BYTES;
use crate::core::{Provider, ProviderConfig, RecipeDiscovery, RecipeProvider};
use crate::errors::{NormalizationError, ProviderError, ProviderResult};
use crate::http_client::{health_check_client, shared_client};
use crate::models::{RecipeData, SearchFilters};
use crate::rate_limiter::RateLimiter;
use crate::utils::ensure_success;

/// Option key bounding sitemap index recursion
pub const MAX_SITEMAP_DEPTH_OPTION: &str = "max_sitemap_depth";
/// Option key overriding the scraper user agent
pub const USER_AGENT_OPTION: &str = "user_agent";

/// Budget Bytes scraper
pub struct BudgetBytesProvider {
    config: ProviderConfig,
    base_url: Url,
    filter: RecipeUrlFilter,
    max_sitemap_depth: usize,
    user_agent: String,
    client: Client,
    limiter: RateLimiter,
    span: Span,
}

impl BudgetBytesProvider {
    /// Build the provider; performs no I/O
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the base URL is invalid or
    /// `max_sitemap_depth` is missing or not a number
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let base_url = Url::parse(&config.base_url_or(BUDGET_BYTES_BASE_URL)).map_err(|e| {
            ProviderError::configuration(BUDGET_BYTES, format!("invalid base URL: {e}"))
        })?;
        let max_sitemap_depth = config
            .usize_option(MAX_SITEMAP_DEPTH_OPTION)
            .ok_or_else(|| {
                ProviderError::configuration(
                    BUDGET_BYTES,
                    format!("option '{MAX_SITEMAP_DEPTH_OPTION}' is required"),
                )
            })?;
        let user_agent = config
            .option(USER_AGENT_OPTION)
            .unwrap_or(SCRAPER_USER_AGENT)
            .to_owned();

        Ok(Self {
            filter: RecipeUrlFilter::new(&base_url),
            limiter: RateLimiter::new(config.min_interval),
            span: info_span!("provider", provider = BUDGET_BYTES),
            client: shared_client().clone(),
            base_url,
            max_sitemap_depth,
            user_agent,
            config,
        })
    }

    /// Host recipes are accepted from
    #[must_use]
    pub fn host(&self) -> &str {
        self.filter.host()
    }

    fn site_url(&self, path: &str) -> ProviderResult<Url> {
        self.base_url.join(path).map_err(|e| {
            ProviderError::invalid_input(BUDGET_BYTES, format!("cannot build URL from '{path}': {e}"))
        })
    }

    async fn fetch_text(&self, url: &Url) -> ProviderResult<String> {
        let response = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        Ok(ensure_success(response, BUDGET_BYTES).await?.text().await?)
    }

    /// Walk one discovery root breadth-first, following sitemap indexes up to the depth bound
    async fn crawl(&self, root: Url, limit: usize) -> ProviderResult<Vec<String>> {
        let mut queue = VecDeque::from([(root, 0_usize)]);
        let mut found: Vec<String> = Vec::new();
        let mut first = true;

        while let Some((url, depth)) = queue.pop_front() {
            let body = match self.fetch_text(&url).await {
                Ok(body) => body,
                Err(err) if first => return Err(err),
                Err(err) => {
                    warn!(url = %url, error = %err, "Skipping child sitemap");
                    continue;
                }
            };
            first = false;

            match parse_document(&body, &url) {
                DiscoveryDocument::SitemapIndex(children) => {
                    if depth >= self.max_sitemap_depth {
                        warn!(url = %url, depth, "Sitemap depth limit reached, not descending");
                        continue;
                    }
                    debug!(url = %url, children = children.len(), "Sitemap index");
                    queue.extend(
                        children
                            .iter()
                            .filter_map(|child| Url::parse(child).ok())
                            .map(|child| (child, depth + 1)),
                    );
                }
                DiscoveryDocument::UrlSet(urls) | DiscoveryDocument::Html(urls) => {
                    debug!(url = %url, urls = urls.len(), "Discovery document parsed");
                    found.extend(urls);
                    if self.filter.filter(&found, limit).len() >= limit {
                        break;
                    }
                }
            }
        }

        Ok(self.filter.filter(found, limit))
    }

    /// Default post sitemaps, stopping at the first that yields recipe URLs
    async fn discover_from_default_sitemaps(&self, limit: usize) -> ProviderResult<Vec<String>> {
        let mut last_error = None;
        for sitemap in DEFAULT_SITEMAPS {
            let url = self.site_url(sitemap)?;
            match self.crawl(url.clone(), limit).await {
                Ok(urls) if !urls.is_empty() => {
                    info!(sitemap = %url, count = urls.len(), "Discovered recipe URLs");
                    return Ok(urls);
                }
                Ok(_) => debug!(sitemap = %url, "Sitemap yielded no recipe URLs"),
                Err(err) => {
                    warn!(sitemap = %url, error = %err, "Sitemap fetch failed");
                    last_error = Some(err);
                }
            }
        }
        last_error.map_or_else(|| Ok(Vec::new()), Err)
    }

    async fn discover(&self, start_url: &str, limit: usize) -> ProviderResult<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let start_url = start_url.trim();
        if start_url.is_empty() {
            return self.discover_from_default_sitemaps(limit).await;
        }
        let root = Url::parse(start_url)
            .or_else(|_| self.base_url.join(start_url))
            .map_err(|e| {
                ProviderError::invalid_input(BUDGET_BYTES, format!("invalid start URL '{start_url}': {e}"))
            })?;
        let urls = self.crawl(root, limit).await?;
        info!(start_url, count = urls.len(), "Discovered recipe URLs");
        Ok(urls)
    }

    async fn process(&self, url: &str) -> ProviderResult<Option<RecipeData>> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| ProviderError::invalid_input(BUDGET_BYTES, format!("invalid URL '{url}': {e}")))?;
        if !self.filter.same_host(&parsed) {
            return Err(ProviderError::invalid_input(
                BUDGET_BYTES,
                format!("'{url}' is not a {} URL", self.filter.host()),
            ));
        }

        self.limiter.acquire().await;
        let response = self
            .client
            .get(parsed.as_str())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(url, "Recipe page not found");
            return Ok(None);
        }
        let html = ensure_success(response, BUDGET_BYTES).await?.text().await?;

        let Some(mut raw) = schema::extract_recipe_json_ld(&html) else {
            debug!(url, "Page has no Recipe JSON-LD");
            return Ok(None);
        };
        if let Value::Object(map) = &mut raw {
            map.entry("url")
                .or_insert_with(|| Value::String(parsed.to_string()));
        }

        let recipe = self.normalize(&raw)?;
        info!(url, title = %recipe.title, ingredients = recipe.ingredients.len(), "Recipe scraped");
        Ok(Some(recipe))
    }

    async fn search_slugs(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> ProviderResult<Vec<RecipeData>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let tokens: Vec<String> = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        let candidates: Vec<String> = self
            .discover_from_default_sitemaps(usize::MAX)
            .await?
            .into_iter()
            .filter(|url| {
                let slug = discovery::slug_of(url).unwrap_or_default().to_lowercase();
                tokens.iter().all(|t| slug.contains(t.as_str()))
            })
            .collect();
        debug!(query, candidates = candidates.len(), "Search candidates selected");

        let mut recipes = Vec::new();
        for url in candidates {
            match self.process(&url).await {
                Ok(Some(recipe)) if filters.matches(&recipe) => recipes.push(recipe),
                Ok(_) => {}
                Err(ProviderError::Normalization(err)) => {
                    warn!(url = %url, error = %err.message, "Skipping unparseable recipe page");
                }
                Err(err) => return Err(err),
            }
            if recipes.len() >= limit {
                break;
            }
        }
        Ok(recipes)
    }
}

/// Registry constructor
///
/// # Errors
///
/// Returns `ConfigurationError` when required options are missing
pub fn create(config: ProviderConfig) -> ProviderResult<Arc<dyn RecipeProvider>> {
    Ok(Arc::new(BudgetBytesProvider::new(config)?))
}

#[async_trait]
impl Provider for BudgetBytesProvider {
    fn name(&self) -> &str {
        BUDGET_BYTES
    }

    fn validate_config(&self) -> bool {
        !self.filter.host().is_empty()
    }

    async fn is_available(&self) -> bool {
        if !self.validate_config() {
            return false;
        }
        let check = health_check_client()
            .get(self.base_url.as_str())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .instrument(self.span.clone())
            .await;
        match check {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(parent: &self.span, error = %err, "Availability check failed");
                false
            }
        }
    }
}

#[async_trait]
impl RecipeProvider for BudgetBytesProvider {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> ProviderResult<Vec<RecipeData>> {
        self.search_slugs(query, limit, filters)
            .instrument(self.span.clone())
            .await
    }

    async fn fetch_by_id(&self, id: &str) -> ProviderResult<Option<RecipeData>> {
        let slug = id.trim().trim_matches('/');
        if slug.is_empty() || slug.contains('/') {
            return Err(ProviderError::invalid_input(
                BUDGET_BYTES,
                format!("'{id}' is not a recipe slug"),
            ));
        }
        let url = self.site_url(&format!("{slug}/"))?;
        self.process(url.as_str())
            .instrument(self.span.clone())
            .await
    }

    fn normalize(&self, raw: &Value) -> Result<RecipeData, NormalizationError> {
        schema::normalize_recipe(raw)
    }

    fn as_discovery(&self) -> Option<&dyn RecipeDiscovery> {
        Some(self)
    }
}

#[async_trait]
impl RecipeDiscovery for BudgetBytesProvider {
    async fn discover_urls(&self, start_url: &str, limit: usize) -> ProviderResult<Vec<String>> {
        self.discover(start_url, limit)
            .instrument(self.span.clone())
            .await
    }

    async fn process_from_url(&self, url: &str) -> ProviderResult<Option<RecipeData>> {
        self.process(url).instrument(self.span.clone()).await
    }
}

impl std::fmt::Debug for BudgetBytesProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetBytesProvider")
            .field("base_url", &self.base_url.as_str())
            .field("max_sitemap_depth", &self.max_sitemap_depth)
            .field("min_interval", &self.config.min_interval)
            .finish_non_exhaustive()
    }
}
