// ABOUTME: Sitemap and HTML link extraction plus the recipe URL filter for Budget Bytes
// ABOUTME: Pure functions over fetched documents; the provider owns all network access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use regex::{Regex, RegexSet};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use crate::constants::budget_bytes::POST_SITEMAP_MARKER;

static LOC_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?is)<loc>\s*(?:<!\[CDATA\[)?\s*([^<\]\s]+)\s*(?:\]\]>)?\s*</loc>").ok()
});

// Paths that are never single recipes: archives, static pages, recaps, roundups.
static EXCLUDED_PATHS: LazyLock<Option<RegexSet>> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)^/category/",
        r"(?i)^/tag/",
        r"(?i)^/page/",
        r"(?i)^/author/",
        r"(?i)^/\d{4}/",
        r"(?i)^/search/",
        r"(?i)^/index/",
        r"(?i)^/(about|contact|faq|privacy|terms)",
        r"(?i)^/(login|register|account)",
        r"(?i)^/extra-bytes/",
        r"(?i)^/weekly-recap",
        r"(?i)^/.*-recap",
        r"(?i)^/.*-challenge",
        r"(?i)^/.*-week-\d+",
        r"(?i)^/feeding-america",
        r"(?i)^/meal-plans?/?$",
        r"(?i)^/.*-meal-plan",
        r"(?i)^/roundup",
        r"(?i)^/.*-giveaway",
        r"(?i)^/best-of-",
        r"(?i)^/top-\d+",
        r"(?i)^/.*-\d{4}/?$",
        r"(?i)^/prices-and-portions",
    ])
    .ok()
});

/// Slugs this short are navigation, not recipes
const MIN_SLUG_LENGTH: usize = 4;

/// A fetched discovery document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryDocument {
    /// `<sitemapindex>`: child sitemaps worth following
    SitemapIndex(Vec<String>),
    /// `<urlset>`: page URLs
    UrlSet(Vec<String>),
    /// Any other page: absolute link targets
    Html(Vec<String>),
}

/// Classify a fetched document and extract its URLs
///
/// Sitemap index children are kept only when they point at post sitemaps.
/// Relative HTML links are resolved against `page_url`.
#[must_use]
pub fn parse_document(body: &str, page_url: &Url) -> DiscoveryDocument {
    let head: String = body.chars().take(2048).collect::<String>().to_lowercase();
    if head.contains("<sitemapindex") {
        let children = extract_locs(body)
            .into_iter()
            .filter(|loc| loc.contains(POST_SITEMAP_MARKER))
            .collect();
        DiscoveryDocument::SitemapIndex(children)
    } else if head.contains("<urlset") {
        DiscoveryDocument::UrlSet(extract_locs(body))
    } else {
        DiscoveryDocument::Html(extract_links(body, page_url))
    }
}

/// Every `<loc>` value in a sitemap, entity-decoded
#[must_use]
pub fn extract_locs(xml: &str) -> Vec<String> {
    let Some(pattern) = LOC_PATTERN.as_ref() else {
        return Vec::new();
    };
    pattern
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
        .collect()
}

/// Absolute targets of every `a[href]` on an HTML page
#[must_use]
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|mut u| {
            u.set_fragment(None);
            u.to_string()
        })
        .collect()
}

/// Accepts URLs that look like a single recipe page on one host
#[derive(Debug, Clone)]
pub struct RecipeUrlFilter {
    host: String,
}

impl RecipeUrlFilter {
    /// Filter accepting pages on `site`'s host
    #[must_use]
    pub fn new(site: &Url) -> Self {
        Self {
            host: site.host_str().unwrap_or_default().to_lowercase(),
        }
    }

    /// Host recipes must live on
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether `url` is on the configured host
    #[must_use]
    pub fn same_host(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(&self.host))
    }

    /// Whether `url` is a recipe page
    #[must_use]
    pub fn accepts(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if !self.same_host(&parsed) {
            return false;
        }
        let path = parsed.path();
        if EXCLUDED_PATHS
            .as_ref()
            .is_some_and(|excluded| excluded.is_match(path))
        {
            return false;
        }
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        matches!(segments.as_slice(), [slug] if slug.len() >= MIN_SLUG_LENGTH)
    }

    /// Accepted URLs in input order, without duplicates, at most `limit`
    #[must_use]
    pub fn filter<I, S>(&self, urls: I, limit: usize) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        urls.into_iter()
            .filter(|u| self.accepts(u.as_ref()))
            .filter(|u| seen.insert(u.as_ref().to_owned()))
            .take(limit)
            .map(|u| u.as_ref().to_owned())
            .collect()
    }
}

/// Last non-empty path segment of a URL, used as the provider-native id
#[must_use]
pub fn slug_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_owned)
}
