// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Endpoints, classification thresholds, macro tables, and unit vocabularies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! Constants module
//!
//! Constants are grouped by the concern that reads them rather than kept in one
//! flat namespace.

/// Unit vocabularies and conversions used by ingredient parsing
pub mod units;

/// Provider identifiers
pub mod provider_ids {
    /// Edamam recipe search API
    pub const EDAMAM: &str = "edamam";
    /// Budget Bytes web scraper
    pub const BUDGET_BYTES: &str = "budget_bytes";
    /// API Ninjas nutrition API
    pub const API_NINJAS: &str = "api_ninjas";
    /// USDA `FoodData` Central
    pub const USDA: &str = "usda";
    /// Hugging Face zero-shot inference
    pub const HUGGINGFACE: &str = "huggingface";
}

/// Default upstream endpoints
pub mod endpoints {
    /// Edamam recipe search v2
    pub const EDAMAM_BASE_URL: &str = "https://api.edamam.com/api/recipes/v2";
    /// Budget Bytes site root
    pub const BUDGET_BYTES_BASE_URL: &str = "https://www.budgetbytes.com";
    /// API Ninjas v1
    pub const API_NINJAS_BASE_URL: &str = "https://api.api-ninjas.com/v1";
    /// USDA `FoodData` Central v1
    pub const USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
    /// Hugging Face hosted inference models root
    pub const HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
}

/// HTTP client behaviour
pub mod http {
    /// Request timeout applied to every outbound call
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// TCP connect timeout
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Timeout for lightweight availability checks
    pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
    /// User agent sent by the scraper
    pub const SCRAPER_USER_AGENT: &str =
        "Mozilla/5.0 (compatible; Recipe Scraper; +https://nourishly.app)";
}

/// Cuisine classification
pub mod classification {
    /// Lower bound (inclusive) of the MEDIUM confidence tier
    pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.6;
    /// Lower bound (inclusive) of the HIGH confidence tier
    pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;
    /// Ranked alternatives kept after the primary label
    pub const MAX_ALTERNATIVES: usize = 5;
    /// Ingredients rendered into a structured classification prompt
    pub const MAX_PROMPT_INGREDIENTS: usize = 15;
    /// Shortest trimmed text worth sending to a model
    pub const MIN_TEXT_LENGTH: usize = 3;
    /// Default zero-shot model
    pub const DEFAULT_MODEL_ID: &str = "facebook/bart-large-mnli";
    /// Classification results kept in the LRU cache
    pub const CACHE_CAPACITY: usize = 100;
}

/// Macro analysis
pub mod macros {
    /// Default quantity for single-ingredient analysis
    pub const DEFAULT_INGREDIENT_GRAMS: f64 = 100.0;
    /// Calories per gram of protein
    pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
    /// Calories per gram of carbohydrate
    pub const CARBOHYDRATE_KCAL_PER_GRAM: f64 = 4.0;
    /// Calories per gram of fat
    pub const FAT_KCAL_PER_GRAM: f64 = 9.0;
    /// Calories per gram of alcohol
    pub const ALCOHOL_KCAL_PER_GRAM: f64 = 7.0;
    /// Confidence of API Ninjas results that include premium fields
    pub const API_NINJAS_CONFIDENCE: f64 = 0.8;
    /// Confidence of API Ninjas results limited to free-tier fields
    pub const API_NINJAS_FREE_TIER_CONFIDENCE: f64 = 0.5;
    /// Confidence of USDA results with measured weights
    pub const USDA_CONFIDENCE: f64 = 0.9;
    /// Confidence of USDA recipe results where some weights were assumed
    pub const USDA_ESTIMATED_CONFIDENCE: f64 = 0.6;
    /// Food names longer than this are truncated in recipe breakdowns
    pub const MAX_FOOD_NAME_LENGTH: usize = 50;
    /// Upper bound on items accepted by a single batch call
    pub const MAX_BATCH_SIZE: usize = 50;
    /// Entries kept in each USDA response cache
    pub const USDA_CACHE_CAPACITY: usize = 1_000;
}

/// USDA `FoodData` Central nutrient identifiers
pub mod usda_nutrients {
    /// Energy (kcal)
    pub const ENERGY_KCAL: u32 = 1008;
    /// Protein (g)
    pub const PROTEIN: u32 = 1003;
    /// Carbohydrate, by difference (g)
    pub const CARBOHYDRATE: u32 = 1005;
    /// Total lipid (g)
    pub const FAT: u32 = 1004;
    /// Fiber, total dietary (g)
    pub const FIBER: u32 = 1079;
    /// Sugars, total (g)
    pub const SUGAR: u32 = 2000;
    /// Sodium (mg)
    pub const SODIUM: u32 = 1093;
    /// Fatty acids, total saturated (g)
    pub const SATURATED_FAT: u32 = 1258;
    /// Cholesterol (mg)
    pub const CHOLESTEROL: u32 = 1253;
}

/// Budget Bytes discovery
pub mod budget_bytes {
    /// Sitemaps tried in order when discovery has no start URL
    pub const DEFAULT_SITEMAPS: &[&str] = &["post-sitemap.xml", "post-sitemap2.xml"];
    /// Marker identifying recipe post sitemaps inside a sitemap index
    pub const POST_SITEMAP_MARKER: &str = "post-sitemap";
}
