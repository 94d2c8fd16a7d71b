// ABOUTME: Nourishly CLI - command-line front end for recipe search, macro analysis, and classification
// ABOUTME: Builds provider chains from NOURISHLY_* variables and prints results as pretty JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly
//!
//! Usage:
//! ```bash
//! # Search recipes with automatic fallback
//! nourishly-cli search "chicken curry" --limit 5 --cuisine indian
//!
//! # Crawl a site, then classify and analyze what was found
//! nourishly-cli --provider budget_bytes enrich --discovery-limit 20 --fetch-budget 5
//!
//! # Macros for 150 g of rice from one named analyzer
//! nourishly-cli --provider usda analyze-ingredient "white rice" --quantity 150
//!
//! # Cuisine of a dish
//! nourishly-cli classify "Pad thai with shrimp and peanuts"
//!
//! # Provider health
//! nourishly-cli status
//! ```

mod commands;
mod helpers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use nourishly::logging::LoggingConfig;
use nourishly::{NourishlyConfig, ProviderServices};
use nourishly_core::models::SearchFilters;
use nourishly_providers::ProviderRegistry;

#[derive(Parser)]
#[command(
    name = "nourishly-cli",
    about = "Nourishly recipe provider CLI",
    long_about = "Search recipes, crawl recipe sites, analyze macros, and classify cuisines through ordered provider chains."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use only this provider instead of automatic fallback
    #[arg(long, short = 'p', global = true)]
    provider: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Search recipes
    Search {
        /// Free-text query
        query: String,

        /// Maximum number of recipes
        #[arg(long, default_value = "10")]
        limit: usize,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Fetch one recipe by provider-native id
    Fetch {
        /// Recipe identifier
        id: String,
    },

    /// List recipe URLs found on a site without fetching them
    Discover {
        /// Page or sitemap to start from (provider default when omitted)
        #[arg(long, default_value = "")]
        start_url: String,

        /// Maximum number of URLs
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Discover recipes, then classify and analyze the ones missing data
    Enrich {
        /// Page or sitemap to start from (provider default when omitted)
        #[arg(long, default_value = "")]
        start_url: String,

        /// Maximum number of URLs to discover
        #[arg(long, default_value = "20")]
        discovery_limit: usize,

        /// Maximum number of pages to fetch
        #[arg(long, default_value = "5")]
        fetch_budget: usize,
    },

    /// Macros for one ingredient
    AnalyzeIngredient {
        /// Ingredient name
        name: String,

        /// Grams to analyze (default: 100)
        #[arg(long)]
        quantity: Option<f64>,
    },

    /// Macros for a recipe given as ingredient lines
    AnalyzeRecipe {
        /// Ingredient lines; use `-` to read them from stdin
        lines: Vec<String>,

        /// Servings the recipe yields
        #[arg(long)]
        servings: Option<u32>,
    },

    /// Cuisine of a dish description, or of a title plus ingredients
    Classify {
        /// Free text, or the title when `--ingredient` is given
        text: String,

        /// Ingredient name (repeatable)
        #[arg(long = "ingredient", short = 'i')]
        ingredients: Vec<String>,
    },

    /// Configuration, availability, and breaker state of every provider
    Status,
}

/// Recipe search filters
#[derive(clap::Args)]
struct FilterArgs {
    /// Cuisine label
    #[arg(long)]
    cuisine: Option<String>,

    /// Diet label (vegan, low-carb, ...)
    #[arg(long)]
    diet: Option<String>,

    /// Maximum preparation minutes
    #[arg(long)]
    max_prep_time: Option<u32>,

    /// Maximum cooking minutes
    #[arg(long)]
    max_cook_time: Option<u32>,

    /// Difficulty label
    #[arg(long)]
    difficulty: Option<String>,
}

impl From<FilterArgs> for SearchFilters {
    fn from(args: FilterArgs) -> Self {
        Self {
            cuisine: args.cuisine,
            diet: args.diet,
            max_prep_time: args.max_prep_time,
            max_cook_time: args.max_cook_time,
            difficulty: args.difficulty,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let config = NourishlyConfig::from_env().context("Invalid NOURISHLY_* configuration")?;
    let registry = ProviderRegistry::new();
    let services = ProviderServices::from_config(&config, &registry)?;
    debug!(?config.http, "Services ready");

    let provider = cli.provider.as_deref();
    match cli.command {
        Command::Search {
            query,
            limit,
            filters,
        } => commands::recipes::search(&services, &query, limit, &filters.into(), provider).await,
        Command::Fetch { id } => commands::recipes::fetch(&services, &id, provider).await,
        Command::Discover { start_url, limit } => {
            commands::recipes::discover(&services, &start_url, limit, provider).await
        }
        Command::Enrich {
            start_url,
            discovery_limit,
            fetch_budget,
        } => {
            commands::recipes::enrich(&services, &start_url, discovery_limit, fetch_budget, provider)
                .await
        }
        Command::AnalyzeIngredient { name, quantity } => {
            commands::macros::analyze_ingredient(&services, &name, quantity, provider).await
        }
        Command::AnalyzeRecipe { lines, servings } => {
            commands::macros::analyze_recipe(&services, &lines, servings, provider).await
        }
        Command::Classify { text, ingredients } => {
            commands::classify::classify(&services, &text, &ingredients, provider).await
        }
        Command::Status => commands::status(&services).await,
    }
}
