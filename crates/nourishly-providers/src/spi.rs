// ABOUTME: Provider identity and capability descriptors for the built-in data sources
// ABOUTME: Enumerates provider ids, their domains, and capability bitflags used for routing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! # Provider Descriptors
//!
//! Every built-in provider is identified by a [`ProviderId`] and described by a
//! [`ProviderDescriptor`]. Descriptors carry static metadata only; the
//! [`ProviderRegistry`](crate::registry::ProviderRegistry) pairs them with
//! constructors.
//!
//! ```rust,ignore
//! use nourishly_providers::spi::{ProviderCapabilities, ProviderDescriptor};
//!
//! pub struct SpoonacularDescriptor;
//!
//! impl ProviderDescriptor for SpoonacularDescriptor {
//!     fn name(&self) -> &'static str {
//!         "spoonacular"
//!     }
//!
//!     fn display_name(&self) -> &'static str {
//!         "Spoonacular"
//!     }
//!
//!     fn capabilities(&self) -> ProviderCapabilities {
//!         ProviderCapabilities::RECIPE_SEARCH | ProviderCapabilities::REQUIRES_CREDENTIALS
//!     }
//!
//!     fn default_base_url(&self) -> &'static str {
//!         "https://api.spoonacular.com"
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{endpoints, provider_ids};

/// The three provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderDomain {
    /// Recipe search, lookup, and discovery
    Recipe,
    /// Macro nutrition analysis
    Macro,
    /// Cuisine classification
    Classifier,
}

impl ProviderDomain {
    /// Lowercase label used in logs and errors
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::Macro => "macro",
            Self::Classifier => "classifier",
        }
    }
}

impl fmt::Display for ProviderDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in provider identifiers, in default fallback order within each domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Edamam recipe search
    Edamam,
    /// Budget Bytes scraper
    BudgetBytes,
    /// API Ninjas nutrition
    ApiNinjas,
    /// USDA `FoodData` Central
    Usda,
    /// Hugging Face zero-shot classification
    HuggingFace,
}

impl ProviderId {
    /// Every built-in, in declaration order
    pub const ALL: [Self; 5] = [
        Self::Edamam,
        Self::BudgetBytes,
        Self::ApiNinjas,
        Self::Usda,
        Self::HuggingFace,
    ];

    /// Stable string identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edamam => provider_ids::EDAMAM,
            Self::BudgetBytes => provider_ids::BUDGET_BYTES,
            Self::ApiNinjas => provider_ids::API_NINJAS,
            Self::Usda => provider_ids::USDA,
            Self::HuggingFace => provider_ids::HUGGINGFACE,
        }
    }

    /// Domain this provider serves
    #[must_use]
    pub const fn domain(self) -> ProviderDomain {
        match self {
            Self::Edamam | Self::BudgetBytes => ProviderDomain::Recipe,
            Self::ApiNinjas | Self::Usda => ProviderDomain::Macro,
            Self::HuggingFace => ProviderDomain::Classifier,
        }
    }

    /// Built-ins of one domain, in declaration order
    #[must_use]
    pub fn for_domain(domain: ProviderDomain) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|id| id.domain() == domain)
            .collect()
    }

    /// Static descriptor for this provider
    #[must_use]
    pub fn descriptor(self) -> &'static dyn ProviderDescriptor {
        match self {
            Self::Edamam => &EdamamDescriptor,
            Self::BudgetBytes => &BudgetBytesDescriptor,
            Self::ApiNinjas => &ApiNinjasDescriptor,
            Self::Usda => &UsdaDescriptor,
            Self::HuggingFace => &HuggingFaceDescriptor,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| format!("Unknown provider '{s}'"))
    }
}

bitflags::bitflags! {
    /// What a provider can do
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ProviderCapabilities: u8 {
        /// Keyword search and lookup by id
        const RECIPE_SEARCH = 0b0000_0001;
        /// Two-phase URL discovery and per-URL processing
        const RECIPE_DISCOVERY = 0b0000_0010;
        /// Ingredient and recipe macro analysis
        const MACRO_ANALYSIS = 0b0000_0100;
        /// Cuisine classification
        const CLASSIFICATION = 0b0000_1000;
        /// Needs an API key before any call
        const REQUIRES_CREDENTIALS = 0b0001_0000;
    }
}

impl ProviderCapabilities {
    /// Whether an API key is needed
    #[must_use]
    pub const fn requires_credentials(&self) -> bool {
        self.contains(Self::REQUIRES_CREDENTIALS)
    }

    /// Whether the provider supports discovery
    #[must_use]
    pub const fn supports_discovery(&self) -> bool {
        self.contains(Self::RECIPE_DISCOVERY)
    }
}

/// Static metadata about a provider
pub trait ProviderDescriptor: Send + Sync {
    /// Identifier used in configuration and selection
    fn name(&self) -> &'static str;

    /// Human-readable name
    fn display_name(&self) -> &'static str;

    /// Capability flags
    fn capabilities(&self) -> ProviderCapabilities;

    /// Upstream base URL used when no override is configured
    fn default_base_url(&self) -> &'static str;

    /// Whether an API key is needed
    fn requires_credentials(&self) -> bool {
        self.capabilities().requires_credentials()
    }
}

/// Edamam recipe search descriptor
pub struct EdamamDescriptor;

impl ProviderDescriptor for EdamamDescriptor {
    fn name(&self) -> &'static str {
        provider_ids::EDAMAM
    }

    fn display_name(&self) -> &'static str {
        "Edamam Recipe Search"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::RECIPE_SEARCH | ProviderCapabilities::REQUIRES_CREDENTIALS
    }

    fn default_base_url(&self) -> &'static str {
        endpoints::EDAMAM_BASE_URL
    }
}

/// Budget Bytes scraper descriptor
pub struct BudgetBytesDescriptor;

impl ProviderDescriptor for BudgetBytesDescriptor {
    fn name(&self) -> &'static str {
        provider_ids::BUDGET_BYTES
    }

    fn display_name(&self) -> &'static str {
        "Budget Bytes"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::RECIPE_SEARCH | ProviderCapabilities::RECIPE_DISCOVERY
    }

    fn default_base_url(&self) -> &'static str {
        endpoints::BUDGET_BYTES_BASE_URL
    }
}

/// API Ninjas nutrition descriptor
pub struct ApiNinjasDescriptor;

impl ProviderDescriptor for ApiNinjasDescriptor {
    fn name(&self) -> &'static str {
        provider_ids::API_NINJAS
    }

    fn display_name(&self) -> &'static str {
        "API Ninjas Nutrition"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::MACRO_ANALYSIS | ProviderCapabilities::REQUIRES_CREDENTIALS
    }

    fn default_base_url(&self) -> &'static str {
        endpoints::API_NINJAS_BASE_URL
    }
}

/// USDA `FoodData` Central descriptor
pub struct UsdaDescriptor;

impl ProviderDescriptor for UsdaDescriptor {
    fn name(&self) -> &'static str {
        provider_ids::USDA
    }

    fn display_name(&self) -> &'static str {
        "USDA FoodData Central"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::MACRO_ANALYSIS | ProviderCapabilities::REQUIRES_CREDENTIALS
    }

    fn default_base_url(&self) -> &'static str {
        endpoints::USDA_BASE_URL
    }
}

/// Hugging Face zero-shot classifier descriptor
pub struct HuggingFaceDescriptor;

impl ProviderDescriptor for HuggingFaceDescriptor {
    fn name(&self) -> &'static str {
        provider_ids::HUGGINGFACE
    }

    fn display_name(&self) -> &'static str {
        "Hugging Face Inference"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::CLASSIFICATION | ProviderCapabilities::REQUIRES_CREDENTIALS
    }

    fn default_base_url(&self) -> &'static str {
        endpoints::HUGGINGFACE_BASE_URL
    }
}
