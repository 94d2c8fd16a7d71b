// ABOUTME: Cuisine labels, confidence tiers, and classification result records
// ABOUTME: Constructors clamp confidence so the tier always matches the score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::constants::classification::{
    HIGH_CONFIDENCE_THRESHOLD, MAX_ALTERNATIVES, MEDIUM_CONFIDENCE_THRESHOLD,
};

/// Cuisines a classifier may return
///
/// Labels outside this set collapse to `Other` when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cuisine {
    /// Italian
    Italian,
    /// Chinese
    Chinese,
    /// Mexican
    Mexican,
    /// Indian
    Indian,
    /// Japanese
    Japanese,
    /// French
    French,
    /// Thai
    Thai,
    /// Mediterranean
    Mediterranean,
    /// American
    American,
    /// Korean
    Korean,
    /// Vietnamese
    Vietnamese,
    /// Spanish
    Spanish,
    /// Greek
    Greek,
    /// Middle Eastern
    MiddleEastern,
    /// German
    German,
    /// British
    British,
    /// Turkish
    Turkish,
    /// Moroccan
    Moroccan,
    /// Lebanese
    Lebanese,
    /// Peruvian
    Peruvian,
    /// Brazilian
    Brazilian,
    /// Caribbean
    Caribbean,
    /// African
    African,
    /// Russian
    Russian,
    /// Scandinavian
    Scandinavian,
    /// Anything not covered above
    Other,
}

impl Cuisine {
    /// Every cuisine, in the order offered to classifiers
    pub const ALL: [Self; 26] = [
        Self::Italian,
        Self::Chinese,
        Self::Mexican,
        Self::Indian,
        Self::Japanese,
        Self::French,
        Self::Thai,
        Self::Mediterranean,
        Self::American,
        Self::Korean,
        Self::Vietnamese,
        Self::Spanish,
        Self::Greek,
        Self::MiddleEastern,
        Self::German,
        Self::British,
        Self::Turkish,
        Self::Moroccan,
        Self::Lebanese,
        Self::Peruvian,
        Self::Brazilian,
        Self::Caribbean,
        Self::African,
        Self::Russian,
        Self::Scandinavian,
        Self::Other,
    ];

    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Italian => "Italian",
            Self::Chinese => "Chinese",
            Self::Mexican => "Mexican",
            Self::Indian => "Indian",
            Self::Japanese => "Japanese",
            Self::French => "French",
            Self::Thai => "Thai",
            Self::Mediterranean => "Mediterranean",
            Self::American => "American",
            Self::Korean => "Korean",
            Self::Vietnamese => "Vietnamese",
            Self::Spanish => "Spanish",
            Self::Greek => "Greek",
            Self::MiddleEastern => "Middle Eastern",
            Self::German => "German",
            Self::British => "British",
            Self::Turkish => "Turkish",
            Self::Moroccan => "Moroccan",
            Self::Lebanese => "Lebanese",
            Self::Peruvian => "Peruvian",
            Self::Brazilian => "Brazilian",
            Self::Caribbean => "Caribbean",
            Self::African => "African",
            Self::Russian => "Russian",
            Self::Scandinavian => "Scandinavian",
            Self::Other => "Other",
        }
    }

    /// Parse a label case-insensitively, falling back to `Other`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(Self::Other)
    }

    /// Labels to offer a zero-shot model
    #[must_use]
    pub fn candidate_labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for Cuisine {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Cuisine> for String {
    fn from(value: Cuisine) -> Self {
        value.as_str().to_owned()
    }
}

/// Coarse bucketing of a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    /// Below 0.6
    Low,
    /// 0.6 up to but excluding 0.8
    Medium,
    /// 0.8 and above
    High,
}

impl ConfidenceLevel {
    /// Tier for a score; lower bounds are inclusive
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE_THRESHOLD {
            Self::High
        } else if confidence >= MEDIUM_CONFIDENCE_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A ranked runner-up label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuisineAlternative {
    /// Cuisine label
    pub cuisine: Cuisine,
    /// Score in [0, 1]
    pub confidence: f64,
}

impl CuisineAlternative {
    /// Alternative with a clamped score
    #[must_use]
    pub fn new(cuisine: Cuisine, confidence: f64) -> Self {
        Self {
            cuisine,
            confidence: clamp_confidence(confidence),
        }
    }
}

/// Outcome of classifying one recipe text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawClassification")]
pub struct ClassificationResult {
    /// Most likely cuisine
    pub primary_cuisine: Cuisine,
    /// Score in [0, 1]
    pub confidence: f64,
    /// Tier derived from `confidence`
    pub confidence_level: ConfidenceLevel,
    /// Runner-up labels, highest first
    pub alternatives: Vec<CuisineAlternative>,
    /// Free-text explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Provider that produced the result
    pub provider: String,
}

impl ClassificationResult {
    /// Result with a clamped score and its derived tier
    #[must_use]
    pub fn new(primary_cuisine: Cuisine, confidence: f64, provider: impl Into<String>) -> Self {
        let confidence = clamp_confidence(confidence);
        Self {
            primary_cuisine,
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            alternatives: Vec::new(),
            reasoning: None,
            provider: provider.into(),
        }
    }

    /// Placeholder used when the input cannot be classified
    #[must_use]
    pub fn unclassified(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(Cuisine::Other, 0.0, provider).with_reasoning(reason)
    }

    /// Attach alternatives, sorted by descending score and capped
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<CuisineAlternative>) -> Self {
        let mut alternatives: Vec<CuisineAlternative> = alternatives
            .into_iter()
            .map(|a| CuisineAlternative::new(a.cuisine, a.confidence))
            .collect();
        alternatives.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        alternatives.truncate(MAX_ALTERNATIVES);
        self.alternatives = alternatives;
        self
    }

    /// Attach reasoning text
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Whether the result clears the HIGH threshold
    #[must_use]
    pub fn is_high_confidence(&self) -> bool {
        self.confidence_level == ConfidenceLevel::High
    }
}

#[derive(Deserialize)]
struct RawClassification {
    primary_cuisine: Cuisine,
    confidence: f64,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    alternatives: Vec<CuisineAlternative>,
    #[serde(default)]
    reasoning: Option<String>,
    provider: String,
}

impl From<RawClassification> for ClassificationResult {
    fn from(raw: RawClassification) -> Self {
        let result = Self::new(raw.primary_cuisine, raw.confidence, raw.provider)
            .with_alternatives(raw.alternatives);
        match raw.reasoning {
            Some(reasoning) => result.with_reasoning(reasoning),
            None => result,
        }
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
