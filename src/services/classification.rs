// ABOUTME: Cuisine classification service over the classifier provider chain
// ABOUTME: Free text, structured title plus ingredients, and order-preserving batches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use nourishly_core::constants::classification::MIN_TEXT_LENGTH;
use nourishly_core::errors::DispatchError;
use nourishly_core::models::ClassificationResult;
use nourishly_providers::{render_classification_text, CuisineClassifier, ProviderDomain};

use super::{provider_status, ProviderStatus};
use crate::orchestration::ProviderChain;

/// Cuisine classification with provider fallback
#[derive(Debug)]
pub struct ClassificationService {
    chain: ProviderChain<dyn CuisineClassifier>,
}

impl ClassificationService {
    /// Service over `classifiers`, tried in the given order
    #[must_use]
    pub fn new(classifiers: Vec<Arc<dyn CuisineClassifier>>, availability_ttl: Duration) -> Self {
        Self {
            chain: ProviderChain::new(ProviderDomain::Classifier, classifiers, availability_ttl),
        }
    }

    /// Underlying chain
    #[must_use]
    pub const fn chain(&self) -> &ProviderChain<dyn CuisineClassifier> {
        &self.chain
    }

    /// Classify free text describing a dish
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the trimmed text is shorter than three
    /// characters, otherwise the chain's dispatch error
    pub async fn classify(
        &self,
        text: &str,
        provider: Option<&str>,
    ) -> Result<ClassificationResult, DispatchError> {
        let text = text.trim();
        check_text(text)?;
        let result = self.chain.run(provider, |p| p.classify(text)).await?;
        debug!(
            cuisine = ?result.primary_cuisine,
            confidence = result.confidence,
            provider = %result.provider,
            "Text classified"
        );
        Ok(result)
    }

    /// Classify a title and ingredient list
    ///
    /// The pair is rendered as `"{title}. Ingredients: a, b"` and classified
    /// like free text.
    ///
    /// # Errors
    ///
    /// Same as [`ClassificationService::classify`]
    pub async fn classify_from_structured(
        &self,
        title: &str,
        ingredients: &[String],
        provider: Option<&str>,
    ) -> Result<ClassificationResult, DispatchError> {
        let text = render_classification_text(title, ingredients);
        self.classify(&text, provider).await
    }

    /// Classify several texts; position `i` of the output answers `texts[i]`
    pub async fn classify_batch(
        &self,
        texts: &[String],
        provider: Option<&str>,
    ) -> Vec<Result<ClassificationResult, DispatchError>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text, provider).await);
        }
        results
    }

    /// Configuration and live availability of every classifier
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        provider_status(&self.chain).await
    }
}

fn check_text(text: &str) -> Result<(), DispatchError> {
    if text.chars().count() < MIN_TEXT_LENGTH {
        return Err(DispatchError::InvalidInput(format!(
            "text must be at least {MIN_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}
