// ABOUTME: Cuisine classification command for free text or a title with ingredients
// ABOUTME: Structured input is rendered to the same text form the classifier sees
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use anyhow::Result;
use nourishly::ProviderServices;

use crate::helpers::display::print_json;

pub async fn classify(
    services: &ProviderServices,
    text: &str,
    ingredients: &[String],
    provider: Option<&str>,
) -> Result<()> {
    let classification = &services.classification;
    let result = if ingredients.is_empty() {
        classification.classify(text, provider).await?
    } else {
        classification
            .classify_from_structured(text, ingredients, provider)
            .await?
    };
    print_json(&result)
}
