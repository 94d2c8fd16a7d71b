// ABOUTME: Macro analysis commands for single ingredients and multi-line recipes
// ABOUTME: Failed analyses are printed like successes and turn into a non-zero exit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use anyhow::{bail, Context, Result};
use std::io;

use nourishly::ProviderServices;
use nourishly_core::models::MacroAnalysisResult;

use crate::helpers::display::print_json;

pub async fn analyze_ingredient(
    services: &ProviderServices,
    name: &str,
    quantity: Option<f64>,
    provider: Option<&str>,
) -> Result<()> {
    let result = services
        .macros
        .analyze_ingredient(name, quantity, provider)
        .await;
    report(&result)
}

pub async fn analyze_recipe(
    services: &ProviderServices,
    lines: &[String],
    servings: Option<u32>,
    provider: Option<&str>,
) -> Result<()> {
    let text = if lines.is_empty() || matches!(lines, [only] if only == "-") {
        io::read_to_string(io::stdin()).context("Failed to read recipe from stdin")?
    } else {
        lines.join("\n")
    };
    let result = services
        .macros
        .analyze_recipe(&text, servings, provider)
        .await;
    report(&result)
}

fn report(result: &MacroAnalysisResult) -> Result<()> {
    print_json(result)?;
    if let Some(message) = result.error_message() {
        bail!("Macro analysis failed: {message}");
    }
    Ok(())
}
