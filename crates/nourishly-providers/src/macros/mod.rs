// ABOUTME: Macro nutrition analyzer implementations
// ABOUTME: API Ninjas natural-language nutrition and USDA FoodData Central
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// API Ninjas nutrition endpoint
#[cfg(feature = "provider-api-ninjas")]
pub mod api_ninjas;
/// USDA `FoodData` Central search and food details
#[cfg(feature = "provider-usda")]
pub mod usda;

#[cfg(feature = "provider-api-ninjas")]
pub use api_ninjas::ApiNinjasAnalyzer;
#[cfg(feature = "provider-usda")]
pub use usda::UsdaAnalyzer;
