// ABOUTME: Provider orchestration with explicit selection and ordered automatic fallback
// ABOUTME: One generic chain shared by the recipe, macro analysis, and classification services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// Generic provider chain
pub mod chain;

pub use chain::ProviderChain;
