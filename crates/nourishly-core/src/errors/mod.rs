// ABOUTME: Error taxonomy for provider calls, orchestration dispatch, and configuration loading
// ABOUTME: Re-exports the structured error types consumed across the workspace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! # Error Types
//!
//! - `ProviderError`: anything that can go wrong inside one provider call
//! - `NormalizationError`: a raw payload that could not become a record
//! - `DispatchError`: the outcome of routing a task through a provider chain
//! - `ConfigError`: missing or malformed environment configuration

/// Configuration loading errors
pub mod config;
/// Orchestration dispatch errors and per-provider attempt records
pub mod dispatch;
/// Provider call and normalization errors
pub mod provider;

pub use config::ConfigError;
pub use dispatch::{AttemptOutcome, DispatchError, ProviderAttempt};
pub use provider::{NormalizationError, ProviderError, ProviderErrorKind, ProviderResult};
