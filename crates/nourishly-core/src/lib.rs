// ABOUTME: Core types and constants for the Nourishly recipe provider layer
// ABOUTME: Foundation crate with error taxonomy, normalized records, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

#![deny(unsafe_code)]

//! # Nourishly Core
//!
//! Foundation crate providing the shared vocabulary of the provider layer.
//! Nothing in here performs I/O, so provider crates and the orchestration
//! crate can both depend on it without pulling in an HTTP stack.
//!
//! ## Modules
//!
//! - **errors**: Provider, dispatch, and configuration error taxonomy
//! - **models**: Normalized recipe, macro analysis, and classification records
//! - **constants**: Cuisine labels, confidence thresholds, unit tables

/// Error taxonomy shared by providers and the orchestration layer
pub mod errors;

/// Provider-agnostic normalized records
pub mod models;

/// Domain constants organized by concern
pub mod constants;
