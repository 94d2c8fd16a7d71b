// ABOUTME: Cuisine classifier implementations
// ABOUTME: Hugging Face hosted zero-shot classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// Hugging Face Inference API zero-shot classifier
#[cfg(feature = "provider-huggingface")]
pub mod huggingface;

#[cfg(feature = "provider-huggingface")]
pub use huggingface::HuggingFaceClassifier;
