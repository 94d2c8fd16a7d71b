// ABOUTME: HTTP-level tests for the Hugging Face zero-shot classifier against a mock server
// ABOUTME: Response layouts, confidence tiers, result caching, and retry on model loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use nourishly_core::errors::ProviderError;
use nourishly_core::models::{ConfidenceLevel, Cuisine};
use nourishly_providers::classifiers::huggingface::{HuggingFaceClassifier, MODEL_ID_OPTION};
use nourishly_providers::utils::RetryConfig;
use nourishly_providers::{CuisineClassifier, Provider, ProviderConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "acme/cuisine-nli";

fn classifier(server: &MockServer) -> HuggingFaceClassifier {
    HuggingFaceClassifier::new(
        ProviderConfig::new("huggingface", Duration::ZERO)
            .with_api_key("hf-token")
            .with_option(MODEL_ID_OPTION, MODEL)
            .with_base_url(server.uri()),
    )
    .with_retry(RetryConfig::none())
}

#[tokio::test]
async fn test_classify_ranks_labels_and_derives_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{MODEL}")))
        .and(header("Authorization", "Bearer hf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sequence": "spaghetti with tomato and basil",
            "labels": ["Greek", "Italian", "French"],
            "scores": [0.1, 0.85, 0.05]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = classifier(&server)
        .classify("spaghetti with tomato and basil")
        .await
        .unwrap();

    assert_eq!(result.primary_cuisine, Cuisine::Italian);
    assert!((result.confidence - 0.85).abs() < f64::EPSILON);
    assert_eq!(result.confidence_level, ConfidenceLevel::High);
    assert_eq!(result.provider, "huggingface");
    let alternatives: Vec<Cuisine> = result.alternatives.iter().map(|a| a.cuisine).collect();
    assert_eq!(alternatives, vec![Cuisine::Greek, Cuisine::French]);
    assert!(result.reasoning.unwrap().contains(MODEL));
}

#[tokio::test]
async fn test_label_score_list_layout_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "Thai", "score": 0.7 },
            { "label": "Vietnamese", "score": 0.2 }
        ])))
        .mount(&server)
        .await;

    let result = classifier(&server)
        .classify("green curry with coconut milk")
        .await
        .unwrap();

    assert_eq!(result.primary_cuisine, Cuisine::Thai);
    assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
}

#[tokio::test]
async fn test_unknown_label_collapses_to_other() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": ["Martian"],
            "scores": [0.4]
        })))
        .mount(&server)
        .await;

    let result = classifier(&server).classify("red dust soup").await.unwrap();

    assert_eq!(result.primary_cuisine, Cuisine::Other);
    assert_eq!(result.confidence_level, ConfidenceLevel::Low);
}

#[tokio::test]
async fn test_identical_text_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": ["Mexican"],
            "scores": [0.9]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hf = classifier(&server);
    let first = hf.classify("tacos al pastor").await.unwrap();
    let second = hf.classify("  tacos al pastor  ").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(hf.cached_len().await, 1);
}

#[tokio::test]
async fn test_short_text_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = classifier(&server).classify(" ab ").await.unwrap_err();

    assert!(matches!(err, ProviderError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_model_loading_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": ["Korean"],
            "scores": [0.95]
        })))
        .mount(&server)
        .await;

    let retry = RetryConfig {
        max_attempts: 2,
        initial_backoff_ms: 1,
        ..RetryConfig::default()
    };
    let hf = classifier(&server).with_retry(retry);
    let result = hf.classify("kimchi fried rice").await.unwrap();

    assert_eq!(result.primary_cuisine, Cuisine::Korean);
}

#[tokio::test]
async fn test_exhausted_retries_surface_a_retryable_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .mount(&server)
        .await;

    let err = classifier(&server)
        .classify("beef bourguignon")
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(err, ProviderError::ApiError { status_code: 503, .. }));
}

#[tokio::test]
async fn test_malformed_payload_is_a_normalization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "bad input" })))
        .mount(&server)
        .await;

    let err = classifier(&server)
        .classify("fish and chips")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Normalization(_)));
}

#[tokio::test]
async fn test_missing_token_is_a_configuration_error() {
    let server = MockServer::start().await;
    let tokenless = HuggingFaceClassifier::new(
        ProviderConfig::new("huggingface", Duration::ZERO).with_base_url(server.uri()),
    );

    assert!(!tokenless.validate_config());
    assert!(!tokenless.is_available().await);
    assert!(matches!(
        tokenless.classify("pad thai noodles").await,
        Err(ProviderError::ConfigurationError { .. })
    ));
}

#[test]
fn test_default_model_is_used_without_option() {
    let hf = HuggingFaceClassifier::new(ProviderConfig::new("huggingface", Duration::ZERO));

    assert_eq!(hf.model_id(), "facebook/bart-large-mnli");
}
