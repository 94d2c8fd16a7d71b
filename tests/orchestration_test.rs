// ABOUTME: Integration tests for the provider chain in explicit and automatic modes
// ABOUTME: Covers fallback order, aggregated failures, availability caching, breakers, and batches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::mock_providers::{MockFailure, MockProvider};
use nourishly::ProviderChain;
use nourishly_core::errors::{AttemptOutcome, DispatchError, ProviderError, ProviderErrorKind};
use nourishly_core::models::SearchFilters;
use nourishly_providers::{CircuitState, ProviderDomain, RecipeProvider};

const TTL: Duration = Duration::from_secs(60);

fn chain(providers: &[&Arc<MockProvider>]) -> ProviderChain<dyn RecipeProvider> {
    let providers: Vec<Arc<dyn RecipeProvider>> = providers
        .iter()
        .map(|p| Arc::clone(p) as Arc<dyn RecipeProvider>)
        .collect();
    ProviderChain::new(ProviderDomain::Recipe, providers, TTL)
}

async fn search(
    chain: &ProviderChain<dyn RecipeProvider>,
    provider: Option<&str>,
) -> Result<String, DispatchError> {
    let filters = SearchFilters::default();
    let recipes = chain
        .run(provider, |p| p.search("soup", 1, &filters))
        .await?;
    Ok(recipes[0].provider.clone())
}

// ============================================================================
// Explicit mode
// ============================================================================

#[tokio::test]
async fn test_explicit_provider_never_falls_back() {
    let a = MockProvider::new("a").failing(MockFailure::Api).arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    let err = search(&chain, Some("a")).await.unwrap_err();

    match err {
        DispatchError::Provider { provider, source } => {
            assert_eq!(provider, "a");
            assert!(matches!(source, ProviderError::ApiError { status_code: 500, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn test_explicit_provider_selected_case_insensitively() {
    let a = MockProvider::new("a").arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    assert_eq!(search(&chain, Some(" B ")).await.unwrap(), "b");
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn test_explicit_unknown_provider_lists_available() {
    let a = MockProvider::new("a").arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    let err = search(&chain, Some("edamam")).await.unwrap_err();

    match &err {
        DispatchError::UnknownProvider {
            domain,
            provider,
            available,
        } => {
            assert_eq!(domain, "recipe");
            assert_eq!(provider, "edamam");
            assert_eq!(available, &vec!["a".to_owned(), "b".to_owned()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Unknown provider 'edamam'"));
}

#[tokio::test]
async fn test_explicit_misconfigured_provider_fails_before_any_call() {
    let a = MockProvider::new("a").misconfigured().arc();
    let chain = chain(&[&a]);

    let err = search(&chain, Some("a")).await.unwrap_err();

    match err {
        DispatchError::Provider { source, .. } => {
            assert_eq!(source.kind(), ProviderErrorKind::Configuration);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(a.calls(), 0);
    assert_eq!(a.availability_checks(), 0);
}

#[tokio::test]
async fn test_explicit_provider_skips_availability_check() {
    let a = MockProvider::new("a").unavailable().arc();
    let chain = chain(&[&a]);

    assert_eq!(search(&chain, Some("a")).await.unwrap(), "a");
    assert_eq!(a.availability_checks(), 0);
}

#[tokio::test]
async fn test_blank_explicit_name_means_auto() {
    let a = MockProvider::new("a").unavailable().arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    assert_eq!(search(&chain, Some("  ")).await.unwrap(), "b");
}

// ============================================================================
// Automatic mode
// ============================================================================

#[tokio::test]
async fn test_auto_returns_first_success() {
    let a = MockProvider::new("a").arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    assert_eq!(search(&chain, None).await.unwrap(), "a");
    assert_eq!(b.calls(), 0);
    assert_eq!(b.availability_checks(), 0);
}

#[tokio::test]
async fn test_auto_falls_back_after_call_failure() {
    let a = MockProvider::new("a").failing(MockFailure::Api).arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    assert_eq!(search(&chain, None).await.unwrap(), "b");
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
}

#[tokio::test]
async fn test_auto_falls_back_after_normalization_failure() {
    let a = MockProvider::new("a").failing(MockFailure::Normalization).arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    assert_eq!(search(&chain, None).await.unwrap(), "b");
}

#[tokio::test]
async fn test_auto_skips_unavailable_without_calling() {
    let a = MockProvider::new("a").unavailable().arc();
    let b = MockProvider::new("b").misconfigured().arc();
    let c = MockProvider::new("c").arc();
    let chain = chain(&[&a, &b, &c]);

    assert_eq!(search(&chain, None).await.unwrap(), "c");
    assert_eq!(a.calls(), 0);
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn test_auto_all_unavailable_aggregates_every_provider() {
    let a = MockProvider::new("a").unavailable().arc();
    let b = MockProvider::new("b").unavailable().arc();
    let chain = chain(&[&a, &b]);

    let err = search(&chain, None).await.unwrap_err();

    assert!(matches!(err, DispatchError::Exhausted { .. }));
    assert_eq!(err.providers(), vec!["a", "b"]);
    assert!(err
        .attempts()
        .iter()
        .all(|attempt| matches!(attempt.outcome, AttemptOutcome::Unavailable)));
    let message = err.to_string();
    assert!(message.contains('a') && message.contains('b'));
    assert_eq!(a.calls() + b.calls(), 0);
}

#[tokio::test]
async fn test_auto_exhausted_keeps_attempt_order_and_causes() {
    let a = MockProvider::new("a").unavailable().arc();
    let b = MockProvider::new("b").failing(MockFailure::Timeout).arc();
    let chain = chain(&[&a, &b]);

    let err = search(&chain, None).await.unwrap_err();

    let attempts = err.attempts();
    assert_eq!(attempts.len(), 2);
    assert!(matches!(attempts[0].outcome, AttemptOutcome::Unavailable));
    match &attempts[1].outcome {
        AttemptOutcome::Failed(ProviderError::Timeout(_)) => {}
        other => panic!("unexpected outcome: {other}"),
    }
    assert_eq!(b.calls(), 1);
}

#[tokio::test]
async fn test_auto_empty_chain_reports_no_providers() {
    let chain = chain(&[]);

    let err = search(&chain, None).await.unwrap_err();

    assert!(matches!(err, DispatchError::NoProviders { ref domain } if domain == "recipe"));
}

#[tokio::test]
async fn test_availability_answer_is_cached() {
    let a = MockProvider::new("a").arc();
    let chain = chain(&[&a]);

    search(&chain, None).await.unwrap();
    search(&chain, None).await.unwrap();
    assert_eq!(a.availability_checks(), 1);

    a.set_available(false);
    assert_eq!(search(&chain, None).await.unwrap(), "a");

    chain.clear_availability();
    assert!(search(&chain, None).await.is_err());
    assert_eq!(a.availability_checks(), 2);
}

#[tokio::test]
async fn test_zero_ttl_checks_every_run() {
    let a = MockProvider::new("a").arc();
    let providers: Vec<Arc<dyn RecipeProvider>> = vec![a.clone()];
    let chain = ProviderChain::new(ProviderDomain::Recipe, providers, Duration::ZERO);

    search(&chain, None).await.unwrap();
    search(&chain, None).await.unwrap();

    assert_eq!(a.availability_checks(), 2);
}

#[tokio::test]
async fn test_open_circuit_skips_failing_provider() {
    let a = MockProvider::new("a").failing(MockFailure::Timeout).arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);

    for _ in 0..5 {
        assert_eq!(search(&chain, None).await.unwrap(), "b");
    }
    assert_eq!(chain.circuit_state("a"), Some(CircuitState::Open));

    assert_eq!(search(&chain, None).await.unwrap(), "b");
    assert_eq!(a.calls(), 5);
}

#[tokio::test]
async fn test_open_circuit_reported_in_exhausted_attempts() {
    let a = MockProvider::new("a").failing(MockFailure::Api).arc();
    let chain = chain(&[&a]);

    for _ in 0..5 {
        search(&chain, None).await.unwrap_err();
    }
    let err = search(&chain, None).await.unwrap_err();

    assert!(matches!(
        err.attempts()[0].outcome,
        AttemptOutcome::CircuitOpen { .. }
    ));
}

#[tokio::test]
async fn test_not_found_does_not_open_circuit() {
    let a = MockProvider::new("a").failing(MockFailure::NotFound).arc();
    let chain = chain(&[&a]);

    for _ in 0..10 {
        search(&chain, None).await.unwrap_err();
    }

    assert_eq!(chain.circuit_state("a"), Some(CircuitState::Closed));
    assert_eq!(a.calls(), 10);
}

// ============================================================================
// Batches
// ============================================================================

#[tokio::test]
async fn test_run_batch_isolates_failures_and_keeps_order() {
    let a = MockProvider::new("a")
        .failing_on("x2", MockFailure::Api)
        .arc();
    let chain = chain(&[&a]);
    let queries = vec!["x1".to_owned(), "x2".to_owned(), "x3".to_owned()];
    let filters = SearchFilters::default();

    let results = chain
        .run_batch(&queries, None, |p, q| p.search(q, 1, &filters))
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap()[0].title, "x1 by a");
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap()[0].title, "x3 by a");
}

#[tokio::test]
async fn test_run_batch_falls_back_per_item() {
    let a = MockProvider::new("a")
        .failing_on("x2", MockFailure::Api)
        .arc();
    let b = MockProvider::new("b").arc();
    let chain = chain(&[&a, &b]);
    let queries = vec!["x1".to_owned(), "x2".to_owned()];
    let filters = SearchFilters::default();

    let results = chain
        .run_batch(&queries, None, |p, q| p.search(q, 1, &filters))
        .await;

    assert_eq!(results[0].as_ref().unwrap()[0].provider, "a");
    assert_eq!(results[1].as_ref().unwrap()[0].provider, "b");
}

#[tokio::test]
async fn test_concurrent_batch_keeps_input_order() {
    let a = MockProvider::new("a")
        .failing_on("q3", MockFailure::Api)
        .arc();
    let chain = chain(&[&a]);
    let queries: Vec<String> = (0..8).map(|i| format!("q{i}")).collect();
    let filters = SearchFilters::default();

    let results = chain
        .run_batch_concurrent(&queries, None, 4, |p, q| p.search(q, 1, &filters))
        .await;

    assert_eq!(results.len(), 8);
    for (i, result) in results.iter().enumerate() {
        if i == 3 {
            assert!(result.is_err());
        } else {
            assert_eq!(result.as_ref().unwrap()[0].title, format!("q{i} by a"));
        }
    }
}

#[tokio::test]
async fn test_empty_batch_returns_empty() {
    let a = MockProvider::new("a").arc();
    let chain = chain(&[&a]);
    let filters = SearchFilters::default();

    let results = chain
        .run_batch(&[] as &[String], None, |p, q| p.search(q, 1, &filters))
        .await;

    assert!(results.is_empty());
    assert_eq!(a.calls(), 0);
}
