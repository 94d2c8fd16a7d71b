// ABOUTME: Ordered provider chain implementing explicit selection and automatic fallback
// ABOUTME: Gates each provider on its circuit breaker and a TTL-cached availability answer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument, Span};

use nourishly_core::errors::{
    AttemptOutcome, DispatchError, ProviderAttempt, ProviderError, ProviderResult,
};
use nourishly_providers::{CircuitBreaker, CircuitState, Provider, ProviderDomain};

struct ChainEntry<P: ?Sized> {
    provider: Arc<P>,
    breaker: CircuitBreaker,
}

/// Providers of one domain in fallback order
///
/// `run` has two modes:
/// - explicit: only the named provider is called and its error is returned as is
/// - auto: providers are tried in order, skipping those whose breaker is open
///   or that report themselves unavailable, with at most one call each
pub struct ProviderChain<P: ?Sized + Provider> {
    domain: ProviderDomain,
    entries: Vec<ChainEntry<P>>,
    availability_ttl: Duration,
    availability: DashMap<String, (bool, Instant)>,
    span: Span,
}

impl<P: ?Sized + Provider> ProviderChain<P> {
    /// Chain over `providers`, tried in the given order
    #[must_use]
    pub fn new(domain: ProviderDomain, providers: Vec<Arc<P>>, availability_ttl: Duration) -> Self {
        let entries = providers
            .into_iter()
            .map(|provider| ChainEntry {
                breaker: CircuitBreaker::new(provider.name()),
                provider,
            })
            .collect();
        Self {
            span: info_span!("provider_chain", domain = domain.as_str()),
            domain,
            entries,
            availability_ttl,
            availability: DashMap::new(),
        }
    }

    /// Task domain
    #[must_use]
    pub const fn domain(&self) -> ProviderDomain {
        self.domain
    }

    /// Provider names in fallback order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.provider.name()).collect()
    }

    /// Whether the chain holds no providers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<P>> {
        self.entry(name).map(|e| &e.provider)
    }

    /// Providers in fallback order
    pub fn providers(&self) -> impl Iterator<Item = &Arc<P>> {
        self.entries.iter().map(|e| &e.provider)
    }

    /// Breaker state of a provider
    #[must_use]
    pub fn circuit_state(&self, name: &str) -> Option<CircuitState> {
        self.entry(name).map(|e| e.breaker.state())
    }

    /// Drop every cached availability answer
    pub fn clear_availability(&self) {
        self.availability.clear();
    }

    fn entry(&self, name: &str) -> Option<&ChainEntry<P>> {
        self.entries
            .iter()
            .find(|e| e.provider.name().eq_ignore_ascii_case(name.trim()))
    }

    /// `is_available` answer, reused for the configured TTL
    pub async fn is_available(&self, provider: &P) -> bool {
        let name = provider.name();
        let cached = self
            .availability
            .get(name)
            .map(|entry| *entry.value())
            .filter(|(_, checked_at)| checked_at.elapsed() < self.availability_ttl);
        if let Some((available, _)) = cached {
            return available;
        }

        let available = provider.is_available().await;
        debug!(parent: &self.span, provider = name, available, "Availability checked");
        self.availability
            .insert(name.to_owned(), (available, Instant::now()));
        available
    }

    /// Run one task
    ///
    /// # Errors
    ///
    /// - `UnknownProvider` when `explicit` names no provider in this chain
    /// - `Provider` carrying the explicit provider's own error, including a
    ///   `ConfigurationError` when its static configuration is incomplete
    /// - `NoProviders` when the chain is empty
    /// - `Exhausted` listing every provider and why it did not succeed
    pub async fn run<'a, T, F>(&'a self, explicit: Option<&str>, op: F) -> Result<T, DispatchError>
    where
        F: Fn(&'a P) -> BoxFuture<'a, ProviderResult<T>>,
        T: Send,
    {
        match explicit.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => self.run_explicit(name, op).instrument(self.span.clone()).await,
            None => self.run_auto(op).instrument(self.span.clone()).await,
        }
    }

    async fn run_explicit<'a, T, F>(&'a self, name: &str, op: F) -> Result<T, DispatchError>
    where
        F: Fn(&'a P) -> BoxFuture<'a, ProviderResult<T>>,
    {
        let Some(entry) = self.entry(name) else {
            return Err(DispatchError::UnknownProvider {
                domain: self.domain.as_str().to_owned(),
                provider: name.to_owned(),
                available: self.names().into_iter().map(str::to_owned).collect(),
            });
        };
        let provider: &'a P = &entry.provider;
        let provider_name = provider.name().to_owned();

        if !provider.validate_config() {
            warn!(provider = %provider_name, "Explicit provider is misconfigured");
            return Err(DispatchError::Provider {
                source: ProviderError::configuration(
                    &provider_name,
                    "static configuration is incomplete",
                ),
                provider: provider_name,
            });
        }

        debug!(provider = %provider_name, "Calling explicit provider");
        match op(provider).await {
            Ok(value) => {
                entry.breaker.record_success();
                Ok(value)
            }
            Err(source) => {
                entry.breaker.record_failure(&source);
                warn!(provider = %provider_name, error = %source, "Explicit provider failed");
                Err(DispatchError::Provider {
                    provider: provider_name,
                    source,
                })
            }
        }
    }

    async fn run_auto<'a, T, F>(&'a self, op: F) -> Result<T, DispatchError>
    where
        F: Fn(&'a P) -> BoxFuture<'a, ProviderResult<T>>,
    {
        if self.entries.is_empty() {
            return Err(DispatchError::NoProviders {
                domain: self.domain.as_str().to_owned(),
            });
        }

        let mut attempts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let provider: &'a P = &entry.provider;
            let name = provider.name();

            if !self.is_available(provider).await {
                debug!(provider = name, "Skipping unavailable provider");
                attempts.push(ProviderAttempt {
                    provider: name.to_owned(),
                    outcome: AttemptOutcome::Unavailable,
                });
                continue;
            }

            if let Err(retry_after_secs) = entry.breaker.try_acquire() {
                debug!(provider = name, retry_after_secs, "Skipping provider with open circuit");
                attempts.push(ProviderAttempt {
                    provider: name.to_owned(),
                    outcome: AttemptOutcome::CircuitOpen { retry_after_secs },
                });
                continue;
            }

            match op(provider).await {
                Ok(value) => {
                    entry.breaker.record_success();
                    if !attempts.is_empty() {
                        info!(provider = name, skipped = attempts.len(), "Fallback provider succeeded");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    entry.breaker.record_failure(&err);
                    warn!(provider = name, error = %err, kind = ?err.kind(), "Provider failed, trying next");
                    attempts.push(ProviderAttempt {
                        provider: name.to_owned(),
                        outcome: AttemptOutcome::Failed(err),
                    });
                }
            }
        }

        let err = DispatchError::exhausted(self.domain.as_str(), attempts);
        warn!(error = %err, "Provider chain exhausted");
        Err(err)
    }

    /// Run one task per input, sequentially; position `i` of the output
    /// belongs to `inputs[i]` and failures never affect other positions
    pub async fn run_batch<'a, I, T, F>(
        &'a self,
        inputs: &'a [I],
        explicit: Option<&'a str>,
        op: F,
    ) -> Vec<Result<T, DispatchError>>
    where
        I: Sync,
        F: Fn(&'a P, &'a I) -> BoxFuture<'a, ProviderResult<T>>,
        T: Send,
    {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            results.push(self.run(explicit, |provider| op(provider, input)).await);
        }
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(parent: &self.span, total = inputs.len(), failed, "Batch completed");
        results
    }

    /// [`ProviderChain::run_batch`] with up to `concurrency` tasks in flight
    ///
    /// Output order still matches input order. Each provider's own rate
    /// limiter keeps serializing its outbound calls.
    pub async fn run_batch_concurrent<'a, I, T, F>(
        &'a self,
        inputs: &'a [I],
        explicit: Option<&'a str>,
        concurrency: usize,
        op: F,
    ) -> Vec<Result<T, DispatchError>>
    where
        I: Sync,
        F: Fn(&'a P, &'a I) -> BoxFuture<'a, ProviderResult<T>>,
        T: Send,
    {
        let op = &op;
        let results: Vec<Result<T, DispatchError>> = stream::iter(inputs)
            .map(|input| self.run(explicit, move |provider| op(provider, input)))
            .buffered(concurrency.max(1))
            .collect()
            .await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(parent: &self.span, total = inputs.len(), failed, concurrency, "Batch completed");
        results
    }
}

impl<P: ?Sized + Provider> std::fmt::Debug for ProviderChain<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("domain", &self.domain)
            .field("providers", &self.names())
            .field("availability_ttl", &self.availability_ttl)
            .finish_non_exhaustive()
    }
}
