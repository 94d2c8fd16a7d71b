// ABOUTME: Circuit breaker guarding calls to one external provider
// ABOUTME: Trips after repeated transient failures so fallback chains skip a failing upstream quickly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::errors::{ProviderError, ProviderResult};

/// Breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through, transient failures are counted
    Closed,
    /// Calls are refused until the recovery timeout elapses
    Open,
    /// Trial calls are let through one at a time
    HalfOpen,
}

impl CircuitState {
    /// Lowercase label for status output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Thresholds and timeouts for a breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive transient failures that open the circuit
    pub failure_threshold: u32,
    /// How long an open circuit refuses calls
    pub recovery_timeout: Duration,
    /// Successful trial calls needed to close a half-open circuit
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

/// Lock-free circuit breaker for one provider
///
/// Only retryable errors (network, timeout, 5xx, 429) count as failures.
/// Configuration and normalization errors say nothing about upstream health
/// and leave the breaker untouched.
#[derive(Debug)]
pub struct CircuitBreaker {
    provider: String,
    state: AtomicU8,
    failures: AtomicU32,
    successes: AtomicU32,
    opened_at_ms: AtomicU64,
    trial_in_flight: AtomicBool,
    trial_started_ms: AtomicU64,
    config: CircuitBreakerConfig,
    epoch: Instant,
}

impl CircuitBreaker {
    /// Breaker with default thresholds
    #[must_use]
    pub fn new(provider: &str) -> Self {
        Self::with_config(provider, CircuitBreakerConfig::default())
    }

    /// Breaker with custom thresholds
    #[must_use]
    pub fn with_config(provider: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            provider: provider.to_owned(),
            state: AtomicU8::new(CircuitState::Closed.as_u8()),
            failures: AtomicU32::new(0),
            successes: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            trial_in_flight: AtomicBool::new(false),
            trial_started_ms: AtomicU64::new(0),
            config,
            epoch: Instant::now(),
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Consecutive failures recorded while closed
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Ask permission for one call
    ///
    /// In half-open state one trial call is granted at a time. A trial that never
    /// reports back (its future was dropped) is presumed lost once it has been
    /// outstanding for the recovery timeout, and the next caller becomes the
    /// trial call.
    ///
    /// # Errors
    ///
    /// Returns the number of seconds until a trial call is allowed when the
    /// circuit refuses the call.
    pub fn try_acquire(&self) -> Result<(), u64> {
        match self.state() {
            CircuitState::Closed => Ok(()),
            CircuitState::HalfOpen => self.try_acquire_trial(),
            CircuitState::Open => {
                let opened_at = self.opened_at_ms.load(Ordering::SeqCst);
                if self.now_ms().saturating_sub(opened_at) < self.recovery_ms() {
                    return Err(self.seconds_until(opened_at));
                }
                // Claim the trial slot before other callers can observe half-open.
                self.trial_started_ms.store(self.now_ms(), Ordering::SeqCst);
                self.trial_in_flight.store(true, Ordering::SeqCst);
                let swapped = self.state.compare_exchange(
                    CircuitState::Open.as_u8(),
                    CircuitState::HalfOpen.as_u8(),
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                );
                if swapped.is_ok() {
                    info!(provider = %self.provider, "Circuit half-open, sending trial call");
                    Ok(())
                } else {
                    self.try_acquire_trial()
                }
            }
        }
    }

    fn try_acquire_trial(&self) -> Result<(), u64> {
        let now = self.now_ms();
        if self
            .trial_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.trial_started_ms.store(now, Ordering::SeqCst);
            return Ok(());
        }

        let started = self.trial_started_ms.load(Ordering::SeqCst);
        if now.saturating_sub(started) < self.recovery_ms() {
            return Err(self.seconds_until(started));
        }
        // Only one caller may replace a lost trial call.
        if self
            .trial_started_ms
            .compare_exchange(started, now, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            warn!(provider = %self.provider, "Trial call never reported back, sending another");
            Ok(())
        } else {
            Err(self.seconds_until(started))
        }
    }

    /// Record a successful call
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => self.failures.store(0, Ordering::SeqCst),
            CircuitState::HalfOpen => {
                let trials = self.successes.fetch_add(1, Ordering::SeqCst) + 1;
                if trials >= self.config.success_threshold {
                    self.close();
                    info!(provider = %self.provider, "Circuit closed, provider recovered");
                } else {
                    self.trial_in_flight.store(false, Ordering::SeqCst);
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed call; non-retryable errors are ignored
    pub fn record_failure(&self, error: &ProviderError) {
        if !error.is_retryable() {
            if self.state() == CircuitState::HalfOpen {
                // The trial call reached the upstream, which is all half-open needs to know.
                self.record_success();
            }
            return;
        }

        match self.state() {
            CircuitState::Closed => {
                let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        provider = %self.provider,
                        failures,
                        recovery_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(provider = %self.provider, "Circuit re-opened, trial call failed");
            }
            CircuitState::Open => self.opened_at_ms.store(self.now_ms(), Ordering::SeqCst),
        }
    }

    /// Run `operation` under breaker protection
    ///
    /// # Errors
    ///
    /// Returns `CircuitBreakerOpen` when the circuit refuses the call, otherwise
    /// the operation's own error.
    pub async fn call<F, T>(&self, operation: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        if let Err(retry_after_secs) = self.try_acquire() {
            return Err(ProviderError::CircuitBreakerOpen {
                provider: self.provider.clone(),
                retry_after_secs,
            });
        }
        let result = operation.await;
        match &result {
            Ok(_) => self.record_success(),
            Err(err) => self.record_failure(err),
        }
        result
    }

    /// Force the circuit closed
    pub fn reset(&self) {
        self.close();
    }

    fn open(&self) {
        self.state
            .store(CircuitState::Open.as_u8(), Ordering::SeqCst);
        self.opened_at_ms.store(self.now_ms(), Ordering::SeqCst);
        self.successes.store(0, Ordering::SeqCst);
        self.trial_in_flight.store(false, Ordering::SeqCst);
    }

    fn close(&self) {
        self.state
            .store(CircuitState::Closed.as_u8(), Ordering::SeqCst);
        self.failures.store(0, Ordering::SeqCst);
        self.successes.store(0, Ordering::SeqCst);
        self.trial_in_flight.store(false, Ordering::SeqCst);
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn recovery_ms(&self) -> u64 {
        self.config.recovery_timeout.as_millis() as u64
    }

    /// Whole seconds until `recovery_timeout` has passed since `since_ms`
    fn seconds_until(&self, since_ms: u64) -> u64 {
        let elapsed = self.now_ms().saturating_sub(since_ms);
        self.recovery_ms().saturating_sub(elapsed).div_ceil(1000)
    }
}
