// ABOUTME: Dispatch errors produced when routing a task through an ordered provider chain
// ABOUTME: Records every attempted provider and why it did not produce a result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use std::fmt;
use thiserror::Error;

use super::provider::ProviderError;

/// Why one provider in a chain did not produce a result
#[derive(Debug)]
pub enum AttemptOutcome {
    /// `is_available()` reported false, so the provider was skipped
    Unavailable,
    /// The provider's circuit breaker refused the call
    CircuitOpen {
        /// Seconds until a recovery trial call is allowed
        retry_after_secs: u64,
    },
    /// The provider was invoked and failed
    Failed(ProviderError),
}

impl AttemptOutcome {
    /// Whether the provider was actually invoked
    #[must_use]
    pub const fn was_invoked(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::CircuitOpen { retry_after_secs } => {
                write!(f, "circuit open (retry in {retry_after_secs}s)")
            }
            Self::Failed(err) => write!(f, "{err}"),
        }
    }
}

/// One entry in the attempt log of a fallback chain
#[derive(Debug)]
pub struct ProviderAttempt {
    /// Provider identifier
    pub provider: String,
    /// What happened
    pub outcome: AttemptOutcome,
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.outcome)
    }
}

/// Failure of a dispatched task
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Explicit provider is not registered for the task domain
    #[error("Unknown provider '{provider}' for {domain}. Available: {available:?}")]
    UnknownProvider {
        /// Task domain (recipes, macros, classification)
        domain: String,
        /// Requested identifier
        provider: String,
        /// Identifiers that are registered
        available: Vec<String>,
    },

    /// The domain has an empty provider chain
    #[error("No {domain} providers are configured")]
    NoProviders {
        /// Task domain
        domain: String,
    },

    /// Input was rejected before any provider was consulted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An explicitly selected provider failed; its error is surfaced verbatim
    #[error("{provider} failed: {source}")]
    Provider {
        /// Provider identifier
        provider: String,
        /// The provider's own error
        #[source]
        source: ProviderError,
    },

    /// Every provider in the chain was skipped or failed
    #[error("All {domain} providers failed: {summary}")]
    Exhausted {
        /// Task domain
        domain: String,
        /// One line per attempt, `provider: reason`, joined with `; `
        summary: String,
        /// Ordered attempt log
        attempts: Vec<ProviderAttempt>,
    },
}

impl DispatchError {
    /// Build the aggregated failure for an exhausted chain
    #[must_use]
    pub fn exhausted(domain: impl Into<String>, attempts: Vec<ProviderAttempt>) -> Self {
        let summary = attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Exhausted {
            domain: domain.into(),
            summary,
            attempts,
        }
    }

    /// Attempt log for exhausted chains, empty otherwise
    #[must_use]
    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            Self::Exhausted { attempts, .. } => attempts,
            _ => &[],
        }
    }

    /// Names of every provider mentioned by this failure, in attempt order
    #[must_use]
    pub fn providers(&self) -> Vec<&str> {
        match self {
            Self::Exhausted { attempts, .. } => {
                attempts.iter().map(|a| a.provider.as_str()).collect()
            }
            Self::Provider { provider, .. } | Self::UnknownProvider { provider, .. } => {
                vec![provider.as_str()]
            }
            Self::NoProviders { .. } | Self::InvalidInput(_) => Vec::new(),
        }
    }
}
