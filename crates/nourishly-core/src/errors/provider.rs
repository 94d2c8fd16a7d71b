// ABOUTME: Structured error types for recipe, macro, and classification provider operations
// ABOUTME: Carries retry information and the raw payload behind normalization failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use serde_json::Value;
use thiserror::Error;

/// Result alias used by every provider operation
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A raw provider payload that could not be mapped onto a normalized record
///
/// The offending payload travels with the error so the failure can be logged
/// or replayed without re-fetching it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{provider} could not normalize payload: {message}")]
pub struct NormalizationError {
    /// Provider that produced the payload
    pub provider: String,
    /// What was missing or malformed
    pub message: String,
    /// The payload as received
    pub raw: Value,
}

impl NormalizationError {
    /// Build a normalization error, cloning the raw payload
    #[must_use]
    pub fn new(provider: impl Into<String>, message: impl Into<String>, raw: &Value) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
            raw: raw.clone(),
        }
    }

    /// Shorthand for the common "required field absent" case
    #[must_use]
    pub fn missing_field(provider: impl Into<String>, field: &str, raw: &Value) -> Self {
        Self::new(provider, format!("missing required field '{field}'"), raw)
    }
}

/// Coarse classification of a provider error, used by the orchestration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Required credential or option missing; detected before any call
    Configuration,
    /// Provider cannot be used right now; the chain skips it
    Unavailable,
    /// Outbound call failed, timed out, or returned a non-success status
    Call,
    /// Raw payload could not be normalized
    Normalization,
}

/// Errors raised inside a single provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Static configuration is insufficient to attempt a call
    #[error("{provider} is misconfigured: {details}")]
    ConfigurationError {
        /// Provider name
        provider: String,
        /// What is missing or invalid
        details: String,
    },

    /// Provider reported itself unavailable
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        /// Provider name
        provider: String,
        /// Why the provider cannot be used
        reason: String,
    },

    /// Upstream API returned a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or summary
        message: String,
        /// Whether repeating the call may succeed
        retryable: bool,
    },

    /// Transport-level failure (DNS, connection reset, TLS)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Upstream rate limit still exceeded after retries
    #[error("{provider} rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Suggested wait before the next attempt
        retry_after_secs: u64,
    },

    /// The requested resource does not exist upstream
    #[error("{provider}: {resource_type} '{resource_id}' not found")]
    NotFound {
        /// Provider name
        provider: String,
        /// Kind of resource (recipe, food, ...)
        resource_type: String,
        /// Identifier or query that did not resolve
        resource_id: String,
    },

    /// Caller-supplied input rejected before any call was made
    #[error("{provider} rejected input: {message}")]
    InvalidInput {
        /// Provider name
        provider: String,
        /// Why the input was rejected
        message: String,
    },

    /// Response body could not be decoded
    #[error("{provider} returned unparseable {field}: {source}")]
    ParseError {
        /// Provider name
        provider: String,
        /// Which response was being decoded
        field: &'static str,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Circuit breaker is refusing calls to this provider
    #[error("Circuit breaker open for {provider}, retry after {retry_after_secs}s")]
    CircuitBreakerOpen {
        /// Provider name
        provider: String,
        /// Seconds until a recovery trial call is allowed
        retry_after_secs: u64,
    },

    /// Raw payload could not be normalized
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

impl ProviderError {
    /// Whether a later attempt against the same provider may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { retryable, .. } => *retryable,
            Self::NetworkError(_) | Self::Timeout(_) | Self::RateLimitExceeded { .. } => true,
            _ => false,
        }
    }

    /// Map onto the four-way taxonomy used by the orchestration layer
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::ConfigurationError { .. } => ProviderErrorKind::Configuration,
            Self::Unavailable { .. } | Self::CircuitBreakerOpen { .. } => {
                ProviderErrorKind::Unavailable
            }
            Self::Normalization(_) => ProviderErrorKind::Normalization,
            _ => ProviderErrorKind::Call,
        }
    }

    /// Provider name if the variant carries one
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::ConfigurationError { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::RateLimitExceeded { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::InvalidInput { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::CircuitBreakerOpen { provider, .. } => Some(provider),
            Self::Normalization(err) => Some(&err.provider),
            Self::NetworkError(_) | Self::Timeout(_) => None,
        }
    }

    /// Convenience constructor for configuration errors
    #[must_use]
    pub fn configuration(provider: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ConfigurationError {
            provider: provider.into(),
            details: details.into(),
        }
    }

    /// Convenience constructor for rejected input
    #[must_use]
    pub fn invalid_input(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for unresolved resources
    #[must_use]
    pub fn not_found(
        provider: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            provider: provider.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}
