// ABOUTME: Shared helpers for provider HTTP calls
// ABOUTME: Retry with exponential backoff, status checking, JSON decoding, and numeric conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{ProviderError, ProviderResult};

/// Retry behaviour for transient upstream statuses
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay
    pub max_backoff_ms: u64,
    /// Statuses that trigger another attempt
    pub retryable_status_codes: Vec<StatusCode>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            retryable_status_codes: vec![
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::SERVICE_UNAVAILABLE,
            ],
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt number `attempt + 1` (1-based `attempt`)
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }
}

/// Send a request, retrying transient statuses with exponential backoff
///
/// `build` is invoked once per attempt because a sent request cannot be reused.
/// Statuses outside the retryable set are returned to the caller unchanged.
///
/// # Errors
///
/// Returns a transport error, or `RateLimitExceeded` / a retryable `ApiError`
/// once every attempt hit a retryable status.
pub async fn send_with_retry<F>(
    build: F,
    provider: &str,
    retry: &RetryConfig,
) -> ProviderResult<Response>
where
    F: Fn() -> RequestBuilder + Send + Sync,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let response = build().send().await?;
        let status = response.status();
        debug!(provider, status = status.as_u16(), attempt, "Upstream response");

        if !retry.retryable_status_codes.contains(&status) {
            return Ok(response);
        }

        if attempt >= retry.max_attempts {
            warn!(
                provider,
                status = status.as_u16(),
                attempts = attempt,
                "Retries exhausted"
            );
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimitExceeded {
                    provider: provider.to_owned(),
                    retry_after_secs: retry_after_secs(&response)
                        .unwrap_or_else(|| retry.backoff(attempt).as_secs()),
                });
            }
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                provider: provider.to_owned(),
                status_code: status.as_u16(),
                message,
                retryable: true,
            });
        }

        let delay = retry.backoff(attempt);
        warn!(
            provider,
            status = status.as_u16(),
            attempt,
            max_attempts = retry.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "Transient upstream status, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Convert a non-success response into an `ApiError`
///
/// # Errors
///
/// Returns `ApiError` carrying the status and body when the status is not 2xx
pub async fn ensure_success(response: Response, provider: &str) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ProviderError::ApiError {
        provider: provider.to_owned(),
        status_code: status.as_u16(),
        message,
        retryable: status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
    })
}

/// Read a response body as JSON
///
/// # Errors
///
/// Returns `NetworkError` if the body cannot be read, `ParseError` if it is not valid JSON for `T`
pub async fn read_json<T>(response: Response, provider: &str, field: &'static str) -> ProviderResult<T>
where
    T: DeserializeOwned,
{
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| ProviderError::ParseError {
        provider: provider.to_owned(),
        field,
        source,
    })
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Numeric conversions for loosely typed upstream values
pub mod conversions {
    /// Round a non-negative float to `u32`, clamping to range
    #[must_use]
    pub fn f64_to_u32(value: f64) -> u32 {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, f64::from(u32::MAX)) as u32
    }

    /// Positive minutes as `u32`, `None` for zero, negative, or non-finite input
    #[must_use]
    pub fn positive_minutes(value: f64) -> Option<u32> {
        (value.is_finite() && value > 0.0).then(|| f64_to_u32(value))
    }
}
