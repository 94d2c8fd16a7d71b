// ABOUTME: Shared HTTP client with connection pooling and explicit timeouts for provider calls
// ABOUTME: Initialized once at startup; availability checks use a separate short-timeout client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

use crate::constants::http::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, HEALTH_CHECK_TIMEOUT_SECS,
};

/// Configured (request, connect) timeouts in seconds
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Client used for every provider call
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Client used for availability checks
static HEALTH_CHECK_CLIENT: OnceLock<Client> = OnceLock::new();

/// Set the shared client timeouts
///
/// Call once at startup before any provider is built. Later calls are ignored;
/// without a call the defaults (30 s request, 10 s connect) apply.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Timeouts the shared client was (or will be) built with
#[must_use]
pub fn client_timeouts() -> (u64, u64) {
    CLIENT_TIMEOUTS
        .get()
        .copied()
        .unwrap_or((DEFAULT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS))
}

/// Pooled client for provider API calls
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = client_timeouts();
        build_client(timeout, connect_timeout)
    })
}

/// Client with a short timeout for `is_available` checks
pub fn health_check_client() -> &'static Client {
    HEALTH_CHECK_CLIENT.get_or_init(|| {
        let (_, connect_timeout) = client_timeouts();
        build_client(HEALTH_CHECK_TIMEOUT_SECS, connect_timeout.min(HEALTH_CHECK_TIMEOUT_SECS))
    })
}

fn build_client(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
