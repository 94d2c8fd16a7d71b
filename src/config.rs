// ABOUTME: Environment configuration for providers, fallback orders, HTTP timeouts, and availability caching
// ABOUTME: Every enabled provider must declare its rate limit; nothing is silently defaulted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

//! # Configuration
//!
//! All settings come from `NOURISHLY_*` environment variables.
//!
//! Per provider (`<ID>` is the upper-cased identifier, e.g. `BUDGET_BYTES`):
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `NOURISHLY_<ID>_ENABLED` | `true` to build the provider (default `false`) |
//! | `NOURISHLY_<ID>_API_KEY` | credential |
//! | `NOURISHLY_<ID>_BASE_URL` | upstream override |
//! | `NOURISHLY_<ID>_RATE_LIMIT_MS` | minimum interval between calls, required when enabled |
//! | `NOURISHLY_<ID>_OPT_<KEY>` | provider option `<key>` |
//!
//! Fallback orders are comma-separated identifiers in
//! `NOURISHLY_RECIPE_PROVIDERS`, `NOURISHLY_MACRO_PROVIDERS` and
//! `NOURISHLY_CLASSIFIER_PROVIDERS`. When unset, enabled built-ins are tried
//! in declaration order.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::time::Duration;

use nourishly_core::constants::http::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use nourishly_core::errors::ConfigError;
use nourishly_providers::{ProviderConfig, ProviderDomain, ProviderId};

/// Prefix shared by every variable
pub const ENV_PREFIX: &str = "NOURISHLY_";

const DEFAULT_AVAILABILITY_TTL_SECS: u64 = 60;

/// Outbound HTTP timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// One enabled provider and the configuration it is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Built-in identifier
    pub id: ProviderId,
    /// Configuration handed to the provider constructor
    pub config: ProviderConfig,
}

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NourishlyConfig {
    /// Enabled providers in declaration order
    pub providers: Vec<ProviderSettings>,
    /// Recipe fallback order
    pub recipe_order: Vec<ProviderId>,
    /// Macro analysis fallback order
    pub macro_order: Vec<ProviderId>,
    /// Classification fallback order
    pub classifier_order: Vec<ProviderId>,
    /// Shared client timeouts
    pub http: HttpConfig,
    /// How long an `is_available` answer is reused
    pub availability_ttl: Duration,
}

impl NourishlyConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or malformed variable
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Load configuration from an explicit set of variables
    ///
    /// # Errors
    ///
    /// Same as [`NourishlyConfig::from_env`]
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        let source = EnvSource { vars: &vars };

        let mut providers = Vec::new();
        for id in ProviderId::ALL {
            if let Some(settings) = source.provider(id)? {
                providers.push(settings);
            }
        }
        let enabled: Vec<ProviderId> = providers.iter().map(|p| p.id).collect();

        Ok(Self {
            recipe_order: source.order("RECIPE_PROVIDERS", ProviderDomain::Recipe, &enabled)?,
            macro_order: source.order("MACRO_PROVIDERS", ProviderDomain::Macro, &enabled)?,
            classifier_order: source.order(
                "CLASSIFIER_PROVIDERS",
                ProviderDomain::Classifier,
                &enabled,
            )?,
            http: HttpConfig {
                timeout_secs: source.u64_or("HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
                connect_timeout_secs: source
                    .u64_or("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            },
            availability_ttl: Duration::from_secs(
                source.u64_or("AVAILABILITY_TTL_SECS", DEFAULT_AVAILABILITY_TTL_SECS)?,
            ),
            providers,
        })
    }

    /// Settings of an enabled provider
    #[must_use]
    pub fn provider(&self, id: ProviderId) -> Option<&ProviderSettings> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Fallback order for a domain
    #[must_use]
    pub fn order(&self, domain: ProviderDomain) -> &[ProviderId] {
        match domain {
            ProviderDomain::Recipe => &self.recipe_order,
            ProviderDomain::Macro => &self.macro_order,
            ProviderDomain::Classifier => &self.classifier_order,
        }
    }
}

/// Upper-cased identifier used inside variable names
fn env_key(id: ProviderId) -> String {
    id.as_str().to_uppercase()
}

struct EnvSource<'a> {
    vars: &'a HashMap<String, String>,
}

impl EnvSource<'_> {
    fn get(&self, name: &str) -> Option<(String, &str)> {
        let variable = format!("{ENV_PREFIX}{name}");
        let value = self.vars.get(&variable)?.trim();
        (!value.is_empty()).then_some((variable, value))
    }

    fn bool_or(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        let Some((variable, value)) = self.get(name) else {
            return Ok(default);
        };
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::invalid(variable, value, "expected true or false")),
        }
    }

    fn u64_or(&self, name: &str, default: u64) -> Result<u64, ConfigError> {
        self.get(name).map_or(Ok(default), |(variable, value)| {
            value
                .parse()
                .map_err(|_| ConfigError::invalid(variable, value, "expected a non-negative integer"))
        })
    }

    fn provider(&self, id: ProviderId) -> Result<Option<ProviderSettings>, ConfigError> {
        let key = env_key(id);
        if !self.bool_or(&format!("{key}_ENABLED"), false)? {
            return Ok(None);
        }

        let rate_limit_name = format!("{key}_RATE_LIMIT_MS");
        let (variable, raw) = self
            .get(&rate_limit_name)
            .ok_or_else(|| ConfigError::missing(format!("{ENV_PREFIX}{rate_limit_name}")))?;
        let millis: u64 = raw
            .parse()
            .map_err(|_| ConfigError::invalid(variable, raw, "expected milliseconds"))?;

        let mut config = ProviderConfig::new(id.as_str(), Duration::from_millis(millis));
        if let Some((_, api_key)) = self.get(&format!("{key}_API_KEY")) {
            config = config.with_api_key(api_key);
        }
        if let Some((_, base_url)) = self.get(&format!("{key}_BASE_URL")) {
            config = config.with_base_url(base_url);
        }
        config.options = self.options(&key);

        Ok(Some(ProviderSettings { id, config }))
    }

    fn options(&self, key: &str) -> BTreeMap<String, String> {
        let prefix = format!("{ENV_PREFIX}{key}_OPT_");
        self.vars
            .iter()
            .filter_map(|(name, value)| {
                let option = name.strip_prefix(&prefix)?;
                let value = value.trim();
                (!option.is_empty() && !value.is_empty())
                    .then(|| (option.to_lowercase(), value.to_owned()))
            })
            .collect()
    }

    fn order(
        &self,
        name: &str,
        domain: ProviderDomain,
        enabled: &[ProviderId],
    ) -> Result<Vec<ProviderId>, ConfigError> {
        let Some((variable, value)) = self.get(name) else {
            return Ok(ProviderId::for_domain(domain)
                .into_iter()
                .filter(|id| enabled.contains(id))
                .collect());
        };

        let mut order = Vec::new();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let id: ProviderId = entry
                .parse()
                .map_err(|reason: String| ConfigError::invalid(&variable, value, reason))?;
            if id.domain() != domain {
                return Err(ConfigError::invalid(
                    &variable,
                    value,
                    format!("'{id}' is a {} provider", id.domain()),
                ));
            }
            if !enabled.contains(&id) {
                return Err(ConfigError::invalid(
                    &variable,
                    value,
                    format!("'{id}' is not enabled"),
                ));
            }
            if !order.contains(&id) {
                order.push(id);
            }
        }
        Ok(order)
    }
}
