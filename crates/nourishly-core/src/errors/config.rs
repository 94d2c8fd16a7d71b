// ABOUTME: Configuration errors raised while loading provider settings from the environment
// ABOUTME: Names the offending variable so misconfiguration is caught before any call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use thiserror::Error;

/// Environment configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing required configuration: {variable}")]
    Missing {
        /// Environment variable name
        variable: String,
    },

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {variable}: '{value}' ({reason})")]
    Invalid {
        /// Environment variable name
        variable: String,
        /// Raw value found
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Missing variable
    #[must_use]
    pub fn missing(variable: impl Into<String>) -> Self {
        Self::Missing {
            variable: variable.into(),
        }
    }

    /// Unparseable variable
    #[must_use]
    pub fn invalid(
        variable: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
