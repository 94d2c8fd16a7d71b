// ABOUTME: Command handlers for nourishly-cli grouped by domain
// ABOUTME: Each handler calls one service and prints its result as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

pub mod classify;
pub mod macros;
pub mod recipes;

use anyhow::Result;
use nourishly::ProviderServices;

use crate::helpers::display::print_json;

/// Print the status of every configured provider
pub async fn status(services: &ProviderServices) -> Result<()> {
    print_json(&services.provider_status().await)
}
