// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports scripted in-memory providers for every domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod mock_providers;
