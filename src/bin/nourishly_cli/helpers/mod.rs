// ABOUTME: Helper modules for nourishly-cli
// ABOUTME: Output formatting shared by every command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

pub mod display;
