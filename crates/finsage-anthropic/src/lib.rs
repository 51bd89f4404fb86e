// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude provider adapter for the Finsage engine.
//!
//! Implements the `ProviderAdapter` seam over the Anthropic Messages API,
//! assigning typed error kinds from HTTP evidence at this boundary.

mod adapter;
pub mod types;

pub use adapter::AnthropicProvider;
