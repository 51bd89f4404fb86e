// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide provider health tracking for the Finsage engine.
//!
//! One [`ProviderHealthMonitor`] is shared across all in-flight requests;
//! entries are per-provider and updated atomically, so unrelated providers
//! never contend on a common lock.

mod monitor;

pub use monitor::{ProviderHealthMetrics, ProviderHealthMonitor, MAX_HEALTH_SCORE};
