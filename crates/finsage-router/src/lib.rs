// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing policy engine for the Finsage engine.
//!
//! Maps a [`QueryClassification`] and subscription tier to a
//! [`RoutingDecision`] via a static, ordered policy table. Pure: no I/O,
//! no mutation, fully deterministic.
//!
//! [`QueryClassification`]: finsage_classifier::QueryClassification

mod policy;

pub use policy::{
    Capability, RoutingDecision, RoutingPolicy, BASELINE_PROVIDERS, PROVIDER_PREFERENCE,
};
