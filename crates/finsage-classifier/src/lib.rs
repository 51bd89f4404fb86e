// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query classification for the Finsage engine.
//!
//! Derives a [`QueryClassification`] (domain, jurisdictions, complexity,
//! special-requirement flags) from raw query text via ordered, scored
//! keyword rules. Pure and synchronous; classification always succeeds.

mod classifier;
mod rules;

pub use classifier::{Complexity, DocumentHint, Domain, QueryClassification, QueryClassifier};
