// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Finsage engine.
//!
//! Providers and document extractors live outside the engine; these traits
//! are the seams through which the orchestrator talks to them. All traits
//! use `#[async_trait]` for dynamic dispatch compatibility.

pub mod extractor;
pub mod provider;

pub use extractor::DocumentExtractor;
pub use provider::ProviderAdapter;
