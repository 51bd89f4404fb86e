// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Finsage unit and integration tests.
//!
//! Mock collaborators implementing the `finsage-core` trait seams, so the
//! orchestrator can be exercised deterministically without network access.

mod mock_extractor;
mod mock_provider;

pub use mock_extractor::MockExtractor;
pub use mock_provider::{MockOutcome, MockProvider};
