// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document text extraction trait.

use async_trait::async_trait;

use crate::error::FinsageError;
use crate::types::ExtractionOutcome;

/// Turns attachment bytes into plain text ahead of classification.
///
/// The engine consumes only `extracted_text`; a failed extraction degrades
/// to answering from the query alone rather than failing the request.
#[async_trait]
pub trait DocumentExtractor: Send + Sync + 'static {
    async fn extract(
        &self,
        data: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<ExtractionOutcome, FinsageError>;
}
