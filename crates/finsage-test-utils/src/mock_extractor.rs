// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock document extractor for testing query enrichment.

use async_trait::async_trait;

use finsage_core::{DocumentExtractor, ExtractionOutcome, FinsageError};

/// A document extractor that returns fixed text, or a scripted failure.
pub struct MockExtractor {
    extracted_text: Option<String>,
    fail_with: Option<String>,
}

impl MockExtractor {
    /// Extractor that always yields the given text.
    pub fn yielding(text: impl Into<String>) -> Self {
        Self {
            extracted_text: Some(text.into()),
            fail_with: None,
        }
    }

    /// Extractor whose extraction always fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            extracted_text: None,
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl DocumentExtractor for MockExtractor {
    async fn extract(
        &self,
        _data: &[u8],
        _filename: &str,
        _mime_type: &str,
    ) -> Result<ExtractionOutcome, FinsageError> {
        if let Some(message) = &self.fail_with {
            return Ok(ExtractionOutcome {
                success: false,
                extracted_text: None,
                error: Some(message.clone()),
            });
        }
        Ok(ExtractionOutcome {
            success: true,
            extracted_text: self.extracted_text.clone(),
            error: None,
        })
    }
}
