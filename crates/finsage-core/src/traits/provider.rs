// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM backend integrations.

use async_trait::async_trait;

use crate::error::FinsageError;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a single LLM provider backend.
///
/// Implementations own transport, authentication, and error classification:
/// every failure must surface as [`FinsageError::Provider`] with a
/// [`ProviderErrorKind`] assigned from transport-level evidence, never left
/// for callers to infer from message text.
///
/// [`ProviderErrorKind`]: crate::error::ProviderErrorKind
#[async_trait]
pub trait ProviderAdapter: Send + Sync + 'static {
    /// Stable identifier used for health tracking and routing ("anthropic").
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, FinsageError>;
}
