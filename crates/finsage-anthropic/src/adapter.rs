// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapter for the Anthropic Messages API.
//!
//! This is the boundary where provider failures get their typed
//! [`ProviderErrorKind`]: 429 maps to rate-limit, 401/403 to auth, an
//! elapsed transport deadline to timeout, everything else to generic.
//! Nothing upstream inspects error message text.
//!
//! The adapter performs exactly one HTTP call per `complete`; retry and
//! fallback policy belong to the invocation loop, which owns the bound on
//! external calls per query.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::debug;

use finsage_config::model::AnthropicConfig;
use finsage_core::{
    ChatRole, FinsageError, ProviderAdapter, ProviderErrorKind, ProviderRequest,
    ProviderResponse, TokenUsage,
};

use crate::types::{ApiErrorResponse, ApiMessage, MessageRequest, MessageResponse};

/// Base URL for the Anthropic Messages API.
const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Provider name registered with the router and health monitor.
const PROVIDER_NAME: &str = "anthropic";

/// Transport-level deadline; the invocation loop applies its own tighter
/// per-call timeout on top.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Provider adapter for Anthropic Claude models.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
}

impl AnthropicProvider {
    /// Creates an adapter with explicit credentials.
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, FinsageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| FinsageError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                FinsageError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| FinsageError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Creates an adapter from the `[anthropic]` config section.
    pub fn from_config(config: &AnthropicConfig) -> Result<Self, FinsageError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| FinsageError::Config("anthropic.api_key is not set".into()))?;
        Self::new(api_key, &config.api_version)
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn build_request(&self, request: &ProviderRequest) -> MessageRequest {
        // System turns travel in the dedicated field; the Messages API
        // rejects them inside the messages array.
        let system = request
            .messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n\n");

        let messages = request
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| ApiMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        MessageRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages,
            system: (!system.is_empty()).then_some(system),
            temperature: request.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, FinsageError> {
        let body = self.build_request(&request);

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "anthropic response received");

        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(classify_transport_error)?;
            let parsed: MessageResponse = serde_json::from_str(&text).map_err(|e| {
                FinsageError::provider(
                    PROVIDER_NAME,
                    ProviderErrorKind::Generic,
                    format!("failed to parse API response: {e}"),
                )
            })?;
            return Ok(ProviderResponse {
                content: parsed.text(),
                usage: TokenUsage {
                    input_tokens: parsed.usage.input_tokens,
                    output_tokens: parsed.usage.output_tokens,
                },
            });
        }

        let kind = classify_status(status);
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!("{}: {}", api_err.error.error_type, api_err.error.message),
            Err(_) => format!("API returned {status}"),
        };

        Err(FinsageError::provider(PROVIDER_NAME, kind, message))
    }
}

/// Map an HTTP status to a typed error kind.
fn classify_status(status: StatusCode) -> ProviderErrorKind {
    match status.as_u16() {
        429 => ProviderErrorKind::RateLimit,
        401 | 403 => ProviderErrorKind::Auth,
        408 => ProviderErrorKind::Timeout,
        _ => ProviderErrorKind::Generic,
    }
}

/// Map a transport-level reqwest error to a typed error kind.
fn classify_transport_error(error: reqwest::Error) -> FinsageError {
    let kind = if error.is_timeout() {
        ProviderErrorKind::Timeout
    } else {
        ProviderErrorKind::Generic
    };
    FinsageError::provider(PROVIDER_NAME, kind, format!("HTTP request failed: {error}"))
}
