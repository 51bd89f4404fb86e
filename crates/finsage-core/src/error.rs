// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Finsage engine.
//!
//! Provider failures carry a typed [`ProviderErrorKind`] assigned at the
//! adapter boundary, so nothing upstream ever matches on error message text.

use strum::{Display, EnumString};
use thiserror::Error;

/// Classified cause of a provider call failure.
///
/// Adapters assign the kind from transport-level evidence (HTTP status,
/// elapsed timeout) when the error is constructed. The health monitor and
/// the invocation loop branch on this enum only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ProviderErrorKind {
    /// The provider rejected the call due to rate limiting (HTTP 429).
    RateLimit,
    /// Authentication or authorization failed (HTTP 401/403, bad key).
    Auth,
    /// The call exceeded its deadline.
    Timeout,
    /// Any other failure (5xx, malformed response, network error).
    Generic,
}

/// The primary error type used across the Finsage engine.
#[derive(Debug, Error)]
pub enum FinsageError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// A single provider call failed.
    #[error("provider `{provider}` failed ({kind}): {message}")]
    Provider {
        provider: String,
        kind: ProviderErrorKind,
        message: String,
    },

    /// Every candidate in the fallback chain failed.
    #[error("all {attempts} provider(s) exhausted, last failure: {kind}")]
    AllProvidersExhausted {
        kind: ProviderErrorKind,
        attempts: usize,
    },

    /// Document text extraction failed.
    #[error("document extraction failed: {0}")]
    Extraction(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FinsageError {
    /// Construct a provider error with an explicit kind.
    pub fn provider(
        provider: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    /// The provider error kind, if this error carries one.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Self::Provider { kind, .. } | Self::AllProvidersExhausted { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_kind_round_trips_through_strings() {
        for kind in [
            ProviderErrorKind::RateLimit,
            ProviderErrorKind::Auth,
            ProviderErrorKind::Timeout,
            ProviderErrorKind::Generic,
        ] {
            let s = kind.to_string();
            assert_eq!(ProviderErrorKind::from_str(&s).unwrap(), kind);
        }
    }

    #[test]
    fn provider_error_exposes_kind() {
        let err = FinsageError::provider("anthropic", ProviderErrorKind::RateLimit, "429");
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::RateLimit));

        let exhausted = FinsageError::AllProvidersExhausted {
            kind: ProviderErrorKind::Timeout,
            attempts: 3,
        };
        assert_eq!(exhausted.provider_kind(), Some(ProviderErrorKind::Timeout));

        let config = FinsageError::Config("bad".into());
        assert_eq!(config.provider_kind(), None);
    }

    #[test]
    fn error_messages_name_the_provider_without_credentials() {
        let err = FinsageError::provider("openai", ProviderErrorKind::Auth, "key rejected");
        let rendered = err.to_string();
        assert!(rendered.contains("openai"));
        assert!(rendered.contains("auth"));
    }
}
