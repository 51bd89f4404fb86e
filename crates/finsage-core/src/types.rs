// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Finsage engine crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of a message in a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// Subscription tier of the requesting user.
///
/// Gates access to higher-capability models in the routing policy.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Professional,
    Enterprise,
}

/// Token consumption reported by a provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens billed for the call.
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// A user-supplied file attached to a query.
///
/// The engine never parses attachment bytes itself; a [`DocumentExtractor`]
/// collaborator turns them into text ahead of classification and solving.
///
/// [`DocumentExtractor`]: crate::traits::DocumentExtractor
#[derive(Debug, Clone)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    /// Caller-supplied hint such as "tax-return" or "financial-statement".
    pub document_type: Option<String>,
}

/// A completion request handed to a provider adapter.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub attachment: Option<Attachment>,
}

/// A completed response from a provider adapter.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub usage: TokenUsage,
}

/// Outcome of a document text extraction attempt.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub success: bool,
    pub extracted_text: Option<String>,
    pub error: Option<String>,
}
