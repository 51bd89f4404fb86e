// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data types produced by the clarification engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How important a missing piece of context is to answering responsibly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
    Critical,
}

/// Confidence band of a clarification analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// The decision the engine reaches for one query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecommendedApproach {
    /// Ask clarifying questions before answering anything.
    Clarify,
    /// Answer directly.
    Answer,
    /// Answer what can be answered, then ask for the missing detail.
    PartialAnswerThenClarify,
}

/// Case-specific facts accumulated from the conversation text.
///
/// All fields optional: absence means the conversation never stated it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub jurisdiction: Option<String>,
    pub tax_year: Option<String>,
    pub business_type: Option<String>,
    pub filing_status: Option<String>,
    pub entity_type: Option<String>,
    pub accounting_method: Option<String>,
}

/// A piece of context the engine decided is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingContextItem {
    pub category: String,
    pub importance: Importance,
    pub reason: String,
    pub suggested_question: String,
}

/// A vague term whose meaning the engine cannot pin down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub term: String,
    pub description: String,
    /// Question from the fixed ambiguity-to-question mapping table.
    pub clarifying_question: String,
}

/// A non-blocking expert-knowledge note attached to the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nuance {
    pub topic: String,
    pub note: String,
}

/// Complete output of the clarification engine for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationAnalysis {
    /// True only when the engine decided to ask before answering.
    pub needs_clarification: bool,
    pub confidence: ConfidenceLevel,
    pub missing_context: Vec<MissingContextItem>,
    pub ambiguities: Vec<Ambiguity>,
    pub detected_nuances: Vec<Nuance>,
    pub conversation_context: ConversationContext,
    pub recommended_approach: RecommendedApproach,
}
