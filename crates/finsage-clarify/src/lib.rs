// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clarification engine for the Finsage engine.
//!
//! Decides, per query, whether to ask clarifying questions before answering,
//! answer directly, or answer and then ask. Built from independent pure
//! passes: context extraction, a missing-context rule table, a vague-term
//! detector, and informational nuance triggers.

mod context;
mod detect;
mod engine;
mod types;

pub use context::extract_conversation_context;
pub use detect::{detect_ambiguities, detect_missing_context, detect_nuances};
pub use engine::{
    determine_approach, generate_clarifying_questions, ClarificationEngine,
    MAX_CLARIFYING_QUESTIONS,
};
pub use types::{
    Ambiguity, ClarificationAnalysis, ConfidenceLevel, ConversationContext, Importance,
    MissingContextItem, Nuance, RecommendedApproach,
};
