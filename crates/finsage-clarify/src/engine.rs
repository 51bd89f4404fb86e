// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The clarify-vs-answer decision.
//!
//! Pipeline per query: extract conversation context, run the missing-context
//! rules, run the vague-term detector, collect nuances, then decide the
//! approach from a fixed decision table. Every pass is pure; the thresholds
//! in [`determine_approach`] are deliberate policy and must not be re-tuned.

use finsage_classifier::QueryClassification;
use finsage_core::ChatMessage;
use tracing::debug;

use crate::context::extract_conversation_context;
use crate::detect::{detect_ambiguities, detect_missing_context, detect_nuances};
use crate::types::{
    Ambiguity, ClarificationAnalysis, ConfidenceLevel, Importance, MissingContextItem,
    RecommendedApproach,
};

/// Maximum clarifying questions surfaced to the user.
pub const MAX_CLARIFYING_QUESTIONS: usize = 3;

/// Openers that mark a general-information question.
const GENERAL_INFORMATION_OPENERS: &[&str] = &[
    "what is",
    "what are",
    "what does",
    "explain",
    "define",
    "tell me about",
    "how does",
];

/// Rule-based engine deciding whether to ask before answering.
#[derive(Debug, Default)]
pub struct ClarificationEngine;

impl ClarificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Analyze one query against its conversation history.
    pub fn analyze(
        &self,
        query: &str,
        history: &[ChatMessage],
        classification: &QueryClassification,
    ) -> ClarificationAnalysis {
        let conversation_context = extract_conversation_context(history, query);
        let missing_context = detect_missing_context(classification, &conversation_context, query);
        let ambiguities = detect_ambiguities(query);
        let detected_nuances = detect_nuances(query);

        let recommended_approach = determine_approach(&missing_context, &ambiguities, query);
        let confidence = confidence_level(&missing_context, &ambiguities);

        debug!(
            approach = %recommended_approach,
            missing = missing_context.len(),
            ambiguities = ambiguities.len(),
            nuances = detected_nuances.len(),
            "clarification analysis complete"
        );

        ClarificationAnalysis {
            needs_clarification: recommended_approach == RecommendedApproach::Clarify,
            confidence,
            missing_context,
            ambiguities,
            detected_nuances,
            conversation_context,
            recommended_approach,
        }
    }
}

/// The decision table. Exact thresholds are product policy; preserve them.
///
/// 1. Any critical-importance missing item asks first.
/// 2. Two or more high-importance items, or two or more ambiguities, ask first.
/// 3. Exactly one high item or exactly one ambiguity answers partially, then asks.
/// 4. General-information phrasing with nothing above answers directly.
/// 5. Everything else answers directly.
pub fn determine_approach(
    missing_context: &[MissingContextItem],
    ambiguities: &[Ambiguity],
    query: &str,
) -> RecommendedApproach {
    if missing_context
        .iter()
        .any(|item| item.importance == Importance::Critical)
    {
        return RecommendedApproach::Clarify;
    }

    let high_count = missing_context
        .iter()
        .filter(|item| item.importance == Importance::High)
        .count();

    if high_count >= 2 || ambiguities.len() >= 2 {
        return RecommendedApproach::Clarify;
    }

    if high_count == 1 || ambiguities.len() == 1 {
        return RecommendedApproach::PartialAnswerThenClarify;
    }

    if is_general_information(query) {
        return RecommendedApproach::Answer;
    }

    RecommendedApproach::Answer
}

/// Collect clarifying questions from critical/high missing items and the
/// ambiguity mapping table, truncated to [`MAX_CLARIFYING_QUESTIONS`].
/// Pure, no side effects.
pub fn generate_clarifying_questions(
    missing_context: &[MissingContextItem],
    ambiguities: &[Ambiguity],
) -> Vec<String> {
    let mut questions: Vec<String> = Vec::new();

    for importance in [Importance::Critical, Importance::High] {
        for item in missing_context
            .iter()
            .filter(|item| item.importance == importance)
        {
            if !questions.contains(&item.suggested_question) {
                questions.push(item.suggested_question.clone());
            }
        }
    }

    for ambiguity in ambiguities {
        if !questions.contains(&ambiguity.clarifying_question) {
            questions.push(ambiguity.clarifying_question.clone());
        }
    }

    questions.truncate(MAX_CLARIFYING_QUESTIONS);
    questions
}

fn is_general_information(query: &str) -> bool {
    let lower = query.trim().to_lowercase();
    GENERAL_INFORMATION_OPENERS
        .iter()
        .any(|opener| lower.starts_with(opener))
}

fn confidence_level(
    missing_context: &[MissingContextItem],
    ambiguities: &[Ambiguity],
) -> ConfidenceLevel {
    let blocking = missing_context
        .iter()
        .filter(|item| item.importance >= Importance::High)
        .count()
        + ambiguities.len();
    match blocking {
        0 => ConfidenceLevel::High,
        1 => ConfidenceLevel::Medium,
        _ => ConfidenceLevel::Low,
    }
}
