// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response assembly and UI routing metadata.
//!
//! Classifies the UI-facing response type from keyword detectors over the
//! original query (not the enriched one) plus classification flags, and
//! appends the fixed "need more information" block on
//! partial-answer-then-clarify outcomes.

use finsage_classifier::QueryClassification;
use finsage_clarify::{
    generate_clarifying_questions, ClarificationAnalysis, RecommendedApproach,
};

use crate::result::ResponseType;

/// Keyword detectors, checked in order; first hit wins.
const RESPONSE_TYPE_DETECTORS: &[(ResponseType, &[&str])] = &[
    (
        ResponseType::Visualization,
        &["chart", "graph", "plot", "visualiz", "dashboard"],
    ),
    (
        ResponseType::Export,
        &["export", "download", "csv", "excel file", "spreadsheet"],
    ),
    (
        ResponseType::Document,
        &["draft a", "write a letter", "memo", "engagement letter", "prepare a document"],
    ),
    (
        ResponseType::Calculation,
        &["calculate", "compute", "how much is", "npv", "irr", "monthly payment"],
    ),
    (
        ResponseType::Research,
        &["research", "case law", "compare jurisdictions", "latest guidance", "precedent"],
    ),
    (
        ResponseType::Analysis,
        &["analyze", "analysis", "assess", "evaluate", "review my"],
    ),
];

/// Classify the UI response type from the original query and classification
/// flags. Calculations that actually fired take precedence over flags.
pub(crate) fn response_type(
    original_query: &str,
    classification: &QueryClassification,
    has_calculations: bool,
) -> ResponseType {
    let lower = original_query.to_lowercase();

    for (response_type, terms) in RESPONSE_TYPE_DETECTORS {
        if terms.iter().any(|t| lower.contains(t)) {
            return *response_type;
        }
    }

    if has_calculations {
        return ResponseType::Calculation;
    }
    if classification.requires_research {
        return ResponseType::Research;
    }
    if classification.requires_document_analysis {
        return ResponseType::Analysis;
    }

    ResponseType::General
}

/// Whether the UI should render the response in its dedicated output pane.
pub(crate) fn show_in_output_pane(
    response_type: ResponseType,
    classification: &QueryClassification,
) -> bool {
    match response_type {
        ResponseType::Document
        | ResponseType::Visualization
        | ResponseType::Export
        | ResponseType::Calculation => true,
        ResponseType::Analysis => classification.requires_document_analysis,
        ResponseType::Research | ResponseType::General => false,
    }
}

/// Fixed-format clarify-first response: no model answer, questions only.
pub(crate) fn clarify_response(analysis: &ClarificationAnalysis, max_questions: usize) -> String {
    let mut questions =
        generate_clarifying_questions(&analysis.missing_context, &analysis.ambiguities);
    questions.truncate(max_questions);

    let mut out =
        String::from("Before I can give you a reliable answer, I need a little more information:\n");
    for (index, question) in questions.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", index + 1, question));
    }
    out
}

/// Append the fixed "need more information" block (questions plus up to two
/// top nuances) to a partial answer. Answers for other approaches pass
/// through untouched.
pub(crate) fn assemble_answer(
    model_text: &str,
    analysis: Option<&ClarificationAnalysis>,
    max_questions: usize,
) -> String {
    let Some(analysis) = analysis else {
        return model_text.to_string();
    };
    if analysis.recommended_approach != RecommendedApproach::PartialAnswerThenClarify {
        return model_text.to_string();
    }

    let mut questions =
        generate_clarifying_questions(&analysis.missing_context, &analysis.ambiguities);
    questions.truncate(max_questions);

    let mut out = model_text.to_string();
    out.push_str("\n\n---\nTo make this answer fully precise, could you also tell me:\n");
    for (index, question) in questions.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", index + 1, question));
    }

    for nuance in analysis.detected_nuances.iter().take(2) {
        out.push_str(&format!("\n\nWorth noting ({}): {}", nuance.topic, nuance.note));
    }

    out
}
