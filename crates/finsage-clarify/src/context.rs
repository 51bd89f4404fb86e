// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context extraction.
//!
//! Scans the full history plus the current query for case-specific facts
//! (jurisdiction, tax year, entity type, filing status, accounting method)
//! via pattern rules. Every field is optional; extraction never fails.

use std::sync::LazyLock;

use finsage_core::ChatMessage;
use regex::Regex;

use crate::types::ConversationContext;

/// Jurisdiction markers. Independent of the classifier's table so the two
/// detectors can evolve separately.
const JURISDICTION_MARKERS: &[(&str, &[&str])] = &[
    ("us", &["united states", "u.s.", "usa", "irs", "federal", "american"]),
    ("uk", &["united kingdom", "hmrc", "british", "england"]),
    ("ca", &["canada", "canadian", "cra"]),
    ("au", &["australia", "australian", "ato"]),
    ("de", &["germany", "german"]),
    ("in", &["india", "indian"]),
];

/// Industry descriptions for the business-type field.
const BUSINESS_TYPES: &[&str] = &[
    "consulting",
    "retail",
    "restaurant",
    "manufacturing",
    "real estate",
    "construction",
    "software",
    "e-commerce",
    "freelance",
    "nonprofit",
];

/// Legal entity forms. Longer phrases first so "s corporation" wins over
/// a bare "corporation".
const ENTITY_TYPES: &[(&str, &str)] = &[
    ("sole proprietorship", "sole proprietorship"),
    ("sole proprietor", "sole proprietorship"),
    ("s corporation", "s corporation"),
    ("s-corp", "s corporation"),
    ("c corporation", "c corporation"),
    ("c-corp", "c corporation"),
    ("limited liability company", "llc"),
    ("llc", "llc"),
    ("partnership", "partnership"),
    ("corporation", "corporation"),
];

static TAX_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19[89][0-9]|20[0-9]{2})\b").unwrap());

static FILING_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(married filing jointly|married filing separately|head of household|qualifying widow(?:er)?|single filer)\b|\bfil(?:e|ing)\s+(?:as\s+)?(single)\b",
    )
    .unwrap()
});

static ACCOUNTING_METHOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(cash|accrual)[ -](?:basis|method|accounting)\b").unwrap());

/// Extract case-specific context from the conversation.
///
/// Later statements win: the current query is scanned last so a correction
/// ("actually it's an S corp") overrides earlier history.
pub fn extract_conversation_context(
    history: &[ChatMessage],
    query: &str,
) -> ConversationContext {
    let mut context = ConversationContext::default();

    for message in history {
        merge_from_text(&mut context, &message.content);
    }
    merge_from_text(&mut context, query);

    context
}

fn merge_from_text(context: &mut ConversationContext, text: &str) {
    let lower = text.to_lowercase();

    for (code, markers) in JURISDICTION_MARKERS {
        if markers.iter().any(|m| lower.contains(m)) {
            context.jurisdiction = Some((*code).to_string());
            break;
        }
    }

    if let Some(captures) = TAX_YEAR.captures(&lower) {
        context.tax_year = Some(captures[1].to_string());
    }

    for business in BUSINESS_TYPES {
        if lower.contains(business) {
            context.business_type = Some((*business).to_string());
            break;
        }
    }

    for (marker, canonical) in ENTITY_TYPES {
        if lower.contains(marker) {
            context.entity_type = Some((*canonical).to_string());
            break;
        }
    }

    if let Some(captures) = FILING_STATUS.captures(&lower) {
        let status = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let status = if status == "single filer" { "single" } else { status };
        context.filing_status = Some(status.to_string());
    }

    if let Some(captures) = ACCOUNTING_METHOD.captures(&lower) {
        context.accounting_method = Some(captures[1].to_string());
    }
}
