// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query classification.
//!
//! Derives domain, jurisdictions, complexity, and special-requirement flags
//! from raw query text using zero-cost keyword scoring. No LLM pre-call, no
//! network, no latency. Classification never fails: an empty or unrecognized
//! query yields a low-confidence general/basic guess.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::rules::{
    ADVANCED_TERMS, DEEP_REASONING_TERMS, DOCUMENT_TERMS, DOMAIN_TABLE, JURISDICTION_TABLE,
    REAL_TIME_TERMS, RESEARCH_TERMS, TAX_SUBDOMAINS,
};

/// Professional domain of a query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Tax,
    Audit,
    Reporting,
    Compliance,
    #[default]
    General,
}

/// Query complexity levels mapped to model capability tiers.
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
pub enum Complexity {
    #[default]
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

/// Optional attachment hint passed alongside the query text.
#[derive(Debug, Clone, Default)]
pub struct DocumentHint {
    pub has_document: bool,
    pub document_type: Option<String>,
}

/// Structured summary of a query's domain, jurisdiction, and complexity.
///
/// Created fresh per request and immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryClassification {
    pub domain: Domain,
    pub sub_domain: Option<String>,
    pub jurisdictions: Vec<String>,
    pub complexity: Complexity,
    pub requires_document_analysis: bool,
    pub requires_research: bool,
    pub requires_real_time_data: bool,
    pub requires_deep_reasoning: bool,
    /// Normalized classification confidence in [0, 1].
    pub confidence: f64,
}

/// Heuristic query classifier backed by the rule tables in [`crate::rules`].
#[derive(Debug, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. Always succeeds with a best-effort guess.
    pub fn classify(&self, query: &str, hint: Option<&DocumentHint>) -> QueryClassification {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return QueryClassification {
                domain: Domain::General,
                sub_domain: None,
                jurisdictions: Vec::new(),
                complexity: Complexity::Basic,
                requires_document_analysis: hint.is_some_and(|h| h.has_document),
                requires_research: false,
                requires_real_time_data: false,
                requires_deep_reasoning: false,
                confidence: 0.2,
            };
        }

        let lower = trimmed.to_lowercase();

        let (domain, domain_score, runner_up) = score_domains(&lower);
        let sub_domain = (domain == Domain::Tax)
            .then(|| tax_sub_domain(&lower))
            .flatten();
        let jurisdictions = detect_jurisdictions(&lower);
        let complexity = score_complexity(trimmed, &lower, &jurisdictions);

        let requires_document_analysis = hint.is_some_and(|h| h.has_document)
            || DOCUMENT_TERMS.iter().any(|t| lower.contains(t));
        let requires_research = RESEARCH_TERMS.iter().any(|t| lower.contains(t));
        let requires_real_time_data = REAL_TIME_TERMS.iter().any(|t| lower.contains(t));
        let requires_deep_reasoning = complexity >= Complexity::Advanced
            || DEEP_REASONING_TERMS.iter().any(|t| lower.contains(t));

        let confidence = confidence_from_scores(domain, domain_score, runner_up);

        debug!(
            domain = %domain,
            complexity = %complexity,
            score = domain_score,
            confidence,
            "query classified"
        );

        QueryClassification {
            domain,
            sub_domain,
            jurisdictions,
            complexity,
            requires_document_analysis,
            requires_research,
            requires_real_time_data,
            requires_deep_reasoning,
            confidence,
        }
    }
}

/// Sum rule weights per domain, returning the winner, its score, and the
/// runner-up score (used to dampen confidence on near-ties).
fn score_domains(lower: &str) -> (Domain, u32, u32) {
    let mut best = (Domain::General, 0u32);
    let mut runner_up = 0u32;

    for (domain, terms) in DOMAIN_TABLE {
        let score: u32 = terms
            .iter()
            .filter(|(term, _)| lower.contains(term))
            .map(|(_, weight)| *weight)
            .sum();
        if score > best.1 {
            runner_up = best.1;
            best = (*domain, score);
        } else if score > runner_up {
            runner_up = score;
        }
    }

    (best.0, best.1, runner_up)
}

/// First matching tax sub-domain, if any.
fn tax_sub_domain(lower: &str) -> Option<String> {
    TAX_SUBDOMAINS
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| lower.contains(t)))
        .map(|(name, _)| (*name).to_string())
}

/// Collect jurisdiction codes whose trigger terms appear in the query.
/// Order follows the fixed table, deduplicated by construction.
fn detect_jurisdictions(lower: &str) -> Vec<String> {
    // Pad so word-boundary-sensitive terms like " uk " match at the edges.
    let padded = format!(" {lower} ");
    JURISDICTION_TABLE
        .iter()
        .filter(|(_, terms)| terms.iter().any(|t| padded.contains(t)))
        .map(|(code, _)| (*code).to_string())
        .collect()
}

/// Complexity heuristic from keyword density and sentence structure.
fn score_complexity(original: &str, lower: &str, jurisdictions: &[String]) -> Complexity {
    let mut score: u32 = ADVANCED_TERMS
        .iter()
        .filter(|(term, _)| lower.contains(term))
        .map(|(_, weight)| *weight)
        .sum();

    let word_count = original.split_whitespace().count();
    score += match word_count {
        0..=8 => 0,
        9..=25 => 1,
        26..=60 => 2,
        _ => 3,
    };

    let sentence_count = original
        .chars()
        .filter(|c| matches!(c, '.' | '?' | '!'))
        .count()
        .max(1);
    if sentence_count >= 3 {
        score += 1;
    }

    if jurisdictions.len() >= 2 {
        score += 2;
    }

    match score {
        0..=1 => Complexity::Basic,
        2..=3 => Complexity::Intermediate,
        4..=6 => Complexity::Advanced,
        _ => Complexity::Expert,
    }
}

/// Normalize the winning domain score into [0, 1], dampened when the
/// runner-up domain scored nearly as high (an ambiguous classification
/// lowers confidence, it is never an error).
fn confidence_from_scores(domain: Domain, score: u32, runner_up: u32) -> f64 {
    if domain == Domain::General {
        // Nothing matched; a general answer is still safe but uncertain.
        return 0.3;
    }

    let base = (score as f64 / (score as f64 + 3.0)).min(0.95);
    let margin = (score - runner_up) as f64 / score as f64;
    // Full confidence at a clear win, down to 60% of base on a dead tie.
    (base * (0.6 + 0.4 * margin)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(query: &str) -> QueryClassification {
        QueryClassifier::new().classify(query, None)
    }

    #[test]
    fn empty_query_degrades_to_general_basic() {
        let c = classify("");
        assert_eq!(c.domain, Domain::General);
        assert_eq!(c.complexity, Complexity::Basic);
        assert!(c.confidence < 0.4);
    }

    #[test]
    fn unrecognized_query_is_general() {
        let c = classify("tell me a story about a dragon");
        assert_eq!(c.domain, Domain::General);
    }

    #[test]
    fn corporate_tax_query_is_tax_domain() {
        let c = classify("What is the corporate tax rate?");
        assert_eq!(c.domain, Domain::Tax);
        assert_eq!(c.sub_domain.as_deref(), Some("corporate"));
    }

    #[test]
    fn audit_query_is_audit_domain() {
        let c = classify("How should we document audit evidence for internal controls testing?");
        assert_eq!(c.domain, Domain::Audit);
    }

    #[test]
    fn reporting_query_is_reporting_domain() {
        let c = classify("Prepare a balance sheet and income statement under IFRS");
        assert_eq!(c.domain, Domain::Reporting);
    }

    #[test]
    fn compliance_query_is_compliance_domain() {
        let c = classify("Do we need an FBAR filing for our foreign accounts?");
        assert_eq!(c.domain, Domain::Compliance);
    }

    #[test]
    fn jurisdictions_are_detected_from_terms() {
        let c = classify("How does IRS treat capital gains versus HMRC rules?");
        assert_eq!(c.jurisdictions, vec!["us".to_string(), "uk".to_string()]);
    }

    #[test]
    fn multi_jurisdiction_raises_complexity() {
        let simple = classify("capital gains tax");
        let multi = classify("capital gains tax in the united states versus canada and germany");
        assert!(multi.complexity > simple.complexity);
    }

    #[test]
    fn advanced_terms_raise_complexity() {
        let c = classify(
            "Analyze the transfer pricing implications and deferred tax treatment of our \
             controlled foreign corporation restructuring across multiple years.",
        );
        assert!(c.complexity >= Complexity::Advanced);
        assert!(c.requires_deep_reasoning);
    }

    #[test]
    fn document_hint_sets_document_flag() {
        let hint = DocumentHint {
            has_document: true,
            document_type: Some("tax-return".into()),
        };
        let c = QueryClassifier::new().classify("summarize this", Some(&hint));
        assert!(c.requires_document_analysis);
    }

    #[test]
    fn document_terms_set_flag_without_hint() {
        let c = classify("Please review my attached trial balance");
        assert!(c.requires_document_analysis);
    }

    #[test]
    fn research_and_real_time_flags() {
        assert!(classify("what does recent ruling case law say about this deduction").requires_research);
        assert!(classify("what is the exchange rate for this invoice").requires_real_time_data);
    }

    #[test]
    fn classification_is_idempotent() {
        let q = "Calculate depreciation for a $120,000 asset over 10 years";
        assert_eq!(classify(q), classify(q));
    }

    #[test]
    fn near_tie_between_domains_lowers_confidence() {
        let clear = classify("tax deduction for my tax return withholding");
        let muddy = classify("audit of the tax deduction disclosure");
        assert!(clear.confidence > muddy.confidence);
    }

    proptest! {
        #[test]
        fn confidence_always_in_unit_interval(query in ".{0,300}") {
            let c = classify(&query);
            prop_assert!((0.0..=1.0).contains(&c.confidence));
        }

        #[test]
        fn classification_never_panics(query in "\\PC{0,500}") {
            let _ = classify(&query);
        }
    }
}
