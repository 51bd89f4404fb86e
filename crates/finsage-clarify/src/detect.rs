// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Missing-context, ambiguity, and nuance detection.
//!
//! Three independent passes over the query and extracted context:
//! - missing-context rules gate the clarify decision,
//! - the vague-term detector is orthogonal to the missing rules,
//! - nuance triggers are informational only and never block an answer.

use finsage_classifier::{Domain, QueryClassification};

use crate::types::{Ambiguity, ConversationContext, Importance, MissingContextItem, Nuance};

/// Input to a single missing-context rule.
pub(crate) struct RuleInput<'a> {
    pub classification: &'a QueryClassification,
    pub context: &'a ConversationContext,
    pub lower_query: &'a str,
}

/// One row of the domain-specific missing-context rule table.
struct MissingRule {
    category: &'static str,
    importance: Importance,
    applies: fn(&RuleInput) -> bool,
    reason: &'static str,
    question: &'static str,
}

/// The rule table, scanned in order. Rules are deduplicated by category,
/// first (highest-priority) hit wins.
const MISSING_RULES: &[MissingRule] = &[
    MissingRule {
        category: "jurisdiction",
        importance: Importance::Critical,
        applies: tax_without_jurisdiction,
        reason: "tax answers change entirely by jurisdiction",
        question: "Which country (and state or province, if applicable) do your tax rules come from?",
    },
    MissingRule {
        category: "jurisdiction",
        importance: Importance::Critical,
        applies: deduction_or_compliance_without_jurisdiction,
        reason: "deduction and compliance rules are jurisdiction-specific",
        question: "Which jurisdiction's rules should this be based on?",
    },
    MissingRule {
        category: "entity_type",
        importance: Importance::Critical,
        applies: business_without_entity_type,
        reason: "the legal entity form determines the applicable rules",
        question: "What type of entity is the business (LLC, S corporation, C corporation, partnership, sole proprietorship)?",
    },
    MissingRule {
        category: "tax_year",
        importance: Importance::High,
        applies: tax_without_year,
        reason: "thresholds and rates change by tax year",
        question: "Which tax year does this concern?",
    },
    MissingRule {
        category: "filing_status",
        importance: Importance::High,
        applies: personal_tax_without_filing_status,
        reason: "personal tax outcomes depend on filing status",
        question: "What is your filing status (single, married filing jointly, married filing separately, head of household)?",
    },
    MissingRule {
        category: "accounting_method",
        importance: Importance::High,
        applies: reporting_without_accounting_method,
        reason: "reporting treatment differs between cash and accrual",
        question: "Does the business use cash-basis or accrual accounting?",
    },
];

fn tax_without_jurisdiction(input: &RuleInput) -> bool {
    input.classification.domain == Domain::Tax && input.context.jurisdiction.is_none()
}

fn deduction_or_compliance_without_jurisdiction(input: &RuleInput) -> bool {
    (input.lower_query.contains("deduct") || input.classification.domain == Domain::Compliance)
        && input.context.jurisdiction.is_none()
}

fn business_without_entity_type(input: &RuleInput) -> bool {
    let about_business = input.classification.sub_domain.as_deref() == Some("corporate")
        || input.lower_query.contains("my business")
        || input.lower_query.contains("our business")
        || input.lower_query.contains("our company")
        || input.lower_query.contains("business expense");
    about_business && input.context.entity_type.is_none()
}

fn tax_without_year(input: &RuleInput) -> bool {
    input.classification.domain == Domain::Tax && input.context.tax_year.is_none()
}

fn personal_tax_without_filing_status(input: &RuleInput) -> bool {
    input.classification.domain == Domain::Tax
        && input.classification.sub_domain.as_deref() == Some("personal")
        && input.context.filing_status.is_none()
}

fn reporting_without_accounting_method(input: &RuleInput) -> bool {
    input.classification.domain == Domain::Reporting
        && input.context.accounting_method.is_none()
}

/// Run the missing-context rule table.
pub fn detect_missing_context(
    classification: &QueryClassification,
    context: &ConversationContext,
    query: &str,
) -> Vec<MissingContextItem> {
    let lower_query = query.to_lowercase();
    let input = RuleInput {
        classification,
        context,
        lower_query: &lower_query,
    };

    let mut items: Vec<MissingContextItem> = Vec::new();
    for rule in MISSING_RULES {
        if items.iter().any(|item| item.category == rule.category) {
            continue;
        }
        if (rule.applies)(&input) {
            items.push(MissingContextItem {
                category: rule.category.to_string(),
                importance: rule.importance,
                reason: rule.reason.to_string(),
                suggested_question: rule.question.to_string(),
            });
        }
    }
    items
}

/// Vague terms with their fixed clarifying questions.
const AMBIGUOUS_TERMS: &[(&str, &str, &str)] = &[
    (
        "recently",
        "an unanchored point in time",
        "When exactly did this happen?",
    ),
    (
        "significant",
        "an unquantified magnitude",
        "Roughly what amount are we talking about?",
    ),
    (
        "substantial",
        "an unquantified magnitude",
        "Can you put a number on that amount?",
    ),
    (
        "a lot of",
        "an unquantified quantity",
        "Approximately how much or how many?",
    ),
    (
        "soon",
        "an unanchored deadline",
        "By what date does this need to happen?",
    ),
    (
        "last year",
        "a relative year that depends on the current date",
        "Which calendar year do you mean?",
    ),
];

/// Qualifiers that make the word "income" specific enough.
const INCOME_QUALIFIERS: &[&str] = &[
    "wage", "salary", "business income", "investment income", "rental income",
    "interest income", "dividend", "capital gain", "self-employment income",
    "taxable income",
];

/// Independent vague-term detector, orthogonal to the missing-context rules.
pub fn detect_ambiguities(query: &str) -> Vec<Ambiguity> {
    let lower = query.to_lowercase();
    let mut ambiguities: Vec<Ambiguity> = AMBIGUOUS_TERMS
        .iter()
        .filter(|(term, _, _)| lower.contains(term))
        .map(|(term, description, question)| Ambiguity {
            term: (*term).to_string(),
            description: (*description).to_string(),
            clarifying_question: (*question).to_string(),
        })
        .collect();

    // "income" with no qualifier could be any of half a dozen categories
    // with different treatment.
    if lower.contains("income") && !INCOME_QUALIFIERS.iter().any(|q| lower.contains(q)) {
        ambiguities.push(Ambiguity {
            term: "income".to_string(),
            description: "an undistinguished income category".to_string(),
            clarifying_question:
                "What kind of income is this (wages, business, investment, rental, other)?"
                    .to_string(),
        });
    }

    ambiguities
}

/// Expert-knowledge triggers. Informational only; these never gate the
/// clarify decision.
const NUANCE_TRIGGERS: &[(&[&str], &str, &str)] = &[
    (
        &["home office", "work from home", "working from home"],
        "home-office deduction",
        "The home-office deduction can be computed under the simplified or the regular method, and the election affects depreciation recapture on a later sale.",
    ),
    (
        &["depreciat"],
        "depreciation method choice",
        "Straight-line is not the only option: accelerated methods and bonus depreciation or expensing elections can materially change the first-year result.",
    ),
    (
        &["sold stock", "sold shares", "sell stock", "repurchase", "buy back the stock"],
        "wash-sale rule",
        "Selling at a loss and repurchasing a substantially identical security within 30 days defers the loss under the wash-sale rule.",
    ),
    (
        &["foreign account", "foreign bank", "overseas account", "offshore account"],
        "FBAR/FATCA reporting",
        "Foreign accounts can trigger FBAR and FATCA reporting once aggregate balances cross the filing thresholds, separate from any tax owed.",
    ),
    (
        &["1031", "like-kind", "exchange property"],
        "1031 exchange timing",
        "A like-kind exchange must identify replacement property within 45 days and close within 180 days; missing either window makes the gain taxable.",
    ),
];

/// Scan for expert nuances worth surfacing alongside the answer.
pub fn detect_nuances(query: &str) -> Vec<Nuance> {
    let lower = query.to_lowercase();
    NUANCE_TRIGGERS
        .iter()
        .filter(|(terms, _, _)| terms.iter().any(|t| lower.contains(t)))
        .map(|(_, topic, note)| Nuance {
            topic: (*topic).to_string(),
            note: (*note).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsage_classifier::QueryClassifier;

    fn classify(query: &str) -> QueryClassification {
        QueryClassifier::new().classify(query, None)
    }

    fn missing_for(query: &str) -> Vec<MissingContextItem> {
        let classification = classify(query);
        let context = crate::context::extract_conversation_context(&[], query);
        detect_missing_context(&classification, &context, query)
    }

    #[test]
    fn tax_query_without_jurisdiction_is_critical() {
        let items = missing_for("What is the corporate tax rate?");
        let jurisdiction = items.iter().find(|i| i.category == "jurisdiction").unwrap();
        assert_eq!(jurisdiction.importance, Importance::Critical);
    }

    #[test]
    fn tax_query_with_jurisdiction_does_not_flag_it() {
        let items = missing_for("What is the corporate tax rate in the United States for 2024?");
        assert!(items.iter().all(|i| i.category != "jurisdiction"));
    }

    #[test]
    fn tax_query_without_year_is_high() {
        let items = missing_for("How are US capital gains taxed?");
        let year = items.iter().find(|i| i.category == "tax_year").unwrap();
        assert_eq!(year.importance, Importance::High);
    }

    #[test]
    fn personal_tax_without_filing_status_is_high() {
        let items = missing_for("How much federal income tax will I personally owe for 2024?");
        let status = items.iter().find(|i| i.category == "filing_status");
        assert!(status.is_some_and(|i| i.importance == Importance::High));
    }

    #[test]
    fn business_query_without_entity_type_is_critical() {
        let items = missing_for("Can my business deduct travel meals in the US for 2024?");
        let entity = items.iter().find(|i| i.category == "entity_type").unwrap();
        assert_eq!(entity.importance, Importance::Critical);
    }

    #[test]
    fn reporting_query_without_method_is_high() {
        let items = missing_for("When should we recognize this revenue in the income statement?");
        let method = items.iter().find(|i| i.category == "accounting_method").unwrap();
        assert_eq!(method.importance, Importance::High);
    }

    #[test]
    fn categories_are_deduplicated() {
        // Both jurisdiction rules apply to a deduction query in the tax
        // domain, but only one jurisdiction item may survive.
        let items = missing_for("What deductions can I claim on my taxes?");
        let count = items.iter().filter(|i| i.category == "jurisdiction").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn vague_terms_are_detected_independently() {
        let ambiguities = detect_ambiguities("I recently made a significant donation");
        let terms: Vec<&str> = ambiguities.iter().map(|a| a.term.as_str()).collect();
        assert!(terms.contains(&"recently"));
        assert!(terms.contains(&"significant"));
    }

    #[test]
    fn unqualified_income_is_ambiguous() {
        let ambiguities = detect_ambiguities("how is income taxed");
        assert!(ambiguities.iter().any(|a| a.term == "income"));
    }

    #[test]
    fn qualified_income_is_not_ambiguous() {
        let ambiguities = detect_ambiguities("how is rental income taxed");
        assert!(ambiguities.iter().all(|a| a.term != "income"));
    }

    #[test]
    fn nuances_fire_on_expert_triggers() {
        let nuances = detect_nuances("Can I deduct my home office if I sold stock at a loss?");
        let topics: Vec<&str> = nuances.iter().map(|n| n.topic.as_str()).collect();
        assert!(topics.contains(&"home-office deduction"));
        assert!(topics.contains(&"wash-sale rule"));
    }

    #[test]
    fn no_nuances_on_plain_queries() {
        assert!(detect_nuances("what is a balance sheet").is_empty());
    }
}
