// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static routing policy.
//!
//! A pure function of (classification, subscription tier) to a routing
//! decision. The policy is an ordered rule table scanned first-match-wins;
//! no I/O, no mutation, so every rule is independently testable.

use finsage_classifier::{Complexity, Domain, QueryClassification};
use finsage_config::model::RoutingConfig;
use finsage_core::SubscriptionTier;
use finsage_solvers::SolverKind;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

/// Fixed provider preference order. Fallback chains are derived from this
/// list, so the ordering is stable across requests.
pub const PROVIDER_PREFERENCE: &[&str] = &["anthropic", "openai", "google", "mistral"];

/// Providers appended to every candidate chain regardless of routing
/// output or current health. Liveness over quality: a degraded baseline
/// attempt beats refusing to answer.
pub const BASELINE_PROVIDERS: &[&str] = &["anthropic", "openai"];

/// Model capability tiers; concrete model ids come from [`RoutingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Light,
    Standard,
    Advanced,
}

impl Capability {
    fn model(self, config: &RoutingConfig) -> String {
        match self {
            Capability::Light => config.light_model.clone(),
            Capability::Standard => config.standard_model.clone(),
            Capability::Advanced => config.advanced_model.clone(),
        }
    }
}

/// The chosen model and provider fallback chain for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub primary_model: String,
    pub preferred_provider: String,
    /// Remaining providers in fixed preference order; deduplicated and
    /// never contains the preferred provider.
    pub fallback_providers: Vec<String>,
    pub solvers_needed: Vec<SolverKind>,
    pub reasoning: String,
    pub confidence: f64,
}

/// One row of the routing policy table. `domain: None` matches any domain.
struct PolicyRule {
    domain: Option<Domain>,
    min_complexity: Complexity,
    min_tier: SubscriptionTier,
    capability: Capability,
    provider: &'static str,
    reasoning: &'static str,
}

/// Ordered policy table, most specific rules first. The final row is a
/// catch-all so routing always succeeds.
const POLICY_TABLE: &[PolicyRule] = &[
    PolicyRule {
        domain: None,
        min_complexity: Complexity::Advanced,
        min_tier: SubscriptionTier::Professional,
        capability: Capability::Advanced,
        provider: "anthropic",
        reasoning: "advanced query on a paid tier routed to the advanced model",
    },
    PolicyRule {
        domain: None,
        min_complexity: Complexity::Advanced,
        min_tier: SubscriptionTier::Free,
        capability: Capability::Standard,
        provider: "anthropic",
        reasoning: "advanced query capped at the standard model on the free tier",
    },
    PolicyRule {
        domain: Some(Domain::Compliance),
        min_complexity: Complexity::Basic,
        min_tier: SubscriptionTier::Free,
        capability: Capability::Standard,
        provider: "anthropic",
        reasoning: "compliance queries always get at least the standard model",
    },
    PolicyRule {
        domain: Some(Domain::Reporting),
        min_complexity: Complexity::Intermediate,
        min_tier: SubscriptionTier::Free,
        capability: Capability::Standard,
        provider: "openai",
        reasoning: "reporting query routed to the standard model",
    },
    PolicyRule {
        domain: None,
        min_complexity: Complexity::Intermediate,
        min_tier: SubscriptionTier::Free,
        capability: Capability::Standard,
        provider: "anthropic",
        reasoning: "intermediate query routed to the standard model",
    },
    PolicyRule {
        domain: None,
        min_complexity: Complexity::Basic,
        min_tier: SubscriptionTier::Free,
        capability: Capability::Light,
        provider: "anthropic",
        reasoning: "basic query routed to the light model",
    },
];

/// Solver sets the policy predicts per domain. Dispatch still attempts its
/// full trigger set; this prediction is recorded for audit.
const SOLVER_TABLE: &[(Domain, &[SolverKind])] = &[
    (
        Domain::Tax,
        &[
            SolverKind::CorporateTax,
            SolverKind::Depreciation,
            SolverKind::Amortization,
        ],
    ),
    (
        Domain::Reporting,
        &[
            SolverKind::Npv,
            SolverKind::Irr,
            SolverKind::Depreciation,
            SolverKind::Amortization,
        ],
    ),
    (Domain::Audit, &[]),
    (Domain::Compliance, &[SolverKind::CorporateTax]),
    (
        Domain::General,
        &[
            SolverKind::CorporateTax,
            SolverKind::Npv,
            SolverKind::Irr,
            SolverKind::Depreciation,
            SolverKind::Amortization,
        ],
    ),
];

/// The routing policy engine. Holds only configuration; routing itself is
/// a pure function.
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    config: RoutingConfig,
}

impl RoutingPolicy {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Derive a routing decision from a classification and subscription tier.
    pub fn route(
        &self,
        classification: &QueryClassification,
        tier: SubscriptionTier,
    ) -> RoutingDecision {
        // Live-data queries go to the provider with retrieval grounding,
        // ahead of the static table.
        let (capability, provider, reasoning) = if classification.requires_real_time_data {
            (
                capability_for(classification.complexity).max(Capability::Standard),
                "google",
                "live-data query routed to the retrieval-grounded provider",
            )
        } else {
            let rule = POLICY_TABLE
                .iter()
                .find(|rule| rule.matches(classification.domain, classification.complexity, tier))
                .unwrap_or(&POLICY_TABLE[POLICY_TABLE.len() - 1]);
            (rule.capability, rule.provider, rule.reasoning)
        };

        // Deep-reasoning work never drops below the standard model.
        let capability = if classification.requires_deep_reasoning {
            capability.max(Capability::Standard)
        } else {
            capability
        };

        // The free tier never reaches the advanced model, whatever the path.
        let capability = if tier == SubscriptionTier::Free {
            capability.min(Capability::Standard)
        } else {
            capability
        };

        let fallback_providers: Vec<String> = PROVIDER_PREFERENCE
            .iter()
            .filter(|p| **p != provider)
            .map(|p| (*p).to_string())
            .collect();

        let solvers_needed = SOLVER_TABLE
            .iter()
            .find(|(domain, _)| *domain == classification.domain)
            .map(|(_, solvers)| solvers.to_vec())
            .unwrap_or_default();

        let decision = RoutingDecision {
            primary_model: capability.model(&self.config),
            preferred_provider: provider.to_string(),
            fallback_providers,
            solvers_needed,
            reasoning: reasoning.to_string(),
            confidence: classification.confidence,
        };

        debug!(
            model = %decision.primary_model,
            provider = %decision.preferred_provider,
            tier = %tier,
            "routing decision"
        );

        decision
    }
}

impl PolicyRule {
    fn matches(&self, domain: Domain, complexity: Complexity, tier: SubscriptionTier) -> bool {
        self.domain.is_none_or(|d| d == domain)
            && complexity >= self.min_complexity
            && tier >= self.min_tier
    }
}

/// Capability tier a complexity level maps to before tier gating.
fn capability_for(complexity: Complexity) -> Capability {
    match complexity {
        Complexity::Basic => Capability::Light,
        Complexity::Intermediate => Capability::Standard,
        Complexity::Advanced | Complexity::Expert => Capability::Advanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsage_classifier::QueryClassifier;

    fn policy() -> RoutingPolicy {
        RoutingPolicy::new(RoutingConfig::default())
    }

    fn classification_for(query: &str) -> QueryClassification {
        QueryClassifier::new().classify(query, None)
    }

    #[test]
    fn basic_query_routes_to_light_model() {
        let c = classification_for("what is a refund");
        let d = policy().route(&c, SubscriptionTier::Free);
        assert!(d.primary_model.contains("haiku"));
    }

    #[test]
    fn advanced_query_on_professional_gets_advanced_model() {
        let c = classification_for(
            "Analyze the transfer pricing implications and deferred tax treatment of our \
             controlled foreign corporation restructuring across multiple years.",
        );
        let d = policy().route(&c, SubscriptionTier::Professional);
        assert!(d.primary_model.contains("opus"));
    }

    #[test]
    fn free_tier_is_capped_below_advanced_model() {
        let c = classification_for(
            "Analyze the transfer pricing implications and deferred tax treatment of our \
             controlled foreign corporation restructuring across multiple years.",
        );
        let d = policy().route(&c, SubscriptionTier::Free);
        assert!(d.primary_model.contains("sonnet"));
        assert!(d.reasoning.contains("free tier"));
    }

    #[test]
    fn fallbacks_follow_preference_order_without_preferred() {
        let c = classification_for("capital gains tax on my shares this year please");
        let d = policy().route(&c, SubscriptionTier::Professional);
        assert!(!d.fallback_providers.contains(&d.preferred_provider));
        let mut deduped = d.fallback_providers.clone();
        deduped.dedup();
        assert_eq!(deduped, d.fallback_providers);
        // Preference order is preserved.
        let expected: Vec<String> = PROVIDER_PREFERENCE
            .iter()
            .filter(|p| **p != d.preferred_provider)
            .map(|p| p.to_string())
            .collect();
        assert_eq!(d.fallback_providers, expected);
    }

    #[test]
    fn real_time_queries_prefer_the_grounded_provider() {
        let c = classification_for("what is the exchange rate for this invoice today");
        let d = policy().route(&c, SubscriptionTier::Professional);
        assert_eq!(d.preferred_provider, "google");
    }

    #[test]
    fn tax_domain_predicts_tax_solvers() {
        let c = classification_for("corporate tax deduction question");
        let d = policy().route(&c, SubscriptionTier::Free);
        assert!(d.solvers_needed.contains(&SolverKind::CorporateTax));
    }

    #[test]
    fn routing_is_pure_and_deterministic() {
        let c = classification_for("How do I depreciate a $10,000 asset over 5 years?");
        let p = policy();
        let d1 = p.route(&c, SubscriptionTier::Enterprise);
        let d2 = p.route(&c, SubscriptionTier::Enterprise);
        assert_eq!(d1, d2);
    }

    #[test]
    fn baseline_providers_are_a_subset_of_the_preference_list() {
        for baseline in BASELINE_PROVIDERS {
            assert!(PROVIDER_PREFERENCE.contains(baseline));
        }
    }
}
