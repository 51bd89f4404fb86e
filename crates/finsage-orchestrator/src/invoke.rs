// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The health-ordered fallback chain.
//!
//! Candidates are contacted strictly one at a time, in sorted order; at most
//! one call succeeds per query and total external calls are bounded by the
//! chain length. Every attempt records exactly one success or failure into
//! the health monitor. Cancellation is dropping the future: recording only
//! happens after an awaited call returns, so a dropped in-flight call
//! records nothing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use finsage_core::{ProviderAdapter, ProviderErrorKind, ProviderRequest, ProviderResponse};
use finsage_health::ProviderHealthMonitor;
use finsage_router::{RoutingDecision, BASELINE_PROVIDERS};
use tracing::{debug, info, warn};

/// Outcome of walking the fallback chain.
pub(crate) struct InvocationOutcome {
    /// The winning response, if any candidate succeeded.
    pub response: Option<ProviderResponse>,
    /// Provider that produced the winning response.
    pub provider: Option<String>,
    /// Providers contacted, in order.
    pub attempted: Vec<String>,
    /// Kind of the final failure when the chain was exhausted.
    pub last_error_kind: Option<ProviderErrorKind>,
}

/// Build the candidate chain for a routing decision.
///
/// Preferred provider first, then the decision's fallbacks, then the
/// baseline providers, deduplicated in that order. Only providers present
/// in the registry survive. The baselines are appended even when unhealthy:
/// attempting a degraded provider beats refusing outright.
pub(crate) fn candidate_chain(
    routing: &RoutingDecision,
    registry: &HashMap<String, Arc<dyn ProviderAdapter>>,
) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if registry.contains_key(name) && !chain.iter().any(|existing| existing == name) {
            chain.push(name.to_string());
        }
    };

    push(&routing.preferred_provider);
    for fallback in &routing.fallback_providers {
        push(fallback);
    }
    for baseline in BASELINE_PROVIDERS {
        push(baseline);
    }

    chain
}

/// Order candidates for contact: drop providers in cooldown (unless that
/// would empty the chain), then stable-sort by health score descending.
pub(crate) fn order_candidates(
    chain: Vec<String>,
    health: &ProviderHealthMonitor,
    now: Instant,
) -> Vec<String> {
    let mut candidates: Vec<String> = chain
        .iter()
        .filter(|name| !health.in_cooldown_at(name, now))
        .cloned()
        .collect();

    // Prefer attempting over failing outright.
    if candidates.is_empty() {
        candidates = chain;
    }

    // Stable sort keeps the preference order on equal scores.
    candidates.sort_by(|a, b| {
        health
            .health_score(b)
            .partial_cmp(&health.health_score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    candidates
}

/// Walk the chain sequentially until one provider succeeds or all fail.
pub(crate) async fn invoke_chain(
    registry: &HashMap<String, Arc<dyn ProviderAdapter>>,
    health: &ProviderHealthMonitor,
    routing: &RoutingDecision,
    request: &ProviderRequest,
    per_call_timeout: Duration,
) -> InvocationOutcome {
    let chain = candidate_chain(routing, registry);
    let candidates = order_candidates(chain, health, Instant::now());

    let mut attempted = Vec::new();
    let mut last_error_kind = None;

    for name in candidates {
        let Some(provider) = registry.get(&name) else {
            continue;
        };
        attempted.push(name.clone());

        #[cfg(feature = "metrics")]
        finsage_metrics::record_attempt(&name);

        debug!(provider = %name, model = %request.model, "contacting provider");
        let call = provider.complete(request.clone());

        match tokio::time::timeout(per_call_timeout, call).await {
            Ok(Ok(response)) => {
                health.record_success(&name);
                info!(provider = %name, tokens = response.usage.total(), "provider call succeeded");
                return InvocationOutcome {
                    response: Some(response),
                    provider: Some(name),
                    attempted,
                    last_error_kind: None,
                };
            }
            Ok(Err(error)) => {
                let kind = error.provider_kind().unwrap_or(ProviderErrorKind::Generic);
                health.record_failure(&name, kind);
                #[cfg(feature = "metrics")]
                finsage_metrics::record_failure(&name, &kind.to_string());
                warn!(provider = %name, %kind, error = %error, "provider call failed, continuing chain");
                last_error_kind = Some(kind);
            }
            Err(_elapsed) => {
                health.record_failure(&name, ProviderErrorKind::Timeout);
                #[cfg(feature = "metrics")]
                finsage_metrics::record_failure(&name, "timeout");
                warn!(provider = %name, timeout_secs = per_call_timeout.as_secs(), "provider call timed out, continuing chain");
                last_error_kind = Some(ProviderErrorKind::Timeout);
            }
        }
    }

    #[cfg(feature = "metrics")]
    finsage_metrics::record_chain_exhausted();

    InvocationOutcome {
        response: None,
        provider: None,
        attempted,
        last_error_kind,
    }
}

/// Fixed, user-safe message for a fully exhausted chain, selected by the
/// final failure's kind. Never leaks provider names or credentials.
pub(crate) fn degraded_message(kind: Option<ProviderErrorKind>) -> &'static str {
    match kind {
        Some(ProviderErrorKind::RateLimit) => {
            "Our analysis service is experiencing high demand right now. Please try again in a few minutes."
        }
        Some(ProviderErrorKind::Auth) => {
            "We could not reach our analysis service due to a configuration problem. Please contact support."
        }
        Some(ProviderErrorKind::Timeout) => {
            "The request took too long to process. Try simplifying your query or splitting it into smaller parts."
        }
        _ => "Something went wrong while preparing your answer. Please try again.",
    }
}
