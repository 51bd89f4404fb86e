// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete orchestration pipeline.
//!
//! Each test builds an isolated orchestrator with mock providers and its own
//! health monitor. Tests are independent and order-insensitive; nothing
//! touches the network.

use std::sync::Arc;
use std::time::Duration;

use finsage_core::{Attachment, ProviderErrorKind, SubscriptionTier};
use finsage_config::model::FinsageConfig;
use finsage_orchestrator::{ChatMode, Orchestrator, OrchestratorRequest, ResponseType};
use finsage_test_utils::{MockExtractor, MockProvider};

/// The standard four-provider registry used by most tests.
struct Providers {
    anthropic: Arc<MockProvider>,
    openai: Arc<MockProvider>,
    google: Arc<MockProvider>,
    mistral: Arc<MockProvider>,
}

impl Providers {
    fn succeeding() -> Self {
        Self {
            anthropic: Arc::new(MockProvider::named("anthropic")),
            openai: Arc::new(MockProvider::named("openai")),
            google: Arc::new(MockProvider::named("google")),
            mistral: Arc::new(MockProvider::named("mistral")),
        }
    }

    fn all_failing(kind: ProviderErrorKind) -> Self {
        Self {
            anthropic: Arc::new(MockProvider::named("anthropic").always_failing(kind)),
            openai: Arc::new(MockProvider::named("openai").always_failing(kind)),
            google: Arc::new(MockProvider::named("google").always_failing(kind)),
            mistral: Arc::new(MockProvider::named("mistral").always_failing(kind)),
        }
    }

    fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(&FinsageConfig::default())
            .with_provider(self.anthropic.clone())
            .with_provider(self.openai.clone())
            .with_provider(self.google.clone())
            .with_provider(self.mistral.clone())
    }

    fn total_calls(&self) -> usize {
        self.anthropic.call_count()
            + self.openai.call_count()
            + self.google.call_count()
            + self.mistral.call_count()
    }
}

fn request(query: &str) -> OrchestratorRequest {
    OrchestratorRequest::from_query(query)
}

// ---- Clarify-first short-circuit ----

#[tokio::test]
async fn missing_jurisdiction_clarifies_without_contacting_providers() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();

    let result = orchestrator
        .handle(request("What is the corporate tax rate?"))
        .await;

    assert!(result.needs_clarification);
    assert!(result.model_used.is_none());
    assert_eq!(result.tokens_used, 0);
    assert!(
        result.response.to_lowercase().contains("jurisdiction")
            || result.response.to_lowercase().contains("country"),
        "expected a jurisdiction question, got: {}",
        result.response
    );
    // The chain was never walked.
    assert_eq!(providers.total_calls(), 0);
    assert!(result.metadata.attempted_providers.is_empty());
}

#[tokio::test]
async fn clarification_carries_the_full_analysis() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();

    let result = orchestrator
        .handle(request("What is the corporate tax rate?"))
        .await;

    let analysis = result.clarification_analysis.expect("analysis present");
    assert!(analysis.needs_clarification);
    assert!(analysis
        .missing_context
        .iter()
        .any(|item| item.category == "jurisdiction"));
}

#[tokio::test]
async fn quick_mode_skips_the_clarification_engine() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();

    let mut req = request("What is the corporate tax rate?");
    req.chat_mode = Some(ChatMode::Quick);
    let result = orchestrator.handle(req).await;

    assert!(!result.needs_clarification);
    assert!(result.clarification_analysis.is_none());
    assert!(result.model_used.is_some());
    assert_eq!(providers.total_calls(), 1);
}

// ---- Solver dispatch ----

#[tokio::test]
async fn depreciation_query_populates_calculation_results() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();

    let result = orchestrator
        .handle(request(
            "Calculate depreciation for a $120,000 asset over 10 years",
        ))
        .await;

    let calc = result.calculation_results.expect("solver fired");
    let dep = calc.depreciation.expect("depreciation result");
    assert!((dep.cost - 120_000.0).abs() < 1e-9);
    assert_eq!(dep.useful_life_years, 10);
    assert!((dep.annual_expense - 12_000.0).abs() < 1e-9);
    assert_eq!(result.metadata.response_type, ResponseType::Calculation);
    assert!(result.metadata.show_in_output_pane);
}

#[tokio::test]
async fn non_numeric_query_yields_no_calculation_results() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();

    let result = orchestrator.handle(request("explain accrual accounting")).await;
    assert!(result.calculation_results.is_none());
}

#[tokio::test]
async fn document_text_is_merged_ahead_of_solving() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator().with_extractor(Arc::new(
        MockExtractor::yielding("Asset ledger entry: machine press purchased for $50,000, depreciate over 5 years."),
    ));

    let mut req = request("Book the depreciation from the attached ledger in the United States for 2024 on accrual accounting for our llc");
    req.attachment = Some(Attachment {
        data: b"%PDF".to_vec(),
        filename: "ledger.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        document_type: Some("ledger".to_string()),
    });
    let result = orchestrator.handle(req).await;

    assert!(result.classification.requires_document_analysis);
    let calc = result.calculation_results.expect("solver fired from document text");
    let dep = calc.depreciation.expect("depreciation result");
    assert!((dep.annual_expense - 10_000.0).abs() < 1e-9);
}

#[tokio::test]
async fn failed_extraction_degrades_to_query_only() {
    let providers = Providers::succeeding();
    let orchestrator = providers
        .orchestrator()
        .with_extractor(Arc::new(MockExtractor::failing("unreadable scan")));

    let mut req = request("explain accrual accounting");
    req.attachment = Some(Attachment {
        data: b"garbage".to_vec(),
        filename: "scan.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        document_type: None,
    });
    let result = orchestrator.handle(req).await;

    // The request still completes from the query alone.
    assert!(result.model_used.is_some());
    assert!(!result.metadata.degraded);
}

// ---- Answer path and assembly ----

#[tokio::test]
async fn fully_specified_query_answers_through_the_preferred_provider() {
    let providers = Providers::succeeding();
    providers
        .anthropic
        .push_outcome(finsage_test_utils::MockOutcome::Succeed(
            "Accrual accounting records revenue when earned.".to_string(),
        ))
        .await;
    let orchestrator = providers.orchestrator();

    let result = orchestrator.handle(request("explain accrual accounting")).await;

    assert_eq!(result.response, "Accrual accounting records revenue when earned.");
    assert!(!result.needs_clarification);
    assert!(result.model_used.is_some());
    assert!(result.tokens_used > 0);
    assert_eq!(result.metadata.attempted_providers, vec!["anthropic"]);
    assert_eq!(providers.total_calls(), 1);
}

#[tokio::test]
async fn partial_answer_appends_clarifying_questions() {
    let providers = Providers::succeeding();
    providers
        .anthropic
        .push_outcome(finsage_test_utils::MockOutcome::Succeed(
            "Capital gains are taxed by holding period.".to_string(),
        ))
        .await;
    let orchestrator = providers.orchestrator();

    // Jurisdiction is stated; the tax year is the one high-importance gap.
    let result = orchestrator
        .handle(request("How are capital gains taxed in the United States?"))
        .await;

    assert!(!result.needs_clarification);
    assert!(result
        .response
        .starts_with("Capital gains are taxed by holding period."));
    assert!(result.response.contains("could you also tell me"));
    assert!(result.response.contains("tax year"));
}

#[tokio::test]
async fn subscription_tier_gates_the_model() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();
    let query = "Analyze the transfer pricing implications and deferred tax treatment of our \
                 controlled foreign corporation restructuring across multiple years, filed in \
                 the United States for 2024 as a c corporation on accrual accounting.";

    let mut free = request(query);
    free.chat_mode = Some(ChatMode::Quick);
    let free_result = orchestrator.handle(free).await;

    let mut pro = request(query);
    pro.chat_mode = Some(ChatMode::Quick);
    pro.subscription_tier = SubscriptionTier::Professional;
    let pro_result = orchestrator.handle(pro).await;

    let free_model = free_result.model_used.expect("free answered");
    let pro_model = pro_result.model_used.expect("pro answered");
    assert!(free_model.contains("sonnet"), "free tier got {free_model}");
    assert!(pro_model.contains("opus"), "professional tier got {pro_model}");
}

// ---- Fallback chain ----

#[tokio::test]
async fn failed_preferred_provider_falls_back_in_order() {
    let providers = Providers::succeeding();
    let failing = Arc::new(
        MockProvider::named("anthropic").always_failing(ProviderErrorKind::Generic),
    );
    let orchestrator = Orchestrator::new(&FinsageConfig::default())
        .with_provider(failing.clone())
        .with_provider(providers.openai.clone())
        .with_provider(providers.google.clone())
        .with_provider(providers.mistral.clone());

    let result = orchestrator.handle(request("explain accrual accounting")).await;

    assert!(!result.metadata.degraded);
    assert_eq!(
        result.metadata.attempted_providers,
        vec!["anthropic", "openai"]
    );
    assert_eq!(failing.call_count(), 1);
    assert_eq!(providers.openai.call_count(), 1);
    // Later candidates were never contacted.
    assert_eq!(providers.google.call_count(), 0);
    assert_eq!(providers.mistral.call_count(), 0);
}

#[tokio::test]
async fn rate_limited_provider_is_skipped_within_its_cooldown() {
    let providers = Providers::succeeding();
    let rate_limited = Arc::new(
        MockProvider::named("anthropic").always_failing(ProviderErrorKind::RateLimit),
    );
    let orchestrator = Orchestrator::new(&FinsageConfig::default())
        .with_provider(rate_limited.clone())
        .with_provider(providers.openai.clone())
        .with_provider(providers.google.clone())
        .with_provider(providers.mistral.clone());

    // First request hits the rate limit and falls back.
    let first = orchestrator.handle(request("explain accrual accounting")).await;
    assert!(!first.metadata.degraded);
    assert_eq!(rate_limited.call_count(), 1);

    // Second request skips the cooled-down provider entirely and goes to the
    // next-highest-health candidate.
    let second = orchestrator.handle(request("explain accrual accounting")).await;
    assert!(!second.metadata.degraded);
    assert_eq!(rate_limited.call_count(), 1);
    assert_eq!(second.metadata.attempted_providers, vec!["openai"]);
    assert_eq!(providers.openai.call_count(), 2);
}

#[tokio::test]
async fn slow_provider_times_out_and_the_chain_continues() {
    let mut config = FinsageConfig::default();
    config.invocation.request_timeout_secs = 1;

    let slow = Arc::new(
        MockProvider::named("anthropic").with_delay(Duration::from_secs(5)),
    );
    let fast = Arc::new(MockProvider::named("openai").succeeding_with("fast answer"));
    let orchestrator = Orchestrator::new(&config)
        .with_provider(slow.clone())
        .with_provider(fast.clone());

    let started = std::time::Instant::now();
    let result = orchestrator.handle(request("explain accrual accounting")).await;

    assert_eq!(result.response, "fast answer");
    assert!(!result.metadata.degraded);
    assert_eq!(
        result.metadata.attempted_providers,
        vec!["anthropic", "openai"]
    );
    // The slow call was abandoned at the deadline, not awaited to completion.
    assert!(started.elapsed() < Duration::from_secs(4));
}

// ---- Chain exhaustion ----

#[tokio::test]
async fn exhausted_chain_returns_the_degraded_template_without_panicking() {
    let providers = Providers::all_failing(ProviderErrorKind::Generic);
    let orchestrator = providers.orchestrator();

    let result = orchestrator.handle(request("explain accrual accounting")).await;

    assert!(result.metadata.degraded);
    assert!(result.model_used.is_none());
    assert_eq!(result.tokens_used, 0);
    assert!(result.response.contains("try again"));
    // Exactly one attempt per registered candidate, no retries.
    assert_eq!(providers.total_calls(), 4);
    assert_eq!(result.metadata.attempted_providers.len(), 4);
}

#[tokio::test]
async fn degraded_message_matches_the_final_error_kind() {
    let rate_limited = Providers::all_failing(ProviderErrorKind::RateLimit);
    let result = rate_limited
        .orchestrator()
        .handle(request("explain accrual accounting"))
        .await;
    assert!(result.response.contains("high demand"));

    let auth_broken = Providers::all_failing(ProviderErrorKind::Auth);
    let result = auth_broken
        .orchestrator()
        .handle(request("explain accrual accounting"))
        .await;
    assert!(result.response.contains("contact support"));
    // No provider names or credential detail leak into the user message.
    assert!(!result.response.contains("anthropic"));
}

#[tokio::test]
async fn exhaustion_still_reports_solver_results() {
    let providers = Providers::all_failing(ProviderErrorKind::Timeout);
    let orchestrator = providers.orchestrator();

    let mut req = request("Calculate depreciation for a $120,000 asset over 10 years");
    req.chat_mode = Some(ChatMode::Quick);
    let result = orchestrator.handle(req).await;

    assert!(result.metadata.degraded);
    assert!(result.response.contains("simplifying"));
    // Deterministic math survives a dead provider fleet.
    let calc = result.calculation_results.expect("solver fired");
    assert!(calc.depreciation.is_some());
}

// ---- Concurrency ----

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_share_health_state_safely() {
    let providers = Providers::succeeding();
    let orchestrator = Arc::new(providers.orchestrator());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let orchestrator = Arc::clone(&orchestrator);
        handles.push(tokio::spawn(async move {
            orchestrator
                .handle(request("explain accrual accounting"))
                .await
        }));
    }
    for handle in handles {
        let result = handle.await.expect("task completed");
        assert!(!result.metadata.degraded);
    }
    assert_eq!(providers.total_calls(), 16);
}

#[tokio::test]
async fn routing_metadata_is_bundled_for_audit() {
    let providers = Providers::succeeding();
    let orchestrator = providers.orchestrator();

    let result = orchestrator
        .handle(request("explain accrual accounting"))
        .await;

    assert_eq!(
        result.routing_decision.primary_model,
        result.model_used.clone().expect("answered")
    );
    assert!(!result.routing_decision.fallback_providers.is_empty());
    assert!(result.classification.confidence > 0.0);
    let json = serde_json::to_value(&result).expect("result serializes");
    assert!(json.get("routing_decision").is_some());
    assert!(json.get("classification").is_some());
}
