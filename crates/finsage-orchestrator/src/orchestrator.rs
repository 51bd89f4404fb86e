// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The orchestration entry point.
//!
//! One request flows through: document enrichment, classification, routing,
//! solver dispatch, the clarify-vs-answer decision, the health-ordered
//! fallback chain, and response assembly. Classification, routing,
//! clarification, and solving are synchronous pure computations; the only
//! suspension points are the document extraction and provider calls.
//! Dropping the future returned by [`Orchestrator::handle`] cancels any
//! in-flight provider call before its outcome is recorded anywhere.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use finsage_clarify::{ClarificationEngine, RecommendedApproach};
use finsage_classifier::{DocumentHint, QueryClassifier};
use finsage_config::model::FinsageConfig;
use finsage_core::{ChatMessage, DocumentExtractor, ProviderAdapter, ProviderRequest};
use finsage_health::ProviderHealthMonitor;
use finsage_router::RoutingPolicy;
use finsage_solvers::run_solvers;
use tracing::{info, instrument, warn};

use crate::assemble::{assemble_answer, clarify_response, response_type, show_in_output_pane};
use crate::invoke::{degraded_message, invoke_chain};
use crate::result::{ChatMode, OrchestrationResult, OrchestratorRequest, ResponseMetadata};

/// System prompt prepended to every provider conversation.
const SYSTEM_PROMPT: &str = "You are a professional accounting, tax, and finance assistant. \
     Answer precisely, name the governing rules where relevant, and never invent figures. \
     If the user's facts are incomplete, say what your answer assumes.";

/// The decision-and-resilience engine.
///
/// Holds the per-process collaborators: the provider registry, the shared
/// health monitor, and an optional document extractor. Each call to
/// [`handle`] runs with private classification/routing/clarification state;
/// the health monitor is the only state shared across requests.
///
/// [`handle`]: Orchestrator::handle
pub struct Orchestrator {
    classifier: QueryClassifier,
    clarifier: ClarificationEngine,
    policy: RoutingPolicy,
    providers: HashMap<String, Arc<dyn ProviderAdapter>>,
    health: Arc<ProviderHealthMonitor>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
    per_call_timeout: Duration,
    temperature: f32,
    max_tokens: u32,
    max_clarifying_questions: usize,
}

impl Orchestrator {
    /// Build an orchestrator from configuration, with an empty provider
    /// registry and a fresh health monitor.
    pub fn new(config: &FinsageConfig) -> Self {
        Self {
            classifier: QueryClassifier::new(),
            clarifier: ClarificationEngine::new(),
            policy: RoutingPolicy::new(config.routing.clone()),
            providers: HashMap::new(),
            health: Arc::new(ProviderHealthMonitor::new(&config.health)),
            extractor: None,
            per_call_timeout: Duration::from_secs(config.invocation.request_timeout_secs),
            temperature: config.invocation.temperature,
            max_tokens: config.invocation.max_tokens,
            max_clarifying_questions: config.engine.max_clarifying_questions,
        }
    }

    /// Register a provider adapter under its own name.
    pub fn with_provider(mut self, provider: Arc<dyn ProviderAdapter>) -> Self {
        self.providers.insert(provider.name().to_string(), provider);
        self
    }

    /// Share an externally constructed health monitor.
    ///
    /// Tests pass isolated instances; a process embedding several engine
    /// instances can pass one shared monitor so they pool reliability data.
    pub fn with_health_monitor(mut self, health: Arc<ProviderHealthMonitor>) -> Self {
        self.health = health;
        self
    }

    /// Attach a document extractor for query enrichment.
    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// The health monitor backing this orchestrator, for diagnostics.
    pub fn health_monitor(&self) -> Arc<ProviderHealthMonitor> {
        Arc::clone(&self.health)
    }

    /// Run one query through the full pipeline.
    ///
    /// Never returns an error: a clarify decision, a solver-only result, and
    /// a fully exhausted provider chain are all legitimate terminal outcomes
    /// expressed in the [`OrchestrationResult`].
    #[instrument(skip_all, fields(tier = %request.subscription_tier))]
    pub async fn handle(&self, request: OrchestratorRequest) -> OrchestrationResult {
        let started = Instant::now();

        let enriched_query = self.enrich_query(&request).await;
        let hint = request.attachment.as_ref().map(|attachment| DocumentHint {
            has_document: true,
            document_type: attachment.document_type.clone(),
        });

        let classification = self.classifier.classify(&enriched_query, hint.as_ref());
        let routing = self
            .policy
            .route(&classification, request.subscription_tier);

        // Deterministic math runs even when the decision below is to ask
        // first; extracted parameters are never wasted.
        let calculation_results = run_solvers(&enriched_query);

        let chat_mode = request.chat_mode.unwrap_or_default();
        let clarification = (chat_mode == ChatMode::Standard).then(|| {
            self.clarifier.analyze(
                &request.query_text,
                &request.conversation_history,
                &classification,
            )
        });

        // Clarify-first short-circuits before any provider is contacted.
        if let Some(analysis) = clarification
            .as_ref()
            .filter(|analysis| analysis.recommended_approach == RecommendedApproach::Clarify)
        {
            #[cfg(feature = "metrics")]
            finsage_metrics::record_clarification();

            let response = clarify_response(analysis, self.max_clarifying_questions);
            let response_type = response_type(
                &request.query_text,
                &classification,
                calculation_results.is_some(),
            );
            info!(%response_type, "asking for clarification before answering");

            return OrchestrationResult {
                response,
                model_used: None,
                metadata: ResponseMetadata {
                    response_type,
                    show_in_output_pane: show_in_output_pane(response_type, &classification),
                    attempted_providers: Vec::new(),
                    degraded: false,
                },
                clarification_analysis: Some(analysis.clone()),
                needs_clarification: true,
                tokens_used: 0,
                processing_time_ms: started.elapsed().as_millis() as u64,
                routing_decision: routing,
                classification,
                calculation_results,
            };
        }

        let provider_request = ProviderRequest {
            model: routing.primary_model.clone(),
            messages: self.build_messages(&request.conversation_history, &enriched_query),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            attachment: request.attachment.clone(),
        };

        let outcome = invoke_chain(
            &self.providers,
            &self.health,
            &routing,
            &provider_request,
            self.per_call_timeout,
        )
        .await;

        let (response, model_used, tokens_used, degraded) = match outcome.response {
            Some(ref provider_response) => (
                assemble_answer(
                    &provider_response.content,
                    clarification.as_ref(),
                    self.max_clarifying_questions,
                ),
                Some(routing.primary_model.clone()),
                provider_response.usage.total(),
                false,
            ),
            None => {
                warn!(
                    attempts = outcome.attempted.len(),
                    "every candidate failed, returning degraded response"
                );
                (
                    degraded_message(outcome.last_error_kind).to_string(),
                    None,
                    0,
                    true,
                )
            }
        };

        let response_type = response_type(
            &request.query_text,
            &classification,
            calculation_results.is_some(),
        );

        #[cfg(feature = "metrics")]
        finsage_metrics::record_latency(started.elapsed().as_secs_f64());

        OrchestrationResult {
            response,
            model_used,
            metadata: ResponseMetadata {
                response_type,
                show_in_output_pane: show_in_output_pane(response_type, &classification),
                attempted_providers: outcome.attempted,
                degraded,
            },
            clarification_analysis: clarification,
            needs_clarification: false,
            tokens_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
            routing_decision: routing,
            classification,
            calculation_results,
        }
    }

    /// Merge extracted document text into the query ahead of classification
    /// and solving. A failed extraction degrades to answering from the query
    /// alone rather than failing the request.
    async fn enrich_query(&self, request: &OrchestratorRequest) -> String {
        let Some(attachment) = &request.attachment else {
            return request.query_text.clone();
        };
        let Some(extractor) = &self.extractor else {
            warn!(
                filename = %attachment.filename,
                "attachment supplied but no document extractor is configured"
            );
            return request.query_text.clone();
        };

        match extractor
            .extract(&attachment.data, &attachment.filename, &attachment.mime_type)
            .await
        {
            Ok(outcome) if outcome.success => match outcome.extracted_text {
                Some(text) if !text.is_empty() => {
                    info!(
                        filename = %attachment.filename,
                        chars = text.len(),
                        "document text merged into query"
                    );
                    format!(
                        "{}\n\nDocument content ({}):\n{}",
                        request.query_text, attachment.filename, text
                    )
                }
                _ => request.query_text.clone(),
            },
            Ok(outcome) => {
                warn!(
                    filename = %attachment.filename,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "document extraction failed, answering from the query alone"
                );
                request.query_text.clone()
            }
            Err(error) => {
                warn!(%error, "document extraction errored, answering from the query alone");
                request.query_text.clone()
            }
        }
    }

    fn build_messages(&self, history: &[ChatMessage], enriched_query: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(enriched_query));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsage_core::ChatRole;

    #[test]
    fn messages_carry_system_history_and_query() {
        let orchestrator = Orchestrator::new(&FinsageConfig::default());
        let history = vec![
            ChatMessage::user("we are an llc in the united states"),
            ChatMessage::assistant("noted"),
        ];
        let messages = orchestrator.build_messages(&history, "what changed for 2025?");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[3].content, "what changed for 2025?");
    }
}
