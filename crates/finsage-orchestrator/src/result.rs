// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and result types for the orchestration entry point.

use finsage_classifier::QueryClassification;
use finsage_clarify::ClarificationAnalysis;
use finsage_core::{Attachment, ChatMessage, SubscriptionTier};
use finsage_router::RoutingDecision;
use finsage_solvers::CalculationResults;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chat modes the transport layer can select.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Full pipeline including the clarification engine.
    #[default]
    Standard,
    /// Answer directly; skip the clarify-vs-answer analysis.
    Quick,
}

/// One orchestration request, assembled by the transport layer.
#[derive(Debug, Clone)]
pub struct OrchestratorRequest {
    pub query_text: String,
    pub conversation_history: Vec<ChatMessage>,
    pub subscription_tier: SubscriptionTier,
    pub attachment: Option<Attachment>,
    pub chat_mode: Option<ChatMode>,
}

impl OrchestratorRequest {
    /// A bare query with no history, on the free tier.
    pub fn from_query(query: impl Into<String>) -> Self {
        Self {
            query_text: query.into(),
            conversation_history: Vec::new(),
            subscription_tier: SubscriptionTier::Free,
            attachment: None,
            chat_mode: None,
        }
    }
}

/// UI-facing response categories, derived from the original query text plus
/// classification flags.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Document,
    Visualization,
    Export,
    Calculation,
    Research,
    Analysis,
    #[default]
    General,
}

/// Routing metadata for downstream rendering and audit logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub response_type: ResponseType,
    /// Whether the UI should render this in its dedicated output pane.
    pub show_in_output_pane: bool,
    /// Providers contacted for this request, in contact order.
    pub attempted_providers: Vec<String>,
    /// True when every candidate failed and a fixed degraded message was
    /// returned instead of a model answer.
    pub degraded: bool,
}

/// The complete outcome of one orchestrated query.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationResult {
    /// Final text shown to the user.
    pub response: String,
    /// Model that produced the answer; `None` for clarify-first and
    /// degraded outcomes.
    pub model_used: Option<String>,
    pub routing_decision: RoutingDecision,
    pub classification: QueryClassification,
    pub calculation_results: Option<CalculationResults>,
    pub metadata: ResponseMetadata,
    /// Absent in quick mode, where the clarification engine is skipped.
    pub clarification_analysis: Option<ClarificationAnalysis>,
    /// True when the engine asked for more information instead of answering.
    pub needs_clarification: bool,
    pub tokens_used: u32,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_type_serializes_lowercase() {
        let json = serde_json::to_string(&ResponseType::Visualization).unwrap();
        assert_eq!(json, "\"visualization\"");
    }

    #[test]
    fn default_request_uses_standard_pipeline() {
        let request = OrchestratorRequest::from_query("hello");
        assert_eq!(request.subscription_tier, SubscriptionTier::Free);
        assert!(request.chat_mode.is_none());
        assert!(request.attachment.is_none());
    }
}
