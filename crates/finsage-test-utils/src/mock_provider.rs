// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with a scripted FIFO queue of
//! outcomes (success text or typed failure), enabling fast, CI-runnable
//! tests of the invocation loop without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use finsage_core::{
    FinsageError, ProviderAdapter, ProviderErrorKind, ProviderRequest, ProviderResponse,
    TokenUsage,
};

/// One scripted call outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text with nominal token usage.
    Succeed(String),
    /// Fail with the given classified kind.
    Fail(ProviderErrorKind),
}

/// A mock LLM provider that replays pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" success is returned. Every call is counted.
pub struct MockProvider {
    name: String,
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    permanent_failure: Option<ProviderErrorKind>,
}

impl MockProvider {
    /// Create a mock provider with the given registry name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
            delay: None,
            permanent_failure: None,
        }
    }

    /// Pre-load the outcome queue.
    pub fn with_outcomes(mut self, outcomes: Vec<MockOutcome>) -> Self {
        self.outcomes = Arc::new(Mutex::new(VecDeque::from(outcomes)));
        self
    }

    /// Always succeed with the given text.
    pub fn succeeding_with(self, text: impl Into<String>) -> Self {
        self.with_outcomes(vec![MockOutcome::Succeed(text.into())])
    }

    /// Fail every call with the given kind (the queue never drains).
    pub fn always_failing(mut self, kind: ProviderErrorKind) -> Self {
        self.permanent_failure = Some(kind);
        self
    }

    /// Sleep this long before answering, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add an outcome to the end of the queue.
    pub async fn push_outcome(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Number of `complete` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_outcome(&self) -> MockOutcome {
        if let Some(kind) = self.permanent_failure {
            return MockOutcome::Fail(kind);
        }
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Succeed("mock response".to_string()))
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, FinsageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_outcome().await {
            MockOutcome::Succeed(text) => Ok(ProviderResponse {
                content: text,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            MockOutcome::Fail(kind) => Err(FinsageError::provider(
                self.name.clone(),
                kind,
                "scripted failure",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            messages: vec![],
            temperature: 0.0,
            max_tokens: 64,
            attachment: None,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::named("mock");
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn outcomes_are_replayed_in_order() {
        let provider = MockProvider::named("mock").with_outcomes(vec![
            MockOutcome::Fail(ProviderErrorKind::Timeout),
            MockOutcome::Succeed("second".to_string()),
        ]);

        let err = provider.complete(request()).await.unwrap_err();
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Timeout));

        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "second");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn always_failing_never_drains() {
        let provider = MockProvider::named("mock").always_failing(ProviderErrorKind::RateLimit);
        for _ in 0..3 {
            let err = provider.complete(request()).await.unwrap_err();
            assert_eq!(err.provider_kind(), Some(ProviderErrorKind::RateLimit));
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn scripted_failure_names_the_provider() {
        let provider = MockProvider::named("flaky").always_failing(ProviderErrorKind::Auth);
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("flaky"));
    }
}
