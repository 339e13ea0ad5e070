//! EnrichmentOrchestrator - per-stage deep dives with stale-result filtering.
//!
//! Every stage entry bumps a generation counter, switches the display to a
//! pending placeholder and hands back a single request future tagged with
//! that stage and generation. The caller runs the future wherever it likes;
//! when its result comes back through [`EnrichmentOrchestrator::apply`] it is
//! accepted only if nothing has been entered since. Earlier requests are never
//! cancelled, their results are simply dropped on arrival.
//!
//! Requests are not retried. Any failure resolves to a fixed fallback text.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use super::prompts;
use crate::domain::enrichment::{EnrichmentDisplay, EnrichmentResult, FALLBACK_MESSAGE};
use crate::domain::foundation::{SessionId, SERVICE_UNAVAILABLE_MESSAGE};
use crate::domain::stage::Stage;
use crate::ports::{AIError, AIProvider};

/// An outstanding deep-dive request.
pub type EnrichmentFuture = BoxFuture<'static, EnrichmentResult>;

/// Tracks which stage the enrichment panel belongs to.
pub struct EnrichmentOrchestrator {
    provider: Arc<dyn AIProvider>,
    session_id: SessionId,
    current: Stage,
    generation: u64,
    display: EnrichmentDisplay,
}

impl EnrichmentOrchestrator {
    /// Starts at the first stage showing the ready message.
    pub fn new(provider: Arc<dyn AIProvider>, session_id: SessionId) -> Self {
        Self {
            provider,
            session_id,
            current: Stage::first(),
            generation: 0,
            display: EnrichmentDisplay::ready(),
        }
    }

    pub fn current_stage(&self) -> Stage {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn display(&self) -> &EnrichmentDisplay {
        &self.display
    }

    /// Records entry into `stage` and returns the request to run for it.
    ///
    /// The first stage gets the static ready message and no request.
    pub fn on_stage_entered(&mut self, stage: Stage) -> Option<EnrichmentFuture> {
        self.generation += 1;
        self.current = stage;

        if stage == Stage::first() {
            self.display = EnrichmentDisplay::ready();
            return None;
        }

        self.display = EnrichmentDisplay::pending(stage);
        debug!(%stage, generation = self.generation, "Requesting deep dive");

        let provider = Arc::clone(&self.provider);
        let session_id = self.session_id;
        let generation = self.generation;
        Some(Box::pin(async move {
            fetch_deep_dive(provider, session_id, stage, generation).await
        }))
    }

    /// Applies a finished request, unless a newer stage entry superseded it.
    ///
    /// Returns whether the display changed.
    pub fn apply(&mut self, result: EnrichmentResult) -> bool {
        if result.for_stage != self.current || result.generation != self.generation {
            debug!(
                for_stage = %result.for_stage,
                generation = result.generation,
                current_stage = %self.current,
                current_generation = self.generation,
                "Discarding stale deep dive"
            );
            return false;
        }

        self.display = EnrichmentDisplay::from_result(result);
        true
    }
}

async fn fetch_deep_dive(
    provider: Arc<dyn AIProvider>,
    session_id: SessionId,
    stage: Stage,
    generation: u64,
) -> EnrichmentResult {
    let request = prompts::deep_dive_request(session_id, stage);
    let trace_id = request.metadata.trace_id.clone();

    match provider.complete(request).await {
        Ok(response) if !response.content.trim().is_empty() => {
            debug!(%stage, generation, %trace_id, tokens = response.usage.total_tokens, "Deep dive received");
            EnrichmentResult::loaded(stage, generation, response.content.trim())
        }
        Ok(_) => {
            warn!(%stage, %trace_id, "Deep dive came back empty");
            EnrichmentResult::fallback(stage, generation, FALLBACK_MESSAGE)
        }
        Err(AIError::NotConfigured) => {
            EnrichmentResult::fallback(stage, generation, SERVICE_UNAVAILABLE_MESSAGE)
        }
        Err(e) => {
            warn!(%stage, %trace_id, error = %e, retryable = e.is_retryable(), "Deep dive failed");
            EnrichmentResult::fallback(stage, generation, FALLBACK_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, UnconfiguredProvider};
    use crate::domain::enrichment::{EnrichmentStatus, PENDING_MESSAGE, READY_MESSAGE};
    use crate::ports::RequestPurpose;
    use std::time::Duration;

    fn orchestrator(provider: MockAIProvider) -> EnrichmentOrchestrator {
        EnrichmentOrchestrator::new(Arc::new(provider), SessionId::new())
    }

    #[test]
    fn idle_shows_ready_without_request() {
        let mut orchestrator = orchestrator(MockAIProvider::new());

        assert!(orchestrator.on_stage_entered(Stage::Idle).is_none());
        assert_eq!(orchestrator.display().text, READY_MESSAGE);
        assert_eq!(orchestrator.display().status, EnrichmentStatus::Ready);
    }

    #[tokio::test]
    async fn stage_entry_sets_pending_then_loads() {
        let provider = MockAIProvider::new().with_response("  Randoms and key shares.  ");
        let mut orchestrator = orchestrator(provider.clone());

        let request = orchestrator.on_stage_entered(Stage::ClientHello).unwrap();
        assert_eq!(orchestrator.display().text, PENDING_MESSAGE);
        assert!(orchestrator.display().is_pending());

        let result = request.await;
        assert!(orchestrator.apply(result));

        let display = orchestrator.display();
        assert_eq!(display.stage, Stage::ClientHello);
        assert_eq!(display.text, "Randoms and key shares.");
        assert_eq!(display.status, EnrichmentStatus::Loaded);

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].metadata.purpose, RequestPurpose::Enrichment);
        assert!(calls[0].messages[0].content.contains("Client Hello"));
    }

    #[tokio::test]
    async fn result_for_previous_stage_is_discarded() {
        let provider = MockAIProvider::new()
            .with_stage_response(Stage::ClientHello, "client hello text", Duration::ZERO)
            .with_stage_response(Stage::ServerHello, "server hello text", Duration::ZERO);
        let mut orchestrator = orchestrator(provider);

        let first = orchestrator.on_stage_entered(Stage::ClientHello).unwrap();
        let second = orchestrator.on_stage_entered(Stage::ServerHello).unwrap();

        let second = second.await;
        let first = first.await;

        assert!(orchestrator.apply(second));
        assert!(!orchestrator.apply(first));
        assert_eq!(orchestrator.display().text, "server hello text");
    }

    #[tokio::test]
    async fn result_from_earlier_visit_to_same_stage_is_discarded() {
        let provider = MockAIProvider::new()
            .with_response("first visit")
            .with_response("second visit");
        let mut orchestrator = orchestrator(provider);

        let first = orchestrator.on_stage_entered(Stage::ClientHello).unwrap();
        assert!(orchestrator.on_stage_entered(Stage::Idle).is_none());
        let second = orchestrator.on_stage_entered(Stage::ClientHello).unwrap();

        assert!(!orchestrator.apply(first.await));
        assert!(orchestrator.display().is_pending());
        assert!(orchestrator.apply(second.await));
        assert_eq!(orchestrator.display().text, "second visit");
    }

    #[tokio::test]
    async fn late_result_after_returning_to_idle_is_discarded() {
        let mut orchestrator = orchestrator(MockAIProvider::new().with_response("late"));

        let request = orchestrator.on_stage_entered(Stage::ServerHello).unwrap();
        orchestrator.on_stage_entered(Stage::Idle);

        assert!(!orchestrator.apply(request.await));
        assert_eq!(orchestrator.display().text, READY_MESSAGE);
    }

    #[tokio::test]
    async fn provider_error_yields_fallback() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "overloaded".to_string(),
        });
        let mut orchestrator = orchestrator(provider);

        let result = orchestrator.on_stage_entered(Stage::KeyDerivation).unwrap().await;

        assert!(result.is_fallback);
        assert!(orchestrator.apply(result));
        assert_eq!(orchestrator.display().text, FALLBACK_MESSAGE);
        assert_eq!(orchestrator.display().status, EnrichmentStatus::Fallback);
    }

    #[tokio::test]
    async fn blank_response_yields_fallback() {
        let mut orchestrator = orchestrator(MockAIProvider::new().with_response("   "));

        let result = orchestrator.on_stage_entered(Stage::ServerFinished).unwrap().await;

        assert!(result.is_fallback);
        assert_eq!(result.text, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn missing_credential_yields_service_unavailable() {
        let mut orchestrator =
            EnrichmentOrchestrator::new(Arc::new(UnconfiguredProvider), SessionId::new());

        let result = orchestrator.on_stage_entered(Stage::SecureTunnel).unwrap().await;

        assert!(orchestrator.apply(result));
        assert_eq!(orchestrator.display().text, SERVICE_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn generation_increases_on_every_entry() {
        let mut orchestrator = orchestrator(MockAIProvider::new());

        orchestrator.on_stage_entered(Stage::ClientHello);
        orchestrator.on_stage_entered(Stage::Idle);
        orchestrator.on_stage_entered(Stage::ClientHello);

        assert_eq!(orchestrator.generation(), 3);
        assert_eq!(orchestrator.current_stage(), Stage::ClientHello);
    }
}
