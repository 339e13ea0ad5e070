//! ChatSession - free-form questions with at most one answer outstanding.
//!
//! A submitted question is appended to the transcript straight away and the
//! caller gets back the request future. Its outcome, an answer or a failed
//! apology turn, goes back in through [`ChatSession::resolve`]. Requests carry
//! only the question and the current stage title.
//!
//! The future always yields a turn. A provider that panics mid-request is
//! reported as a failed turn so the pending flag is always cleared.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, warn};

use super::prompts;
use crate::domain::chat::{ChatTranscript, ChatTurn, CHAT_APOLOGY};
use crate::domain::foundation::{SessionId, SERVICE_UNAVAILABLE_MESSAGE};
use crate::domain::stage::Stage;
use crate::ports::{AIError, AIProvider};

/// An outstanding chat request; resolves to the turn to append.
pub type ChatFuture = BoxFuture<'static, ChatTurn>;

/// Why a question was not submitted. The transcript is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatRejection {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("an answer is still pending")]
    AnswerPending,
}

/// Transcript plus the in-flight flag.
pub struct ChatSession {
    provider: Arc<dyn AIProvider>,
    session_id: SessionId,
    transcript: ChatTranscript,
    awaiting_answer: bool,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn AIProvider>, session_id: SessionId) -> Self {
        Self {
            provider,
            session_id,
            transcript: ChatTranscript::new(),
            awaiting_answer: false,
        }
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// True between a successful submit and its resolve.
    pub fn is_awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    /// Appends the question and returns the request that answers it.
    ///
    /// # Errors
    ///
    /// - `AnswerPending` if the previous question has not been answered yet
    /// - `EmptyQuestion` if `question` is blank
    pub fn submit(&mut self, question: &str, stage: Stage) -> Result<ChatFuture, ChatRejection> {
        if self.awaiting_answer {
            debug!("Question rejected: answer pending");
            return Err(ChatRejection::AnswerPending);
        }

        let turn = ChatTurn::asker(question).map_err(|_| ChatRejection::EmptyQuestion)?;
        let request = prompts::chat_request(self.session_id, stage, turn.text());

        self.transcript.append(turn);
        self.awaiting_answer = true;
        debug!(%stage, turns = self.transcript.len(), "Question submitted");

        let provider = Arc::clone(&self.provider);
        Ok(Box::pin(async move {
            let trace_id = request.metadata.trace_id.clone();
            let outcome = AssertUnwindSafe(provider.complete(request))
                .catch_unwind()
                .await;
            let Ok(outcome) = outcome else {
                warn!(%trace_id, "Chat request panicked");
                return ChatTurn::failed_responder(CHAT_APOLOGY);
            };

            match outcome {
                Ok(response) => ChatTurn::responder(&response.content).unwrap_or_else(|_| {
                    warn!(%trace_id, "Chat answer came back empty");
                    ChatTurn::failed_responder(CHAT_APOLOGY)
                }),
                Err(AIError::NotConfigured) => {
                    ChatTurn::failed_responder(SERVICE_UNAVAILABLE_MESSAGE)
                }
                Err(e) => {
                    warn!(%trace_id, error = %e, retryable = e.is_retryable(), "Chat request failed");
                    ChatTurn::failed_responder(CHAT_APOLOGY)
                }
            }
        }))
    }

    /// Appends the answer to the outstanding question.
    ///
    /// Returns false, leaving the transcript alone, if nothing was pending.
    pub fn resolve(&mut self, answer: ChatTurn) -> bool {
        if !self.awaiting_answer {
            warn!("Dropping chat answer with no question pending");
            return false;
        }

        self.transcript.append(answer);
        self.awaiting_answer = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, UnconfiguredProvider};
    use crate::domain::chat::TurnRole;
    use crate::ports::{
        CompletionRequest, CompletionResponse, MessageRole, ProviderInfo, RequestPurpose,
    };
    use async_trait::async_trait;

    struct PanickingProvider;

    #[async_trait]
    impl AIProvider for PanickingProvider {
        async fn complete(&self, _: CompletionRequest) -> Result<CompletionResponse, AIError> {
            panic!("provider blew up")
        }

        fn provider_info(&self) -> ProviderInfo {
            ProviderInfo::new("panicking", "none")
        }
    }

    fn session(provider: MockAIProvider) -> ChatSession {
        ChatSession::new(Arc::new(provider), SessionId::new())
    }

    #[tokio::test]
    async fn question_and_answer_are_appended_in_order() {
        let mut chat = session(MockAIProvider::new().with_response("Because of forward secrecy."));

        let request = chat.submit("  Why ephemeral keys?  ", Stage::KeyDerivation).unwrap();
        assert_eq!(chat.transcript().len(), 1);
        assert!(chat.is_awaiting_answer());

        assert!(chat.resolve(request.await));

        let turns = chat.transcript().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role(), TurnRole::Asker);
        assert_eq!(turns[0].text(), "Why ephemeral keys?");
        assert_eq!(turns[1].role(), TurnRole::Responder);
        assert_eq!(turns[1].text(), "Because of forward secrecy.");
        assert!(!turns[1].failed());
        assert!(!chat.is_awaiting_answer());
    }

    #[test]
    fn blank_question_is_rejected() {
        let mut chat = session(MockAIProvider::new());

        let err = chat.submit("   ", Stage::Idle).err();

        assert_eq!(err, Some(ChatRejection::EmptyQuestion));
        assert!(chat.transcript().is_empty());
        assert!(!chat.is_awaiting_answer());
    }

    #[test]
    fn second_question_rejected_while_pending() {
        let mut chat = session(MockAIProvider::new());

        let _pending = chat.submit("first", Stage::ClientHello).unwrap();
        let err = chat.submit("second", Stage::ClientHello).err();

        assert_eq!(err, Some(ChatRejection::AnswerPending));
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test]
    async fn failure_appends_failed_apology() {
        let mut chat = session(MockAIProvider::new().with_error(MockError::Network {
            message: "connection reset".to_string(),
        }));

        let request = chat.submit("What is a nonce?", Stage::ClientHello).unwrap();
        chat.resolve(request.await);

        let last = chat.transcript().last().unwrap();
        assert_eq!(last.role(), TurnRole::Responder);
        assert!(last.failed());
        assert_eq!(last.text(), CHAT_APOLOGY);
        assert!(!chat.is_awaiting_answer());
    }

    #[tokio::test]
    async fn missing_credential_appends_service_unavailable() {
        let mut chat = ChatSession::new(Arc::new(UnconfiguredProvider), SessionId::new());

        let request = chat.submit("Hello?", Stage::Idle).unwrap();
        chat.resolve(request.await);

        let last = chat.transcript().last().unwrap();
        assert!(last.failed());
        assert_eq!(last.text(), SERVICE_UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn request_carries_only_question_and_stage_context() {
        let provider = MockAIProvider::new();
        let mut chat = session(provider.clone());

        let first = chat.submit("first question", Stage::ClientHello).unwrap();
        chat.resolve(first.await);
        let second = chat.submit("second question", Stage::ServerFinished).unwrap();
        chat.resolve(second.await);

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        let last = &calls[1];
        assert_eq!(last.metadata.purpose, RequestPurpose::Chat);
        assert_eq!(last.messages.len(), 1);
        assert_eq!(last.messages[0].role, MessageRole::User);
        assert_eq!(last.messages[0].content, "second question");
        assert!(last.system_prompt.as_deref().unwrap().contains("Server Finished"));
    }

    #[tokio::test]
    async fn panicking_provider_yields_apology_and_frees_the_session() {
        let mut chat = ChatSession::new(Arc::new(PanickingProvider), SessionId::new());

        let request = chat.submit("Will this work?", Stage::ClientHello).unwrap();
        assert!(chat.resolve(request.await));

        let last = chat.transcript().last().unwrap();
        assert!(last.failed());
        assert_eq!(last.text(), CHAT_APOLOGY);
        assert!(!chat.is_awaiting_answer());
        assert!(chat.submit("Try again?", Stage::ClientHello).is_ok());
    }

    #[test]
    fn resolve_without_pending_question_is_ignored() {
        let mut chat = session(MockAIProvider::new());

        assert!(!chat.resolve(ChatTurn::failed_responder("stray")));
        assert!(chat.transcript().is_empty());
    }
}
