//! Tour runtime - the single writer behind a viewing session.
//!
//! One spawned task owns the [`PlaybackController`], the
//! [`EnrichmentOrchestrator`] and the [`ChatSession`]. It reacts to three
//! event sources in one `select!` loop:
//!
//! 1. viewer commands arriving from a [`TourHandle`]
//! 2. the auto-advance timer
//! 3. completed outbound requests
//!
//! Requests run as separate tasks in a `JoinSet`, so the loop never waits on
//! the network. After every event the loop publishes a fresh
//! [`TourSnapshot`] on a watch channel. Commands are published before they
//! are acknowledged, so a caller that awaited one sees its effect in
//! [`TourHandle::snapshot`].
//!
//! ## Shutdown
//!
//! [`TourHandle::shutdown`] stops the loop. Dropping the runtime drops the
//! timer and aborts every request still in flight. Dropping the last handle
//! has the same effect.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use super::chat_session::{ChatRejection, ChatSession};
use super::enrichment_orchestrator::EnrichmentOrchestrator;
use super::playback_controller::PlaybackController;
use crate::config::PlaybackConfig;
use crate::domain::chat::{ChatTranscript, ChatTurn};
use crate::domain::enrichment::{EnrichmentDisplay, EnrichmentResult};
use crate::domain::foundation::SessionId;
use crate::domain::playback::{PlaybackState, Transition};
use crate::domain::stage::{RenderState, StageCatalog, StageMetadata};
use crate::ports::AIProvider;

const COMMAND_BUFFER: usize = 32;

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct TourSnapshot {
    pub session_id: SessionId,
    pub playback: PlaybackState,
    pub render: RenderState,
    pub metadata: &'static StageMetadata,
    pub enrichment: EnrichmentDisplay,
    #[serde(skip)]
    pub transcript: ChatTranscript,
    /// True while a chat answer is outstanding.
    pub chat_pending: bool,
}

/// Errors returned by [`TourHandle`] operations.
#[derive(Debug, Error)]
pub enum TourError {
    /// The runtime has stopped and no longer accepts commands.
    #[error("tour session has shut down")]
    Closed,

    /// The question was not submitted.
    #[error("question not accepted: {0}")]
    Rejected(#[from] ChatRejection),

    /// The runtime task panicked or was aborted.
    #[error("tour runtime failed: {0}")]
    Runtime(#[from] JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Navigation {
    Advance,
    Retreat,
    Reset,
    TogglePlay,
}

#[derive(Debug)]
enum TourCommand {
    Navigate {
        action: Navigation,
        reply: oneshot::Sender<PlaybackState>,
    },
    Ask {
        question: String,
        reply: oneshot::Sender<Result<(), ChatRejection>>,
    },
}

enum Completion {
    Enrichment(EnrichmentResult),
    Chat(ChatTurn),
}

/// Client side of a running tour.
///
/// Navigation calls return once the runtime has applied them.
#[derive(Debug)]
pub struct TourHandle {
    commands: mpsc::Sender<TourCommand>,
    snapshots: watch::Receiver<TourSnapshot>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TourHandle {
    pub async fn advance(&self) -> Result<PlaybackState, TourError> {
        self.navigate(Navigation::Advance).await
    }

    pub async fn retreat(&self) -> Result<PlaybackState, TourError> {
        self.navigate(Navigation::Retreat).await
    }

    pub async fn reset(&self) -> Result<PlaybackState, TourError> {
        self.navigate(Navigation::Reset).await
    }

    pub async fn toggle_play(&self) -> Result<PlaybackState, TourError> {
        self.navigate(Navigation::TogglePlay).await
    }

    /// Submits a question about the stage currently on screen.
    ///
    /// # Errors
    ///
    /// - `Rejected` if the question is blank or an answer is still pending
    /// - `Closed` if the runtime has stopped
    pub async fn ask(&self, question: impl Into<String>) -> Result<(), TourError> {
        let (reply, response) = oneshot::channel();
        self.send(TourCommand::Ask {
            question: question.into(),
            reply,
        })
        .await?;
        response.await.map_err(|_| TourError::Closed)??;
        Ok(())
    }

    /// A receiver that sees every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<TourSnapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> TourSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stops the runtime and waits for it to finish.
    pub async fn shutdown(self) -> Result<(), TourError> {
        // The runtime may already be gone; joining below reports how it ended
        let _ = self.shutdown.send(true);
        self.task.await?;
        Ok(())
    }

    async fn navigate(&self, action: Navigation) -> Result<PlaybackState, TourError> {
        let (reply, response) = oneshot::channel();
        self.send(TourCommand::Navigate { action, reply }).await?;
        response.await.map_err(|_| TourError::Closed)
    }

    async fn send(&self, command: TourCommand) -> Result<(), TourError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| TourError::Closed)
    }
}

/// Server side of a tour: owns all mutable session state.
pub struct TourRuntime {
    session_id: SessionId,
    playback: PlaybackController,
    enrichment: EnrichmentOrchestrator,
    chat: ChatSession,
    in_flight: JoinSet<Completion>,
    snapshots: watch::Sender<TourSnapshot>,
}

impl TourRuntime {
    /// Spawns a runtime on the current tokio runtime and returns its handle.
    pub fn spawn(provider: Arc<dyn AIProvider>, config: &PlaybackConfig) -> TourHandle {
        let session_id = SessionId::new();
        let playback = PlaybackController::new(config.interval());
        let enrichment = EnrichmentOrchestrator::new(Arc::clone(&provider), session_id);
        let chat = ChatSession::new(provider, session_id);

        let initial = snapshot_of(session_id, &playback, &enrichment, &chat);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let runtime = Self {
            session_id,
            playback,
            enrichment,
            chat,
            in_flight: JoinSet::new(),
            snapshots: snapshot_tx,
        };
        let task = tokio::spawn(runtime.run(command_rx, shutdown_rx));

        TourHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<TourCommand>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            session_id = %self.session_id,
            interval_ms = self.playback.interval().as_millis() as u64,
            "Tour session started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                command = commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }

                _ = self.playback.next_tick() => {
                    let transition = self.playback.advance();
                    self.after_navigation(transition);
                    self.publish();
                }

                Some(joined) = self.in_flight.join_next() => {
                    self.handle_completion(joined);
                    self.publish();
                }
            }
        }

        info!(
            session_id = %self.session_id,
            abandoned_requests = self.in_flight.len(),
            "Tour session stopped"
        );
    }

    /// Applies a command, publishes the result, then replies.
    fn handle_command(&mut self, command: TourCommand) {
        match command {
            TourCommand::Navigate { action, reply } => {
                let transition = match action {
                    Navigation::Advance => self.playback.advance(),
                    Navigation::Retreat => self.playback.retreat(),
                    Navigation::Reset => self.playback.reset(),
                    Navigation::TogglePlay => self.playback.toggle_play(),
                };
                self.after_navigation(transition);
                self.publish();
                let _ = reply.send(self.playback.state());
            }
            TourCommand::Ask { question, reply } => {
                let outcome = self
                    .chat
                    .submit(&question, self.playback.stage())
                    .map(|request| {
                        self.in_flight.spawn(async move { Completion::Chat(request.await) });
                    });
                self.publish();
                let _ = reply.send(outcome);
            }
        }
    }

    fn after_navigation(&mut self, transition: Transition) {
        if transition.started_playing() {
            info!(stage = %transition.to, "Auto-advance started");
        } else if transition.stopped_playing() {
            info!(stage = %transition.to, "Auto-advance stopped");
        }

        if !transition.stage_changed() {
            return;
        }

        debug!(from = %transition.from, to = %transition.to, "Stage changed");
        if let Some(request) = self.enrichment.on_stage_entered(transition.to) {
            self.in_flight
                .spawn(async move { Completion::Enrichment(request.await) });
        }
    }

    fn handle_completion(&mut self, joined: Result<Completion, JoinError>) {
        match joined {
            Ok(Completion::Enrichment(result)) => {
                self.enrichment.apply(result);
            }
            Ok(Completion::Chat(answer)) => {
                self.chat.resolve(answer);
            }
            Err(e) => warn!(error = %e, "Outbound request task failed"),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(snapshot_of(
            self.session_id,
            &self.playback,
            &self.enrichment,
            &self.chat,
        ));
    }
}

fn snapshot_of(
    session_id: SessionId,
    playback: &PlaybackController,
    enrichment: &EnrichmentOrchestrator,
    chat: &ChatSession,
) -> TourSnapshot {
    let stage = playback.stage();
    TourSnapshot {
        session_id,
        playback: playback.state(),
        render: RenderState::for_stage(stage),
        metadata: StageCatalog::standard().get(stage),
        enrichment: enrichment.display().clone(),
        transcript: chat.transcript().clone(),
        chat_pending: chat.is_awaiting_answer(),
    }
}
