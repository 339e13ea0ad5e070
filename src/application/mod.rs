//! Application layer - Playback, enrichment and chat orchestration.
//!
//! The three session components are plain state machines that hand back
//! request futures instead of awaiting them. [`TourRuntime`] owns all three
//! and is the only place those futures are run and their results applied.

pub mod chat_session;
pub mod enrichment_orchestrator;
pub mod playback_controller;
pub mod prompts;
pub mod tour;

pub use chat_session::{ChatFuture, ChatRejection, ChatSession};
pub use enrichment_orchestrator::{EnrichmentFuture, EnrichmentOrchestrator};
pub use playback_controller::{PlaybackController, DEFAULT_INTERVAL};
pub use tour::{TourError, TourHandle, TourRuntime, TourSnapshot};
