//! Prompt construction for the two request kinds.
//!
//! Both requests are single-shot: the deep dive only names the stage, and a
//! chat request carries the current question plus the stage title as context,
//! never earlier turns.

use uuid::Uuid;

use crate::domain::foundation::SessionId;
use crate::domain::stage::{Stage, StageCatalog};
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

const DEEP_DIVE_SYSTEM_PROMPT: &str = "You are a network security educator walking a developer \
through a TLS 1.3 style handshake. Explain the requested step in at most four short sentences \
of plain prose. Mention what is exchanged and what it protects against. No markdown, no lists.";

const CHAT_SYSTEM_PROMPT: &str = "You are a network security educator answering questions \
about a TLS 1.3 style handshake. Answer in at most five short sentences of plain prose. \
If the question is unrelated to secure connections, say so briefly.";

const DEEP_DIVE_MAX_TOKENS: u32 = 300;
const DEEP_DIVE_TEMPERATURE: f32 = 0.4;
const CHAT_MAX_TOKENS: u32 = 400;
const CHAT_TEMPERATURE: f32 = 0.6;

/// Builds the deep-dive request for `stage`, using its title as the topic.
pub fn deep_dive_request(session_id: SessionId, stage: Stage) -> CompletionRequest {
    let title = StageCatalog::standard().title(stage);

    CompletionRequest::new(metadata(session_id, RequestPurpose::Enrichment, stage))
        .with_system_prompt(DEEP_DIVE_SYSTEM_PROMPT)
        .with_message(
            MessageRole::User,
            format!("Give a deep dive on the \"{title}\" step of the handshake."),
        )
        .with_max_tokens(DEEP_DIVE_MAX_TOKENS)
        .with_temperature(DEEP_DIVE_TEMPERATURE)
}

/// Builds a chat request for `question` while `stage` is on screen.
pub fn chat_request(session_id: SessionId, stage: Stage, question: &str) -> CompletionRequest {
    let title = StageCatalog::standard().title(stage);

    CompletionRequest::new(metadata(session_id, RequestPurpose::Chat, stage))
        .with_system_prompt(format!(
            "{CHAT_SYSTEM_PROMPT} The viewer is currently looking at the \"{title}\" stage."
        ))
        .with_message(MessageRole::User, question)
        .with_max_tokens(CHAT_MAX_TOKENS)
        .with_temperature(CHAT_TEMPERATURE)
}

fn metadata(session_id: SessionId, purpose: RequestPurpose, stage: Stage) -> RequestMetadata {
    RequestMetadata::new(session_id, purpose, stage, Uuid::new_v4().to_string())
}
