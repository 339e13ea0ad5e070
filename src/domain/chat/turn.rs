//! A single question or answer in the chat transcript.
//!
//! Turns are immutable once created.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, TurnId, ValidationError};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The viewer asking a question.
    Asker,
    /// The text-generation service answering.
    Responder,
}

/// An immutable entry in the transcript.
///
/// # Invariants
///
/// - `text` is non-empty
/// - only responder turns may be marked `failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    id: TurnId,
    role: TurnRole,
    text: String,
    failed: bool,
    created_at: Timestamp,
}

impl ChatTurn {
    /// Creates a question turn. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the question is empty or whitespace-only
    pub fn asker(text: impl AsRef<str>) -> Result<Self, ValidationError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("question"));
        }
        Ok(Self::build(TurnRole::Asker, text.to_string(), false))
    }

    /// Creates a successful answer turn.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the answer is empty or whitespace-only
    pub fn responder(text: impl AsRef<str>) -> Result<Self, ValidationError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("answer"));
        }
        Ok(Self::build(TurnRole::Responder, text.to_string(), false))
    }

    /// Creates an answer turn marking a failed request.
    pub fn failed_responder(text: impl Into<String>) -> Self {
        Self::build(TurnRole::Responder, text.into(), true)
    }

    fn build(role: TurnRole, text: String, failed: bool) -> Self {
        Self {
            id: TurnId::new(),
            role,
            text,
            failed,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asker_trims_question() {
        let turn = ChatTurn::asker("  why ephemeral keys?  ").unwrap();
        assert_eq!(turn.role(), TurnRole::Asker);
        assert_eq!(turn.text(), "why ephemeral keys?");
        assert!(!turn.failed());
    }

    #[test]
    fn asker_rejects_blank_question() {
        assert!(ChatTurn::asker("").is_err());
        assert!(matches!(
            ChatTurn::asker(" \n\t "),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn responder_rejects_blank_answer() {
        assert!(ChatTurn::responder("   ").is_err());
    }

    #[test]
    fn failed_responder_is_marked() {
        let turn = ChatTurn::failed_responder("Sorry");
        assert_eq!(turn.role(), TurnRole::Responder);
        assert!(turn.failed());
    }

    #[test]
    fn turns_get_distinct_ids() {
        let a = ChatTurn::asker("one").unwrap();
        let b = ChatTurn::asker("one").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&TurnRole::Responder).unwrap(), "\"responder\"");
    }
}
