//! Append-only chat transcript.
//!
//! Turns are stored behind an `Arc` so snapshots handed to the presentation
//! layer are cheap clones; appending copies the backing vector only while a
//! snapshot is still holding the old one.

use std::sync::Arc;

use super::ChatTurn;

/// Ordered log of chat turns. There is no API to edit or remove a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    turns: Arc<Vec<ChatTurn>>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn at the end of the transcript.
    pub fn append(&mut self, turn: ChatTurn) {
        Arc::make_mut(&mut self.turns).push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::TurnRole;

    #[test]
    fn new_transcript_is_empty() {
        let transcript = ChatTranscript::new();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn append_preserves_order() {
        let mut transcript = ChatTranscript::new();
        transcript.append(ChatTurn::asker("first").unwrap());
        transcript.append(ChatTurn::responder("second").unwrap());

        let texts: Vec<_> = transcript.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(transcript.last().unwrap().role(), TurnRole::Responder);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_appends() {
        let mut transcript = ChatTranscript::new();
        transcript.append(ChatTurn::asker("q1").unwrap());

        let snapshot = transcript.clone();
        transcript.append(ChatTurn::responder("a1").unwrap());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(transcript.len(), 2);
        assert_eq!(snapshot.turns()[0], transcript.turns()[0]);
    }
}
