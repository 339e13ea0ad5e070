//! Chat module - Question/answer turns and the append-only transcript.

mod transcript;
mod turn;

pub use transcript::ChatTranscript;
pub use turn::{ChatTurn, TurnRole};

/// Answer text recorded when the text service fails to respond.
pub const CHAT_APOLOGY: &str =
    "Sorry, I couldn't get an answer to that right now. Please try asking again.";
