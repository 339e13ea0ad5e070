//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the Handshake Tour domain.

mod errors;
mod ids;
mod timestamp;

/// Shown in place of any AI output when no API key is configured.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The AI assistant is unavailable: no API key is configured.";

pub use errors::ValidationError;
pub use ids::{SessionId, TurnId};
pub use timestamp::Timestamp;
