//! Domain layer containing the tour's state and value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, validation errors)
//! - `stage` - The handshake stage sequence, its catalog and derived render state
//! - `playback` - Position and auto-advance state machine
//! - `enrichment` - Deep-dive results and the text shown for the current stage
//! - `chat` - Question/answer turns and the append-only transcript

pub mod chat;
pub mod enrichment;
pub mod foundation;
pub mod playback;
pub mod stage;
