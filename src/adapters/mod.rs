//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the tour to external systems:
//! - `ai` - Text-generation providers (Anthropic, OpenAI, offline, mock)

pub mod ai;

pub use ai::{build_provider, MockAIProvider, MockError, UnconfiguredProvider};
