//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `AnthropicProvider` - Anthropic Messages API
//! - `OpenAIProvider` - OpenAI Chat Completions API
//! - `UnconfiguredProvider` - Fails fast when no API key is set
//! - `MockAIProvider` - Configurable mock for testing
//!
//! `build_provider` picks one of the real adapters from configuration.

mod anthropic_provider;
mod factory;
mod mock_provider;
mod openai_provider;
mod unconfigured_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider, DEFAULT_ANTHROPIC_MODEL};
pub use factory::build_provider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, DEFAULT_OPENAI_MODEL};
pub use unconfigured_provider::UnconfiguredProvider;
