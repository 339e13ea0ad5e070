//! Builds the configured [`AIProvider`].

use std::sync::Arc;

use crate::config::{AiConfig, ProviderKind};
use crate::ports::{AIError, AIProvider};

use super::{
    AnthropicConfig, AnthropicProvider, OpenAIConfig, OpenAIProvider, UnconfiguredProvider,
};

/// Creates the provider described by `config`.
///
/// Without an API key this returns an [`UnconfiguredProvider`], so the tour
/// keeps working offline.
///
/// # Errors
///
/// - `Unavailable` if the HTTP client cannot be constructed
pub fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let api_key = match &config.api_key {
        Some(key) if config.has_api_key() => key.clone(),
        _ => {
            tracing::warn!("No AI API key configured; deep dives and chat will be unavailable");
            return Ok(Arc::new(UnconfiguredProvider));
        }
    };

    let provider: Arc<dyn AIProvider> = match config.provider {
        ProviderKind::Anthropic => {
            let mut provider_config =
                AnthropicConfig::from_secret(api_key).with_timeout(config.timeout());
            if let Some(model) = &config.model {
                provider_config = provider_config.with_model(model);
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url);
            }
            Arc::new(AnthropicProvider::new(provider_config)?)
        }
        ProviderKind::OpenAI => {
            let mut provider_config =
                OpenAIConfig::from_secret(api_key).with_timeout(config.timeout());
            if let Some(model) = &config.model {
                provider_config = provider_config.with_model(model);
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(provider_config)?)
        }
    };

    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "AI provider configured");

    Ok(provider)
}
