//! Text-generation provider configuration
//!
//! A single API key drives both deep dives and chat. Leaving it unset is
//! allowed: the tour still runs and every AI call degrades to a fixed
//! "service unavailable" message.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the selected provider
    pub api_key: Option<Secret<String>>,

    /// Which provider the key belongs to
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model override (provider default when unset)
    pub model: Option<String>,

    /// Base URL override (e.g. a local proxy)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Supported text-generation providers
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a non-blank API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate AI configuration
    ///
    /// A missing key is not an error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidBaseUrl);
            }
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderKind::default(),
            model: None,
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = AiConfig {
            api_key: Some(Secret::new("   ".to_string())),
            ..Default::default()
        };
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_missing_key_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let config = AiConfig {
            base_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_provider_kind_deserializes_lowercase() {
        let kind: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(kind, ProviderKind::OpenAI);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig {
            api_key: Some(Secret::new("sk-ant-top-secret".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
