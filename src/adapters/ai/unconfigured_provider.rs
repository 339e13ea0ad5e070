//! Provider used when no API key is configured.
//!
//! Every call fails fast with [`AIError::NotConfigured`] without touching the
//! network, which the application layer turns into its fixed
//! "service unavailable" text.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl AIProvider for UnconfiguredProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        tracing::debug!(
            purpose = %request.metadata.purpose,
            stage = %request.metadata.stage,
            "Skipping AI request: no API key configured"
        );
        Err(AIError::NotConfigured)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("unconfigured", "none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::stage::Stage;
    use crate::ports::{RequestMetadata, RequestPurpose};

    #[tokio::test]
    async fn every_call_reports_not_configured() {
        let provider = UnconfiguredProvider;
        let request = CompletionRequest::new(RequestMetadata::new(
            SessionId::new(),
            RequestPurpose::Enrichment,
            Stage::ClientHello,
            "trace",
        ));

        let err = provider.complete(request).await.unwrap_err();
        assert!(matches!(err, AIError::NotConfigured));
    }
}
