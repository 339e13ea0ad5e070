//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real text-generation APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in call order
//! - Responses pinned to a stage, matched on request metadata
//! - Per-response latency, so responses can complete out of request order
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_delayed_response("slow", Duration::from_secs(3))
//!     .with_response("fast");
//!
//! // The second call resolves before the first.
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::stage::Stage;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Mock text-generation provider.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Responses reserved for requests about a specific stage.
    by_stage: Arc<Mutex<HashMap<Stage, VecDeque<MockResponse>>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Latency applied to responses without their own delay.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success {
        content: String,
        delay: Option<Duration>,
    },
    /// Return an error.
    Error {
        error: MockError,
        delay: Option<Duration>,
    },
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate a missing credential.
    NotConfigured,
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::NotConfigured => AIError::NotConfigured,
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            by_stage: Arc::new(Mutex::new(HashMap::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Success {
            content: content.into(),
            delay: None,
        })
    }

    /// Adds a successful response that takes `delay` to arrive.
    pub fn with_delayed_response(self, content: impl Into<String>, delay: Duration) -> Self {
        self.push(MockResponse::Success {
            content: content.into(),
            delay: Some(delay),
        })
    }

    /// Adds a response served only to requests whose metadata names `stage`.
    ///
    /// Stage responses take precedence over the shared queue.
    pub fn with_stage_response(
        self,
        stage: Stage,
        content: impl Into<String>,
        delay: Duration,
    ) -> Self {
        locked(&self.by_stage)
            .entry(stage)
            .or_default()
            .push_back(MockResponse::Success {
                content: content.into(),
                delay: Some(delay),
            });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error { error, delay: None })
    }

    /// Adds an error response that takes `delay` to arrive.
    pub fn with_delayed_error(self, error: MockError, delay: Duration) -> Self {
        self.push(MockResponse::Error {
            error,
            delay: Some(delay),
        })
    }

    /// Sets the latency for responses without their own delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        locked(&self.calls).clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        locked(&self.calls).clear();
    }

    fn push(self, response: MockResponse) -> Self {
        locked(&self.responses).push_back(response);
        self
    }

    /// Gets the next response for `stage` or a default.
    fn next_response(&self, stage: Stage) -> MockResponse {
        if let Some(response) = locked(&self.by_stage)
            .get_mut(&stage)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }

        locked(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: "Mock response".to_string(),
                delay: None,
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let stage = request.metadata.stage;
        locked(&self.calls).push(request);

        // Pick the response now so concurrent calls keep their queue order
        let response = self.next_response(stage);
        let delay = match &response {
            MockResponse::Success { delay, .. } | MockResponse::Error { delay, .. } => {
                delay.unwrap_or(self.delay)
            }
        };

        if !delay.is_zero() {
            sleep(delay).await;
        }

        match response {
            MockResponse::Success { content, .. } => Ok(CompletionResponse {
                content,
                usage: TokenUsage::new(10, 20),
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockResponse::Error { error, .. } => Err(error.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
