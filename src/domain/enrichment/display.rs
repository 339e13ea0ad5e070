//! Deep-dive results and what is shown for the current stage.

use serde::Serialize;

use crate::domain::stage::Stage;

/// Shown at the first stage, where no request is made.
pub const READY_MESSAGE: &str =
    "Step forward or press play to start the handshake. A deep dive for each stage appears here.";

/// Placeholder while a request for the current stage is outstanding.
pub const PENDING_MESSAGE: &str = "Consulting the handshake expert...";

/// Shown when the text service fails for the current stage.
pub const FALLBACK_MESSAGE: &str =
    "The deep dive for this stage is unavailable right now. The stage summary still covers the essentials.";

/// Text produced for one stage request, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentResult {
    /// Stage the request was issued for.
    pub for_stage: Stage,
    /// Generation counter at issue time.
    pub generation: u64,
    pub text: String,
    /// True when `text` is a fallback rather than service output.
    pub is_fallback: bool,
}

impl EnrichmentResult {
    /// A successful deep dive.
    pub fn loaded(for_stage: Stage, generation: u64, text: impl Into<String>) -> Self {
        Self {
            for_stage,
            generation,
            text: text.into(),
            is_fallback: false,
        }
    }

    /// A fallback substituted for a failed request.
    pub fn fallback(for_stage: Stage, generation: u64, text: impl Into<String>) -> Self {
        Self {
            for_stage,
            generation,
            text: text.into(),
            is_fallback: true,
        }
    }
}

/// Lifecycle of the text shown for the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Static message at the first stage.
    Ready,
    /// Request outstanding.
    Pending,
    /// Service text applied.
    Loaded,
    /// Request failed; fallback text applied.
    Fallback,
}

/// The enrichment text currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentDisplay {
    pub stage: Stage,
    pub text: String,
    pub status: EnrichmentStatus,
}

impl EnrichmentDisplay {
    /// The static message for the first stage.
    pub fn ready() -> Self {
        Self {
            stage: Stage::first(),
            text: READY_MESSAGE.to_string(),
            status: EnrichmentStatus::Ready,
        }
    }

    /// Placeholder while `stage` is being fetched.
    pub fn pending(stage: Stage) -> Self {
        Self {
            stage,
            text: PENDING_MESSAGE.to_string(),
            status: EnrichmentStatus::Pending,
        }
    }

    /// Display for an applied result.
    pub fn from_result(result: EnrichmentResult) -> Self {
        let status = if result.is_fallback {
            EnrichmentStatus::Fallback
        } else {
            EnrichmentStatus::Loaded
        };
        Self {
            stage: result.for_stage,
            text: result.text,
            status,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EnrichmentStatus::Pending
    }
}

impl Default for EnrichmentDisplay {
    fn default() -> Self {
        Self::ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_display_is_for_idle() {
        let display = EnrichmentDisplay::ready();
        assert_eq!(display.stage, Stage::Idle);
        assert_eq!(display.text, READY_MESSAGE);
        assert_eq!(display.status, EnrichmentStatus::Ready);
    }

    #[test]
    fn pending_display_uses_placeholder() {
        let display = EnrichmentDisplay::pending(Stage::ServerHello);
        assert!(display.is_pending());
        assert_eq!(display.text, PENDING_MESSAGE);
    }

    #[test]
    fn loaded_result_maps_to_loaded_status() {
        let display =
            EnrichmentDisplay::from_result(EnrichmentResult::loaded(Stage::ClientHello, 1, "deep"));
        assert_eq!(display.status, EnrichmentStatus::Loaded);
        assert_eq!(display.text, "deep");
        assert_eq!(display.stage, Stage::ClientHello);
    }

    #[test]
    fn fallback_result_maps_to_fallback_status() {
        let display = EnrichmentDisplay::from_result(EnrichmentResult::fallback(
            Stage::ClientHello,
            1,
            FALLBACK_MESSAGE,
        ));
        assert_eq!(display.status, EnrichmentStatus::Fallback);
        assert_eq!(display.text, FALLBACK_MESSAGE);
    }
}
