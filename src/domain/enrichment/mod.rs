//! Enrichment module - Per-stage deep-dive text and its display state.

mod display;

pub use display::{
    EnrichmentDisplay, EnrichmentResult, EnrichmentStatus, FALLBACK_MESSAGE, PENDING_MESSAGE,
    READY_MESSAGE,
};
