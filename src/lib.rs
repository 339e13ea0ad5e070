//! Handshake Tour - Guided, AI-narrated walkthrough of a secure transport handshake
//!
//! A viewer steps, or auto-plays, through the stages of a TLS 1.3 style
//! handshake. Each stage is enriched with a deep dive fetched from a
//! text-generation service, and the viewer can ask free-form questions
//! about the stage on screen.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
