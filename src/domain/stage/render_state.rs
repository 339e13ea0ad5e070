//! Display flags derived from the current stage.
//!
//! `RenderState` is a pure function of the stage index. It is rebuilt on
//! every stage change and never patched in place.

use serde::Serialize;

use super::{Direction, Stage, StageCatalog};
use crate::domain::foundation::ValidationError;

/// What the presentation layer needs to draw the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderState {
    pub stage: Stage,
    /// Session keys exist on both sides.
    pub keys_established: bool,
    /// Application data is flowing through the encrypted channel.
    pub tunnel_active: bool,
    /// The client's ephemeral key share has been sent.
    pub client_key_visible: bool,
    /// The server's ephemeral key share has been sent.
    pub server_key_visible: bool,
    /// The server's certificate has been presented.
    pub certificate_presented: bool,
    /// Traffic direction drawn for this stage.
    pub direction: Direction,
}

impl RenderState {
    /// Derives the render state for a stage.
    pub fn for_stage(stage: Stage) -> Self {
        Self {
            stage,
            keys_established: stage >= Stage::KeyDerivation,
            tunnel_active: stage == Stage::SecureTunnel,
            client_key_visible: stage >= Stage::ClientHello,
            server_key_visible: stage >= Stage::ServerHello,
            certificate_presented: stage >= Stage::ServerHello,
            direction: StageCatalog::standard().get(stage).direction,
        }
    }

    /// Derives the render state for a raw stage index.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `index` is not a valid stage index
    pub fn for_index(index: usize) -> Result<Self, ValidationError> {
        Stage::from_index(index).map(Self::for_stage).ok_or_else(|| {
            ValidationError::out_of_range("stage_index", 0, Stage::COUNT as i64 - 1, index as i64)
        })
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::for_stage(Stage::first())
    }
}
