//! Stage enum representing the 7 steps of the handshake walkthrough.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The 7 handshake stages, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    ClientHello,
    ServerHello,
    KeyDerivation,
    ServerFinished,
    ClientFinished,
    SecureTunnel,
}

impl Stage {
    /// Number of stages in the sequence.
    pub const COUNT: usize = 7;

    /// Returns all stages in canonical order.
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Idle,
            Stage::ClientHello,
            Stage::ServerHello,
            Stage::KeyDerivation,
            Stage::ServerFinished,
            Stage::ClientFinished,
            Stage::SecureTunnel,
        ]
    }

    /// The stage every tour starts from.
    pub fn first() -> Stage {
        Stage::Idle
    }

    /// The terminal stage of the sequence.
    pub fn last() -> Stage {
        Stage::SecureTunnel
    }

    /// Returns the 0-based index of this stage in the canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Looks up a stage by its 0-based index.
    pub fn from_index(index: usize) -> Option<Stage> {
        Self::all().get(index).copied()
    }

    /// Returns the next stage in order, if any.
    pub fn next(&self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }

    /// Returns the previous stage in order, if any.
    pub fn previous(&self) -> Option<Stage> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Returns true for the last stage of the sequence.
    pub fn is_terminal(&self) -> bool {
        *self == Self::last()
    }

    /// Short protocol-style label (e.g. `ClientHello`).
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::ClientHello => "ClientHello",
            Stage::ServerHello => "ServerHello",
            Stage::KeyDerivation => "KeyDerivation",
            Stage::ServerFinished => "ServerFinished",
            Stage::ClientFinished => "ClientFinished",
            Stage::SecureTunnel => "SecureTunnel",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
