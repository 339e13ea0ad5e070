//! Static descriptive metadata for every handshake stage.
//!
//! The catalog is built at compile time and never mutated. Lookups are
//! infallible because every [`Stage`] has exactly one entry, stored at the
//! stage's own index.

use serde::Serialize;

use super::Stage;

/// Which way traffic flows on the wire during a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Client sends to the server.
    ToPeer,
    /// Server sends to the client.
    ToClient,
    /// Both sides exchange traffic.
    Bidirectional,
    /// Nothing crosses the wire; work happens locally.
    #[serde(rename = "none")]
    NoTraffic,
}

/// Descriptive record shown alongside a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageMetadata {
    pub stage: Stage,
    pub title: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub facts: &'static [&'static str],
    pub analogy: &'static str,
    pub rationale: &'static str,
    pub direction: Direction,
}

/// Immutable, ordered table of [`StageMetadata`].
#[derive(Debug)]
pub struct StageCatalog {
    entries: [StageMetadata; Stage::COUNT],
}

static STANDARD: StageCatalog = StageCatalog {
    entries: [
        StageMetadata {
            stage: Stage::Idle,
            title: "Ready to Connect",
            label: "IDLE",
            description: "The client and server have not exchanged a single byte. \
                Anything sent now would cross the network in plain text.",
            facts: &[
                "No session keys exist yet",
                "The network path is assumed hostile",
                "Both peers start with only long-term identities",
            ],
            analogy: "Two strangers about to talk across a crowded room full of eavesdroppers.",
            rationale: "Every secure session begins from an untrusted channel, \
                so the handshake must bootstrap trust from nothing.",
            direction: Direction::NoTraffic,
        },
        StageMetadata {
            stage: Stage::ClientHello,
            title: "Client Hello",
            label: "CLIENT HELLO",
            description: "The client opens the conversation, listing the cipher suites it \
                supports and sending an ephemeral public key share.",
            facts: &[
                "Carries a fresh 32-byte random nonce",
                "Offers supported cipher suites and groups",
                "Includes an ephemeral key share (e.g. X25519)",
                "Names the target host via SNI",
            ],
            analogy: "Knocking on a door and offering a list of languages you can speak.",
            rationale: "Sending the key share up front lets the handshake finish in a \
                single round trip.",
            direction: Direction::ToPeer,
        },
        StageMetadata {
            stage: Stage::ServerHello,
            title: "Server Hello",
            label: "SERVER HELLO",
            description: "The server picks a cipher suite, replies with its own key share \
                and proves its identity with a certificate.",
            facts: &[
                "Selects one cipher suite from the client's offer",
                "Returns the server's ephemeral key share",
                "Presents a certificate chain",
                "Signs the transcript in CertificateVerify",
            ],
            analogy: "The host answers, agrees on a language and shows an ID badge.",
            rationale: "The signature binds the server's identity to this exact handshake, \
                defeating replay and impersonation.",
            direction: Direction::ToClient,
        },
        StageMetadata {
            stage: Stage::KeyDerivation,
            title: "Key Derivation",
            label: "KEY DERIVATION",
            description: "Both sides combine their private key with the peer's public share \
                to reach the same secret, then expand it into traffic keys.",
            facts: &[
                "Diffie-Hellman yields an identical shared secret on both ends",
                "HKDF expands the secret into separate keys per direction",
                "The shared secret itself never crosses the wire",
            ],
            analogy: "Mixing paint: each side adds a secret colour to a public one and both \
                end up with the same shade.",
            rationale: "Ephemeral keys give forward secrecy; stealing a long-term key later \
                cannot decrypt this session.",
            direction: Direction::NoTraffic,
        },
        StageMetadata {
            stage: Stage::ServerFinished,
            title: "Server Finished",
            label: "SERVER FINISHED",
            description: "The server sends a MAC over the whole handshake transcript, \
                encrypted under the new handshake keys.",
            facts: &[
                "First message protected by derived keys",
                "Covers every handshake message exchanged so far",
                "Detects any tampering with the negotiation",
            ],
            analogy: "Reading back the whole agreement and sealing it with a wax stamp.",
            rationale: "A transcript MAC proves both sides saw the same negotiation, \
                blocking downgrade attacks.",
            direction: Direction::ToClient,
        },
        StageMetadata {
            stage: Stage::ClientFinished,
            title: "Client Finished",
            label: "CLIENT FINISHED",
            description: "The client verifies the server's Finished message and answers \
                with its own transcript MAC.",
            facts: &[
                "Confirms the client derived the same keys",
                "Completes mutual key confirmation",
                "Application data may follow immediately",
            ],
            analogy: "Countersigning the sealed agreement.",
            rationale: "Key confirmation in both directions guarantees neither side is \
                talking to an impostor holding different keys.",
            direction: Direction::ToPeer,
        },
        StageMetadata {
            stage: Stage::SecureTunnel,
            title: "Secure Tunnel",
            label: "SECURE TUNNEL",
            description: "Application traffic now flows in both directions, encrypted and \
                authenticated with the session keys.",
            facts: &[
                "AEAD ciphers protect confidentiality and integrity",
                "Each record carries a unique nonce",
                "Keys can be rotated without a new handshake",
            ],
            analogy: "A private pneumatic tube between the two rooms.",
            rationale: "All the earlier work exists so this channel can be cheap, fast and \
                private for the rest of the session.",
            direction: Direction::Bidirectional,
        },
    ],
};

impl StageCatalog {
    /// The built-in catalog for the seven-stage handshake.
    pub fn standard() -> &'static StageCatalog {
        &STANDARD
    }

    /// Metadata for a stage.
    pub fn get(&self, stage: Stage) -> &StageMetadata {
        &self.entries[stage.index()]
    }

    /// Human-readable title for a stage.
    pub fn title(&self, stage: Stage) -> &'static str {
        self.get(stage).title
    }

    /// Iterates entries in stage order.
    pub fn iter(&self) -> impl Iterator<Item = &StageMetadata> {
        self.entries.iter()
    }

    /// Number of entries (always [`Stage::COUNT`]).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_sits_at_its_stage_index() {
        let catalog = StageCatalog::standard();
        for (position, entry) in catalog.iter().enumerate() {
            assert_eq!(entry.stage.index(), position, "{:?} misplaced", entry.stage);
        }
    }

    #[test]
    fn catalog_covers_every_stage() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.len(), Stage::COUNT);
        for stage in Stage::all() {
            assert_eq!(catalog.get(*stage).stage, *stage);
        }
    }

    #[test]
    fn every_entry_has_text_and_facts() {
        for entry in StageCatalog::standard().iter() {
            assert!(!entry.title.is_empty());
            assert!(!entry.description.is_empty());
            assert!(!entry.analogy.is_empty());
            assert!(!entry.rationale.is_empty());
            assert!(!entry.facts.is_empty(), "{:?} has no facts", entry.stage);
        }
    }

    #[test]
    fn titles_are_unique() {
        let mut titles: Vec<_> = StageCatalog::standard().iter().map(|e| e.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), Stage::COUNT);
    }

    #[test]
    fn message_stages_have_directions() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.get(Stage::ClientHello).direction, Direction::ToPeer);
        assert_eq!(catalog.get(Stage::ServerHello).direction, Direction::ToClient);
        assert_eq!(catalog.get(Stage::KeyDerivation).direction, Direction::NoTraffic);
        assert_eq!(catalog.get(Stage::SecureTunnel).direction, Direction::Bidirectional);
    }

    #[test]
    fn direction_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Direction::ToPeer).unwrap(), "\"to_peer\"");
        assert_eq!(serde_json::to_string(&Direction::NoTraffic).unwrap(), "\"none\"");
    }
}
