//! Participant identity as supplied by the caller.
//!
//! The engine performs no authentication. Whoever drives the coordinator
//! (an HTTP layer, a bot, a test) resolves the caller to a [`Participant`]
//! and passes it along with every operation; the engine trusts it.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for participants.
///
/// Participant ids are assigned by the external identity provider, not by
/// this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "participant_{}", self.0)
    }
}

/// The identity attached to every coordinator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name used for grouping on the board and in exports.
    pub name: String,
    /// Admins may mutate any item and drive privileged session transitions.
    pub is_admin: bool,
}

impl Participant {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
            is_admin: false,
        }
    }

    pub fn admin(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
            is_admin: true,
        }
    }
}
