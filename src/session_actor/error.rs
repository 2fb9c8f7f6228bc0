//! Error types for the session actor.
//!
//! Every variant is a deterministic consequence of state or input, reported
//! synchronously and never retried. A failed operation leaves the session
//! and its items untouched.

use crate::model::{LockCause, ParticipantId, SessionState};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Item mutation attempted outside the editable window. Carries the
    /// current state and whether the lock came from the deadline or from an
    /// explicit action.
    #[error("session is not editable (state {state}: {cause})")]
    NotEditable { state: SessionState, cause: LockCause },

    /// Close attempted while the session was still open; it must lock
    /// first, explicitly or via the deadline.
    #[error("session must be locked before closing (state {state})")]
    NotLocked { state: SessionState },

    /// The requested session, item or restaurant does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The caller is neither the owner of the target nor an admin.
    #[error("{participant} may not {action}")]
    Forbidden {
        participant: ParticipantId,
        action: String,
    },

    /// Quantity must be a positive integer.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// Unit price must be non-negative.
    #[error("price must not be negative, got {0}")]
    InvalidPrice(Decimal),

    /// A transition the state machine does not define, e.g. leaving a
    /// terminal state without the reopen override.
    #[error("no transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    /// CSV serialization failed.
    #[error("export failed: {0}")]
    Export(String),

    /// Message-passing failure between client and actor.
    #[error("coordinator error: {0}")]
    Coordinator(String),
}

impl From<csv::Error> for SessionError {
    fn from(e: csv::Error) -> Self {
        SessionError::Export(e.to_string())
    }
}
