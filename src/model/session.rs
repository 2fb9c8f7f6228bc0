//! The order session aggregate: lifecycle state machine plus owned item list.
//!
//! A [`Session`] bundles everything one food-order round needs: the state
//! machine deciding which operations are currently legal, and the
//! [`ItemStore`] holding the lines participants have added. All access goes
//! through the owning actor task, so the methods here can take `&mut self`
//! without any locking.
//!
//! # Deadline handling
//! The deadline is evaluated lazily. Every state-sensitive operation calls
//! [`Session::refresh`] first, which applies the Open → Locked transition
//! once `now` has reached the deadline. There is no background timer; a
//! consumer wanting a live countdown polls the board.

use crate::model::{
    Item, ItemDraft, ItemId, ItemPatch, ItemStore, Participant, RestaurantId,
};
use crate::session_actor::SessionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl From<u32> for SessionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

/// Lifecycle states of a session.
///
/// `Open` is the only state accepting item mutation. `Closed` and
/// `Cancelled` are terminal; only the admin reopen override leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Open,
    Locked,
    Closed,
    Cancelled,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Open => "open",
            SessionState::Locked => "locked",
            SessionState::Closed => "closed",
            SessionState::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// How a session ended up locked. Reported back to callers whose mutation
/// was rejected, so the transport layer can phrase the refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockCause {
    /// The deadline passed and the lazy check latched the lock.
    Deadline,
    /// An organizer or admin locked the session by hand.
    Explicit,
}

impl Display for LockCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LockCause::Deadline => "deadline passed",
            LockCause::Explicit => "explicitly locked",
        };
        write!(f, "{s}")
    }
}

/// One food-order round tied to a restaurant and (optionally) a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub restaurant_id: RestaurantId,
    /// Restaurant display name, denormalized at creation so exports never
    /// need a second actor round trip.
    pub restaurant_name: String,
    /// e.g. "Friday lunch".
    pub title: String,
    pub notes: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub state: SessionState,
    /// Set when entering `Locked`; cleared on reopen.
    pub lock_cause: Option<LockCause>,
    pub created_by: Participant,
    pub created_at: DateTime<Utc>,
    /// Bumped on every successful item mutation and on reopen. Callers use
    /// it for optimistic concurrency and cache invalidation.
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    items: ItemStore,
}

/// Payload for opening a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreate {
    pub title: String,
    pub restaurant_id: RestaurantId,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: Participant,
}

impl Session {
    pub(crate) fn open(id: SessionId, params: SessionCreate) -> Self {
        Self {
            id,
            restaurant_id: params.restaurant_id,
            // Filled in by the creation hook once the reference is resolved.
            restaurant_name: String::new(),
            title: params.title.trim().to_string(),
            notes: params.notes,
            deadline: params.deadline,
            state: SessionState::Open,
            lock_cause: None,
            created_by: params.created_by,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
            closed_at: None,
            items: ItemStore::new(),
        }
    }

    pub(crate) fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Applies the lazy deadline transition: an `Open` session whose
    /// deadline has passed becomes `Locked` with [`LockCause::Deadline`].
    ///
    /// Called at the top of every actor operation, which is what makes the
    /// deadline "force Open → Locked on next access" without any timer.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        if self.state == SessionState::Open && self.deadline_passed(now) {
            self.state = SessionState::Locked;
            self.lock_cause = Some(LockCause::Deadline);
        }
    }

    /// True only while the session is `Open` and its deadline has not
    /// passed. Pure; re-evaluated per call, never cached.
    pub fn can_mutate_items(&self, now: DateTime<Utc>) -> bool {
        self.state == SessionState::Open && !self.deadline_passed(now)
    }

    /// Error-carrying form of [`can_mutate_items`](Self::can_mutate_items),
    /// consulted by every item mutation entry point.
    fn editable_guard(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let cause = match self.state {
            SessionState::Open if self.deadline_passed(now) => LockCause::Deadline,
            SessionState::Open => return Ok(()),
            _ => self.lock_cause.unwrap_or(LockCause::Explicit),
        };
        Err(SessionError::NotEditable {
            state: self.state,
            cause,
        })
    }

    fn require_organizer(&self, by: &Participant, action: &str) -> Result<(), SessionError> {
        if by.is_admin || by.id == self.created_by.id {
            return Ok(());
        }
        Err(SessionError::Forbidden {
            participant: by.id,
            action: action.to_string(),
        })
    }

    fn require_admin(&self, by: &Participant, action: &str) -> Result<(), SessionError> {
        if by.is_admin {
            return Ok(());
        }
        Err(SessionError::Forbidden {
            participant: by.id,
            action: action.to_string(),
        })
    }

    // --- State transitions ---

    /// Explicit Open → Locked, by the organizer or an admin.
    ///
    /// Locking an already-locked session is a no-op: the deadline may have
    /// latched the lock a moment earlier, and repeating the intent is not a
    /// fault.
    pub fn lock(&mut self, by: &Participant, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.refresh(now);
        self.require_organizer(by, "lock the session")?;
        match self.state {
            SessionState::Open => {
                self.state = SessionState::Locked;
                self.lock_cause = Some(LockCause::Explicit);
                Ok(())
            }
            SessionState::Locked => Ok(()),
            from => Err(SessionError::InvalidTransition {
                from,
                to: SessionState::Locked,
            }),
        }
    }

    /// Locked → Closed, admin only. Fails with [`SessionError::NotLocked`]
    /// while the session is still open: the lock (explicit or by deadline)
    /// is what freezes the exported snapshot.
    pub fn close(&mut self, by: &Participant, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.refresh(now);
        self.require_admin(by, "close the session")?;
        match self.state {
            SessionState::Locked => {
                self.state = SessionState::Closed;
                self.closed_at = Some(now);
                Ok(())
            }
            SessionState::Open => Err(SessionError::NotLocked { state: self.state }),
            from => Err(SessionError::InvalidTransition {
                from,
                to: SessionState::Closed,
            }),
        }
    }

    /// Open/Locked → Cancelled, admin only.
    pub fn cancel(&mut self, by: &Participant, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.refresh(now);
        self.require_admin(by, "cancel the session")?;
        match self.state {
            SessionState::Open | SessionState::Locked => {
                self.state = SessionState::Cancelled;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition {
                from,
                to: SessionState::Cancelled,
            }),
        }
    }

    /// Admin override re-entering `Open` from any non-open state.
    ///
    /// Takes a replacement deadline: reopening past the old deadline would
    /// otherwise re-lock on the very next access. Bumps `updated_at` so
    /// callers drop any cached aggregation.
    pub fn reopen(
        &mut self,
        by: &Participant,
        new_deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.require_admin(by, "reopen the session")?;
        if self.state == SessionState::Open {
            return Err(SessionError::InvalidTransition {
                from: SessionState::Open,
                to: SessionState::Open,
            });
        }
        self.state = SessionState::Open;
        self.lock_cause = None;
        self.closed_at = None;
        self.deadline = new_deadline;
        self.updated_at = now;
        Ok(())
    }

    // --- Item mutation, gated by the state machine ---

    pub fn add_item(
        &mut self,
        by: Participant,
        draft: ItemDraft,
        now: DateTime<Utc>,
    ) -> Result<Item, SessionError> {
        self.refresh(now);
        self.editable_guard(now)?;
        let item = self.items.add(self.id, by, draft, now)?;
        self.updated_at = now;
        Ok(item)
    }

    pub fn edit_item(
        &mut self,
        by: &Participant,
        id: ItemId,
        patch: ItemPatch,
        now: DateTime<Utc>,
    ) -> Result<Item, SessionError> {
        self.refresh(now);
        self.editable_guard(now)?;
        let item = self.items.edit(id, by, patch, now)?;
        self.updated_at = now;
        Ok(item)
    }

    pub fn remove_item(
        &mut self,
        by: &Participant,
        id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.refresh(now);
        self.editable_guard(now)?;
        self.items.remove(id, by)?;
        self.updated_at = now;
        Ok(())
    }

    /// Items in creation order. Permitted in every state so locked and
    /// closed sessions stay viewable.
    pub fn list_items(&self) -> Vec<Item> {
        self.items.list()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
