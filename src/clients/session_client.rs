//! # Session Client
//!
//! The coordinator's public operation set. Every method resolves to one
//! message to the session actor, so concurrent callers are serialized per
//! session while independent sessions proceed in parallel.

use crate::board::Board;
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{
    Item, ItemDraft, ItemId, ItemPatch, Participant, Session, SessionCreate, SessionId,
    SessionState,
};
use crate::session_actor::{SessionAction, SessionActionResult, SessionError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

fn map_error(e: FrameworkError<SessionError>) -> SessionError {
    match e {
        FrameworkError::Entity(e) => e,
        FrameworkError::NotFound(what) => SessionError::NotFound(what),
        other => SessionError::Coordinator(other.to_string()),
    }
}

/// Client for interacting with the session actor.
#[derive(Clone)]
pub struct SessionClient {
    inner: ResourceClient<Session>,
}

impl SessionClient {
    pub fn new(inner: ResourceClient<Session>) -> Self {
        Self { inner }
    }

    async fn act(
        &self,
        id: SessionId,
        action: SessionAction,
    ) -> Result<SessionActionResult, SessionError> {
        self.inner.perform_action(id, action).await.map_err(map_error)
    }
}

#[async_trait]
impl ActorClient<Session> for SessionClient {
    type Error = SessionError;

    fn inner(&self) -> &ResourceClient<Session> {
        &self.inner
    }

    fn map_error(e: FrameworkError<SessionError>) -> SessionError {
        map_error(e)
    }
}

impl SessionClient {
    /// Open a new session. Validation of the restaurant reference happens
    /// in the actor's creation hook.
    #[instrument(skip(self, params))]
    pub async fn create_session(&self, params: SessionCreate) -> Result<SessionId, SessionError> {
        debug!(title = %params.title, "Sending request");
        self.inner.create(params).await.map_err(map_error)
    }

    /// Append a line item. An unset price is pre-filled from the
    /// restaurant's menu when the dish name matches.
    #[instrument(skip(self, draft))]
    pub async fn add_item(
        &self,
        session: SessionId,
        by: Participant,
        draft: ItemDraft,
    ) -> Result<Item, SessionError> {
        debug!(item = %draft.name, "Sending request");
        match self.act(session, SessionAction::AddItem { by, draft }).await? {
            SessionActionResult::Item(item) => Ok(item),
            _ => unreachable!("AddItem action must return Item result"),
        }
    }

    /// Apply a partial update to an item.
    #[instrument(skip(self, patch))]
    pub async fn edit_item(
        &self,
        session: SessionId,
        by: Participant,
        item: ItemId,
        patch: ItemPatch,
    ) -> Result<Item, SessionError> {
        debug!("Sending request");
        match self
            .act(session, SessionAction::EditItem { by, item, patch })
            .await?
        {
            SessionActionResult::Item(item) => Ok(item),
            _ => unreachable!("EditItem action must return Item result"),
        }
    }

    /// Delete an item.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        session: SessionId,
        by: Participant,
        item: ItemId,
    ) -> Result<(), SessionError> {
        debug!("Sending request");
        match self
            .act(session, SessionAction::RemoveItem { by, item })
            .await?
        {
            SessionActionResult::Removed => Ok(()),
            _ => unreachable!("RemoveItem action must return Removed result"),
        }
    }

    async fn transition(
        &self,
        session: SessionId,
        action: SessionAction,
    ) -> Result<SessionState, SessionError> {
        match self.act(session, action).await? {
            SessionActionResult::State(state) => Ok(state),
            _ => unreachable!("transition actions must return State result"),
        }
    }

    /// Explicitly lock the session (organizer or admin).
    #[instrument(skip(self))]
    pub async fn lock_session(
        &self,
        session: SessionId,
        by: Participant,
    ) -> Result<SessionState, SessionError> {
        debug!("Sending request");
        self.transition(session, SessionAction::Lock { by }).await
    }

    /// Close a locked session (admin). Fails with
    /// [`SessionError::NotLocked`] while the session is still open.
    #[instrument(skip(self))]
    pub async fn close_session(
        &self,
        session: SessionId,
        by: Participant,
    ) -> Result<SessionState, SessionError> {
        debug!("Sending request");
        self.transition(session, SessionAction::Close { by }).await
    }

    /// Cancel a session before it closes (admin).
    #[instrument(skip(self))]
    pub async fn cancel_session(
        &self,
        session: SessionId,
        by: Participant,
    ) -> Result<SessionState, SessionError> {
        debug!("Sending request");
        self.transition(session, SessionAction::Cancel { by }).await
    }

    /// Admin override: re-enter `Open` with a replacement deadline.
    #[instrument(skip(self))]
    pub async fn reopen_session(
        &self,
        session: SessionId,
        by: Participant,
        new_deadline: Option<DateTime<Utc>>,
    ) -> Result<SessionState, SessionError> {
        debug!("Sending request");
        self.transition(session, SessionAction::Reopen { by, new_deadline })
            .await
    }

    /// Current state plus aggregated totals.
    #[instrument(skip(self))]
    pub async fn board(&self, session: SessionId) -> Result<Board, SessionError> {
        debug!("Sending request");
        match self.act(session, SessionAction::Board).await? {
            SessionActionResult::Board(board) => Ok(*board),
            _ => unreachable!("Board action must return Board result"),
        }
    }

    /// All items in creation order; allowed in every state.
    #[instrument(skip(self))]
    pub async fn list_items(&self, session: SessionId) -> Result<Vec<Item>, SessionError> {
        debug!("Sending request");
        match self.act(session, SessionAction::ListItems).await? {
            SessionActionResult::Items(items) => Ok(items),
            _ => unreachable!("ListItems action must return Items result"),
        }
    }

    /// Plain-text order block (stable format, see the export module).
    #[instrument(skip(self))]
    pub async fn export_text(&self, session: SessionId) -> Result<String, SessionError> {
        debug!("Sending request");
        match self.act(session, SessionAction::ExportText).await? {
            SessionActionResult::Export(text) => Ok(text),
            _ => unreachable!("ExportText action must return Export result"),
        }
    }

    /// CSV document (stable columns, see the export module).
    #[instrument(skip(self))]
    pub async fn export_csv(&self, session: SessionId) -> Result<String, SessionError> {
        debug!("Sending request");
        match self.act(session, SessionAction::ExportCsv).await? {
            SessionActionResult::Export(csv) => Ok(csv),
            _ => unreachable!("ExportCsv action must return Export result"),
        }
    }
}
