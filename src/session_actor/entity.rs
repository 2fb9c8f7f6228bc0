//! Entity trait implementation for the session aggregate.
//!
//! The session actor is the serialization point for everything touching one
//! session: item mutations, state transitions, board reads and exports all
//! arrive as messages and run one at a time. Every handler first applies
//! the lazy deadline check, so a passed deadline locks the session on the
//! next access of any kind.

use super::{SessionAction, SessionActionResult, SessionError};
use crate::board::{aggregate, Board};
use crate::clients::{ActorClient, RestaurantClient};
use crate::clock::Clock;
use crate::export::{render_csv, render_order_text};
use crate::framework::ActorEntity;
use crate::model::{Session, SessionCreate, SessionId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Dependencies injected into every session hook.
pub struct SessionDeps {
    /// Restaurant reference: creation-time validation and menu price
    /// pre-fill.
    pub restaurants: RestaurantClient,
    /// Time source for deadline checks and record timestamps.
    pub clock: Arc<dyn Clock>,
}

#[async_trait]
impl ActorEntity for Session {
    type Id = SessionId;
    type Create = SessionCreate;
    type Update = ();
    type Action = SessionAction;
    type ActionResult = SessionActionResult;
    type Context = SessionDeps;
    type Error = SessionError;

    fn from_create_params(id: SessionId, params: SessionCreate) -> Result<Self, SessionError> {
        Ok(Session::open(id, params))
    }

    /// Resolves the restaurant reference and stamps creation time.
    ///
    /// Failing the lookup aborts the create: a session must always point at
    /// a known restaurant.
    async fn on_create(&mut self, ctx: &SessionDeps) -> Result<(), SessionError> {
        let restaurant = ctx
            .restaurants
            .get(self.restaurant_id)
            .await
            .map_err(|e| SessionError::Coordinator(e.to_string()))?
            .ok_or_else(|| SessionError::NotFound(self.restaurant_id.to_string()))?;
        self.restaurant_name = restaurant.name;
        self.stamp_created(ctx.clock.now());
        Ok(())
    }

    /// Sessions change through actions, not generic updates.
    async fn on_update(&mut self, _update: (), _ctx: &SessionDeps) -> Result<(), SessionError> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: SessionAction,
        ctx: &SessionDeps,
    ) -> Result<SessionActionResult, SessionError> {
        let now = ctx.clock.now();
        self.refresh(now);

        match action {
            SessionAction::AddItem { by, mut draft } => {
                // Best-effort price pre-fill from the menu; free-text names
                // simply miss and stay unpriced.
                if draft.price.is_none() {
                    match ctx.restaurants.quote_dish(self.restaurant_id, &draft.name).await {
                        Ok(Some(entry)) => {
                            debug!(dish = %draft.name, price = %entry.price, "Menu price pre-filled");
                            draft.price = Some(entry.price);
                        }
                        Ok(None) => {}
                        Err(e) => debug!(error = %e, "Menu lookup skipped"),
                    }
                }
                let item = self.add_item(by, draft, now)?;
                Ok(SessionActionResult::Item(item))
            }
            SessionAction::EditItem { by, item, patch } => {
                let item = self.edit_item(&by, item, patch, now)?;
                Ok(SessionActionResult::Item(item))
            }
            SessionAction::RemoveItem { by, item } => {
                self.remove_item(&by, item, now)?;
                Ok(SessionActionResult::Removed)
            }
            SessionAction::Lock { by } => {
                self.lock(&by, now)?;
                Ok(SessionActionResult::State(self.state))
            }
            SessionAction::Close { by } => {
                self.close(&by, now)?;
                Ok(SessionActionResult::State(self.state))
            }
            SessionAction::Cancel { by } => {
                self.cancel(&by, now)?;
                Ok(SessionActionResult::State(self.state))
            }
            SessionAction::Reopen { by, new_deadline } => {
                self.reopen(&by, new_deadline, now)?;
                Ok(SessionActionResult::State(self.state))
            }
            SessionAction::Board => Ok(SessionActionResult::Board(Box::new(self.board()))),
            SessionAction::ListItems => Ok(SessionActionResult::Items(self.list_items())),
            SessionAction::ExportText => {
                let board = self.board();
                Ok(SessionActionResult::Export(render_order_text(
                    &board.snapshot,
                    &self.restaurant_name,
                    self.deadline,
                )))
            }
            SessionAction::ExportCsv => {
                let board = self.board();
                Ok(SessionActionResult::Export(render_csv(&board.snapshot)?))
            }
        }
    }
}

impl Session {
    /// Read model: header fields plus the aggregation of the current items.
    fn board(&self) -> Board {
        Board {
            session_id: self.id,
            title: self.title.clone(),
            restaurant_id: self.restaurant_id,
            restaurant_name: self.restaurant_name.clone(),
            state: self.state,
            deadline: self.deadline,
            snapshot: aggregate(&self.list_items()),
        }
    }
}
