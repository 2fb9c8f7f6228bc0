//! Custom actions for the session actor.
//!
//! Beyond the generic create/get, everything a coordinator can do to a
//! session travels as one of these messages. Because the actor handles them
//! one at a time, each variant executes atomically against the session.

use crate::board::Board;
use crate::model::{Item, ItemDraft, ItemId, ItemPatch, Participant, SessionState};
use chrono::{DateTime, Utc};

/// Operations on one session.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Append a line item; the acting participant becomes its owner.
    AddItem { by: Participant, draft: ItemDraft },
    /// Partially update an item owned by `by` (or any item, for admins).
    EditItem {
        by: Participant,
        item: ItemId,
        patch: ItemPatch,
    },
    /// Delete an item, same authorization as editing.
    RemoveItem { by: Participant, item: ItemId },
    /// Explicit Open → Locked (organizer or admin).
    Lock { by: Participant },
    /// Locked → Closed (admin).
    Close { by: Participant },
    /// Open/Locked → Cancelled (admin).
    Cancel { by: Participant },
    /// Admin override back to Open, with a replacement deadline.
    Reopen {
        by: Participant,
        new_deadline: Option<DateTime<Utc>>,
    },
    /// Current state plus the aggregated totals.
    Board,
    /// All items in creation order, any state.
    ListItems,
    /// Plain-text order block.
    ExportText,
    /// CSV document.
    ExportCsv,
}

/// Results, variants matching 1:1 with [`SessionAction`].
#[derive(Debug, Clone)]
pub enum SessionActionResult {
    Item(Item),
    Removed,
    State(SessionState),
    Board(Box<Board>),
    Items(Vec<Item>),
    Export(String),
}
