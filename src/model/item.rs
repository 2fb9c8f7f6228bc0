//! Line items and the per-session item store.
//!
//! Items never exist outside a session: [`ItemStore`] is owned by a
//! [`Session`](crate::model::Session) and allocates item ids itself. Storage
//! is a `BTreeMap` keyed by the monotonically increasing id, so iteration
//! order is creation order with no hash-map nondeterminism.

use crate::model::{Participant, SessionId};
use crate::session_actor::SessionError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Type-safe identifier for items, unique within one session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemId(pub u32);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// One ordered line: who wants what, how many, at which price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub session_id: SessionId,
    /// The participant who added the line. Carried in full (id + display
    /// name) so aggregation and export never consult an identity store.
    pub added_by: Participant,
    pub name: String,
    pub quantity: u32,
    /// Unit price. `None` means "price pending": the item is listed but
    /// contributes nothing to totals until a price is filled in.
    pub price: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Line total, `None` while the price is pending.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.map(|p| p * Decimal::from(self.quantity))
    }
}

/// Payload for adding a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: u32,
    pub price: Option<Decimal>,
    pub notes: Option<String>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            price: None,
            notes: None,
        }
    }

    pub fn priced(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn noted(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Change request for a field that can also be cleared, not just replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldUpdate<T> {
    Set(T),
    Clear,
}

/// Partial update for an item: absent fields are left untouched.
///
/// Price and notes distinguish "leave as is" (`None`) from "clear"
/// (`Some(FieldUpdate::Clear)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<FieldUpdate<Decimal>>,
    pub notes: Option<FieldUpdate<String>>,
}

impl ItemPatch {
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn requantify(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn reprice(mut self, price: Decimal) -> Self {
        self.price = Some(FieldUpdate::Set(price));
        self
    }

    pub fn clear_price(mut self) -> Self {
        self.price = Some(FieldUpdate::Clear);
        self
    }

    pub fn renote(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(FieldUpdate::Set(notes.into()));
        self
    }
}

fn check_quantity(quantity: u32) -> Result<(), SessionError> {
    if quantity == 0 {
        return Err(SessionError::InvalidQuantity(quantity));
    }
    Ok(())
}

fn check_price(price: Decimal) -> Result<(), SessionError> {
    if price.is_sign_negative() {
        return Err(SessionError::InvalidPrice(price));
    }
    Ok(())
}

fn may_modify(item: &Item, editor: &Participant) -> bool {
    editor.is_admin || item.added_by.id == editor.id
}

/// Item collection for one session.
///
/// The store enforces input validation and per-item ownership; whether the
/// session currently accepts mutations at all is the state machine's call
/// and is checked by [`Session`](crate::model::Session) before the store is
/// touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStore {
    next_id: u32,
    items: BTreeMap<ItemId, Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            items: BTreeMap::new(),
        }
    }

    /// Validates and inserts a new item, returning a clone of it.
    pub fn add(
        &mut self,
        session_id: SessionId,
        owner: Participant,
        draft: ItemDraft,
        now: DateTime<Utc>,
    ) -> Result<Item, SessionError> {
        check_quantity(draft.quantity)?;
        if let Some(price) = draft.price {
            check_price(price)?;
        }

        let id = ItemId(self.next_id);
        self.next_id += 1;

        let item = Item {
            id,
            session_id,
            added_by: owner,
            name: draft.name.trim().to_string(),
            quantity: draft.quantity,
            price: draft.price,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(id, item.clone());
        Ok(item)
    }

    /// Applies a partial update to an existing item.
    ///
    /// The patch is validated in full before any field is written, so a
    /// rejected edit leaves the item byte-for-byte unchanged.
    pub fn edit(
        &mut self,
        id: ItemId,
        editor: &Participant,
        patch: ItemPatch,
        now: DateTime<Utc>,
    ) -> Result<Item, SessionError> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        if !may_modify(item, editor) {
            return Err(SessionError::Forbidden {
                participant: editor.id,
                action: format!("edit {id}"),
            });
        }

        if let Some(quantity) = patch.quantity {
            check_quantity(quantity)?;
        }
        if let Some(FieldUpdate::Set(price)) = &patch.price {
            check_price(*price)?;
        }

        if let Some(name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        match patch.price {
            Some(FieldUpdate::Set(price)) => item.price = Some(price),
            Some(FieldUpdate::Clear) => item.price = None,
            None => {}
        }
        match patch.notes {
            Some(FieldUpdate::Set(notes)) => item.notes = Some(notes),
            Some(FieldUpdate::Clear) => item.notes = None,
            None => {}
        }
        item.updated_at = now;
        Ok(item.clone())
    }

    /// Removes an item, subject to the same ownership rule as [`edit`](Self::edit).
    pub fn remove(&mut self, id: ItemId, editor: &Participant) -> Result<(), SessionError> {
        let item = self
            .items
            .get(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        if !may_modify(item, editor) {
            return Err(SessionError::Forbidden {
                participant: editor.id,
                action: format!("delete {id}"),
            });
        }
        self.items.remove(&id);
        Ok(())
    }

    /// All items in creation order. Read-only, allowed in every session state.
    pub fn list(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 11, 0, 0).unwrap()
    }

    fn store_with_one_item() -> (ItemStore, Item) {
        let mut store = ItemStore::new();
        let item = store
            .add(
                SessionId(1),
                Participant::new(1, "Alice"),
                ItemDraft::new("burger", 2).priced(dec!(4.50)),
                now(),
            )
            .unwrap();
        (store, item)
    }

    #[test]
    fn add_rejects_zero_quantity() {
        let mut store = ItemStore::new();
        let err = store
            .add(
                SessionId(1),
                Participant::new(1, "Alice"),
                ItemDraft::new("burger", 0),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidQuantity(0)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_negative_price() {
        let mut store = ItemStore::new();
        let err = store
            .add(
                SessionId(1),
                Participant::new(1, "Alice"),
                ItemDraft::new("burger", 1).priced(dec!(-0.01)),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidPrice(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn edit_applies_only_supplied_fields() {
        let (mut store, item) = store_with_one_item();
        let later = now() + chrono::Duration::minutes(5);

        let updated = store
            .edit(
                item.id,
                &Participant::new(1, "Alice"),
                ItemPatch::default().requantify(3),
                later,
            )
            .unwrap();

        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.name, "burger");
        assert_eq!(updated.price, Some(dec!(4.50)));
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, now());
    }

    #[test]
    fn edit_can_clear_price_and_notes() {
        let (mut store, item) = store_with_one_item();
        let updated = store
            .edit(
                item.id,
                &Participant::new(1, "Alice"),
                ItemPatch::default().clear_price().renote("no onions"),
                now(),
            )
            .unwrap();
        assert_eq!(updated.price, None);
        assert_eq!(updated.notes.as_deref(), Some("no onions"));
    }

    #[test]
    fn rejected_edit_leaves_item_unchanged() {
        let (mut store, item) = store_with_one_item();
        let err = store
            .edit(
                item.id,
                &Participant::new(1, "Alice"),
                ItemPatch::default().rename("pizza").requantify(0),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidQuantity(0)));

        let unchanged = &store.list()[0];
        assert_eq!(unchanged, &item);
    }

    #[test]
    fn non_owner_gets_forbidden_admin_does_not() {
        let (mut store, item) = store_with_one_item();

        let err = store
            .edit(
                item.id,
                &Participant::new(2, "Bob"),
                ItemPatch::default().requantify(5),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::Forbidden { .. }));

        let err = store.remove(item.id, &Participant::new(2, "Bob")).unwrap_err();
        assert!(matches!(err, SessionError::Forbidden { .. }));

        store
            .edit(
                item.id,
                &Participant::admin(9, "Root"),
                ItemPatch::default().requantify(5),
                now(),
            )
            .unwrap();
        store.remove(item.id, &Participant::admin(9, "Root")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn missing_item_is_not_found() {
        let mut store = ItemStore::new();
        let err = store
            .edit(
                ItemId(7),
                &Participant::new(1, "Alice"),
                ItemPatch::default(),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[test]
    fn list_preserves_creation_order() {
        let mut store = ItemStore::new();
        let alice = Participant::new(1, "Alice");
        for name in ["burger", "fries", "cola"] {
            store
                .add(SessionId(1), alice.clone(), ItemDraft::new(name, 1), now())
                .unwrap();
        }
        let names: Vec<_> = store.list().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["burger", "fries", "cola"]);
    }
}
