//! Board aggregation: turning a session's item list into totals.
//!
//! [`aggregate`] is a pure function of the item list. Given the same items
//! (same ids, same fields) it produces a byte-identical snapshot: grouping
//! follows first-appearance order of each participant, items stay in
//! creation order, and money math uses [`Decimal`] throughout. No wall
//! clock, no hash-map iteration.

use crate::model::{Item, Participant, RestaurantId, SessionId, SessionState};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One item on the board, paired with its line total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLine {
    pub item: Item,
    /// `quantity × unit price`; `None` while the price is pending.
    pub line_total: Option<Decimal>,
}

impl BoardLine {
    /// Listed but not counted: the item has no price yet.
    pub fn price_pending(&self) -> bool {
        self.line_total.is_none()
    }
}

/// Everything one participant has ordered, with their subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: Participant,
    pub lines: Vec<BoardLine>,
    /// Sum of line totals over priced items; pending items contribute 0.
    pub subtotal: Decimal,
    /// Summed quantity across this participant's lines.
    pub quantity: u64,
}

/// Point-in-time aggregation of a session's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Participants in order of their first item.
    pub participants: Vec<ParticipantSummary>,
    /// Sum of all participant subtotals.
    pub grand_total: Decimal,
    /// Number of items (lines), not summed quantity.
    pub item_count: usize,
    /// Summed quantity across all items.
    pub total_quantity: u64,
}

/// The coordinator's read model: session header plus aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub session_id: SessionId,
    pub title: String,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub state: SessionState,
    pub deadline: Option<DateTime<Utc>>,
    pub snapshot: BoardSnapshot,
}

/// Groups items by participant and computes subtotals and the grand total.
pub fn aggregate(items: &[Item]) -> BoardSnapshot {
    let mut participants: Vec<ParticipantSummary> = Vec::new();
    let mut grand_total = Decimal::ZERO;
    let mut total_quantity = 0u64;

    for item in items {
        let line = BoardLine {
            item: item.clone(),
            line_total: item.line_total(),
        };

        let idx = match participants
            .iter()
            .position(|s| s.participant.id == item.added_by.id)
        {
            Some(idx) => idx,
            None => {
                participants.push(ParticipantSummary {
                    participant: item.added_by.clone(),
                    lines: Vec::new(),
                    subtotal: Decimal::ZERO,
                    quantity: 0,
                });
                participants.len() - 1
            }
        };
        let summary = &mut participants[idx];

        if let Some(line_total) = line.line_total {
            summary.subtotal += line_total;
            grand_total += line_total;
        }
        summary.quantity += u64::from(item.quantity);
        total_quantity += u64::from(item.quantity);
        summary.lines.push(line);
    }

    BoardSnapshot {
        participants,
        grand_total,
        item_count: items.len(),
        total_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemDraft, ItemStore};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn items() -> Vec<Item> {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 11, 0, 0).unwrap();
        let u1 = Participant::new(1, "U1");
        let u2 = Participant::new(2, "U2");

        let mut store = ItemStore::new();
        store
            .add(
                SessionId(1),
                u1.clone(),
                ItemDraft::new("burger", 2).priced(dec!(4.50)),
                now,
            )
            .unwrap();
        store
            .add(SessionId(1), u1, ItemDraft::new("fries", 1), now)
            .unwrap();
        store
            .add(
                SessionId(1),
                u2,
                ItemDraft::new("burger", 1).priced(dec!(4.50)),
                now,
            )
            .unwrap();
        store.list()
    }

    #[test]
    fn pending_prices_are_listed_but_not_counted() {
        let snapshot = aggregate(&items());

        assert_eq!(snapshot.participants.len(), 2);
        let u1 = &snapshot.participants[0];
        assert_eq!(u1.participant.name, "U1");
        assert_eq!(u1.subtotal, dec!(9.00));
        assert_eq!(u1.lines.len(), 2);
        assert!(u1.lines[1].price_pending());

        let u2 = &snapshot.participants[1];
        assert_eq!(u2.subtotal, dec!(4.50));

        assert_eq!(snapshot.grand_total, dec!(13.50));
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(snapshot.total_quantity, 4);
    }

    #[test]
    fn subtotals_sum_to_grand_total() {
        let snapshot = aggregate(&items());
        let summed: Decimal = snapshot.participants.iter().map(|p| p.subtotal).sum();
        assert_eq!(summed, snapshot.grand_total);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let items = items();
        assert_eq!(aggregate(&items), aggregate(&items));
    }

    #[test]
    fn empty_session_aggregates_to_zeroes() {
        let snapshot = aggregate(&[]);
        assert!(snapshot.participants.is_empty());
        assert_eq!(snapshot.grand_total, Decimal::ZERO);
        assert_eq!(snapshot.item_count, 0);
        assert_eq!(snapshot.total_quantity, 0);
    }
}
