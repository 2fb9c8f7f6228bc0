//! Export renderers: the order text pasted into a chat or phone call, and
//! the CSV handed to spreadsheets.
//!
//! Both functions are pure over a [`BoardSnapshot`] plus the header fields.
//! Their output is an interop contract, not cosmetics: field order,
//! separators and the fixed 2-decimal price format must stay stable across
//! versions (the exact shapes are pinned by tests below).

use crate::board::BoardSnapshot;
use crate::session_actor::SessionError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt::Write as _;

/// Fixed 2-decimal money rendering, independent of locale.
fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn fmt_deadline(deadline: DateTime<Utc>) -> String {
    deadline.format("%Y-%m-%d %H:%M").to_string()
}

/// Renders the plain-text order block.
///
/// Shape:
///
/// ```text
/// Pizza Corner (deadline: 2024-05-03 11:30)
/// Alice: burger x2 (no onions) — 9.00; fries x1 —
/// Bob: burger x1 — 4.50
/// Total: 13.50 (3 items)
/// ```
///
/// One line per participant, items joined by `; `, each item as
/// `name xQty (notes) — lineTotal` with the total blank while the price is
/// pending.
pub fn render_order_text(
    snapshot: &BoardSnapshot,
    restaurant: &str,
    deadline: Option<DateTime<Utc>>,
) -> String {
    let mut out = String::new();
    match deadline {
        Some(deadline) => {
            let _ = writeln!(out, "{restaurant} (deadline: {})", fmt_deadline(deadline));
        }
        None => {
            let _ = writeln!(out, "{restaurant} (no deadline)");
        }
    }

    for summary in &snapshot.participants {
        let items: Vec<String> = summary
            .lines
            .iter()
            .map(|line| {
                let item = &line.item;
                let notes = match &item.notes {
                    Some(notes) => format!(" ({notes})"),
                    None => String::new(),
                };
                let price = match line.line_total {
                    Some(total) => format!(" {}", money(total)),
                    None => String::new(),
                };
                format!("{} x{}{notes} —{price}", item.name, item.quantity)
            })
            .collect();
        let _ = writeln!(out, "{}: {}", summary.participant.name, items.join("; "));
    }

    let _ = write!(
        out,
        "Total: {} ({} items)",
        money(snapshot.grand_total),
        snapshot.item_count
    );
    out
}

/// Renders the CSV document: a header row, then one row per item.
///
/// Columns: `participant,item,quantity,unit_price,line_total,notes`.
/// Price columns are fixed 2-decimal or empty while pending.
pub fn render_csv(snapshot: &BoardSnapshot) -> Result<String, SessionError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "participant",
        "item",
        "quantity",
        "unit_price",
        "line_total",
        "notes",
    ])?;

    for summary in &snapshot.participants {
        for line in &summary.lines {
            let item = &line.item;
            let quantity = item.quantity.to_string();
            let unit_price = item.price.map(money).unwrap_or_default();
            let line_total = line.line_total.map(money).unwrap_or_default();
            writer.write_record([
                summary.participant.name.as_str(),
                item.name.as_str(),
                quantity.as_str(),
                unit_price.as_str(),
                line_total.as_str(),
                item.notes.as_deref().unwrap_or(""),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| SessionError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SessionError::Export(e.to_string()))
}
