//! Custom actions for the restaurant actor: menu management and lookup.

use crate::model::MenuEntry;

/// Operations on one restaurant's menu.
#[derive(Debug, Clone)]
pub enum RestaurantAction {
    /// Add a dish to the menu.
    AddDish(MenuEntry),
    /// Look up a dish by name (case-insensitive). Read-only; used by the
    /// session actor to pre-fill prices.
    QuoteDish(String),
}

/// Results, variants matching 1:1 with [`RestaurantAction`].
#[derive(Debug, Clone)]
pub enum RestaurantActionResult {
    DishAdded,
    Quote(Option<MenuEntry>),
}
