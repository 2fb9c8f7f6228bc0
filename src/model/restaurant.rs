//! Restaurant reference data: where a session orders from, and the known menu.
//!
//! The menu is a convenience: it pre-fills prices when a participant adds a
//! dish by its listed name. Free-text item names always remain permitted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for restaurants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestaurantId(pub u32);

impl From<u32> for RestaurantId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "restaurant_{}", self.0)
    }
}

/// One dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub name: String,
    pub price: Decimal,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub url: Option<String>,
    pub menu: Vec<MenuEntry>,
}

impl Restaurant {
    /// Case-insensitive menu lookup by dish name.
    pub fn dish(&self, name: &str) -> Option<&MenuEntry> {
        let wanted = name.trim().to_lowercase();
        self.menu.iter().find(|e| e.name.to_lowercase() == wanted)
    }
}

/// Payload for registering a new restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub url: Option<String>,
    pub menu: Vec<MenuEntry>,
}

/// Partial update for an existing restaurant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn dish_lookup_ignores_case_and_whitespace() {
        let restaurant = Restaurant {
            id: RestaurantId(1),
            name: "Pizza Corner".to_string(),
            url: None,
            menu: vec![MenuEntry::new("Margherita", dec!(8.50))],
        };
        assert_eq!(
            restaurant.dish(" margherita ").map(|e| e.price),
            Some(dec!(8.50))
        );
        assert!(restaurant.dish("calzone").is_none());
    }
}
