//! Restaurant catalog actor.
//!
//! Holds the known restaurants and their menus. Read-mostly: the session
//! actor queries it to validate references and pre-fill prices.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Restaurant;

/// Creates a new restaurant actor and its generic client.
pub fn new() -> (ResourceActor<Restaurant>, ResourceClient<Restaurant>) {
    ResourceActor::new(32)
}
