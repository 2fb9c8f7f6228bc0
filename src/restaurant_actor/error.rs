//! Error types for the restaurant actor.

use thiserror::Error;

/// Errors that can occur during restaurant catalog operations.
#[derive(Debug, Error)]
pub enum RestaurantError {
    /// The requested restaurant does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A dish with the same name is already on the menu.
    #[error("dish already on the menu: {0}")]
    DuplicateDish(String),

    /// Message-passing failure between client and actor.
    #[error("catalog error: {0}")]
    Catalog(String),
}
