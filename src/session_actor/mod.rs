//! Session-specific resource logic and entity implementation.
//!
//! The session actor owns every [`Session`] aggregate and is the
//! per-session serialization point: one message at a time, so concurrent
//! participants never interleave inside a mutation.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::SessionDeps;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Session;

/// Creates a new session actor and its generic client.
pub fn new() -> (ResourceActor<Session>, ResourceClient<Session>) {
    ResourceActor::new(32)
}
