//! Generic actor framework: entity trait, actor loop, client, mocks.

pub mod core;
pub mod mock;

pub use self::core::*;
