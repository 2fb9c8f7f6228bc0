//! # System Lifecycle & Orchestration
//!
//! Wiring is where actor systems earn their complexity budget. This module
//! provides the conductor: [`MealboardSystem`] creates the actors, injects
//! dependencies via context ("late binding": construct without
//! dependencies, inject at `run()`), and coordinates graceful shutdown by
//! dropping clients and awaiting the actor tasks.
//!
//! The session actor depends on the restaurant client and on the clock;
//! both arrive through its context. The dependency graph is acyclic, so
//! channel closure propagates cleanly: once the public clients drop, the
//! session actor exits, its context drops the restaurant client clone, and
//! the restaurant actor exits in turn.
//!
//! [`setup_tracing`] initializes the structured logging stack for binaries
//! and examples; libraries and tests leave the subscriber to the host.

pub mod system;
pub mod tracing;

pub use self::system::*;
pub use self::tracing::*;
