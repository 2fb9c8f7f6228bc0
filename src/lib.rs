//! # Mealboard
//!
//! > **A group food-order coordinator built as a small actor system.**
//!
//! An organizer opens an order session tied to a restaurant and a deadline;
//! participants append line items (name, quantity, price, notes) until the
//! session locks; the board aggregates per-participant subtotals and a
//! grand total; exports render the finalized order as plain text or CSV.
//!
//! ## Core Concepts
//!
//! ### Sessions are state machines
//! A session moves `Open → Locked → Closed`, with `Cancelled` as an escape
//! hatch before closing. Items can only change while `Open`, and a passed
//! deadline locks the session lazily on the next access; there are no
//! background timers.
//!
//! ### One actor owns each resource
//! A session's item list and state are shared mutable data under concurrent
//! requests. Instead of handing out locks, each resource type lives behind
//! a [`framework::ResourceActor`] processing messages sequentially: all
//! writes to one session are totally ordered, reads get consistent
//! snapshots, and independent sessions never contend.
//!
//! ### Aggregation and export are pure
//! [`board::aggregate`] and the [`export`] renderers are pure functions of
//! the item list: same items in, byte-identical output, which is what
//! makes the export formats a dependable interop contract.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `ResourceActor<T>` / `ResourceClient<T>` pair and the
//! [`ActorEntity`](framework::ActorEntity) trait. Business logic lives in
//! entities; channels, message loops and error plumbing are written once.
//!
//! ### 2. The Domain ([`model`], [`board`], [`export`])
//! Pure data and pure functions: sessions with their state machine and item
//! store, the aggregation snapshot, and the renderers.
//!
//! ### 3. The Actors ([`session_actor`], [`restaurant_actor`])
//! [`ActorEntity`](framework::ActorEntity) implementations. The session
//! actor serializes all mutation per session and consults the restaurant
//! actor for reference data; the restaurant actor owns the menus.
//!
//! ### 4. The Interface ([`clients`])
//! Typed wrappers hiding the message passing:
//! [`SessionClient`](clients::SessionClient) is the coordinator's public
//! operation set, [`RestaurantClient`](clients::RestaurantClient) the
//! catalog's.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`MealboardSystem`](lifecycle::MealboardSystem) spins the actors up,
//! wires the contexts (including the injectable [`clock`]), and shuts the
//! system down gracefully.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```
//!
//! Identity is the caller's job: every operation takes a
//! [`Participant`](model::Participant) (id, display name, admin flag) that
//! the engine trusts. Wire this crate behind whatever transport and
//! authentication layer you like.

pub mod board;
pub mod clients;
pub mod clock;
pub mod export;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod restaurant_actor;
pub mod session_actor;
