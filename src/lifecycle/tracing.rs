//! # Observability & Tracing
//!
//! Structured logging for the whole actor system, via the `tracing` crate.
//!
//! Every actor operation is logged with structured fields (entity type, id,
//! outcome); clients open spans per request with `#[instrument]`. Domain
//! errors are reported to callers, never swallowed here: the log is an
//! observation channel, not an error path.
//!
//! ## Configuration
//!
//! Log levels come from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # operation outcomes
//! RUST_LOG=debug cargo run     # full payloads at function entry
//! RUST_LOG=mealboard::framework=debug cargo run
//! ```
//!
//! The compact format hides module paths (`with_target(false)`) since the
//! structured `entity_type` field already says who is talking.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
