//! Pure domain types shared across the engine.
//!
//! Nothing in here performs I/O; these are the records that flow
//! through the pipeline and into the store.

pub mod bucket;
pub mod execution;
pub mod forecast;
pub mod market;
pub mod position;
pub mod risk;
pub mod signal;
pub mod summary;

/// Opaque unique identifier for one pipeline cycle.
pub type RunId = String;

/// Generate a fresh run id.
#[must_use]
pub fn new_run_id() -> RunId {
    uuid::Uuid::new_v4().to_string()
}
