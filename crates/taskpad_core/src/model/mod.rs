//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical note/task record persisted by the store.
//! - Own record-level validation shared by create, load and import paths.
//!
//! # Invariants
//! - Every record carries a non-empty opaque id.
//! - `updated >= created` for every valid record.

pub mod record;
