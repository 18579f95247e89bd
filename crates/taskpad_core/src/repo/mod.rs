//! Key/value persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the slot-level storage contract used by the record store and
//!   preferences.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - A `put` replaces the whole slot value in a single statement.
//! - Repository constructors reject connections that were never migrated.

pub mod kv_repo;
