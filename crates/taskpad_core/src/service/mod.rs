//! Core use-case services.
//!
//! # Responsibility
//! - Own the record collection and its persistence lifecycle.
//! - Sanitize external input before it reaches the collection.
//! - Persist small UI preferences next to the records.

pub mod preferences;
pub mod record_store;
pub mod sanitize;
