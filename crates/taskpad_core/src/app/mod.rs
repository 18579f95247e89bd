//! Event-driven application controller.
//!
//! # Responsibility
//! - Translate UI events into store mutations and UI state changes.
//! - Gate destructive actions behind explicit confirmation.
//! - Re-render after every handled event.
//!
//! # Invariants
//! - Events are handled one at a time; no handler re-enters another.
//! - Declined confirmations and rejected input leave the store unchanged.
//! - An open inline edit is closed, committed or reverted, before any event
//!   that moves focus away from it.

pub mod controller;
pub mod keys;
