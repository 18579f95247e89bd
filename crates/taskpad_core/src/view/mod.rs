//! View projection and declarative rendering.
//!
//! # Responsibility
//! - Derive the visible, ordered record list from store state and UI state.
//! - Describe the page as plain values so presentation stays decoupled from
//!   store mutation.
//! - Drive per-field inline editing.
//!
//! # Invariants
//! - Projection and rendering are pure: equal inputs give equal outputs.
//! - Display order is never written back to the store.

pub mod edit;
pub mod projector;
pub mod render;
pub mod state;
