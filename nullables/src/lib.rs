//! Nullable infrastructure for deterministic testing.
//!
//! The governance core never reads a wall clock or queries a live validator
//! set on its own; both are passed in. This crate provides controllable
//! stand-ins that:
//! - Return deterministic values
//! - Can be moved programmatically (advance time, rotate epochs, change membership)
//!
//! Usage: hand these to `StakeSnapshot` / `VotingProcess` operations in tests.

pub mod clock;
pub mod voters;

pub use clock::NullClock;
pub use voters::NullVoterSet;
