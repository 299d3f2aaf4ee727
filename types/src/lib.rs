//! Fundamental types for stake-weighted validator governance.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! validator identities, millisecond timestamps, logical epochs, and the two
//! external oracles (clock and active voter set) that operations are handed
//! explicitly.

pub mod address;
pub mod error;
pub mod time;
pub mod voters;

pub use address::ValidatorAddress;
pub use error::TypesError;
pub use time::{Clock, Epoch, Timestamp};
pub use voters::ActiveVoterSet;
