//! Stake snapshot for the validator set.
//!
//! Holds the authoritative per-validator stake and a second map of stake to
//! exclude (delegations from a neutral party). The reconciled "finalized"
//! view is derived on demand so the two source maps stay the single source
//! of truth:
//!
//! `finalized(v) = all_stake(v) − ignored_stake(v)`
//!
//! Mutation is gated by a [`SnapshotAdminCap`] minted once, together with
//! the snapshot, and passed explicitly into every update.

pub mod error;
pub mod snapshot;

pub use error::StakeError;
pub use snapshot::{SnapshotAdminCap, StakeMap, StakeSnapshot};
