//! The stake snapshot and its admin capability.

use crate::error::StakeError;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use stakevote_types::{Clock, Epoch, ValidatorAddress};
use std::collections::BTreeMap;
use std::fmt;

/// Validator → stake amount.
pub type StakeMap = BTreeMap<ValidatorAddress, u64>;

/// Bearer credential for mutating one [`StakeSnapshot`].
///
/// Holds a random 32-byte secret; the snapshot keeps only its Blake2b-256
/// digest, so neither a snapshot record nor a fresh mint can reproduce it.
/// Not `Clone`. Persist it with [`SnapshotAdminCap::to_bytes`] and keep the
/// bytes as private as a key.
#[derive(Serialize, Deserialize)]
pub struct SnapshotAdminCap {
    secret: [u8; 32],
}

impl SnapshotAdminCap {
    fn mint() -> Result<Self, StakeError> {
        let mut secret = [0u8; 32];
        getrandom::getrandom(&mut secret).map_err(|e| StakeError::Entropy(e.to_string()))?;
        Ok(Self { secret })
    }

    fn digest(&self) -> [u8; 32] {
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(b"stakevote-snapshot-admin");
        hasher.update(self.secret);
        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StakeError> {
        bincode::serialize(self).map_err(|e| StakeError::Serialization(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StakeError> {
        bincode::deserialize(data).map_err(|e| StakeError::Serialization(e.to_string()))
    }
}

impl fmt::Debug for SnapshotAdminCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SnapshotAdminCap(..)")
    }
}

/// Stake distribution of the validator set, as last written by the admin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeSnapshot {
    /// Blake2b-256 digest of the admin capability's secret.
    admin_digest: [u8; 32],
    all_stake: StakeMap,
    ignored_stake: StakeMap,
    last_updated_epoch: Epoch,
}

impl StakeSnapshot {
    /// Create an empty snapshot at epoch 0, along with its admin capability.
    pub fn new() -> Result<(Self, SnapshotAdminCap), StakeError> {
        let cap = SnapshotAdminCap::mint()?;
        let snapshot = Self {
            admin_digest: cap.digest(),
            all_stake: StakeMap::new(),
            ignored_stake: StakeMap::new(),
            last_updated_epoch: Epoch::ZERO,
        };
        Ok((snapshot, cap))
    }

    /// Replace the full stake map and stamp the current epoch.
    pub fn update_all_stake(
        &mut self,
        cap: &SnapshotAdminCap,
        all_stake: StakeMap,
        clock: &impl Clock,
    ) -> Result<(), StakeError> {
        self.check_cap(cap)?;
        self.all_stake = all_stake;
        self.last_updated_epoch = clock.epoch();
        tracing::info!(
            validators = self.all_stake.len(),
            epoch = self.last_updated_epoch.as_u64(),
            "all-stake map replaced"
        );
        Ok(())
    }

    /// Replace the ignored-stake map and stamp the current epoch.
    pub fn update_ignored_stake(
        &mut self,
        cap: &SnapshotAdminCap,
        ignored_stake: StakeMap,
        clock: &impl Clock,
    ) -> Result<(), StakeError> {
        self.check_cap(cap)?;
        self.ignored_stake = ignored_stake;
        self.last_updated_epoch = clock.epoch();
        tracing::info!(
            entries = self.ignored_stake.len(),
            epoch = self.last_updated_epoch.as_u64(),
            "ignored-stake map replaced"
        );
        Ok(())
    }

    /// Stake per validator after subtracting ignored stake.
    ///
    /// Every key of `all_stake` appears in the result, zero-valued entries
    /// included. Ignored entries with no matching stake are dropped.
    pub fn finalized_stake(&self) -> Result<StakeMap, StakeError> {
        self.all_stake
            .iter()
            .map(|(voter, &stake)| {
                let ignored = self.ignored_stake.get(voter).copied().unwrap_or(0);
                stake
                    .checked_sub(ignored)
                    .map(|finalized| (voter.clone(), finalized))
                    .ok_or_else(|| StakeError::IgnoredStakeExceedsStake {
                        voter: voter.clone(),
                        stake,
                        ignored,
                    })
            })
            .collect()
    }

    /// Sum of the finalized stake, widened so it cannot overflow.
    pub fn total_finalized_stake(&self) -> Result<u128, StakeError> {
        Ok(self
            .finalized_stake()?
            .values()
            .map(|&s| u128::from(s))
            .sum())
    }

    /// Whether the snapshot was last written during `current_epoch`.
    pub fn is_up_to_date(&self, current_epoch: Epoch) -> bool {
        self.last_updated_epoch == current_epoch
    }

    pub fn all_stake(&self) -> &StakeMap {
        &self.all_stake
    }

    pub fn ignored_stake(&self) -> &StakeMap {
        &self.ignored_stake
    }

    pub fn last_updated_epoch(&self) -> Epoch {
        self.last_updated_epoch
    }

    /// Serialize the snapshot record for persistence. The capability is not included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StakeError> {
        bincode::serialize(self).map_err(|e| StakeError::Serialization(e.to_string()))
    }

    /// Restore a snapshot record written by [`StakeSnapshot::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, StakeError> {
        bincode::deserialize(data).map_err(|e| StakeError::Serialization(e.to_string()))
    }

    fn check_cap(&self, cap: &SnapshotAdminCap) -> Result<(), StakeError> {
        if cap.digest() != self.admin_digest {
            return Err(StakeError::CapabilityMismatch);
        }
        Ok(())
    }
}
