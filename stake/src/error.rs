//! Stake-snapshot errors.

use stakevote_types::ValidatorAddress;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("ignored stake {ignored} exceeds stake {stake} for validator {voter}")]
    IgnoredStakeExceedsStake {
        voter: ValidatorAddress,
        stake: u64,
        ignored: u64,
    },

    #[error("admin capability does not belong to this snapshot")]
    CapabilityMismatch,

    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
