use stakevote_stake::StakeError;
use stakevote_types::{Epoch, Timestamp, ValidatorAddress};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("validator {0} is not an eligible voter")]
    NotEligibleVoter(ValidatorAddress),

    #[error("voting is not open")]
    VotingNotOpen,

    #[error("invalid ballot {0:?}: expected \"Yes\", \"No\" or \"Abstain\"")]
    InvalidBallot(String),

    #[error("validator {0} has already cast a ballot")]
    AlreadyVoted(ValidatorAddress),

    #[error("stake snapshot last updated in {last_updated}, not fresh enough to finalize in {current}")]
    SnapshotStale { last_updated: Epoch, current: Epoch },

    #[error("vote has already been finalized")]
    AlreadyFinalized,

    #[error("voting is still open and cannot end early")]
    VotingStillOpen,

    #[error("proposal has not passed")]
    NotPassed,

    #[error("invalid schedule: start {start}, minimum duration {minimum_duration}, end {end} must be non-decreasing")]
    InvalidSchedule {
        start: Timestamp,
        minimum_duration: Timestamp,
        end: Timestamp,
    },

    #[error("stake reconciliation failed: {0}")]
    Stake(#[from] StakeError),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
