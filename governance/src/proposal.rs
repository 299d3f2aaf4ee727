//! The proposal under vote: its outcome and its fixed schedule.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use stakevote_types::Timestamp;

/// Outcome of the vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteResult {
    /// Not finalized yet.
    Pending,
    /// Quorum reached and yes outweighed no. Terminal.
    Passed,
    /// Finalized without passing. Terminal.
    NotPassed,
}

impl VoteResult {
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Production proposal text.
pub const PROPOSAL_DESCRIPTION: &str = "Lower the validator joining stake threshold from \
    30,000,000 to 15,000,000 staked units and the low-stake removal threshold from \
    20,000,000 to 10,000,000, effective from the first epoch after the vote passes";

/// Production window start: 2026-11-02T00:00:00Z.
pub const START_TIMESTAMP_MS: u64 = 1_793_577_600_000;

/// Earliest early-termination time: one week after start.
pub const MINIMUM_DURATION_TIMESTAMP_MS: u64 = START_TIMESTAMP_MS + 7 * 24 * 60 * 60 * 1_000;

/// Production window end: two weeks after start.
pub const END_TIMESTAMP_MS: u64 = START_TIMESTAMP_MS + 14 * 24 * 60 * 60 * 1_000;

/// Description and schedule of the proposal.
///
/// The three timestamps are non-decreasing: `start <= minimum_duration <= end`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalParams {
    pub description: String,
    /// Voting opens (inclusive).
    pub start_timestamp_ms: Timestamp,
    /// Earliest time finalization may end the vote early.
    pub minimum_duration_timestamp_ms: Timestamp,
    /// Voting closes (exclusive).
    pub end_timestamp_ms: Timestamp,
}

impl ProposalParams {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.start_timestamp_ms > self.minimum_duration_timestamp_ms
            || self.minimum_duration_timestamp_ms > self.end_timestamp_ms
        {
            return Err(GovernanceError::InvalidSchedule {
                start: self.start_timestamp_ms,
                minimum_duration: self.minimum_duration_timestamp_ms,
                end: self.end_timestamp_ms,
            });
        }
        Ok(())
    }
}

impl Default for ProposalParams {
    fn default() -> Self {
        Self {
            description: PROPOSAL_DESCRIPTION.to_string(),
            start_timestamp_ms: Timestamp::from_millis(START_TIMESTAMP_MS),
            minimum_duration_timestamp_ms: Timestamp::from_millis(MINIMUM_DURATION_TIMESTAMP_MS),
            end_timestamp_ms: Timestamp::from_millis(END_TIMESTAMP_MS),
        }
    }
}
