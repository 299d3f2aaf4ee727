//! Stake-weighted tally and the quorum, pass and early-termination rules.
//!
//! All sums are `u128` so doubling the participating stake cannot overflow
//! for any realistic validator set.

use crate::ballot::Ballot;
use serde::{Deserialize, Serialize};
use stakevote_stake::StakeMap;
use stakevote_types::ValidatorAddress;
use std::collections::BTreeMap;

/// Stake behind each ballot value, plus the total finalized stake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes_stake: u128,
    pub no_stake: u128,
    pub abstain_stake: u128,
    /// Sum of every finalized stake entry, voters or not.
    pub total_stake: u128,
}

impl VoteTally {
    /// Tally `votes` against reconciled stake.
    ///
    /// Validators without a ballot only add to `total_stake`. Ballots from
    /// validators missing from `finalized_stake` weigh nothing.
    pub fn compute(
        votes: &BTreeMap<ValidatorAddress, Ballot>,
        finalized_stake: &StakeMap,
    ) -> Self {
        let mut tally = Self::default();
        for (voter, &stake) in finalized_stake {
            let stake = u128::from(stake);
            tally.total_stake += stake;
            match votes.get(voter) {
                Some(Ballot::Yes) => tally.yes_stake += stake,
                Some(Ballot::No) => tally.no_stake += stake,
                Some(Ballot::Abstain) => tally.abstain_stake += stake,
                None => {}
            }
        }
        tally
    }

    /// Stake that cast no ballot at all.
    pub fn non_participating(&self) -> u128 {
        self.total_stake
            .saturating_sub(self.yes_stake + self.no_stake + self.abstain_stake)
    }

    /// More than half of the total stake voted Yes or No.
    pub fn participation_quorum_reached(&self) -> bool {
        (self.yes_stake + self.no_stake) * 2 > self.total_stake
    }

    pub fn passed(&self) -> bool {
        self.yes_stake > self.no_stake && self.participation_quorum_reached()
    }

    /// Yes wins even if every non-participating validator later counted as No.
    pub fn has_majority(&self) -> bool {
        self.yes_stake > self.no_stake + self.non_participating()
    }
}
