//! The active-voter-set oracle.

use crate::address::ValidatorAddress;
use std::collections::{BTreeSet, HashSet};

/// Membership predicate over the validators currently allowed to vote.
///
/// Consulted once, at the moment a ballot is cast.
pub trait ActiveVoterSet {
    fn is_active_voter(&self, voter: &ValidatorAddress) -> bool;
}

impl ActiveVoterSet for HashSet<ValidatorAddress> {
    fn is_active_voter(&self, voter: &ValidatorAddress) -> bool {
        self.contains(voter)
    }
}

impl ActiveVoterSet for BTreeSet<ValidatorAddress> {
    fn is_active_voter(&self, voter: &ValidatorAddress) -> bool {
        self.contains(voter)
    }
}

impl<T: ActiveVoterSet + ?Sized> ActiveVoterSet for &T {
    fn is_active_voter(&self, voter: &ValidatorAddress) -> bool {
        (**self).is_active_voter(voter)
    }
}
