//! Nullable voter set: an active-validator oracle whose membership tests control.

use stakevote_types::{ActiveVoterSet, ValidatorAddress};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// In-memory active voter set that can change between calls.
#[derive(Default)]
pub struct NullVoterSet {
    members: RefCell<BTreeSet<ValidatorAddress>>,
}

impl NullVoterSet {
    pub fn new(members: impl IntoIterator<Item = ValidatorAddress>) -> Self {
        Self {
            members: RefCell::new(members.into_iter().collect()),
        }
    }

    pub fn add(&self, voter: ValidatorAddress) {
        self.members.borrow_mut().insert(voter);
    }

    /// Drop a validator from the active set (e.g. it left the committee).
    pub fn remove(&self, voter: &ValidatorAddress) {
        self.members.borrow_mut().remove(voter);
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }
}

impl ActiveVoterSet for NullVoterSet {
    fn is_active_voter(&self, voter: &ValidatorAddress) -> bool {
        self.members.borrow().contains(voter)
    }
}
