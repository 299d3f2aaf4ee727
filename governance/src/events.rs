//! Audit records emitted by the voting process, and the bus that delivers them.

use crate::ballot::Ballot;
use crate::error::GovernanceError;
use crate::proposal::VoteResult;
use crate::tally::VoteTally;
use serde::{Deserialize, Serialize};
use stakevote_stake::StakeMap;
use stakevote_types::{Epoch, Timestamp, ValidatorAddress};
use std::collections::BTreeMap;

/// Permanent audit trail of a finalization: the outcome together with every
/// input that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationRecord {
    pub outcome: VoteResult,
    pub votes: BTreeMap<ValidatorAddress, Ballot>,
    /// Raw stake map of the snapshot used.
    pub all_stake: StakeMap,
    /// Ignored-stake map of the snapshot used.
    pub ignored_stake: StakeMap,
    pub tally: VoteTally,
    pub finalized_at: Timestamp,
    pub epoch: Epoch,
    /// Finalized before the end timestamp through the early-termination rule.
    pub ended_early: bool,
}

impl FinalizationRecord {
    /// Render the record as pretty-printed JSON for archival.
    pub fn to_json(&self) -> Result<String, GovernanceError> {
        serde_json::to_string_pretty(self).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }
}

/// Events observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    /// A ballot was recorded.
    BallotCast {
        voter: ValidatorAddress,
        ballot: Ballot,
    },
    /// The vote reached its terminal state.
    VoteFinalized(FinalizationRecord),
}

/// Synchronous fan-out event bus for governance events.
///
/// Listeners run inline on the calling thread, after the operation has
/// committed its state change.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
