//! The voting process state machine.

use crate::ballot::Ballot;
use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::events::{EventBus, FinalizationRecord, GovernanceEvent};
use crate::proposal::{ProposalParams, VoteResult};
use crate::tally::VoteTally;
use serde::{Deserialize, Serialize};
use stakevote_stake::StakeSnapshot;
use stakevote_types::{ActiveVoterSet, Clock, Timestamp, ValidatorAddress};
use std::collections::BTreeMap;

/// Ballot collection and finalization for a single proposal.
///
/// Every operation either applies completely or fails without touching state
/// or emitting events. Callers serialize operations on one instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingProcess {
    result: VoteResult,
    params: ProposalParams,
    /// Insert-only: a validator appears at most once and is never removed.
    votes: BTreeMap<ValidatorAddress, Ballot>,
}

impl VotingProcess {
    /// The production instance, with the baked-in description and schedule.
    pub fn new() -> Self {
        Self::with_params(ProposalParams::default())
    }

    /// An instance with an overridden description and schedule.
    pub fn new_for_testing(params: ProposalParams) -> Result<Self, GovernanceError> {
        params.validate()?;
        Ok(Self::with_params(params))
    }

    /// Build from config: the `[proposal]` override if present, production otherwise.
    pub fn from_config(config: &GovernanceConfig) -> Result<Self, GovernanceError> {
        match &config.proposal {
            Some(params) => Self::new_for_testing(params.clone()),
            None => Ok(Self::new()),
        }
    }

    fn with_params(params: ProposalParams) -> Self {
        Self {
            result: VoteResult::Pending,
            params,
            votes: BTreeMap::new(),
        }
    }

    /// Record `voter`'s ballot.
    ///
    /// Checked in order: eligibility, open window, ballot token, duplicate.
    pub fn vote(
        &mut self,
        voter: &ValidatorAddress,
        ballot: &str,
        clock: &impl Clock,
        voters: &impl ActiveVoterSet,
        events: &EventBus,
    ) -> Result<(), GovernanceError> {
        if !voters.is_active_voter(voter) {
            return Err(GovernanceError::NotEligibleVoter(voter.clone()));
        }
        if !self.is_voting_open(clock.now()) {
            return Err(GovernanceError::VotingNotOpen);
        }
        let ballot: Ballot = ballot.parse()?;
        if self.votes.contains_key(voter) {
            return Err(GovernanceError::AlreadyVoted(voter.clone()));
        }

        self.votes.insert(voter.clone(), ballot);
        tracing::info!(voter = %voter, ballot = %ballot, "ballot cast");
        events.emit(&GovernanceEvent::BallotCast {
            voter: voter.clone(),
            ballot,
        });
        Ok(())
    }

    /// Tally the recorded ballots against the snapshot's reconciled stake.
    pub fn tally(&self, snapshot: &StakeSnapshot) -> Result<VoteTally, GovernanceError> {
        let finalized = snapshot.finalized_stake()?;
        Ok(VoteTally::compute(&self.votes, &finalized))
    }

    /// Decide the outcome and move to a terminal state.
    ///
    /// Requires a snapshot written in the current epoch. Succeeds once the
    /// window has ended, or earlier if the minimum duration has passed and
    /// the outcome is already decided in Yes's favour.
    pub fn finalize(
        &mut self,
        snapshot: &StakeSnapshot,
        clock: &impl Clock,
        events: &EventBus,
    ) -> Result<FinalizationRecord, GovernanceError> {
        let epoch = clock.epoch();
        if !snapshot.is_up_to_date(epoch) {
            return Err(GovernanceError::SnapshotStale {
                last_updated: snapshot.last_updated_epoch(),
                current: epoch,
            });
        }
        if self.result.is_final() {
            return Err(GovernanceError::AlreadyFinalized);
        }

        let now = clock.now();
        let tally = self.tally(snapshot)?;
        let outcome = if tally.passed() {
            VoteResult::Passed
        } else {
            VoteResult::NotPassed
        };
        tracing::debug!(
            yes = %tally.yes_stake,
            no = %tally.no_stake,
            abstain = %tally.abstain_stake,
            total = %tally.total_stake,
            quorum = tally.participation_quorum_reached(),
            majority = tally.has_majority(),
            "tally computed"
        );

        let can_end_early = now >= self.params.minimum_duration_timestamp_ms
            && tally.has_majority()
            && tally.participation_quorum_reached();
        let window_closed = now >= self.params.end_timestamp_ms;
        if !window_closed && !can_end_early {
            return Err(GovernanceError::VotingStillOpen);
        }

        self.result = outcome;
        let record = FinalizationRecord {
            outcome,
            votes: self.votes.clone(),
            all_stake: snapshot.all_stake().clone(),
            ignored_stake: snapshot.ignored_stake().clone(),
            tally,
            finalized_at: now,
            epoch,
            ended_early: !window_closed,
        };
        tracing::info!(
            outcome = ?outcome,
            ballots = record.votes.len(),
            ended_early = record.ended_early,
            "vote finalized"
        );
        events.emit(&GovernanceEvent::VoteFinalized(record.clone()));
        Ok(record)
    }

    /// Guard for downstream execution: fails unless the proposal passed.
    pub fn assert_can_be_executed(&self) -> Result<(), GovernanceError> {
        match self.result {
            VoteResult::Passed => Ok(()),
            _ => Err(GovernanceError::NotPassed),
        }
    }

    /// Whether a ballot cast at `now` would fall inside the open window.
    pub fn is_voting_open(&self, now: Timestamp) -> bool {
        self.result == VoteResult::Pending
            && now >= self.params.start_timestamp_ms
            && now < self.params.end_timestamp_ms
    }

    pub fn result(&self) -> VoteResult {
        self.result
    }

    pub fn description(&self) -> &str {
        &self.params.description
    }

    pub fn params(&self) -> &ProposalParams {
        &self.params
    }

    pub fn votes(&self) -> &BTreeMap<ValidatorAddress, Ballot> {
        &self.votes
    }

    pub fn ballot_of(&self, voter: &ValidatorAddress) -> Option<Ballot> {
        self.votes.get(voter).copied()
    }

    /// Serialize the process record for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }

    /// Restore a process record written by [`VotingProcess::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, GovernanceError> {
        let process: Self =
            bincode::deserialize(data).map_err(|e| GovernanceError::Serialization(e.to_string()))?;
        process.params.validate()?;
        Ok(process)
    }
}

impl Default for VotingProcess {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakevote_nullables::{NullClock, NullVoterSet};
    use stakevote_stake::{SnapshotAdminCap, StakeMap};
    use stakevote_types::Epoch;
    use std::sync::{Arc, Mutex};

    const START: u64 = 1_000;
    const MIN: u64 = 5_000;
    const END: u64 = 10_000;

    fn validator(n: u8) -> ValidatorAddress {
        ValidatorAddress::from_bytes([n; 32])
    }

    fn test_process() -> VotingProcess {
        VotingProcess::new_for_testing(ProposalParams {
            description: "raise the gas price floor".into(),
            start_timestamp_ms: Timestamp::from_millis(START),
            minimum_duration_timestamp_ms: Timestamp::from_millis(MIN),
            end_timestamp_ms: Timestamp::from_millis(END),
        })
        .unwrap()
    }

    fn voter_set(ids: impl IntoIterator<Item = u8>) -> NullVoterSet {
        NullVoterSet::new(ids.into_iter().map(validator))
    }

    fn recording_bus() -> (EventBus, Arc<Mutex<Vec<GovernanceEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = seen.clone();
        bus.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));
        (bus, seen)
    }

    fn snapshot_with(
        entries: &[(u8, u64)],
        clock: &NullClock,
    ) -> (StakeSnapshot, SnapshotAdminCap) {
        let (mut snapshot, cap) = StakeSnapshot::new().unwrap();
        let map: StakeMap = entries.iter().map(|&(n, s)| (validator(n), s)).collect();
        snapshot.update_all_stake(&cap, map, clock).unwrap();
        (snapshot, cap)
    }

    #[test]
    fn production_instance_uses_defaults() {
        let process = VotingProcess::new();
        assert_eq!(process.params(), &ProposalParams::default());
        assert_eq!(process.result(), VoteResult::Pending);
        assert!(process.votes().is_empty());
    }

    #[test]
    fn new_for_testing_rejects_bad_schedule() {
        let err = VotingProcess::new_for_testing(ProposalParams {
            description: "bad".into(),
            start_timestamp_ms: Timestamp::from_millis(10),
            minimum_duration_timestamp_ms: Timestamp::from_millis(5),
            end_timestamp_ms: Timestamp::from_millis(20),
        })
        .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidSchedule { .. }));
    }

    #[test]
    fn vote_records_ballot_and_emits_event() {
        let mut process = test_process();
        let clock = NullClock::new(START, 0);
        let voters = voter_set([1]);
        let (bus, seen) = recording_bus();

        process
            .vote(&validator(1), "Yes", &clock, &voters, &bus)
            .unwrap();

        assert_eq!(process.ballot_of(&validator(1)), Some(Ballot::Yes));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![GovernanceEvent::BallotCast {
                voter: validator(1),
                ballot: Ballot::Yes,
            }]
        );
    }

    #[test]
    fn ineligible_voter_rejected_first() {
        let mut process = test_process();
        // Outside the window and with a bad token: eligibility still wins.
        let clock = NullClock::new(0, 0);
        let voters = voter_set([1]);
        let err = process
            .vote(&validator(2), "Maybe", &clock, &voters, &EventBus::new())
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NotEligibleVoter(v) if v == validator(2)));
    }

    #[test]
    fn window_is_half_open() {
        let mut process = test_process();
        let voters = voter_set([1, 2, 3]);
        let bus = EventBus::new();

        let before = NullClock::new(START - 1, 0);
        assert!(matches!(
            process.vote(&validator(1), "Yes", &before, &voters, &bus),
            Err(GovernanceError::VotingNotOpen)
        ));

        let at_start = NullClock::new(START, 0);
        process
            .vote(&validator(1), "Yes", &at_start, &voters, &bus)
            .unwrap();

        let last = NullClock::new(END - 1, 0);
        process.vote(&validator(2), "No", &last, &voters, &bus).unwrap();

        let at_end = NullClock::new(END, 0);
        assert!(matches!(
            process.vote(&validator(3), "Yes", &at_end, &voters, &bus),
            Err(GovernanceError::VotingNotOpen)
        ));
    }

    #[test]
    fn timing_checked_before_ballot_token() {
        let mut process = test_process();
        let clock = NullClock::new(END, 0);
        let voters = voter_set([1]);
        assert!(matches!(
            process.vote(&validator(1), "bogus", &clock, &voters, &EventBus::new()),
            Err(GovernanceError::VotingNotOpen)
        ));
    }

    #[test]
    fn invalid_ballot_rejected_before_duplicate_check() {
        let mut process = test_process();
        let clock = NullClock::new(START, 0);
        let voters = voter_set([1]);
        let bus = EventBus::new();
        process.vote(&validator(1), "No", &clock, &voters, &bus).unwrap();

        assert!(matches!(
            process.vote(&validator(1), "yes", &clock, &voters, &bus),
            Err(GovernanceError::InvalidBallot(_))
        ));
    }

    #[test]
    fn second_ballot_rejected_regardless_of_value() {
        let mut process = test_process();
        let clock = NullClock::new(START, 0);
        let voters = voter_set([1]);
        let (bus, seen) = recording_bus();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();

        for token in ["Yes", "No", "Abstain"] {
            let err = process
                .vote(&validator(1), token, &clock, &voters, &bus)
                .unwrap_err();
            assert!(matches!(err, GovernanceError::AlreadyVoted(_)));
        }
        assert_eq!(process.ballot_of(&validator(1)), Some(Ballot::Yes));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn finalize_requires_fresh_snapshot() {
        let mut process = test_process();
        let clock = NullClock::new(END, 3);
        let (snapshot, _cap) = snapshot_with(&[(1, 100)], &clock);

        clock.advance_epoch();
        let err = process
            .finalize(&snapshot, &clock, &EventBus::new())
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::SnapshotStale { last_updated, current }
                if last_updated == Epoch::new(3) && current == Epoch::new(4)
        ));
        assert_eq!(process.result(), VoteResult::Pending);
    }

    #[test]
    fn finalize_before_end_without_majority_fails() {
        let mut process = test_process();
        let clock = NullClock::new(START, 1);
        let voters = voter_set([1, 2]);
        let (bus, seen) = recording_bus();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        process.vote(&validator(2), "No", &clock, &voters, &bus).unwrap();

        // yes=60 does not exceed no=40 plus the 50 that never voted.
        clock.set(MIN);
        let (snapshot, _cap) = snapshot_with(&[(1, 60), (2, 40), (3, 50)], &clock);
        assert!(matches!(
            process.finalize(&snapshot, &clock, &bus),
            Err(GovernanceError::VotingStillOpen)
        ));
        assert_eq!(process.result(), VoteResult::Pending);
        // Only the two ballots were emitted.
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn early_end_waits_for_minimum_duration() {
        let mut process = test_process();
        let clock = NullClock::new(START, 1);
        let voters = voter_set([1, 2]);
        let bus = EventBus::new();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        let (snapshot, _cap) = snapshot_with(&[(1, 90), (2, 10)], &clock);

        clock.set(MIN - 1);
        assert!(matches!(
            process.finalize(&snapshot, &clock, &bus),
            Err(GovernanceError::VotingStillOpen)
        ));

        clock.set(MIN);
        let record = process.finalize(&snapshot, &clock, &bus).unwrap();
        assert_eq!(record.outcome, VoteResult::Passed);
        assert!(record.ended_early);
        assert_eq!(process.result(), VoteResult::Passed);
    }

    #[test]
    fn finalize_twice_fails_and_keeps_result() {
        let mut process = test_process();
        let clock = NullClock::new(START, 1);
        let voters = voter_set([1]);
        let bus = EventBus::new();
        process.vote(&validator(1), "No", &clock, &voters, &bus).unwrap();

        clock.set(END);
        let (snapshot, _cap) = snapshot_with(&[(1, 100)], &clock);
        let record = process.finalize(&snapshot, &clock, &bus).unwrap();
        assert_eq!(record.outcome, VoteResult::NotPassed);
        assert!(!record.ended_early);

        assert!(matches!(
            process.finalize(&snapshot, &clock, &bus),
            Err(GovernanceError::AlreadyFinalized)
        ));
        assert_eq!(process.result(), VoteResult::NotPassed);
    }

    #[test]
    fn no_votes_after_finalization() {
        let mut process = test_process();
        let clock = NullClock::new(START, 1);
        let voters = voter_set([1, 2]);
        let bus = EventBus::new();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        clock.set(MIN);
        let (snapshot, _cap) = snapshot_with(&[(1, 100), (2, 10)], &clock);
        process.finalize(&snapshot, &clock, &bus).unwrap();

        assert!(!process.is_voting_open(clock.now()));
        assert!(matches!(
            process.vote(&validator(2), "No", &clock, &voters, &bus),
            Err(GovernanceError::VotingNotOpen)
        ));
    }

    #[test]
    fn stake_underflow_surfaces_as_error() {
        let mut process = test_process();
        let clock = NullClock::new(END, 1);
        let (mut snapshot, cap) = snapshot_with(&[(1, 10)], &clock);
        snapshot
            .update_ignored_stake(&cap, StakeMap::from([(validator(1), 20)]), &clock)
            .unwrap();

        let err = process
            .finalize(&snapshot, &clock, &EventBus::new())
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Stake(_)));
        assert_eq!(process.result(), VoteResult::Pending);
    }

    #[test]
    fn finalization_record_captures_snapshot() {
        let mut process = test_process();
        let clock = NullClock::new(START, 2);
        let voters = voter_set([1, 2]);
        let (bus, seen) = recording_bus();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        process.vote(&validator(2), "Abstain", &clock, &voters, &bus).unwrap();

        clock.set(END);
        let (mut snapshot, cap) = snapshot_with(&[(1, 100), (2, 50)], &clock);
        let ignored = StakeMap::from([(validator(1), 30)]);
        snapshot
            .update_ignored_stake(&cap, ignored.clone(), &clock)
            .unwrap();

        let record = process.finalize(&snapshot, &clock, &bus).unwrap();
        assert_eq!(record.all_stake, *snapshot.all_stake());
        assert_eq!(record.ignored_stake, ignored);
        assert_eq!(record.votes, *process.votes());
        assert_eq!(record.tally.yes_stake, 70);
        assert_eq!(record.tally.abstain_stake, 50);
        assert_eq!(record.tally.total_stake, 120);
        assert_eq!(record.finalized_at, Timestamp::from_millis(END));
        assert_eq!(record.epoch, Epoch::new(2));
        // 70 * 2 = 140 > 120
        assert_eq!(record.outcome, VoteResult::Passed);

        let events = seen.lock().unwrap();
        assert_eq!(
            events.last(),
            Some(&GovernanceEvent::VoteFinalized(record.clone()))
        );
    }

    #[test]
    fn voter_who_left_set_still_counts() {
        let mut process = test_process();
        let clock = NullClock::new(START, 1);
        let voters = voter_set([1, 2]);
        let bus = EventBus::new();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        voters.remove(&validator(1));

        clock.set(END);
        let (snapshot, _cap) = snapshot_with(&[(1, 80), (2, 20)], &clock);
        let record = process.finalize(&snapshot, &clock, &bus).unwrap();
        assert_eq!(record.tally.yes_stake, 80);
        assert_eq!(record.outcome, VoteResult::Passed);
    }

    #[test]
    fn execution_guard() {
        let mut process = test_process();
        assert!(matches!(
            process.assert_can_be_executed(),
            Err(GovernanceError::NotPassed)
        ));

        let clock = NullClock::new(START, 1);
        let voters = voter_set([1]);
        let bus = EventBus::new();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        clock.set(END);
        let (snapshot, _cap) = snapshot_with(&[(1, 1)], &clock);
        process.finalize(&snapshot, &clock, &bus).unwrap();
        process.assert_can_be_executed().unwrap();
    }

    #[test]
    fn not_passed_blocks_execution() {
        let mut process = test_process();
        let clock = NullClock::new(END, 1);
        let (snapshot, _cap) = snapshot_with(&[(1, 1)], &clock);
        process.finalize(&snapshot, &clock, &EventBus::new()).unwrap();
        assert_eq!(process.result(), VoteResult::NotPassed);
        assert!(process.assert_can_be_executed().is_err());
    }

    #[test]
    fn persistence_round_trip() {
        let mut process = test_process();
        let clock = NullClock::new(START, 1);
        let voters = voter_set([1, 2]);
        let bus = EventBus::new();
        process.vote(&validator(1), "Yes", &clock, &voters, &bus).unwrap();
        process.vote(&validator(2), "Abstain", &clock, &voters, &bus).unwrap();

        let restored = VotingProcess::from_bytes(&process.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, process);
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        assert!(matches!(
            VotingProcess::from_bytes(&[0xff, 0x01]),
            Err(GovernanceError::Serialization(_))
        ));
    }
}
