//! One-shot, stake-weighted governance vote for a validator set.
//!
//! Lifecycle: `Pending → Passed | NotPassed` (terminal, exactly once).
//!
//! - Eligible validators cast one ballot each (`Yes`, `No`, `Abstain`) while
//!   the window `[start, end)` is open.
//! - Finalization reads a [`StakeSnapshot`](stakevote_stake::StakeSnapshot)
//!   refreshed in the current epoch and tallies ballots against its
//!   reconciled stake.
//! - Quorum: `(yes + no) × 2 > total`. Abstaining counts like not voting.
//! - Pass: quorum reached and `yes > no`.
//! - Early end: after the minimum duration, once `yes > no + non_participating`
//!   and quorum holds, the outcome can no longer change.
//!
//! Key principle: stake-weighted, not one-validator-one-vote.

pub mod ballot;
pub mod config;
pub mod error;
pub mod events;
pub mod process;
pub mod proposal;
pub mod tally;

pub use ballot::Ballot;
pub use config::GovernanceConfig;
pub use error::GovernanceError;
pub use events::{EventBus, FinalizationRecord, GovernanceEvent};
pub use process::VotingProcess;
pub use proposal::{ProposalParams, VoteResult};
pub use tally::VoteTally;
