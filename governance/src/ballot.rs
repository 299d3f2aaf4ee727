//! Ballot values.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validator's ballot. The wire vocabulary is exactly `"Yes"`, `"No"` and `"Abstain"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ballot {
    Yes,
    No,
    /// Counted in total stake but not toward quorum.
    Abstain,
}

impl Ballot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Abstain => "Abstain",
        }
    }
}

impl FromStr for Ballot {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            "Abstain" => Ok(Self::Abstain),
            other => Err(GovernanceError::InvalidBallot(other.to_string())),
        }
    }
}

impl fmt::Display for Ballot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
