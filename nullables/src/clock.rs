//! Nullable clock: deterministic time and epoch for testing.

use stakevote_types::{Clock, Epoch, Timestamp};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time and epoch only advance when you tell them to.
pub struct NullClock {
    millis: Cell<u64>,
    epoch: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_millis: u64, initial_epoch: u64) -> Self {
        Self {
            millis: Cell::new(initial_millis),
            epoch: Cell::new(initial_epoch),
        }
    }

    /// Advance time by a number of milliseconds.
    pub fn advance(&self, millis: u64) {
        self.millis.set(self.millis.get() + millis);
    }

    /// Set the time to a specific value.
    pub fn set(&self, millis: u64) {
        self.millis.set(millis);
    }

    /// Move to the next epoch.
    pub fn advance_epoch(&self) {
        self.epoch.set(self.epoch.get() + 1);
    }

    pub fn set_epoch(&self, epoch: u64) {
        self.epoch.set(epoch);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.get())
    }

    fn epoch(&self) -> Epoch {
        Epoch::new(self.epoch.get())
    }
}
