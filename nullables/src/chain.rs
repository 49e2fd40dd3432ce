//! Nullable chain context — deterministic time and height for testing.

use agora_types::{BlockHeight, Timestamp};
use std::cell::Cell;

/// A deterministic chain context for testing.
///
/// The engines take `now` and `height` as explicit arguments; tests
/// drive both from one place so they never drift apart. Time and
/// height only advance when you tell them to.
pub struct NullChain {
    secs: Cell<u64>,
    height: Cell<u64>,
}

impl NullChain {
    pub fn new(initial_secs: u64, initial_height: u64) -> Self {
        Self {
            secs: Cell::new(initial_secs),
            height: Cell::new(initial_height),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.get())
    }

    /// Get the current height.
    pub fn height(&self) -> BlockHeight {
        BlockHeight::new(self.height.get())
    }

    /// Advance time by a number of seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.secs.set(self.secs.get() + secs);
    }

    /// Advance the chain by a number of blocks.
    pub fn advance_blocks(&self, blocks: u64) {
        self.height.set(self.height.get() + blocks);
    }

    /// Set the time to a specific value.
    pub fn set_time(&self, secs: u64) {
        self.secs.set(secs);
    }

    /// Set the height to a specific value.
    pub fn set_height(&self, height: u64) {
        self.height.set(height);
    }
}
