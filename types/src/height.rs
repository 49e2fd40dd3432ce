//! Ledger height type used as the voting-power snapshot reference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block/ledger height on the underlying chain.
///
/// Heights in the past are immutable reference points: the voting-power
/// oracle must answer identically for the same height forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The height immediately before this one (saturating at genesis).
    ///
    /// Snapshots are taken at the *prior* height so that voting power
    /// acquired in the creation block itself carries no weight.
    pub fn prior(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(h: u64) -> Self {
        Self(h)
    }
}
