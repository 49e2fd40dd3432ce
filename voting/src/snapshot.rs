//! Creation-time voting-power snapshot.

use agora_types::BlockHeight;
use serde::{Deserialize, Serialize};

/// The fixed historical reference captured when a proposal is created.
///
/// `height` is the prior ledger height (creation height − 1), so power moved
/// in the creation block itself — e.g. borrow-vote-repay within one block —
/// carries no weight. `total_power` is the total supply at that height and
/// serves as the quorum denominator for the proposal's entire life; it is
/// never re-read from the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerSnapshot {
    /// The ledger height at which per-voter power is resolved.
    pub height: BlockHeight,
    /// Total voting supply at `height` (quorum denominator).
    pub total_power: u128,
}

impl PowerSnapshot {
    pub fn new(height: BlockHeight, total_power: u128) -> Self {
        Self {
            height,
            total_power,
        }
    }

    /// Required participating power under a ratio quorum.
    pub fn required_quorum(&self, ratio: crate::QuorumRatio) -> u128 {
        ratio.required_power(self.total_power)
    }
}
