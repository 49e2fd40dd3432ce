//! Integer quorum arithmetic for ratio-of-supply quorums.

use crate::error::VotingError;
use serde::{Deserialize, Serialize};

/// A participation quorum expressed as a fraction of the snapshotted total
/// voting supply (e.g. 4/100 = 4% of supply must vote).
///
/// The required power is `floor(total × numerator / denominator)`, computed
/// with pure integer arithmetic so the result is bit-for-bit reproducible
/// off-chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumRatio {
    numerator: u32,
    denominator: u32,
}

impl QuorumRatio {
    /// Build a ratio, rejecting a zero denominator and numerator > denominator.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, VotingError> {
        let ratio = Self {
            numerator,
            denominator,
        };
        ratio.validate()?;
        Ok(ratio)
    }

    /// Re-check the ratio invariants (needed after deserializing from
    /// caller-supplied configuration, which bypasses [`QuorumRatio::new`]).
    pub fn validate(&self) -> Result<(), VotingError> {
        if self.denominator == 0 || self.numerator > self.denominator {
            return Err(VotingError::InvalidRatio {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Minimum participating power for a vote on `total` supply to be valid.
    ///
    /// Split into quotient and remainder terms so the intermediate products
    /// stay in range for arbitrarily large supplies:
    /// `floor(t·n/d) = (t/d)·n + ((t%d)·n)/d`.
    pub fn required_power(&self, total: u128) -> u128 {
        let num = self.numerator as u128;
        let den = self.denominator as u128;
        (total / den) * num + (total % den) * num / den
    }
}
