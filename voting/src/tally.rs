//! Checked vote-tally accumulators.

use crate::error::VotingError;
use serde::{Deserialize, Serialize};

/// A voter's position on a full governance proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    Against,
    For,
    Abstain,
}

/// Power-weighted tallies for a proposal.
///
/// Accumulators only ever grow while a proposal is active and freeze once it
/// reaches a terminal status. The sum of all recorded vote weights always
/// equals `total()` — votes are added to exactly one side, exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_power: u128,
    pub against_power: u128,
    pub abstain_power: u128,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `power` to the side matching `choice`.
    pub fn record(&mut self, choice: VoteChoice, power: u128) -> Result<(), VotingError> {
        let side = match choice {
            VoteChoice::For => &mut self.for_power,
            VoteChoice::Against => &mut self.against_power,
            VoteChoice::Abstain => &mut self.abstain_power,
        };
        *side = side.checked_add(power).ok_or(VotingError::Overflow)?;
        Ok(())
    }

    /// Total participating power (quorum numerator). Abstentions count
    /// toward participation even though they never decide the outcome.
    pub fn total(&self) -> u128 {
        self.for_power
            .saturating_add(self.against_power)
            .saturating_add(self.abstain_power)
    }

    /// Whether the vote passes on direction alone: strictly more power For
    /// than Against. A tie fails.
    pub fn passes(&self) -> bool {
        self.for_power > self.against_power
    }
}

/// Power-weighted yes/no tallies for a lightweight vote session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryTally {
    pub yes_power: u128,
    pub no_power: u128,
}

impl BinaryTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, approve: bool, weight: u128) -> Result<(), VotingError> {
        let side = if approve {
            &mut self.yes_power
        } else {
            &mut self.no_power
        };
        *side = side.checked_add(weight).ok_or(VotingError::Overflow)?;
        Ok(())
    }

    /// Total participating power, compared against an absolute quorum.
    pub fn participating(&self) -> u128 {
        self.yes_power.saturating_add(self.no_power)
    }

    /// Strictly more yes than no. A tie fails.
    pub fn passes(&self) -> bool {
        self.yes_power > self.no_power
    }
}
