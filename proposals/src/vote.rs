//! Individual vote records.

use agora_types::{AccountId, ContentRef, Timestamp};
use agora_voting::VoteChoice;
use serde::{Deserialize, Serialize};

/// A cast vote, retained for audit after the proposal closes.
///
/// `power` is the voter's power at the proposal's snapshot height,
/// frozen at cast time. At most one vote exists per (proposal, voter);
/// votes are never changed or withdrawn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub voter: AccountId,
    pub choice: VoteChoice,
    pub power: u128,
    pub cast_at: Timestamp,
    /// Optional content-addressed reference to the voter's reasoning.
    pub reasoning: Option<ContentRef>,
}
