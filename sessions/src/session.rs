//! Vote sessions and their records.

use agora_types::{AccountId, BlockHeight, ContentRef, SessionId, Timestamp};
use agora_voting::BinaryTally;
use serde::{Deserialize, Serialize};

/// Shortest session window: ten minutes.
pub const MIN_SESSION_DURATION_SECS: u64 = 600;
/// Longest session window: seven days.
pub const MAX_SESSION_DURATION_SECS: u64 = 604_800;
/// Longest question text a session may carry.
pub const MAX_QUESTION_LEN: usize = 500;

/// A lightweight yes/no vote session.
///
/// Structurally a slimmed-down proposal: a single boolean question, an
/// absolute participation quorum instead of a ratio of supply, and a
/// plain active flag instead of a status machine. Vote weights resolve
/// against a height fixed at creation, so the tally stays reproducible
/// from this record alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteSession {
    pub id: SessionId,
    pub creator: AccountId,
    /// The question put to the vote, in plain text.
    pub question: String,
    /// Opaque content-addressed reference to supporting material.
    pub content: ContentRef,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Height at which vote weights are resolved (creation − 1).
    pub snapshot_height: BlockHeight,
    /// False once ended, canceled, or emergency-stopped.
    pub active: bool,
    pub tally: BinaryTally,
    /// Distinct voters, not power. Each voter counts exactly once.
    pub total_participants: u64,
    /// Absolute participating power needed for the session to count.
    /// Captured at creation; later parameter changes never touch it.
    pub minimum_quorum: u128,
    /// Escrowed at creation; refunded when the session draws quorum or
    /// is terminated early, forfeited to the treasury otherwise.
    pub deposit: u128,
    pub deposit_refunded: bool,
}

impl VoteSession {
    /// Is `now` inside the voting window? Both bounds inclusive.
    pub fn voting_open(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// Has the voting window closed?
    pub fn voting_closed(&self, now: Timestamp) -> bool {
        now > self.end_time
    }

    /// Whether the recorded participation reaches the session quorum.
    pub fn quorum_met(&self) -> bool {
        self.tally.participating() >= self.minimum_quorum
    }
}

/// A single yes/no vote inside a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleVote {
    pub voter: AccountId,
    pub approve: bool,
    pub cast_at: Timestamp,
    /// Power at the session's snapshot height, immutable once cast.
    pub weight: u128,
}

/// What a terminated session reported.
///
/// Early termination (cancel, emergency stop) always reports
/// `result = false` and `quorum_met = false` whatever the tallies said.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Quorum reached and strictly more yes than no.
    pub result: bool,
    pub quorum_met: bool,
}

impl SessionOutcome {
    /// The outcome every early-terminated session reports.
    pub const STOPPED: Self = Self {
        result: false,
        quorum_met: false,
    };
}
