//! Proposals and their lifecycle.

use agora_types::{AccountId, ContentRef, ProposalId, Timestamp};
use agora_voting::{PowerSnapshot, QuorumRatio, Tally};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest voting window a proposal may request: one hour.
pub const MIN_VOTING_DURATION_SECS: u64 = 3_600;
/// Longest voting window a proposal may request: thirty days.
pub const MAX_VOTING_DURATION_SECS: u64 = 2_592_000;

/// Lifecycle states of a proposal.
///
/// Creation goes straight to `Active`. `Pending` is kept in the enum
/// for wire and audit compatibility but is never entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Declared but not yet open for voting. Currently unused.
    Pending,
    /// Voting window is open (or awaiting finalization after close).
    Active,
    /// Finalized: quorum met and more power for than against.
    Succeeded,
    /// Finalized: quorum missed, or against outweighed for, or a tie.
    Failed,
    /// A succeeded proposal handed to the execution scheduler.
    Executed,
    /// Withdrawn by the proposer or struck by an admin.
    Canceled,
}

impl ProposalStatus {
    /// Terminal states freeze the proposal: no further votes or
    /// transitions except Succeeded → Executed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Succeeded
                | ProposalStatus::Failed
                | ProposalStatus::Executed
                | ProposalStatus::Canceled
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Active => "active",
            ProposalStatus::Succeeded => "succeeded",
            ProposalStatus::Failed => "failed",
            ProposalStatus::Executed => "executed",
            ProposalStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}

/// Category of a proposal, selecting the execution delay requested
/// from the scheduler. The scheduler enforces the wait, not the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalCategory {
    /// Routine decisions: 24 hour delay.
    Standard,
    /// Incident response: 1 hour delay.
    Emergency,
    /// Rule changes: 7 day delay.
    Constitutional,
}

impl ProposalCategory {
    /// Delay the engine requests when handing the proposal to the
    /// scheduler.
    pub fn recommended_delay_secs(&self) -> u64 {
        match self {
            ProposalCategory::Standard => 86_400,
            ProposalCategory::Emergency => 3_600,
            ProposalCategory::Constitutional => 604_800,
        }
    }
}

impl fmt::Display for ProposalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposalCategory::Standard => "standard",
            ProposalCategory::Emergency => "emergency",
            ProposalCategory::Constitutional => "constitutional",
        };
        write!(f, "{}", s)
    }
}

/// A collective-decision proposal.
///
/// The snapshot is captured once at creation and never re-queried;
/// every vote is weighed against it, so the tally is reproducible from
/// this record alone regardless of later ledger activity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: AccountId,
    /// Opaque content-addressed reference to the proposal body.
    pub content: ContentRef,
    pub category: ProposalCategory,
    pub status: ProposalStatus,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Power reference point: height and total supply at creation − 1.
    pub snapshot: PowerSnapshot,
    /// Quorum ratio captured at creation. Later parameter changes never
    /// touch an in-flight proposal.
    pub quorum: QuorumRatio,
    pub tally: Tally,
    /// Escrowed at creation; refunded on success or cancellation,
    /// forfeited to the treasury on failure.
    pub deposit: u128,
    pub deposit_refunded: bool,
}

impl Proposal {
    /// Is `now` inside the voting window? Both bounds inclusive.
    pub fn voting_open(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// Has the voting window closed?
    pub fn voting_closed(&self, now: Timestamp) -> bool {
        now > self.end_time
    }

    /// Participating power required for this proposal's quorum.
    ///
    /// A pure function of captured data; re-running it off-chain on the
    /// stored record reproduces the finalization arithmetic exactly.
    pub fn required_quorum(&self) -> u128 {
        self.snapshot.required_quorum(self.quorum)
    }
}
