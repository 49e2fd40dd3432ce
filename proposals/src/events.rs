//! Events emitted by the proposal engine for external indexers.

use agora_types::{AccountId, ContentRef, ProposalId, Timestamp};
use agora_voting::{PowerSnapshot, Tally, VoteChoice};
use serde::{Deserialize, Serialize};

use crate::{ProposalCategory, ProposalStatus};

/// Every observable state transition of the proposal engine.
///
/// Delivered synchronously through the engine's `EventBus`;
/// serde-serializable so indexers can persist the stream verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ProposalEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: AccountId,
        content: ContentRef,
        category: ProposalCategory,
        start: Timestamp,
        end: Timestamp,
        snapshot: PowerSnapshot,
    },
    VoteCast {
        id: ProposalId,
        voter: AccountId,
        choice: VoteChoice,
        power: u128,
        cast_at: Timestamp,
        reasoning: Option<ContentRef>,
    },
    ProposalFinalized {
        id: ProposalId,
        status: ProposalStatus,
        tally: Tally,
        quorum_met: bool,
    },
    ProposalExecuted {
        id: ProposalId,
        executor: AccountId,
    },
    ProposalCanceled {
        id: ProposalId,
    },
    DepositRefunded {
        id: ProposalId,
        recipient: AccountId,
        amount: u128,
    },
    ParameterUpdated {
        name: String,
        old: String,
        new: String,
    },
}
