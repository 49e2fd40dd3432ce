//! Events emitted by the session engine for external indexers.

use agora_types::{AccountId, BlockHeight, ContentRef, SessionId, Timestamp};
use agora_voting::BinaryTally;
use serde::{Deserialize, Serialize};

/// Every observable state transition of the session engine.
///
/// Delivered synchronously through the engine's `EventBus`;
/// serde-serializable so indexers can persist the stream verbatim.
/// Every session terminates with exactly one `VoteSessionEnded`;
/// early-terminated sessions additionally carry a `SessionCanceled`
/// naming the cause.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SessionEvent {
    VoteSessionCreated {
        id: SessionId,
        creator: AccountId,
        question: String,
        content: ContentRef,
        start: Timestamp,
        end: Timestamp,
        snapshot_height: BlockHeight,
        minimum_quorum: u128,
    },
    SimpleVoteCast {
        id: SessionId,
        voter: AccountId,
        approve: bool,
        weight: u128,
        cast_at: Timestamp,
    },
    VoteSessionEnded {
        id: SessionId,
        result: bool,
        quorum_met: bool,
        tally: BinaryTally,
        total_participants: u64,
    },
    SessionDepositRefunded {
        id: SessionId,
        recipient: AccountId,
        amount: u128,
    },
    SessionCanceled {
        id: SessionId,
        /// True when struck by a moderator's emergency stop rather than
        /// withdrawn by the creator or an admin.
        emergency: bool,
    },
    SessionParameterUpdated {
        name: String,
        old: String,
        new: String,
    },
}
