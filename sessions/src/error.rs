use agora_oracle::{LedgerError, OracleError};
use agora_types::{AccountId, SessionId};
use agora_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    UnknownSession(SessionId),

    #[error("session question is empty")]
    EmptyQuestion,

    #[error("session question is {len} chars, maximum is {max}")]
    QuestionTooLong { len: usize, max: usize },

    #[error("session duration {requested}s outside [{min}s, {max}s]")]
    DurationOutOfBounds { requested: u64, min: u64, max: u64 },

    #[error("insufficient voting power: needed {needed}, available {available}")]
    InsufficientPower { needed: u128, available: u128 },

    #[error("deposit operation failed: {0}")]
    Deposit(#[from] LedgerError),

    #[error("power oracle failure: {0}")]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Voting(#[from] VotingError),

    #[error("session {0} is not active")]
    NotActive(SessionId),

    #[error("voting window for session {0} has not opened yet")]
    VotingNotStarted(SessionId),

    #[error("voting window for session {0} has closed")]
    VotingClosed(SessionId),

    #[error("voting in session {0} is still open")]
    VotingStillOpen(SessionId),

    #[error("{0} has already voted in this session")]
    AlreadyVoted(AccountId),

    #[error("caller {0} lacks the required role or relationship")]
    Unauthorized(AccountId),

    #[error("engine is paused")]
    Paused,

    #[error("reentrant call rejected")]
    ReentrantCall,

    #[error("configuration error: {0}")]
    Config(String),
}
