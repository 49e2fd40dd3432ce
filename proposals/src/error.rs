use agora_oracle::{LedgerError, OracleError, SchedulerError};
use agora_types::{AccountId, ProposalId};
use agora_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),

    #[error("proposal content reference is empty")]
    EmptyContent,

    #[error("voting duration {requested}s outside [{min}s, {max}s]")]
    DurationOutOfBounds { requested: u64, min: u64, max: u64 },

    #[error("insufficient voting power: needed {needed}, available {available}")]
    InsufficientPower { needed: u128, available: u128 },

    #[error("deposit operation failed: {0}")]
    Deposit(#[from] LedgerError),

    #[error("power oracle failure: {0}")]
    Oracle(#[from] OracleError),

    #[error("scheduler refused the request: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Voting(#[from] VotingError),

    #[error("proposal {0} is not active")]
    NotActive(ProposalId),

    #[error("voting window for proposal {0} has not opened yet")]
    VotingNotStarted(ProposalId),

    #[error("voting window for proposal {0} has closed")]
    VotingClosed(ProposalId),

    #[error("voting on proposal {0} is still open")]
    VotingStillOpen(ProposalId),

    #[error("{0} has already voted on this proposal")]
    AlreadyVoted(AccountId),

    #[error("proposal {id} is {status}, expected {expected}")]
    WrongStatus {
        id: ProposalId,
        status: crate::ProposalStatus,
        expected: crate::ProposalStatus,
    },

    #[error("caller {0} lacks the required role or relationship")]
    Unauthorized(AccountId),

    #[error("engine is paused")]
    Paused,

    #[error("reentrant call rejected")]
    ReentrantCall,

    #[error("configuration error: {0}")]
    Config(String),
}
