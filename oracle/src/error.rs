use agora_types::BlockHeight;
use thiserror::Error;

/// Failures reported by a [`VotingPowerOracle`](crate::VotingPowerOracle).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle has no finalized data at the requested height.
    #[error("no snapshot available at height {0}")]
    UnknownHeight(BlockHeight),

    /// The backend could not be reached or returned garbage.
    #[error("oracle backend failure: {0}")]
    Backend(String),
}

/// Failures reported by a [`Ledger`](crate::Ledger).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The account does not hold enough tokens for the escrow.
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// The account has not granted the engine a large enough allowance.
    #[error("insufficient allowance: needed {needed}, approved {approved}")]
    InsufficientAllowance { needed: u128, approved: u128 },

    /// The token ledger itself is paused and refuses transfers.
    #[error("ledger is paused")]
    LedgerPaused,

    /// The backend could not be reached or returned garbage.
    #[error("ledger backend failure: {0}")]
    Backend(String),
}

/// Failures reported by a [`DelayScheduler`](crate::DelayScheduler).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Execution was requested for an id that was never scheduled.
    #[error("nothing scheduled under id {0}")]
    NotScheduled(u64),

    /// The id is already sitting in the queue.
    #[error("id {0} is already scheduled")]
    AlreadyScheduled(u64),

    /// The mandatory delay has not fully elapsed yet.
    #[error("delay not elapsed: {remaining_secs}s remaining")]
    DelayNotElapsed { remaining_secs: u64 },

    /// The backend could not be reached or returned garbage.
    #[error("scheduler backend failure: {0}")]
    Backend(String),
}
