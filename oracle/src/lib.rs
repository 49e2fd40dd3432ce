//! Collaborator traits for the Agora governance engines.
//!
//! The engines never talk to a token contract, a balance ledger, or a
//! timelock directly. They depend on the three traits in this crate and
//! receive concrete implementations at construction time. Production
//! deployments wire in real backends; tests wire in the in-memory fakes
//! from `agora-nullables`.
//!
//! All trait methods take `&self` so implementations can be shared
//! behind an `Arc`. Implementations that mutate use interior mutability.

mod error;
mod ledger;
mod power;
mod scheduler;

pub use error::{LedgerError, OracleError, SchedulerError};
pub use ledger::Ledger;
pub use power::VotingPowerOracle;
pub use scheduler::DelayScheduler;
