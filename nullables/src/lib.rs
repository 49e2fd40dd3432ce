//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every collaborator the engines depend on (power oracle, token
//! ledger, timelock scheduler) plus the chain context (time, height)
//! has a test-friendly implementation here that:
//! - Returns deterministic values
//! - Can be controlled programmatically
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod ledger;
pub mod power;
pub mod scheduler;

pub use chain::NullChain;
pub use ledger::NullLedger;
pub use power::NullPowerOracle;
pub use scheduler::NullScheduler;
