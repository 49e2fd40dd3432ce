//! Shared voting primitives for the Agora governance engines.
//!
//! Both engines weigh votes with power read from a fixed historical
//! reference point captured at creation time and never re-queried, so every
//! tally is a pure function of recorded data. This crate holds the pieces
//! that make that true: the creation-time snapshot, checked tally
//! accumulators, and integer quorum arithmetic.
//!
//! The two engines deliberately use different quorum models: proposals
//! measure participation against a ratio of the snapshotted total supply
//! ([`QuorumRatio`]), sessions against a fixed absolute power amount (a
//! plain comparison, no type needed).

pub mod error;
pub mod quorum;
pub mod snapshot;
pub mod tally;

pub use error::VotingError;
pub use quorum::QuorumRatio;
pub use snapshot::PowerSnapshot;
pub use tally::{BinaryTally, Tally, VoteChoice};
