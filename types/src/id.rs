//! Entity id aliases.
//!
//! Ids are monotonically increasing integers owned exclusively by the engine
//! that assigns them; they are never reused, even after cancellation.

/// Unique identifier for a governance proposal.
pub type ProposalId = u64;

/// Unique identifier for a lightweight vote session.
pub type SessionId = u64;
