//! Proposal governance: snapshot-weighted voting with deposit economics.
//!
//! A proposal opens a voting window at creation, weighs every vote
//! against a power snapshot taken one block before creation, and is
//! finalized by anyone after the window closes: quorum is a ratio of
//! the snapshotted supply, passing needs strictly more power for than
//! against, success refunds the creation deposit and failure forfeits
//! it to the engine treasury. Succeeded proposals are handed to a
//! delay scheduler for timelocked execution.

pub mod engine;
pub mod error;
pub mod events;
pub mod params;
pub mod proposal;
pub mod vote;

pub use engine::ProposalEngine;
pub use error::ProposalError;
pub use events::ProposalEvent;
pub use params::ProposalParams;
pub use proposal::{
    Proposal, ProposalCategory, ProposalStatus, MAX_VOTING_DURATION_SECS,
    MIN_VOTING_DURATION_SECS,
};
pub use vote::Vote;
