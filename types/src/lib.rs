//! Fundamental types for the Agora governance engines.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identities, content references, timestamps, ledger
//! heights, and entity id aliases.

pub mod account;
pub mod content;
pub mod height;
pub mod id;
pub mod time;

pub use account::AccountId;
pub use content::ContentRef;
pub use height::BlockHeight;
pub use id::{ProposalId, SessionId};
pub use time::Timestamp;
