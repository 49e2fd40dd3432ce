//! Session governance: lightweight yes/no votes with absolute quorums.
//!
//! A vote session asks one boolean question, weighs every vote against
//! a power snapshot taken one block before creation, and ends when
//! anyone calls for it after the window closes. Quorum is a fixed
//! amount of participating power rather than a ratio of supply, and
//! the creation deposit is returned whenever that quorum is reached,
//! whichever way the vote went. There is no execution step: the
//! reported outcome is the whole product.

pub mod engine;
pub mod error;
pub mod events;
pub mod params;
pub mod session;

pub use engine::SessionEngine;
pub use error::SessionError;
pub use events::SessionEvent;
pub use params::SessionParams;
pub use session::{
    SessionOutcome, SimpleVote, VoteSession, MAX_QUESTION_LEN, MAX_SESSION_DURATION_SECS,
    MIN_SESSION_DURATION_SECS,
};
