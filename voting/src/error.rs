use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VotingError {
    #[error("invalid quorum ratio {numerator}/{denominator}")]
    InvalidRatio { numerator: u32, denominator: u32 },

    #[error("tally accumulator overflow")]
    Overflow,
}
