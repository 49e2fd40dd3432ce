//! Content-addressed reference type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque content-addressed reference (e.g. an IPFS CID) pointing at
/// off-engine proposal metadata or vote reasoning.
///
/// The engines validate non-emptiness only; resolving and pinning the
/// content is the indexing layer's job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef(String);

impl ContentRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
