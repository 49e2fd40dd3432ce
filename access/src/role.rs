use serde::{Deserialize, Serialize};
use std::fmt;

/// Privileges recognized by the engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May change parameters, pause and unpause, grant and revoke roles,
    /// and cancel any proposal or session.
    Admin,
    /// May trigger execution of succeeded proposals.
    Executor,
    /// May emergency-stop a running vote session.
    Moderator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Executor => write!(f, "executor"),
            Role::Moderator => write!(f, "moderator"),
        }
    }
}
