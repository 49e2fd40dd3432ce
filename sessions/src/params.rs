//! Engine parameters with TOML file support.

use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Admin-tunable parameters of the session engine.
///
/// Can be loaded from a TOML file via [`SessionParams::from_toml_file`]
/// or built programmatically (e.g. for tests). Changes apply to future
/// sessions only; live sessions keep the values captured at creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionParams {
    /// Minimum current voting power required to open a session.
    #[serde(default = "default_creation_threshold")]
    pub creation_threshold: u128,

    /// Participation quorum applied when a session does not override
    /// it, in absolute power.
    #[serde(default = "default_minimum_quorum")]
    pub default_minimum_quorum: u128,

    /// Deposit escrowed at creation.
    #[serde(default = "default_session_deposit")]
    pub session_deposit: u128,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_creation_threshold() -> u128 {
    50
}

fn default_minimum_quorum() -> u128 {
    500
}

fn default_session_deposit() -> u128 {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SessionParams {
    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, SessionError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SessionError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        toml::from_str(s).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Serialize parameters to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SessionError> {
        toml::to_string_pretty(self).map_err(|e| SessionError::Config(e.to_string()))
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            creation_threshold: default_creation_threshold(),
            default_minimum_quorum: default_minimum_quorum(),
            session_deposit: default_session_deposit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = SessionParams::default();
        assert_eq!(params.creation_threshold, 50);
        assert_eq!(params.default_minimum_quorum, 500);
        assert_eq!(params.session_deposit, 10);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let params = SessionParams::from_toml_str("creation_threshold = 200\n").unwrap();
        assert_eq!(params.creation_threshold, 200);
        assert_eq!(params.default_minimum_quorum, 500);
        assert_eq!(params.session_deposit, 10);
    }

    #[test]
    fn full_toml_round_trips() {
        let params = SessionParams {
            creation_threshold: 75,
            default_minimum_quorum: 10_000,
            session_deposit: 25,
        };
        let toml = params.to_toml_string().unwrap();
        let back = SessionParams::from_toml_str(&toml).unwrap();
        assert_eq!(back.creation_threshold, 75);
        assert_eq!(back.default_minimum_quorum, 10_000);
        assert_eq!(back.session_deposit, 25);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SessionParams::from_toml_str("creation_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }
}
