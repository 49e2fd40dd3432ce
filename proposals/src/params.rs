//! Engine parameters with TOML file support.

use agora_voting::QuorumRatio;
use serde::{Deserialize, Serialize};

use crate::ProposalError;

/// Admin-tunable parameters of the proposal engine.
///
/// Can be loaded from a TOML file via [`ProposalParams::from_toml_file`]
/// or built programmatically (e.g. for tests). Changes apply to future
/// proposals only; in-flight proposals keep the values captured at
/// their creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalParams {
    /// Minimum voting power (at the snapshot height) required to create
    /// a proposal.
    #[serde(default = "default_voting_threshold")]
    pub voting_threshold: u128,

    /// Fraction of the snapshotted total supply that must participate
    /// for a proposal to reach quorum.
    #[serde(default = "default_quorum")]
    pub quorum: QuorumRatio,

    /// Deposit escrowed at creation.
    #[serde(default = "default_proposal_deposit")]
    pub proposal_deposit: u128,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_threshold() -> u128 {
    100
}

fn default_quorum() -> QuorumRatio {
    QuorumRatio::new(4, 100).expect("4/100 is a valid ratio")
}

fn default_proposal_deposit() -> u128 {
    100
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ProposalParams {
    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ProposalError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ProposalError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse parameters from a TOML string.
    ///
    /// The quorum ratio is re-validated after deserialization so a
    /// hand-edited file cannot smuggle in a zero denominator.
    pub fn from_toml_str(s: &str) -> Result<Self, ProposalError> {
        let params: Self = toml::from_str(s).map_err(|e| ProposalError::Config(e.to_string()))?;
        params.quorum.validate()?;
        Ok(params)
    }

    /// Serialize the parameters to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ProposalParams is always serializable to TOML")
    }
}

impl Default for ProposalParams {
    fn default() -> Self {
        Self {
            voting_threshold: default_voting_threshold(),
            quorum: default_quorum(),
            proposal_deposit: default_proposal_deposit(),
        }
    }
}
