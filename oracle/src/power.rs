use agora_types::{AccountId, BlockHeight};

use crate::OracleError;

/// Read-only source of voting power.
///
/// Historical queries must be immutable: once a height has passed, the
/// power and supply reported for it never change on later calls. The
/// engines snapshot a height at proposal creation and rely on every
/// subsequent vote being weighed against exactly that ledger state.
pub trait VotingPowerOracle: Send + Sync {
    /// Voting power of `account` at the present moment.
    fn current_power(&self, account: &AccountId) -> Result<u128, OracleError>;

    /// Voting power of `account` as of `height`.
    fn historical_power(
        &self,
        account: &AccountId,
        height: BlockHeight,
    ) -> Result<u128, OracleError>;

    /// Total supply of voting power as of `height`.
    ///
    /// Quorum thresholds are computed against this figure.
    fn historical_total_supply(&self, height: BlockHeight) -> Result<u128, OracleError>;
}
