use agora_types::AccountId;

use crate::LedgerError;

/// Token ledger used for deposit escrow.
///
/// `escrow` followed by `release` for the same amount must be
/// value-neutral for the account. The engines never hold tokens
/// themselves; forfeited deposits are simply never released.
pub trait Ledger: Send + Sync {
    /// Move `amount` from `from` into engine custody.
    fn escrow(&self, from: &AccountId, amount: u128) -> Result<(), LedgerError>;

    /// Return `amount` from engine custody to `to`.
    fn release(&self, to: &AccountId, amount: u128) -> Result<(), LedgerError>;
}
