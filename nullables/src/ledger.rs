//! Nullable token ledger — in-memory balances with failure injection.

use agora_oracle::{Ledger, LedgerError};
use agora_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory ledger for testing.
///
/// Escrowed value moves into a single custody pot; releases move it
/// back out. Every escrow and release is recorded for assertions, and
/// the next call of either kind can be forced to fail to exercise the
/// engines' abort paths.
pub struct NullLedger {
    balances: Mutex<HashMap<AccountId, u128>>,
    held: Mutex<u128>,
    escrows: Mutex<Vec<(AccountId, u128)>>,
    releases: Mutex<Vec<(AccountId, u128)>>,
    fail_next_escrow: Mutex<Option<LedgerError>>,
    fail_next_release: Mutex<Option<LedgerError>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            held: Mutex::new(0),
            escrows: Mutex::new(Vec::new()),
            releases: Mutex::new(Vec::new()),
            fail_next_escrow: Mutex::new(None),
            fail_next_release: Mutex::new(None),
        }
    }

    /// Set `account`'s spendable balance.
    pub fn set_balance(&self, account: &AccountId, amount: u128) {
        self.balances.lock().unwrap().insert(account.clone(), amount);
    }

    /// `account`'s current spendable balance.
    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Total value currently sitting in custody.
    pub fn total_held(&self) -> u128 {
        *self.held.lock().unwrap()
    }

    /// All escrows performed, in order (for assertions).
    pub fn escrows(&self) -> Vec<(AccountId, u128)> {
        self.escrows.lock().unwrap().clone()
    }

    /// All releases performed, in order (for assertions).
    pub fn releases(&self) -> Vec<(AccountId, u128)> {
        self.releases.lock().unwrap().clone()
    }

    /// Make the next `escrow` call fail with `err`.
    pub fn fail_next_escrow(&self, err: LedgerError) {
        *self.fail_next_escrow.lock().unwrap() = Some(err);
    }

    /// Make the next `release` call fail with `err`.
    pub fn fail_next_release(&self, err: LedgerError) {
        *self.fail_next_release.lock().unwrap() = Some(err);
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for NullLedger {
    fn escrow(&self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if let Some(err) = self.fail_next_escrow.lock().unwrap().take() {
            return Err(err);
        }
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        balances.insert(from.clone(), available - amount);
        *self.held.lock().unwrap() += amount;
        self.escrows.lock().unwrap().push((from.clone(), amount));
        Ok(())
    }

    fn release(&self, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if let Some(err) = self.fail_next_release.lock().unwrap().take() {
            return Err(err);
        }
        let mut held = self.held.lock().unwrap();
        *held = held
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::Backend("release exceeds custody".into()))?;
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.get(to).copied().unwrap_or(0);
        balances.insert(to.clone(), balance + amount);
        self.releases.lock().unwrap().push((to.clone(), amount));
        Ok(())
    }
}
