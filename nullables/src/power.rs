//! Nullable voting power oracle — programmable power tables.

use agora_oracle::{OracleError, VotingPowerOracle};
use agora_types::{AccountId, BlockHeight};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory power oracle for testing.
///
/// Historical entries are plain table cells, so a past height never
/// changes unless the test rewrites it on purpose. Accounts without an
/// entry have zero power; heights without a supply entry are unknown.
/// Thread-safe so it can sit behind an `Arc` like a real backend.
pub struct NullPowerOracle {
    current: Mutex<HashMap<AccountId, u128>>,
    historical: Mutex<HashMap<(AccountId, u64), u128>>,
    supply: Mutex<HashMap<u64, u128>>,
}

impl NullPowerOracle {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(HashMap::new()),
            historical: Mutex::new(HashMap::new()),
            supply: Mutex::new(HashMap::new()),
        }
    }

    /// Set the power `account` reports right now.
    pub fn set_current_power(&self, account: &AccountId, power: u128) {
        self.current.lock().unwrap().insert(account.clone(), power);
    }

    /// Set the power `account` reports as of `height`.
    pub fn set_power_at(&self, account: &AccountId, height: u64, power: u128) {
        self.historical
            .lock()
            .unwrap()
            .insert((account.clone(), height), power);
    }

    /// Set the total supply reported as of `height`.
    pub fn set_supply_at(&self, height: u64, supply: u128) {
        self.supply.lock().unwrap().insert(height, supply);
    }

    /// Populate `account` with `power` at every height in `heights`,
    /// and the same value as its current power.
    pub fn seed_account(&self, account: &AccountId, power: u128, heights: &[u64]) {
        self.set_current_power(account, power);
        for &height in heights {
            self.set_power_at(account, height, power);
        }
    }
}

impl Default for NullPowerOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingPowerOracle for NullPowerOracle {
    fn current_power(&self, account: &AccountId) -> Result<u128, OracleError> {
        Ok(self
            .current
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0))
    }

    fn historical_power(
        &self,
        account: &AccountId,
        height: BlockHeight,
    ) -> Result<u128, OracleError> {
        Ok(self
            .historical
            .lock()
            .unwrap()
            .get(&(account.clone(), height.value()))
            .copied()
            .unwrap_or(0))
    }

    fn historical_total_supply(&self, height: BlockHeight) -> Result<u128, OracleError> {
        self.supply
            .lock()
            .unwrap()
            .get(&height.value())
            .copied()
            .ok_or(OracleError::UnknownHeight(height))
    }
}
