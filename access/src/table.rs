use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use agora_types::AccountId;

use crate::Role;

/// Flat account-to-roles table.
///
/// Authorization decisions stay in the engines; the table only answers
/// membership queries. Grants and revokes are idempotent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleTable {
    roles: HashMap<AccountId, HashSet<Role>>,
}

impl RoleTable {
    /// Empty table with `admin` holding [`Role::Admin`].
    ///
    /// Engines are constructed with at least one admin so parameter
    /// changes are never locked out.
    pub fn with_admin(admin: AccountId) -> Self {
        let mut table = Self::default();
        table.grant(admin, Role::Admin);
        table
    }

    /// Grant `role` to `account`. Returns `true` if it was newly granted.
    pub fn grant(&mut self, account: AccountId, role: Role) -> bool {
        self.roles.entry(account).or_default().insert(role)
    }

    /// Revoke `role` from `account`. Returns `true` if it was held.
    pub fn revoke(&mut self, account: &AccountId, role: Role) -> bool {
        match self.roles.get_mut(account) {
            Some(held) => {
                let removed = held.remove(&role);
                if held.is_empty() {
                    self.roles.remove(account);
                }
                removed
            }
            None => false,
        }
    }

    /// Does `account` hold `role`?
    pub fn has(&self, account: &AccountId, role: Role) -> bool {
        self.roles
            .get(account)
            .map(|held| held.contains(&role))
            .unwrap_or(false)
    }

    /// Shorthand for `has(account, Role::Admin)`.
    pub fn is_admin(&self, account: &AccountId) -> bool {
        self.has(account, Role::Admin)
    }

    /// Accounts currently holding `role`.
    pub fn holders(&self, role: Role) -> Vec<&AccountId> {
        let mut holders: Vec<&AccountId> = self
            .roles
            .iter()
            .filter(|(_, held)| held.contains(&role))
            .map(|(account, _)| account)
            .collect();
        holders.sort();
        holders
    }
}
