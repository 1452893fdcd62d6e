//! Outward value transfers
//!
//! Deposit refunds and fee withdrawals leave the registry through a
//! [`ValueTransfer`]. A transfer may call back into the registry before it
//! returns, so the registry finishes all of its state changes and releases its
//! lock before invoking one.

use crate::errors::RegistryError;
use crate::types::{AccountId, Amount};
use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub trait ValueTransfer: Send + Sync {
    /// Deliver `amount` to `to`
    fn transfer(&self, to: &AccountId, amount: Amount) -> Result<()>;
}

/// In-memory balances credited by registry payouts
#[derive(Debug, Default)]
pub struct InMemoryBalances {
    balances: RwLock<HashMap<AccountId, Amount>>,
}

impl InMemoryBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(balances: HashMap<AccountId, Amount>) -> Self {
        Self {
            balances: RwLock::new(balances),
        }
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    pub fn total(&self) -> Amount {
        self.balances.read().values().sum()
    }

    /// Copy of all balances
    pub fn snapshot(&self) -> PaidBalances {
        PaidBalances(self.balances.read().clone())
    }
}

impl ValueTransfer for InMemoryBalances {
    fn transfer(&self, to: &AccountId, amount: Amount) -> Result<()> {
        let mut balances = self.balances.write();
        let entry = balances.entry(*to).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("balance overflow for {}", to))?;
        debug!(target: "vanity_registry", "Credited {} to {}", amount, to);
        Ok(())
    }
}

/// Serializable view of [`InMemoryBalances`], keyed by hex account id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, Amount>", into = "HashMap<String, Amount>")]
pub struct PaidBalances(pub HashMap<AccountId, Amount>);

impl TryFrom<HashMap<String, Amount>> for PaidBalances {
    type Error = RegistryError;

    fn try_from(map: HashMap<String, Amount>) -> std::result::Result<Self, RegistryError> {
        map.into_iter()
            .map(|(k, v)| AccountId::from_hex(&k).map(|id| (id, v)))
            .collect::<std::result::Result<_, RegistryError>>()
            .map(Self)
    }
}

impl From<PaidBalances> for HashMap<String, Amount> {
    fn from(balances: PaidBalances) -> Self {
        balances
            .0
            .into_iter()
            .map(|(k, v)| (k.to_hex(), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfers_accumulate() {
        let bank = InMemoryBalances::new();
        let alice = AccountId::new([1u8; 32]);
        bank.transfer(&alice, 10).unwrap();
        bank.transfer(&alice, 5).unwrap();
        assert_eq!(bank.balance_of(&alice), 15);
        assert_eq!(bank.balance_of(&AccountId::new([2u8; 32])), 0);
        assert_eq!(bank.total(), 15);
    }

    #[test]
    fn test_paid_balances_json() {
        let bank = InMemoryBalances::new();
        let alice = AccountId::new([1u8; 32]);
        bank.transfer(&alice, 10).unwrap();

        let json = serde_json::to_string(&bank.snapshot()).unwrap();
        assert!(json.contains(&alice.to_hex()));
        let parsed: PaidBalances = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.0.get(&alice), Some(&10));
    }

    #[test]
    fn test_paid_balances_reject_bad_account() {
        let json = format!("{{\"{}\": 5, \"not-hex\": 7}}", "11".repeat(32));
        assert!(serde_json::from_str::<PaidBalances>(&json).is_err());
    }
}
