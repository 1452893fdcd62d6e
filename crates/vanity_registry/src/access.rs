//! Single-administrator access gate

use crate::errors::{RegistryError, Result};
use crate::types::AccountId;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AccessControl {
    admin: AccountId,
}

impl AccessControl {
    pub fn new(admin: AccountId) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> AccountId {
        self.admin
    }

    pub fn ensure_admin(&self, caller: &AccountId) -> Result<()> {
        if *caller != self.admin {
            return Err(RegistryError::NotAdministrator);
        }
        Ok(())
    }

    /// Hand administration to `new_admin`; only the current admin may do so
    pub fn transfer(&mut self, caller: &AccountId, new_admin: AccountId) -> Result<AccountId> {
        self.ensure_admin(caller)?;
        let previous = std::mem::replace(&mut self.admin, new_admin);
        info!(
            target: "vanity_registry",
            "Administrator transferred from {} to {}",
            previous,
            new_admin
        );
        Ok(previous)
    }
}
