//! Protocol fee accounting
//!
//! Accumulates the non-refundable part of registrations and renewals until
//! the administrator withdraws it.

use crate::errors::{RegistryError, Result};
use crate::types::Amount;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FeeLedger {
    balance: Amount,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_balance(balance: Amount) -> Self {
        Self { balance }
    }

    /// Add collected fees
    pub fn accrue(&mut self, amount: Amount) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        debug!(target: "vanity_registry", "Accrued {} in fees (balance {})", amount, self.balance);
        Ok(())
    }

    /// Capture the whole balance and zero it, ahead of paying it out
    pub fn take(&mut self) -> Result<Amount> {
        if self.balance == 0 {
            return Err(RegistryError::NoFeesToWithdraw);
        }
        Ok(std::mem::take(&mut self.balance))
    }

    /// Put back an amount captured by [`take`](Self::take) whose payout failed
    pub fn restore(&mut self, amount: Amount) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }
}
