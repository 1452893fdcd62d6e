//! Length-based name pricing

use crate::constants::{NAME_MAX_LENGTH, NAME_MIN_LENGTH};
use crate::errors::{RegistryError, Result};
use crate::types::{Amount, RegistryParams};

/// Reject names outside `[NAME_MIN_LENGTH, NAME_MAX_LENGTH]` bytes
pub fn validate_length(name: &[u8]) -> Result<usize> {
    let length = name.len();
    if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&length) {
        return Err(RegistryError::InvalidLength {
            length,
            min: NAME_MIN_LENGTH,
            max: NAME_MAX_LENGTH,
        });
    }
    Ok(length)
}

/// Pure pricing over the current registry parameters
#[derive(Debug, Clone, Copy)]
pub struct PriceModel {
    unit_byte_price: Amount,
    lock_fee: Amount,
}

impl PriceModel {
    pub fn new(unit_byte_price: Amount, lock_fee: Amount) -> Self {
        Self {
            unit_byte_price,
            lock_fee,
        }
    }

    /// Non-refundable name price: `length * unit_byte_price`
    pub fn price(&self, name: &[u8]) -> Result<Amount> {
        let length = validate_length(name)?;
        (length as Amount)
            .checked_mul(self.unit_byte_price)
            .ok_or(RegistryError::ArithmeticOverflow)
    }

    /// Total registration cost: name price plus the refundable lock fee
    pub fn registration_cost(&self, name: &[u8]) -> Result<Amount> {
        self.price(name)?
            .checked_add(self.lock_fee)
            .ok_or(RegistryError::ArithmeticOverflow)
    }
}

impl From<&RegistryParams> for PriceModel {
    fn from(params: &RegistryParams) -> Self {
        Self::new(params.unit_byte_price, params.lock_fee)
    }
}
