//! Types for the vanity name registry

use crate::errors::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value in the registry's single native unit.
pub type Amount = u128;

/// Seconds since the UNIX epoch.
pub type Timestamp = u64;

/// Digest of a name's raw bytes, keying [`NameRecord`]s.
pub type NameHash = [u8; 32];

/// Digest of `(submitter, name)`, keying commitments.
pub type CommitHash = [u8; 32];

/// Identity of a party interacting with the registry (32 bytes, hex on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64 character hex identity
    pub fn from_hex(value: &str) -> Result<Self> {
        let value = value.trim_start_matches("0x");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|e| RegistryError::InvalidIdentity(format!("{value}: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for AccountId {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl FromStr for AccountId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Registration state of a single name.
///
/// A record is vacant when `expires_at == 0`, active while `expires_at > now`
/// and expired afterwards. Expired records keep their stale owner and deposit
/// until a new registration overwrites them or the owner unlocks the deposit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameRecord {
    /// Raw name bytes
    pub name: Vec<u8>,
    /// Expiry timestamp (0 = never registered or released)
    pub expires_at: Timestamp,
    /// Refundable deposit escrowed by the owner
    pub locked_deposit: Amount,
    /// Current (or last) holder
    pub owner: AccountId,
}

impl NameRecord {
    /// Whether the name may be registered again at `now`
    pub fn is_vacant(&self, now: Timestamp) -> bool {
        self.expires_at == 0 || self.expires_at <= now
    }

    /// Lossy UTF-8 rendering of the name, for logs and errors
    pub fn display_name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// Tunable registry parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryParams {
    /// Price charged per name byte (non-refundable)
    pub unit_byte_price: Amount,
    /// Refundable deposit required on registration
    pub lock_fee: Amount,
    /// Lifetime added on registration and on each renewal
    pub lock_duration: Timestamp,
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            unit_byte_price: crate::constants::DEFAULT_UNIT_BYTE_PRICE,
            lock_fee: crate::constants::DEFAULT_LOCK_FEE,
            lock_duration: crate::constants::DEFAULT_LOCK_DURATION_SECS,
        }
    }
}
