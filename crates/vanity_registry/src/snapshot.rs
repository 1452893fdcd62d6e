//! Persisted registry state

use crate::errors::Result;
use crate::types::{AccountId, Amount, CommitHash, NameRecord, RegistryParams, Timestamp};
use serde::{Deserialize, Serialize};

/// Everything a registry needs to resume where it left off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub admin: AccountId,
    pub params: RegistryParams,
    pub fee_balance: Amount,
    /// Latest time the registry observed; restored registries never go behind it
    pub last_observed: Timestamp,
    /// Records sorted by name
    pub records: Vec<NameRecord>,
    /// Commitments sorted by digest
    pub commitments: Vec<CommitmentEntry>,
    /// Refunds owed after failed payouts, sorted by account
    #[serde(default)]
    pub pending_refunds: Vec<PendingRefund>,
}

impl RegistrySnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentEntry {
    #[serde(with = "hex_digest")]
    pub hash: CommitHash,
    pub committed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRefund {
    pub account: AccountId,
    pub amount: Amount,
}

mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let value = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&value, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(bytes)
    }
}
