//! Events emitted by registry operations, for observers and indexers

use crate::types::{AccountId, Amount, RegistryParams, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RegistryEvent {
    NameRegistered {
        name: Vec<u8>,
        owner: AccountId,
        timestamp: Timestamp,
    },
    NameRenewed {
        name: Vec<u8>,
        owner: AccountId,
        timestamp: Timestamp,
    },
    NameUnlocked {
        name: Vec<u8>,
        timestamp: Timestamp,
    },
    /// A failed refund could not be put back into its record
    RefundDeferred {
        owner: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    },
    RefundClaimed {
        owner: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    },
    ParamsUpdated {
        params: RegistryParams,
        timestamp: Timestamp,
    },
    FeesWithdrawn {
        to: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    },
    AdminTransferred {
        previous: AccountId,
        admin: AccountId,
        timestamp: Timestamp,
    },
}
