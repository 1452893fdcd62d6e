//! Error types for the vanity name registry

use crate::types::Amount;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid name length {length}: must be between {min} and {max} bytes")]
    InvalidLength { length: usize, min: usize, max: usize },

    #[error("Name unavailable: {name} is registered until {expires_at}")]
    NameUnavailable { name: String, expires_at: u64 },

    #[error("No commitment found for this submitter and name")]
    NoCommitment,

    #[error("Commitment cooldown not elapsed: registrable from {ready_at}, now {now}")]
    CooldownNotElapsed { ready_at: u64, now: u64 },

    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment { required: Amount, provided: Amount },

    #[error("Unauthorized: caller is not the owner of {name}")]
    NotOwner { name: String },

    #[error("Invalid amount: renewal requires exactly {required}, provided {provided}")]
    InvalidAmount { required: Amount, provided: Amount },

    #[error("No locked deposit for {name}")]
    NoLockedDeposit { name: String },

    #[error("No pending refund for this account")]
    NoPendingRefund,

    #[error("No fees to withdraw")]
    NoFeesToWithdraw,

    #[error("Unauthorized: caller is not the administrator")]
    NotAdministrator,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Value transfer failed: {0}")]
    TransferFailed(anyhow::Error),

    #[error("Invalid account identity: {0}")]
    InvalidIdentity(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
