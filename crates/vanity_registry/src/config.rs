//! Registry configuration
//!
//! Values come from an optional TOML file, overridden by `VANITY_*`
//! environment variables (for example `VANITY_LOCK_FEE=250`).

use crate::constants::{DEFAULT_LOCK_DURATION_SECS, DEFAULT_LOCK_FEE, DEFAULT_UNIT_BYTE_PRICE};
use crate::errors::{RegistryError, Result};
use crate::types::{AccountId, Amount, RegistryParams, Timestamp};
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Hex identity of the initial administrator
    pub admin: Option<String>,
    #[serde(deserialize_with = "amount::deserialize")]
    pub unit_byte_price: Amount,
    #[serde(deserialize_with = "amount::deserialize")]
    pub lock_fee: Amount,
    pub lock_duration_secs: Timestamp,
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            admin: None,
            unit_byte_price: DEFAULT_UNIT_BYTE_PRICE,
            lock_fee: DEFAULT_LOCK_FEE,
            lock_duration_secs: DEFAULT_LOCK_DURATION_SECS,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Load from `path` (if given) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix("VANITY"))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(RegistryError::InvalidParameter(format!(
                    "configuration file {} not found",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }
        // Values stay strings; hex admin ids would otherwise parse as numbers.
        builder = builder.add_source(env);

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Registry parameters, validated
    pub fn params(&self) -> Result<RegistryParams> {
        if self.lock_duration_secs == 0 {
            return Err(RegistryError::InvalidParameter(
                "lock_duration_secs must be non-zero".to_string(),
            ));
        }
        Ok(RegistryParams {
            unit_byte_price: self.unit_byte_price,
            lock_fee: self.lock_fee,
            lock_duration: self.lock_duration_secs,
        })
    }

    /// Configured administrator, if any
    pub fn admin(&self) -> Result<Option<AccountId>> {
        self.admin.as_deref().map(AccountId::from_hex).transpose()
    }
}

/// `config` has no 128-bit integers; amounts arrive as integers (TOML) or
/// strings (environment) and are widened here.
mod amount {
    use crate::types::Amount;
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::custom(format!("negative amount {v}")))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.trim()
                .parse()
                .map_err(|e| E::custom(format!("invalid amount {v:?}: {e}")))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
