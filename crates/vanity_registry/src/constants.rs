//! Registry-wide constants and parameter defaults.

use crate::types::{Amount, Timestamp};

/// Shortest registrable name, in bytes.
pub const NAME_MIN_LENGTH: usize = 3;

/// Longest registrable name, in bytes.
pub const NAME_MAX_LENGTH: usize = 30;

/// Cooldown between a commitment and the registration it authorizes (5 minutes).
pub const FRONTRUN_WINDOW_SECS: Timestamp = 5 * 60;

/// Default registration lifetime (365 days).
pub const DEFAULT_LOCK_DURATION_SECS: Timestamp = 365 * SECONDS_PER_DAY;

/// Default price per name byte, in base units.
pub const DEFAULT_UNIT_BYTE_PRICE: Amount = 1_000;

/// Default refundable deposit required on top of the name price.
pub const DEFAULT_LOCK_FEE: Amount = 100_000;

pub const SECONDS_PER_DAY: Timestamp = 24 * 60 * 60;
