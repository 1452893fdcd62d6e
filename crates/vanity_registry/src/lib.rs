//! Vanity Name Registry
//!
//! Lets parties reserve, register, renew and release short human-readable
//! names. Names are priced by length, registration is protected against
//! front-running by a commit-reveal cooldown, and every active name escrows
//! a refundable deposit that its owner can reclaim (releasing the name).
//!
//! All mutable state lives behind a single lock inside [`NameRegistry`], so
//! each operation is applied atomically and either completes or leaves no trace.

pub mod access;
pub mod clock;
pub mod commit;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fees;
pub mod hashing;
pub mod price;
pub mod registry;
pub mod snapshot;
pub mod transfer;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crate::config::RegistryConfig;
pub use constants::*;
pub use errors::*;
pub use events::RegistryEvent;
pub use hashing::{commitment_hash, name_hash};
pub use registry::NameRegistry;
pub use snapshot::RegistrySnapshot;
pub use transfer::{InMemoryBalances, ValueTransfer};
pub use types::*;
