//! Commit-reveal tracking
//!
//! A submitter first publishes `commitment_hash(submitter, name)`. The name can
//! only be registered by that submitter once `FRONTRUN_WINDOW_SECS` have passed,
//! which leaves an observer of the pending registration no time to react.
//!
//! Commitments are never cleared: after the name becomes vacant again the same
//! commitment authorizes another registration without a new cooldown.

use crate::constants::FRONTRUN_WINDOW_SECS;
use crate::errors::{RegistryError, Result};
use crate::hashing::commitment_hash;
use crate::types::{AccountId, CommitHash, Timestamp};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CommitRegistry {
    /// Commitment digest → submission time
    commits: HashMap<CommitHash, Timestamp>,
}

impl CommitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (CommitHash, Timestamp)>) -> Self {
        Self {
            commits: entries.into_iter().collect(),
        }
    }

    /// Record a commitment at `now`, resetting any earlier cooldown for it
    pub fn commit(&mut self, hash: CommitHash, now: Timestamp) {
        self.commits.insert(hash, now);
    }

    /// Submission time of a commitment (0 = none)
    pub fn committed_at(&self, hash: &CommitHash) -> Timestamp {
        self.commits.get(hash).copied().unwrap_or(0)
    }

    /// Verify `submitter` holds a cooled-down commitment for `name`
    pub fn check(&self, submitter: &AccountId, name: &[u8], now: Timestamp) -> Result<()> {
        let committed_at = self.committed_at(&commitment_hash(submitter, name));
        if committed_at == 0 {
            return Err(RegistryError::NoCommitment);
        }

        let ready_at = committed_at
            .checked_add(FRONTRUN_WINDOW_SECS)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        if now < ready_at {
            return Err(RegistryError::CooldownNotElapsed { ready_at, now });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&CommitHash, &Timestamp)> {
        self.commits.iter()
    }
}
