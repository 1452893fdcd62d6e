//! Deterministic digests used as storage keys

use crate::types::{AccountId, CommitHash, NameHash};
use sha2::{Digest, Sha256};

/// Digest of a name's raw bytes
pub fn name_hash(name: &[u8]) -> NameHash {
    Sha256::digest(name).into()
}

/// Digest binding a submitter to the name they intend to register.
///
/// Clients compute this off-line and submit only the digest, so the name
/// stays hidden until registration.
pub fn commitment_hash(submitter: &AccountId, name: &[u8]) -> CommitHash {
    let mut h = Sha256::new();
    h.update(submitter.as_bytes());
    h.update(name);
    h.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_hash_is_deterministic() {
        assert_eq!(name_hash(b"alice"), name_hash(b"alice"));
        assert_ne!(name_hash(b"alice"), name_hash(b"alicf"));
    }

    #[test]
    fn test_commitment_binds_submitter() {
        let a = AccountId::new([1u8; 32]);
        let b = AccountId::new([2u8; 32]);
        assert_ne!(commitment_hash(&a, b"abc"), commitment_hash(&b, b"abc"));
        assert_ne!(commitment_hash(&a, b"abc"), commitment_hash(&a, b"abd"));
        assert_ne!(commitment_hash(&a, b"abc"), name_hash(b"abc"));
    }
}
