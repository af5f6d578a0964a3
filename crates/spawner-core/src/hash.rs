//! Pure synchronous hashing for identifiers and commitments
//!
//! Every digest in the protocol goes through this module: derived instance
//! identifiers, instruction hashes, governance base ids and wager commitments.
//! Hashing is deterministic and side-effect free, so it sits outside the
//! effect traits.
//!
//! Current algorithm: **SHA-256** (32-byte output).
//!
//! ```
//! use spawner_core::hash::{hash, hasher};
//!
//! let digest = hash(b"hello world");
//!
//! let mut h = hasher();
//! h.update(b"hello");
//! h.update(b" world");
//! assert_eq!(h.finalize(), digest);
//! ```

use sha2::{Digest, Sha256};
use std::fmt;

/// Length of every digest produced by this module.
pub const DIGEST_LEN: usize = 32;

/// Incremental hasher for multi-part input.
///
/// Parts are concatenated with no delimiter; callers that need framing must
/// add it themselves.
#[derive(Clone, Default)]
pub struct Hasher(Sha256);

impl Hasher {
    /// Update the hasher with more data
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    /// Finalize and return the 32-byte digest
    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        let result = self.0.finalize();
        let mut output = [0u8; DIGEST_LEN];
        output.copy_from_slice(&result);
        output
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hasher(sha256)")
    }
}

/// Create an incremental hasher.
pub fn hasher() -> Hasher {
    Hasher::default()
}

/// Hash arbitrary bytes to a 32-byte digest.
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut h = hasher();
    h.update(data);
    h.finalize()
}

/// Hash the concatenation of several parts.
pub fn hash_parts(parts: &[&[u8]]) -> [u8; DIGEST_LEN] {
    let mut h = hasher();
    for part in parts {
        h.update(part);
    }
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash(b"test"), hash(b"test"));
        assert_ne!(hash(b"test"), hash(b"other"));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            hex::encode(hash(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parts_match_concatenation() {
        assert_eq!(hash_parts(&[b"acc", b"ount"]), hash(b"account"));
    }
}
