//! ed25519 test signers
//!
//! Deterministic key material for tests: the same seed string always yields
//! the same signer, so identities and derived ids are stable across runs.

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use spawner_core::hash;
use spawner_core::{Identity, SpawnResult, Signer};

/// Signer backed by an in-memory ed25519 key
#[derive(Debug, Clone)]
pub struct TestSigner {
    signing_key: SigningKey,
}

impl TestSigner {
    /// Create a signer from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create a signer from a seed string
    pub fn from_seed_string(seed: &str) -> Self {
        Self::from_seed(&hash::hash(seed.as_bytes()))
    }

    /// Verifying half of the key
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Raw public key bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.verifying_key().to_bytes()
    }
}

impl Signer for TestSigner {
    fn identity(&self) -> Identity {
        Identity::Ed25519(self.public_key())
    }

    fn sign(&self, message: &[u8]) -> SpawnResult<Vec<u8>> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    #[test]
    fn seed_strings_are_deterministic() {
        let a = TestSigner::from_seed_string("alice");
        let b = TestSigner::from_seed_string("alice");
        let c = TestSigner::from_seed_string("bob");
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn signatures_verify() {
        let signer = TestSigner::from_seed_string("alice");
        let bytes = signer.sign(b"digest").expect("sign");
        let signature = Signature::from_slice(&bytes).expect("signature");
        assert!(signer.verifying_key().verify(b"digest", &signature).is_ok());
    }
}
