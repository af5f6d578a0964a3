//! Instance identifiers and deterministic identifier derivation
//!
//! Singleton-per-owner resources (accounts, credential sets) live at an
//! identifier derived from the owner's base identifier and a type tag. Two
//! derivations with the same tag and owner always agree, which is what makes
//! repeated creation requests idempotent. Distinct tags keep resource classes
//! of the same owner apart.
//!
//! Resources created in bulk under one owner (events, wagers) are not derived
//! here; they receive ledger-assigned identifiers from the spawning
//! instruction (see [`crate::transaction::Instruction::derive_id`]).

use crate::errors::{SpawnError, SpawnResult};
use crate::hash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag for account instances.
pub const ACCOUNT_TAG: &str = "account";
/// Type tag for credential-set instances.
pub const CREDENTIAL_TAG: &str = "credential";

/// 32-byte identifier of a ledger resource.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct InstanceId(pub [u8; 32]);

impl InstanceId {
    /// Wrap raw identifier bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a byte slice of exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> SpawnResult<Self> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| {
            SpawnError::malformed(format!(
                "instance id must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy into an owned vector (for instruction arguments)
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", hex::encode(&self.0[..8]))
    }
}

impl FromStr for InstanceId {
    type Err = SpawnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| SpawnError::validation(format!("invalid instance id hex: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for InstanceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for InstanceId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Derive the identifier of a singleton resource: `sha256(type_tag || owner_base_id)`.
pub fn derive_id(type_tag: &str, owner_base_id: &[u8]) -> InstanceId {
    InstanceId(hash::hash_parts(&[type_tag.as_bytes(), owner_base_id]))
}

/// Identifier of the account owned by a governance structure.
pub fn account_id(owner: &InstanceId) -> InstanceId {
    derive_id(ACCOUNT_TAG, owner.as_bytes())
}

/// Identifier of the credential set owned by a governance structure.
pub fn credential_id(owner: &InstanceId) -> InstanceId {
    derive_id(CREDENTIAL_TAG, owner.as_bytes())
}
