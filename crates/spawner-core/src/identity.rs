//! Signing identities
//!
//! An identity is whoever can appear in a governance rule expression and in
//! an instruction's signer list. The string form doubles as the key under
//! which the ledger tracks the identity's replay counter.

use crate::errors::{SpawnError, SpawnResult};
use crate::identifiers::InstanceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A party that can authorize instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Identity {
    /// A single ed25519 public key
    Ed25519([u8; 32]),
    /// Another governance structure, referenced by its base id
    Governance(InstanceId),
}

impl Identity {
    /// Public key bytes for key identities
    pub fn ed25519_key(&self) -> Option<&[u8; 32]> {
        match self {
            Self::Ed25519(key) => Some(key),
            Self::Governance(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(key) => write!(f, "ed25519:{}", hex::encode(key)),
            Self::Governance(id) => write!(f, "governance:{id}"),
        }
    }
}

impl FromStr for Identity {
    type Err = SpawnError;

    fn from_str(s: &str) -> SpawnResult<Self> {
        let (kind, body) = s
            .split_once(':')
            .ok_or_else(|| SpawnError::validation(format!("identity without kind: {s}")))?;
        match kind {
            "ed25519" => {
                let bytes = hex::decode(body)
                    .map_err(|e| SpawnError::validation(format!("invalid ed25519 hex: {e}")))?;
                let key: [u8; 32] = bytes.try_into().map_err(|_| {
                    SpawnError::validation("ed25519 public key must be 32 bytes")
                })?;
                Ok(Self::Ed25519(key))
            }
            "governance" => Ok(Self::Governance(body.parse()?)),
            other => Err(SpawnError::validation(format!(
                "unknown identity kind: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form_round_trips() {
        for identity in [
            Identity::Ed25519([3; 32]),
            Identity::Governance(InstanceId([4; 32])),
        ] {
            let parsed: Identity = identity.to_string().parse().expect("parse");
            assert_eq!(parsed, identity);
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!("x509:abcd".parse::<Identity>().is_err());
        assert!("no-kind".parse::<Identity>().is_err());
    }
}
