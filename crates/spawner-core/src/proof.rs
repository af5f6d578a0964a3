//! Ledger proofs as seen by the client
//!
//! A proof answers "what is stored at this key?". Verifying the inclusion
//! path itself belongs to the ledger collaborator; the client only reads the
//! result: either the key maps to a contract value, or the proof shows
//! absence (in which case `key` is the neighbouring key the ledger returned).

use crate::contracts::ContractState;
use crate::errors::{SpawnError, SpawnResult};
use crate::identifiers::InstanceId;
use serde::{Deserialize, Serialize};

/// Value stored under a ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Contract the value belongs to
    pub contract_id: String,
    /// Contract-encoded state
    pub value: Vec<u8>,
    /// Governance structure controlling the instance
    pub governance_id: InstanceId,
}

/// Inclusion or absence proof for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Key the proof ends at
    pub key: InstanceId,
    /// Stored entry, `None` for absence proofs
    pub entry: Option<StateEntry>,
}

impl Proof {
    /// Proof that `key` holds `entry`
    pub fn present(key: InstanceId, entry: StateEntry) -> Self {
        Self {
            key,
            entry: Some(entry),
        }
    }

    /// Proof that `key` holds nothing
    pub fn absent(key: InstanceId) -> Self {
        Self { key, entry: None }
    }

    /// True when the proof shows a value stored at exactly `id`.
    pub fn exists(&self, id: &InstanceId) -> bool {
        self.key == *id && self.entry.is_some()
    }

    /// Stored entry, failing for absence proofs
    pub fn entry(&self) -> SpawnResult<&StateEntry> {
        self.entry
            .as_ref()
            .ok_or_else(|| SpawnError::malformed(format!("no value stored at {}", self.key)))
    }

    /// Encoded value
    pub fn value(&self) -> SpawnResult<&[u8]> {
        Ok(&self.entry()?.value)
    }

    /// Contract id of the stored value
    pub fn contract_id(&self) -> SpawnResult<&str> {
        Ok(&self.entry()?.contract_id)
    }

    /// Decode the entry as a specific contract state, checking the tag.
    pub fn decode_as<S: ContractState>(&self, id: &InstanceId) -> SpawnResult<S> {
        if !self.exists(id) {
            return Err(SpawnError::malformed(format!(
                "proof does not match instance {id}"
            )));
        }
        let entry = self.entry()?;
        if entry.contract_id != S::CONTRACT_ID {
            return Err(SpawnError::malformed(format!(
                "instance {id} is a '{}', expected '{}'",
                entry.contract_id,
                S::CONTRACT_ID
            )));
        }
        S::decode(&entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Coin;
    use crate::contracts::AccountState;

    fn account_entry() -> StateEntry {
        let state = AccountState {
            coin: Coin::spawner(42),
            governance_id: InstanceId([9; 32]),
        };
        StateEntry {
            contract_id: AccountState::CONTRACT_ID.to_string(),
            value: state.encode().expect("encode"),
            governance_id: InstanceId([9; 32]),
        }
    }

    #[test]
    fn absence_proof_does_not_exist() {
        let id = InstanceId([1; 32]);
        let proof = Proof::absent(id);
        assert!(!proof.exists(&id));
        assert!(proof.value().is_err());
    }

    #[test]
    fn neighbour_key_is_not_existence() {
        let proof = Proof::present(InstanceId([2; 32]), account_entry());
        assert!(!proof.exists(&InstanceId([1; 32])));
    }

    #[test]
    fn decode_as_checks_contract_tag() {
        let id = InstanceId([2; 32]);
        let proof = Proof::present(id, account_entry());
        let account: AccountState = proof.decode_as(&id).expect("account");
        assert_eq!(account.coin.value, 42);

        let wrong = proof.decode_as::<crate::contracts::WagerState>(&id);
        assert!(matches!(wrong, Err(SpawnError::Malformed { .. })));
    }
}
