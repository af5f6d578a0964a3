//! Contract state decoders
//!
//! Ledger values are tagged with the id of the contract that owns them. The
//! protocol never executes these contracts; it only needs to encode spawn
//! arguments and decode the resulting state. Decoding dispatches on the tag
//! and rejects tags it does not know instead of passing bytes through.

pub mod account;
pub mod credential;
pub mod event;
pub mod governance;
pub mod spawner;
pub mod wager;

pub use account::AccountState;
pub use credential::{Attribute, Credential, CredentialSet};
pub use event::{EventDescription, EventPhase, EventState};
pub use governance::{Governance, Rule, RuleOp};
pub use spawner::{FeeSchedule, ResourceKind};
pub use wager::{WagerPhase, WagerState, UNSET_SLOT};

use crate::errors::{SpawnError, SpawnResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Name of the governance-id argument shared by several spawns.
pub const ARG_GOVERNANCE_ID: &str = "governanceID";

/// State of one contract type, with its ledger tag and byte layout.
pub trait ContractState: Sized + Serialize + DeserializeOwned {
    /// Contract id the ledger tags this state with
    const CONTRACT_ID: &'static str;

    /// Encode for the ledger
    fn encode(&self) -> SpawnResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| {
            SpawnError::serialization(format!("{} encode: {e}", Self::CONTRACT_ID))
        })
    }

    /// Decode ledger bytes, rejecting malformed layouts
    fn decode(bytes: &[u8]) -> SpawnResult<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| SpawnError::malformed(format!("{} decode: {e}", Self::CONTRACT_ID)))
    }
}

/// Decoded state of any contract the protocol spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Coin-holding account
    Account(AccountState),
    /// Credential set
    Credential(CredentialSet),
    /// Identity-governance structure
    Governance(Governance),
    /// Event (party)
    Event(EventState),
    /// Rock-paper-scissors wager
    Wager(WagerState),
    /// The spawner's fee schedule
    Spawner(FeeSchedule),
}

impl ResourceState {
    /// Decode `bytes` according to `contract_id`.
    pub fn decode(contract_id: &str, bytes: &[u8]) -> SpawnResult<Self> {
        match contract_id {
            AccountState::CONTRACT_ID => Ok(Self::Account(AccountState::decode(bytes)?)),
            CredentialSet::CONTRACT_ID => Ok(Self::Credential(CredentialSet::decode(bytes)?)),
            Governance::CONTRACT_ID => Ok(Self::Governance(Governance::decode(bytes)?)),
            EventState::CONTRACT_ID => Ok(Self::Event(EventState::decode(bytes)?)),
            WagerState::CONTRACT_ID => Ok(Self::Wager(WagerState::decode(bytes)?)),
            FeeSchedule::CONTRACT_ID => Ok(Self::Spawner(FeeSchedule::decode(bytes)?)),
            other => Err(SpawnError::unknown_contract(other)),
        }
    }

    /// Contract id of the decoded state
    pub fn contract_id(&self) -> &'static str {
        match self {
            Self::Account(_) => AccountState::CONTRACT_ID,
            Self::Credential(_) => CredentialSet::CONTRACT_ID,
            Self::Governance(_) => Governance::CONTRACT_ID,
            Self::Event(_) => EventState::CONTRACT_ID,
            Self::Wager(_) => WagerState::CONTRACT_ID,
            Self::Spawner(_) => FeeSchedule::CONTRACT_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Coin;
    use crate::identifiers::InstanceId;
    use assert_matches::assert_matches;

    #[test]
    fn dispatches_on_contract_id() {
        let state = AccountState {
            coin: Coin::spawner(7),
            governance_id: InstanceId([1; 32]),
        };
        let bytes = state.encode().expect("encode");
        let decoded = ResourceState::decode("account", &bytes).expect("decode");
        assert_eq!(decoded, ResourceState::Account(state));
        assert_eq!(decoded.contract_id(), "account");
    }

    #[test]
    fn unknown_contract_rejected() {
        assert_matches!(
            ResourceState::decode("lottery", &[]),
            Err(SpawnError::UnknownContract { contract_id }) if contract_id == "lottery"
        );
    }

    #[test]
    fn truncated_bytes_are_malformed() {
        assert_matches!(
            ResourceState::decode("wager", &[1, 2, 3]),
            Err(SpawnError::Malformed { .. })
        );
    }
}
