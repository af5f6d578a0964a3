//! Spawner contract surface: the fee schedule
//!
//! The spawner instance stores one price per resource kind and the account
//! that collects them. The schedule is read-only from the client's side;
//! refreshing it means decoding a new one from the ledger.

use super::ContractState;
use crate::coin::Coin;
use crate::errors::{SpawnError, SpawnResult};
use crate::identifiers::InstanceId;
use crate::transaction::Argument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payout-destination argument of a spawner spawn.
pub const ARG_BENEFICIARY: &str = "beneficiary";

/// Kind of resource the spawner sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// User identity-governance structure
    Identity,
    /// Coin account
    Account,
    /// Credential set
    Credential,
    /// Event
    Event,
    /// Wager
    Wager,
}

impl ResourceKind {
    /// Every kind, in schedule order
    pub const ALL: [ResourceKind; 5] = [
        Self::Identity,
        Self::Account,
        Self::Credential,
        Self::Event,
        Self::Wager,
    ];

    /// Kinds paid for at sign-up
    pub const SIGNUP: [ResourceKind; 3] = [Self::Identity, Self::Account, Self::Credential];

    /// Argument name carrying this kind's price when the spawner is created
    pub fn cost_argument(self) -> &'static str {
        match self {
            Self::Identity => "costIdentity",
            Self::Account => "costAccount",
            Self::Credential => "costCredential",
            Self::Event => "costEvent",
            Self::Wager => "costWager",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::Account => "account",
            Self::Credential => "credential",
            Self::Event => "event",
            Self::Wager => "wager",
        };
        f.write_str(name)
    }
}

/// Prices and payout destination of a spawner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Price of a user identity
    pub cost_identity: Coin,
    /// Price of an account
    pub cost_account: Coin,
    /// Price of a credential set
    pub cost_credential: Coin,
    /// Price of an event
    pub cost_event: Coin,
    /// Price of a wager, on top of the stake
    pub cost_wager: Coin,
    /// Account receiving collected fees
    pub beneficiary: InstanceId,
}

impl FeeSchedule {
    /// Price of one resource kind
    pub fn cost(&self, kind: ResourceKind) -> &Coin {
        match kind {
            ResourceKind::Identity => &self.cost_identity,
            ResourceKind::Account => &self.cost_account,
            ResourceKind::Credential => &self.cost_credential,
            ResourceKind::Event => &self.cost_event,
            ResourceKind::Wager => &self.cost_wager,
        }
    }

    /// Combined price of several kinds.
    ///
    /// Each listed kind is counted once per occurrence.
    pub fn total_cost(&self, kinds: &[ResourceKind]) -> SpawnResult<Coin> {
        let (first, rest) = kinds
            .split_first()
            .ok_or_else(|| SpawnError::validation("no resource kinds to price"))?;
        rest.iter()
            .try_fold(*self.cost(*first), |total, kind| total.checked_add(self.cost(*kind)))
    }

    /// Price of identity + account + credential set
    pub fn signup_cost(&self) -> SpawnResult<Coin> {
        self.total_cost(&ResourceKind::SIGNUP)
    }

    /// Spawn arguments that create a spawner with this schedule.
    pub fn to_arguments(&self) -> SpawnResult<Vec<Argument>> {
        let mut args = ResourceKind::ALL
            .iter()
            .map(|kind| Ok(Argument::new(kind.cost_argument(), self.cost(*kind).to_bytes()?)))
            .collect::<SpawnResult<Vec<_>>>()?;
        args.push(Argument::new(ARG_BENEFICIARY, self.beneficiary.to_vec()));
        Ok(args)
    }

    /// Rebuild a schedule from spawner spawn arguments.
    pub fn from_arguments(args: &[Argument]) -> SpawnResult<Self> {
        let find = |name: &str| {
            args.iter()
                .find(|arg| arg.name == name)
                .map(|arg| arg.value.as_slice())
                .ok_or_else(|| SpawnError::validation(format!("missing spawner argument '{name}'")))
        };
        let cost = |kind: ResourceKind| Coin::from_bytes(find(kind.cost_argument())?);
        Ok(Self {
            cost_identity: cost(ResourceKind::Identity)?,
            cost_account: cost(ResourceKind::Account)?,
            cost_credential: cost(ResourceKind::Credential)?,
            cost_event: cost(ResourceKind::Event)?,
            cost_wager: cost(ResourceKind::Wager)?,
            beneficiary: InstanceId::from_slice(find(ARG_BENEFICIARY)?)?,
        })
    }
}

impl ContractState for FeeSchedule {
    const CONTRACT_ID: &'static str = "spawner";
}
