//! Account (coin) contract surface

use super::ContractState;
use crate::coin::Coin;
use crate::identifiers::InstanceId;
use serde::{Deserialize, Serialize};

/// Command that debits an account into the running transaction.
pub const FETCH_COMMAND: &str = "fetch";
/// Amount argument of [`FETCH_COMMAND`].
pub const ARG_COINS: &str = "coins";
/// Coin-name argument of an account spawn.
pub const ARG_COIN_NAME: &str = "coinName";

/// Balance held by an account instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Current balance
    pub coin: Coin,
    /// Owning governance structure
    pub governance_id: InstanceId,
}

impl ContractState for AccountState {
    const CONTRACT_ID: &'static str = "account";
}
