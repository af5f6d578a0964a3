//! Rock-paper-scissors wager contract surface
//!
//! The stored state only ever carries the first player's commitment hash.
//! Slots use [`UNSET_SLOT`] until the corresponding player has acted.

use super::ContractState;
use crate::coin::Coin;
use crate::identifiers::InstanceId;
use serde::{Deserialize, Serialize};

/// Whole-state argument of a wager spawn.
pub const ARG_STRUCT: &str = "struct";
/// Command the first player uses to reveal.
pub const CONFIRM_COMMAND: &str = "confirm";
/// Reveal argument: reduced choice byte followed by the padding.
pub const ARG_PREHASH: &str = "prehash";
/// Account argument receiving the payout.
pub const ARG_ACCOUNT: &str = "account";
/// Sentinel for a player slot nobody has filled.
pub const UNSET_SLOT: i32 = -1;

/// Progress of a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerPhase {
    /// Commitment published, nobody joined
    Created,
    /// Second player staked and chose
    Joined,
    /// First player disclosed choice and padding
    Revealed,
    /// Paid out; the contract removed the instance
    Resolved,
}

/// Stored state of a wager instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerState {
    /// Free-text description
    pub description: String,
    /// Priced stake: what each player puts in plus the wager price
    pub stake: Coin,
    /// `sha256(choice mod 3 || padding)`
    pub first_player_hash: [u8; 32],
    /// Revealed first-player choice, or [`UNSET_SLOT`]
    pub first_player: i32,
    /// Second-player choice, or [`UNSET_SLOT`]
    pub second_player: i32,
    /// Account of the second player once joined
    pub second_player_account: Option<InstanceId>,
}

impl WagerState {
    /// Fresh wager carrying only the commitment.
    pub fn new(description: impl Into<String>, stake: Coin, first_player_hash: [u8; 32]) -> Self {
        Self {
            description: description.into(),
            stake,
            first_player_hash,
            first_player: UNSET_SLOT,
            second_player: UNSET_SLOT,
            second_player_account: None,
        }
    }

    /// Phase implied by the stored slots.
    ///
    /// `Resolved` is never stored: a resolved wager no longer exists.
    pub fn phase(&self) -> WagerPhase {
        if self.first_player >= 0 {
            WagerPhase::Revealed
        } else if self.second_player >= 0 {
            WagerPhase::Joined
        } else {
            WagerPhase::Created
        }
    }
}

impl ContractState for WagerState {
    const CONTRACT_ID: &'static str = "wager";
}
