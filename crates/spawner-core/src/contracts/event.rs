//! Event (party) contract surface

use super::ContractState;
use crate::identifiers::InstanceId;
use serde::{Deserialize, Serialize};

/// Description argument of an event spawn.
pub const ARG_DESCRIPTION: &str = "description";
/// Per-attendee reward argument of an event spawn.
pub const ARG_MINING_REWARD: &str = "miningReward";

/// What an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescription {
    /// Short name
    pub name: String,
    /// Purpose statement
    pub purpose: String,
    /// Start time, unix milliseconds
    pub datetime: u64,
    /// Venue
    pub location: String,
}

impl EventDescription {
    /// bincode encoding, carried in the description argument
    pub fn to_bytes(&self) -> crate::errors::SpawnResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a description argument
    pub fn from_bytes(bytes: &[u8]) -> crate::errors::SpawnResult<Self> {
        bincode::deserialize(bytes).map_err(|e| {
            crate::errors::SpawnError::malformed(format!("event description: {e}"))
        })
    }
}

/// Lifecycle of an event, driven by its organizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPhase {
    /// Spawned, attendees not yet fixed
    Configured,
    /// Barrier passed, attendee lists being merged
    Scheduled,
    /// Attendees rewarded
    Finalized,
}

/// Stored state of an event instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventState {
    /// Current phase
    pub phase: EventPhase,
    /// Event description
    pub description: EventDescription,
    /// Organizers' joint governance structure
    pub governance_id: InstanceId,
    /// Reward per attendee, in spawner coins
    pub mining_reward: u64,
}

impl ContractState for EventState {
    const CONTRACT_ID: &'static str = "event";
}
