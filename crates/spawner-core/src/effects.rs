//! Effect interfaces for the ledger and for signing
//!
//! These traits are the only way the protocol touches the outside world.
//! Every ledger method is a suspension point; implementations live outside
//! this crate (a ledger RPC client in production, `spawner-testkit` in
//! tests).

use crate::errors::{RejectionReason, SpawnResult};
use crate::identifiers::InstanceId;
use crate::identity::Identity;
use crate::proof::Proof;
use crate::transaction::SignedTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ledger refusal as reported by submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Classified reason
    pub reason: RejectionReason,
    /// Ledger-provided detail
    pub message: String,
}

impl Rejection {
    /// Create a rejection
    pub fn new(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

/// Result of submitting a transaction and waiting for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// Every instruction was applied in the given block
    Included {
        /// Index of the block that includes the transaction
        block_index: u64,
    },
    /// Nothing was applied
    Rejected(Rejection),
}

/// Ledger capabilities consumed by the protocol.
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Inclusion or absence proof for `id`.
    ///
    /// Fails with `NotReachable` or `Malformed` when the lookup itself fails.
    async fn get_proof(&self, id: &InstanceId) -> SpawnResult<Proof>;

    /// Last accepted counter for each identity, in the same order.
    async fn latest_counters(&self, identities: &[Identity]) -> SpawnResult<Vec<u64>>;

    /// Submit and block until inclusion or rejection, waiting at most
    /// `wait_blocks` blocks.
    async fn submit_and_await(
        &self,
        transaction: &SignedTransaction,
        wait_blocks: u32,
    ) -> SpawnResult<SubmissionOutcome>;
}

/// Something that can authorize instructions.
pub trait Signer: Send + Sync {
    /// Identity the ledger checks signatures against
    fn identity(&self) -> Identity;

    /// Sign an instruction digest
    fn sign(&self, message: &[u8]) -> SpawnResult<Vec<u8>>;
}
