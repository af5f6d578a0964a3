//! # Spawner Core - Layer 1: Types and Effect Interfaces
//!
//! Foundation of the fee-metered spawning protocol: identifiers, coins,
//! the client transaction model, ledger proofs, contract state decoders and
//! the effect traits through which the protocol reaches the ledger.
//!
//! ## What Belongs Here
//!
//! - Deterministic identifier derivation (`sha256(tag || owner)`)
//! - Instruction / transaction types with counter and signature handling
//! - Contract state types and the tagged [`contracts::ResourceState`] decoder
//! - [`effects::LedgerEffects`] and [`effects::Signer`]
//! - The unified [`SpawnError`]
//!
//! ## What Does NOT Belong Here
//!
//! - Transaction composition and spawn flows (spawner-protocol)
//! - Ledger or signer implementations (spawner-testkit, production clients)

#![forbid(unsafe_code)]

/// Priced quantities
pub mod coin;

/// Client configuration
pub mod config;

/// Contract state decoders
pub mod contracts;

/// Ledger and signing effect interfaces
pub mod effects;

/// Unified error handling
pub mod errors;

/// SHA-256 hashing
pub mod hash;

/// Instance identifiers and derivation
pub mod identifiers;

/// Signing identities
pub mod identity;

/// Ledger proofs
pub mod proof;

/// Client transaction model
pub mod transaction;

pub use coin::{Coin, CoinName};
pub use config::SpawnerConfig;
pub use contracts::{ContractState, FeeSchedule, ResourceKind, ResourceState};
pub use effects::{LedgerEffects, Rejection, Signer, SubmissionOutcome};
pub use errors::{RejectionReason, SpawnError, SpawnResult};
pub use identifiers::{account_id, credential_id, derive_id, InstanceId};
pub use identity::Identity;
pub use proof::{Proof, StateEntry};
pub use transaction::{
    Argument, Instruction, InstructionKind, SignedTransaction, UnsignedTransaction,
};
