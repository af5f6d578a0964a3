//! # Spawner Protocol - Layer 2: Fee-Metered Spawning
//!
//! Turns "create a user identity, a funded account, a credential set, an
//! event or a wager" into a single atomically submitted ledger transaction.
//!
//! ## What Belongs Here
//!
//! - [`schedule`]: versioned fee schedule snapshots
//! - [`guard`]: existence checks at derived identifiers
//! - [`builder`]: fetch-then-spawn transactions, counters, signing, submission
//! - [`commitment`]: commit-reveal for wagers
//! - [`instances`]: handles decoded from ledger proofs
//! - [`Spawner`]: the create operations
//!
//! ## Design Principles
//!
//! - A payer is never debited without the resource being created
//! - Repeating a creation with a derived identifier is free and returns the
//!   existing resource
//! - All ledger access goes through [`spawner_core::LedgerEffects`]
//! - Nothing is retried internally

#![forbid(unsafe_code)]

pub mod builder;
pub mod commitment;
pub mod guard;
pub mod instances;
pub mod schedule;
pub mod spawner;

pub use builder::{sign_and_submit, Included, SpawnTransaction, SpawnTransactionBuilder};
pub use commitment::{commitment_hash, verify, Choice, WagerSecret, PADDING_LEN};
pub use guard::{ensure_spawned, Existence, SpawnOutcome};
pub use instances::{
    AccountInstance, CredentialInstance, EventInstance, GovernanceInstance, InstanceHandle,
    WagerInstance,
};
pub use schedule::{FeeScheduleCache, ScheduleSnapshot};
pub use spawner::Spawner;
