//! # Spawner Testkit
//!
//! Test infrastructure for the spawner protocol:
//!
//! - [`MemoryLedger`]: in-memory [`spawner_core::LedgerEffects`] with
//!   all-or-nothing execution, counter and signature checks, and call counts
//! - [`TestSigner`]: deterministic ed25519 signers
//! - [`SpawnerFixture`]: a ledger pre-seeded with a spawner and funded users
//!
//! ```rust,ignore
//! let fixture = SpawnerFixture::new().await?;
//! let alice = fixture.user("alice", 100).await?;
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

pub mod fixtures;
pub mod keys;
pub mod ledger;

pub use fixtures::{sample_schedule, SpawnerFixture, TestUser};
pub use keys::TestSigner;
pub use ledger::MemoryLedger;
