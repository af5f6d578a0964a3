//! Ledger fixtures
//!
//! [`SpawnerFixture`] seeds a [`MemoryLedger`] with an administrator identity,
//! the beneficiary account the spawner pays into, and a spawner instance.
//! [`SpawnerFixture::user`] adds funded users on top.

use crate::keys::TestSigner;
use crate::ledger::MemoryLedger;
use spawner_core::contracts::Governance;
use spawner_core::{account_id, hash, Coin, FeeSchedule, InstanceId, SpawnResult};

/// Schedule used by most tests: identity 10, account 20, credential 30,
/// event 40, wager 5.
pub fn sample_schedule(beneficiary: InstanceId) -> FeeSchedule {
    FeeSchedule {
        cost_identity: Coin::spawner(10),
        cost_account: Coin::spawner(20),
        cost_credential: Coin::spawner(30),
        cost_event: Coin::spawner(40),
        cost_wager: Coin::spawner(5),
        beneficiary,
    }
}

/// A user with a key, an identity and a funded account.
#[derive(Debug, Clone)]
pub struct TestUser {
    /// Key the user signs with
    pub signer: TestSigner,
    /// The user's identity structure
    pub governance: Governance,
    /// Base id of [`Self::governance`]
    pub governance_id: InstanceId,
    /// The user's account, derived from the identity
    pub account_id: InstanceId,
}

/// Ledger seeded with a working spawner.
#[derive(Debug, Clone)]
pub struct SpawnerFixture {
    /// The ledger
    pub ledger: MemoryLedger,
    /// Spawner instance
    pub spawner_id: InstanceId,
    /// Account receiving fees
    pub beneficiary: InstanceId,
    /// Administrator owning the spawner and the beneficiary account
    pub admin: TestUser,
}

impl SpawnerFixture {
    /// Fixture with [`sample_schedule`]
    pub async fn new() -> SpawnResult<Self> {
        Self::with_schedule(sample_schedule).await
    }

    /// Fixture whose schedule is built from the beneficiary account id
    pub async fn with_schedule(
        schedule: impl FnOnce(InstanceId) -> FeeSchedule,
    ) -> SpawnResult<Self> {
        let ledger = MemoryLedger::new();
        let admin = seed_user(&ledger, "spawner-admin", "admin", 0).await?;
        let spawner_id = InstanceId(hash::hash(b"spawner fixture"));
        ledger
            .seed_spawner(spawner_id, &schedule(admin.account_id), admin.governance_id)
            .await?;
        Ok(Self {
            ledger,
            spawner_id,
            beneficiary: admin.account_id,
            admin,
        })
    }

    /// Seed a user whose account holds `balance` spawner coins
    pub async fn user(&self, alias: &str, balance: u64) -> SpawnResult<TestUser> {
        seed_user(&self.ledger, alias, alias, balance).await
    }

    /// Seed a signer with an identity but no account
    pub async fn user_without_account(&self, alias: &str) -> SpawnResult<TestUser> {
        let signer = TestSigner::from_seed_string(alias);
        let governance = Governance::for_user(signer.public_key(), alias);
        let governance_id = self.ledger.seed_governance(&governance).await?;
        Ok(TestUser {
            signer,
            governance,
            governance_id,
            account_id: account_id(&governance_id),
        })
    }
}

async fn seed_user(
    ledger: &MemoryLedger,
    seed: &str,
    alias: &str,
    balance: u64,
) -> SpawnResult<TestUser> {
    let signer = TestSigner::from_seed_string(seed);
    let governance = Governance::for_user(signer.public_key(), alias);
    let governance_id = ledger.seed_governance(&governance).await?;
    let account_id = ledger.seed_account(governance_id, balance).await?;
    Ok(TestUser {
        signer,
        governance,
        governance_id,
        account_id,
    })
}
