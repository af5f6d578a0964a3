//! Fee schedule snapshots
//!
//! The schedule is read from the spawner instance and cached as an immutable
//! [`ScheduleSnapshot`]. Refreshing swaps the whole `Arc`, so a reader holds
//! either the old snapshot or the new one and never a mix of both.

use parking_lot::RwLock;
use spawner_core::{FeeSchedule, InstanceId, LedgerEffects, SpawnResult};
use std::sync::Arc;

/// One decoded version of the fee schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    /// Incremented on every refresh; the first load is version 0
    pub version: u64,
    /// Prices and beneficiary
    pub schedule: FeeSchedule,
}

/// Versioned cache of a spawner's fee schedule.
#[derive(Debug)]
pub struct FeeScheduleCache {
    spawner_id: InstanceId,
    current: RwLock<Arc<ScheduleSnapshot>>,
}

impl FeeScheduleCache {
    /// Cache seeded with an already decoded schedule
    pub fn new(spawner_id: InstanceId, schedule: FeeSchedule) -> Self {
        Self {
            spawner_id,
            current: RwLock::new(Arc::new(ScheduleSnapshot {
                version: 0,
                schedule,
            })),
        }
    }

    /// Read the spawner instance and cache its schedule
    pub async fn load<L>(ledger: &L, spawner_id: InstanceId) -> SpawnResult<Self>
    where
        L: LedgerEffects + ?Sized,
    {
        let schedule = fetch_schedule(ledger, &spawner_id).await?;
        Ok(Self::new(spawner_id, schedule))
    }

    /// Spawner instance the schedule belongs to
    pub fn spawner_id(&self) -> InstanceId {
        self.spawner_id
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<ScheduleSnapshot> {
        self.current.read().clone()
    }

    /// Re-read the spawner instance and replace the snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh<L>(&self, ledger: &L) -> SpawnResult<Arc<ScheduleSnapshot>>
    where
        L: LedgerEffects + ?Sized,
    {
        let schedule = fetch_schedule(ledger, &self.spawner_id).await?;
        let mut current = self.current.write();
        let next = Arc::new(ScheduleSnapshot {
            version: current.version.saturating_add(1),
            schedule,
        });
        *current = Arc::clone(&next);
        drop(current);

        tracing::info!(
            spawner = %self.spawner_id,
            version = next.version,
            "fee schedule refreshed"
        );
        Ok(next)
    }
}

async fn fetch_schedule<L>(ledger: &L, spawner_id: &InstanceId) -> SpawnResult<FeeSchedule>
where
    L: LedgerEffects + ?Sized,
{
    let proof = ledger.get_proof(spawner_id).await?;
    proof.decode_as::<FeeSchedule>(spawner_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spawner_core::{Coin, SpawnError};
    use spawner_testkit::{sample_schedule, SpawnerFixture};

    #[tokio::test]
    async fn refresh_replaces_the_whole_snapshot() {
        let fixture = SpawnerFixture::new().await.expect("fixture");
        let cache = FeeScheduleCache::load(&fixture.ledger, fixture.spawner_id)
            .await
            .expect("load");
        let before = cache.snapshot();
        assert_eq!(before.version, 0);

        let mut cheaper = sample_schedule(fixture.beneficiary);
        cheaper.cost_account = Coin::spawner(1);
        cheaper.cost_event = Coin::spawner(2);
        fixture
            .ledger
            .seed_spawner(fixture.spawner_id, &cheaper, fixture.admin.governance_id)
            .await
            .expect("reseed");

        let after = cache.refresh(&fixture.ledger).await.expect("refresh");
        assert_eq!(after.version, 1);
        assert_eq!(after.schedule, cheaper);
        assert_eq!(cache.snapshot(), after);
        // Readers holding the old snapshot keep a consistent view.
        assert_eq!(before.schedule.cost_account.value, 20);
        assert_eq!(before.schedule.cost_event.value, 40);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let fixture = SpawnerFixture::new().await.expect("fixture");
        let cache = FeeScheduleCache::load(&fixture.ledger, fixture.spawner_id)
            .await
            .expect("load");

        fixture.ledger.set_unreachable(true);
        let result = cache.refresh(&fixture.ledger).await;
        assert!(matches!(result, Err(SpawnError::NotReachable { .. })));
        assert_eq!(cache.snapshot().version, 0);
    }

    #[tokio::test]
    async fn missing_spawner_is_malformed() {
        let fixture = SpawnerFixture::new().await.expect("fixture");
        let result = FeeScheduleCache::load(&fixture.ledger, InstanceId([0xee; 32])).await;
        assert!(matches!(result, Err(SpawnError::Malformed { .. })));
    }
}
