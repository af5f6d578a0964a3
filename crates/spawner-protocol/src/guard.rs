//! Idempotent spawn guard
//!
//! Resources with derived identifiers are looked up before anything is
//! built. If the derived id already holds the resource, the caller gets the
//! existing handle and no fee is charged. Lookup failures are errors, never
//! "absent".

use crate::instances::InstanceHandle;
use spawner_core::{ContractState, InstanceId, LedgerEffects, SpawnResult};

/// Result of an existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence<R> {
    /// The resource is registered; here is its handle
    Present(R),
    /// Nothing is stored at the derived id
    Absent,
}

/// Handle returned by a create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnOutcome<T> {
    /// The resource
    pub handle: T,
    /// True when nothing was submitted because the resource already existed
    pub already_existed: bool,
}

impl<T> SpawnOutcome<T> {
    /// Outcome for a resource found by the guard
    pub fn existing(handle: T) -> Self {
        Self {
            handle,
            already_existed: true,
        }
    }

    /// Outcome for a freshly spawned resource
    pub fn created(handle: T) -> Self {
        Self {
            handle,
            already_existed: false,
        }
    }

    /// Drop the flag
    pub fn into_handle(self) -> T {
        self.handle
    }
}

/// Check whether `derived_id` already holds an `R`.
///
/// A present instance of another contract type is `Malformed`.
pub async fn ensure_spawned<R, L>(ledger: &L, derived_id: &InstanceId) -> SpawnResult<Existence<R>>
where
    R: InstanceHandle,
    L: LedgerEffects + ?Sized,
{
    let proof = ledger.get_proof(derived_id).await?;
    if !proof.exists(derived_id) {
        return Ok(Existence::Absent);
    }
    let handle = R::from_proof(*derived_id, &proof)?;
    tracing::debug!(
        instance = %derived_id,
        contract = R::State::CONTRACT_ID,
        "resource already registered"
    );
    Ok(Existence::Present(handle))
}
