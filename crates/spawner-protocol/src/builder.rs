//! Atomic spawn transactions
//!
//! Every paid creation is one transaction: instruction 0 fetches the price
//! from the payer's account, the following instructions spawn through the
//! spawner. The ledger applies all of them or none, so a payer is never
//! debited for a resource that was not created.
//!
//! Submission is strictly counters, then signatures, then submit-and-wait.
//! Nothing is retried; a stale counter surfaces as `StaleState` and the
//! caller rebuilds.

use crate::schedule::ScheduleSnapshot;
use spawner_core::contracts::account::{ARG_COINS, FETCH_COMMAND};
use spawner_core::contracts::AccountState;
use spawner_core::{
    Argument, Coin, ContractState, Identity, InstanceId, Instruction, LedgerEffects,
    RejectionReason, ResourceKind, SignedTransaction, Signer, SpawnError, SpawnResult,
    SubmissionOutcome, UnsignedTransaction,
};
use std::sync::Arc;

/// Entry point for composing paid spawns.
pub struct SpawnTransaction;

impl SpawnTransaction {
    /// Start a transaction paid from `payer` through `spawner_id`, priced
    /// with `schedule`.
    pub fn builder(
        spawner_id: InstanceId,
        payer: InstanceId,
        schedule: Arc<ScheduleSnapshot>,
    ) -> SpawnTransactionBuilder {
        SpawnTransactionBuilder {
            spawner_id,
            payer,
            schedule,
            kinds: Vec::new(),
            extra: 0,
            price_override: None,
            spawns: Vec::new(),
        }
    }
}

/// Fetch-then-spawn composer.
#[derive(Debug, Clone)]
pub struct SpawnTransactionBuilder {
    spawner_id: InstanceId,
    payer: InstanceId,
    schedule: Arc<ScheduleSnapshot>,
    kinds: Vec<ResourceKind>,
    extra: u64,
    price_override: Option<Coin>,
    spawns: Vec<Instruction>,
}

impl SpawnTransactionBuilder {
    /// Add a spawn of `contract_id`, priced as `kind`
    pub fn spawn(mut self, kind: ResourceKind, contract_id: &str, args: Vec<Argument>) -> Self {
        self.kinds.push(kind);
        self.spawns
            .push(Instruction::spawn(self.spawner_id, contract_id, args));
        self
    }

    /// Fetch `amount` on top of the schedule price
    pub fn extra(mut self, amount: u64) -> Self {
        self.extra = amount;
        self
    }

    /// Fetch exactly `price` instead of the schedule price
    pub fn price_override(mut self, price: Coin) -> Self {
        self.price_override = Some(price);
        self
    }

    /// Amount the fetch instruction withdraws
    pub fn price(&self) -> SpawnResult<Coin> {
        if let Some(price) = self.price_override {
            return Ok(price);
        }
        self.schedule
            .schedule
            .total_cost(&self.kinds)?
            .checked_add_value(self.extra)
    }

    /// Produce the unsigned transaction: the fetch, then every spawn.
    pub fn compose(self) -> SpawnResult<UnsignedTransaction> {
        if self.spawns.is_empty() {
            return Err(SpawnError::validation(
                "a spawn transaction needs at least one spawn",
            ));
        }
        let price = self.price()?;
        let fetch = Instruction::invoke(
            self.payer,
            AccountState::CONTRACT_ID,
            FETCH_COMMAND,
            vec![Argument::amount(ARG_COINS, price.value)],
        );

        let mut instructions = Vec::with_capacity(1 + self.spawns.len());
        instructions.push(fetch);
        instructions.extend(self.spawns);

        tracing::debug!(
            payer = %self.payer,
            price = price.value,
            schedule_version = self.schedule.version,
            kinds = ?self.kinds,
            "composed spawn transaction"
        );
        UnsignedTransaction::new(instructions)
    }

    /// Compose, sign and submit in one step
    pub async fn submit<L>(
        self,
        ledger: &L,
        signers: &[&dyn Signer],
        wait_blocks: u32,
    ) -> SpawnResult<Included>
    where
        L: LedgerEffects + ?Sized,
    {
        let transaction = self.compose()?;
        sign_and_submit(ledger, transaction, signers, wait_blocks).await
    }
}

/// A transaction the ledger included.
#[derive(Debug, Clone)]
pub struct Included {
    /// The transaction as submitted
    pub transaction: SignedTransaction,
    /// Block that includes it
    pub block_index: u64,
}

impl Included {
    /// Ledger-assigned id of what instruction `index` spawned
    pub fn spawned_id(&self, index: usize) -> SpawnResult<InstanceId> {
        Ok(self.transaction.instruction(index)?.derive_id(""))
    }
}

/// Apply fresh counters, sign and submit, then wait for inclusion.
pub async fn sign_and_submit<L>(
    ledger: &L,
    mut transaction: UnsignedTransaction,
    signers: &[&dyn Signer],
    wait_blocks: u32,
) -> SpawnResult<Included>
where
    L: LedgerEffects + ?Sized,
{
    let identities: Vec<Identity> = signers.iter().map(|signer| signer.identity()).collect();
    let latest = ledger.latest_counters(&identities).await?;
    transaction.apply_counters(&identities, &latest)?;
    let transaction = transaction.sign_with(signers)?;
    let tx_hash = InstanceId(transaction.hash());

    tracing::info!(
        tx = %tx_hash,
        instructions = transaction.instructions().len(),
        wait_blocks,
        "submitting transaction"
    );
    match ledger.submit_and_await(&transaction, wait_blocks).await? {
        SubmissionOutcome::Included { block_index } => {
            tracing::info!(tx = %tx_hash, block_index, "transaction included");
            Ok(Included {
                transaction,
                block_index,
            })
        }
        SubmissionOutcome::Rejected(rejection) => {
            tracing::warn!(
                tx = %tx_hash,
                reason = %rejection.reason,
                message = %rejection.message,
                "transaction rejected"
            );
            Err(match rejection.reason {
                RejectionReason::StaleCounter => SpawnError::stale_state(rejection.message),
                reason => SpawnError::rejected(reason, rejection.message),
            })
        }
    }
}
