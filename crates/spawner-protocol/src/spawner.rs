//! The spawner façade
//!
//! [`Spawner`] turns "create an X" into one fee-paying transaction against a
//! spawner instance. Resources with derived identifiers (identities,
//! accounts, credential sets) are guarded, so repeating a creation returns
//! the existing resource without charging again. Events and wagers get
//! ledger-assigned identifiers and are created every time.

use crate::builder::{sign_and_submit, SpawnTransaction, SpawnTransactionBuilder};
use crate::commitment::WagerSecret;
use crate::guard::{ensure_spawned, Existence, SpawnOutcome};
use crate::instances::{
    AccountInstance, CredentialInstance, EventInstance, GovernanceInstance, InstanceHandle,
    WagerInstance,
};
use crate::schedule::{FeeScheduleCache, ScheduleSnapshot};
use spawner_core::config::DEFAULT_INCLUSION_WAIT_BLOCKS;
use spawner_core::contracts::account::ARG_COIN_NAME;
use spawner_core::contracts::credential::ARG_CREDENTIAL;
use spawner_core::contracts::event::{ARG_DESCRIPTION, ARG_MINING_REWARD};
use spawner_core::contracts::governance::ARG_GOVERNANCE;
use spawner_core::contracts::wager::ARG_STRUCT;
use spawner_core::contracts::{
    AccountState, CredentialSet, EventDescription, EventState, Governance, WagerState,
    ARG_GOVERNANCE_ID,
};
use spawner_core::{
    account_id, credential_id, Argument, Coin, ContractState, FeeSchedule, InstanceId,
    Instruction, LedgerEffects, ResourceKind, Signer, SpawnError, SpawnResult, SpawnerConfig,
    UnsignedTransaction,
};
use std::sync::Arc;

/// Client for one spawner instance.
#[derive(Debug)]
pub struct Spawner<L: LedgerEffects> {
    ledger: Arc<L>,
    schedule: FeeScheduleCache,
    wait_blocks: u32,
}

impl<L: LedgerEffects> Spawner<L> {
    /// Create a spawner instance through the governance structure
    /// `governance_id`, then load it.
    ///
    /// `signers` must satisfy that structure's spawn rule.
    pub async fn create(
        ledger: Arc<L>,
        governance_id: InstanceId,
        schedule: &FeeSchedule,
        signers: &[&dyn Signer],
        wait_blocks: u32,
    ) -> SpawnResult<Self> {
        let spawn = Instruction::spawn(
            governance_id,
            FeeSchedule::CONTRACT_ID,
            schedule.to_arguments()?,
        );
        let transaction = UnsignedTransaction::new(vec![spawn])?;
        let included = sign_and_submit(ledger.as_ref(), transaction, signers, wait_blocks).await?;
        let spawner_id = included.spawned_id(0)?;
        tracing::info!(spawner = %spawner_id, "spawner instance created");
        Ok(Self::from_ledger(ledger, spawner_id)
            .await?
            .with_inclusion_wait(wait_blocks))
    }

    /// Load an existing spawner instance
    pub async fn from_ledger(ledger: Arc<L>, spawner_id: InstanceId) -> SpawnResult<Self> {
        let schedule = FeeScheduleCache::load(ledger.as_ref(), spawner_id).await?;
        Ok(Self {
            ledger,
            schedule,
            wait_blocks: DEFAULT_INCLUSION_WAIT_BLOCKS,
        })
    }

    /// Load the spawner named in `config`, with its inclusion wait.
    ///
    /// Fails with `Config` when the spawner charges in a coin other than the
    /// configured `coin_name`.
    pub async fn from_config(ledger: Arc<L>, config: &SpawnerConfig) -> SpawnResult<Self> {
        config.validate()?;
        let spawner_id = config
            .spawner_instance()?
            .ok_or_else(|| SpawnError::config("spawner_id is not set"))?;
        let spawner = Self::from_ledger(ledger, spawner_id).await?;

        let charged = spawner.schedule().schedule.cost_account.name;
        if config.coin()? != charged {
            return Err(SpawnError::config(format!(
                "coin_name {} does not match the spawner's coin {}",
                config.coin_name,
                charged.label()
            )));
        }
        Ok(spawner.with_inclusion_wait(config.inclusion_wait_blocks))
    }

    /// Wait up to `blocks` blocks for each submission
    pub fn with_inclusion_wait(mut self, blocks: u32) -> Self {
        self.wait_blocks = blocks;
        self
    }

    /// Spawner instance id
    pub fn id(&self) -> InstanceId {
        self.schedule.spawner_id()
    }

    /// Current fee schedule snapshot
    pub fn schedule(&self) -> Arc<ScheduleSnapshot> {
        self.schedule.snapshot()
    }

    /// Re-read the fee schedule from the ledger
    pub async fn refresh_schedule(&self) -> SpawnResult<Arc<ScheduleSnapshot>> {
        self.schedule.refresh(self.ledger.as_ref()).await
    }

    /// Price of an identity, an account and a credential set
    pub fn total_signup_cost(&self) -> SpawnResult<Coin> {
        self.schedule().schedule.signup_cost()
    }

    fn builder(&self, payer: &AccountInstance) -> SpawnTransactionBuilder {
        SpawnTransaction::builder(self.id(), payer.id(), self.schedule())
    }

    /// Create the identity structure of a user.
    ///
    /// The structure is content-addressed, so the same key and alias always
    /// land on the same id and a repeated call returns the existing one.
    pub async fn create_identity(
        &self,
        payer: &AccountInstance,
        signer: &dyn Signer,
        public_key: [u8; 32],
        alias: &str,
    ) -> SpawnResult<SpawnOutcome<GovernanceInstance>> {
        let structure = Governance::for_user(public_key, alias);
        let id = structure.base_id();
        if let Existence::Present(handle) = ensure_spawned(self.ledger.as_ref(), &id).await? {
            return Ok(SpawnOutcome::existing(handle));
        }

        tracing::info!(identity = %id, alias, "creating identity");
        self.builder(payer)
            .spawn(
                ResourceKind::Identity,
                Governance::CONTRACT_ID,
                vec![Argument::new(ARG_GOVERNANCE, structure.encode()?)],
            )
            .submit(self.ledger.as_ref(), &[signer], self.wait_blocks)
            .await?;
        let handle = GovernanceInstance::from_ledger(self.ledger.as_ref(), id).await?;
        Ok(SpawnOutcome::created(handle))
    }

    /// Create the account of `owner`, funded with `initial_balance` taken
    /// from the payer on top of the account price.
    pub async fn create_account(
        &self,
        payer: &AccountInstance,
        signer: &dyn Signer,
        owner: InstanceId,
        initial_balance: u64,
    ) -> SpawnResult<SpawnOutcome<AccountInstance>> {
        let id = account_id(&owner);
        if let Existence::Present(handle) = ensure_spawned(self.ledger.as_ref(), &id).await? {
            return Ok(SpawnOutcome::existing(handle));
        }

        let coin_name = self.schedule().schedule.cost_account.name;
        tracing::info!(account = %id, owner = %owner, initial_balance, "creating account");
        self.builder(payer)
            .spawn(
                ResourceKind::Account,
                AccountState::CONTRACT_ID,
                vec![
                    Argument::new(ARG_COIN_NAME, coin_name.as_bytes().to_vec()),
                    Argument::new(ARG_GOVERNANCE_ID, owner.to_vec()),
                ],
            )
            .extra(initial_balance)
            .submit(self.ledger.as_ref(), &[signer], self.wait_blocks)
            .await?;
        let handle = AccountInstance::from_ledger(self.ledger.as_ref(), id).await?;
        Ok(SpawnOutcome::created(handle))
    }

    /// Create the credential set of `owner`
    pub async fn create_credential_set(
        &self,
        payer: &AccountInstance,
        signer: &dyn Signer,
        owner: InstanceId,
        credentials: &CredentialSet,
    ) -> SpawnResult<SpawnOutcome<CredentialInstance>> {
        let id = credential_id(&owner);
        if let Existence::Present(handle) = ensure_spawned(self.ledger.as_ref(), &id).await? {
            return Ok(SpawnOutcome::existing(handle));
        }

        tracing::info!(credential = %id, owner = %owner, "creating credential set");
        self.builder(payer)
            .spawn(
                ResourceKind::Credential,
                CredentialSet::CONTRACT_ID,
                vec![
                    Argument::new(ARG_GOVERNANCE_ID, owner.to_vec()),
                    Argument::new(ARG_CREDENTIAL, credentials.encode()?),
                ],
            )
            .submit(self.ledger.as_ref(), &[signer], self.wait_blocks)
            .await?;
        let handle = CredentialInstance::from_ledger(self.ledger.as_ref(), id).await?;
        Ok(SpawnOutcome::created(handle))
    }

    /// Create an event co-governed by `organizers`.
    ///
    /// Every organizer must have published a personhood key; this is checked
    /// before touching the ledger.
    pub async fn create_event(
        &self,
        payer: &AccountInstance,
        signer: &dyn Signer,
        organizers: &[CredentialInstance],
        description: &EventDescription,
        mining_reward: u64,
    ) -> SpawnResult<EventInstance> {
        if organizers.is_empty() {
            return Err(SpawnError::validation("an event needs at least one organizer"));
        }
        if let Some(missing) = organizers.iter().find(|org| org.personhood_key().is_none()) {
            return Err(SpawnError::validation(format!(
                "organizer {} has not published a personhood key",
                missing.governance_id()
            )));
        }

        let organizer_ids: Vec<InstanceId> =
            organizers.iter().map(CredentialInstance::governance_id).collect();
        let structure = Governance::for_organizers(
            &organizer_ids,
            &format!("party-governance {}", description.name),
        );
        let included = self
            .builder(payer)
            .spawn(
                ResourceKind::Identity,
                Governance::CONTRACT_ID,
                vec![Argument::new(ARG_GOVERNANCE, structure.encode()?)],
            )
            .spawn(
                ResourceKind::Event,
                EventState::CONTRACT_ID,
                vec![
                    Argument::new(ARG_GOVERNANCE_ID, structure.base_id().to_vec()),
                    Argument::new(ARG_DESCRIPTION, description.to_bytes()?),
                    Argument::amount(ARG_MINING_REWARD, mining_reward),
                ],
            )
            .submit(self.ledger.as_ref(), &[signer], self.wait_blocks)
            .await?;

        let id = included.spawned_id(2)?;
        tracing::info!(event = %id, organizers = organizers.len(), "event created");
        EventInstance::from_ledger(self.ledger.as_ref(), id).await
    }

    /// Create a wager committing to `choice` with a 31-byte `padding`.
    ///
    /// The payer's visible balance must cover the stake plus the wager price;
    /// both this and the padding length are checked before any ledger call.
    /// The published state carries that priced stake. The returned handle
    /// carries the plaintext needed to reveal later.
    pub async fn create_wager(
        &self,
        payer: &AccountInstance,
        signer: &dyn Signer,
        stake: u64,
        choice: u8,
        padding: &[u8],
        description: &str,
    ) -> SpawnResult<WagerInstance> {
        let secret = WagerSecret::new(choice, padding)?;
        let schedule = self.schedule();
        let stake = Coin::new(schedule.schedule.cost_wager.name, stake);
        let price = schedule.schedule.cost_wager.checked_add(&stake)?;
        if payer.balance() < price.value {
            return Err(SpawnError::validation(format!(
                "balance {} does not cover stake {} plus wager cost {}",
                payer.balance(),
                stake.value,
                schedule.schedule.cost_wager.value
            )));
        }

        let state = WagerState::new(description, price, secret.commitment());
        let included = SpawnTransaction::builder(self.id(), payer.id(), schedule)
            .spawn(
                ResourceKind::Wager,
                WagerState::CONTRACT_ID,
                vec![Argument::new(ARG_STRUCT, state.encode()?)],
            )
            .extra(stake.value)
            .submit(self.ledger.as_ref(), &[signer], self.wait_blocks)
            .await?;

        let id = included.spawned_id(1)?;
        tracing::info!(wager = %id, stake = stake.value, "wager created");
        Ok(WagerInstance::from_ledger(self.ledger.as_ref(), id)
            .await?
            .with_secret(secret))
    }
}
