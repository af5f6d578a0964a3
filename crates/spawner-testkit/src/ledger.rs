//! In-memory ledger for testing
//!
//! [`MemoryLedger`] implements [`LedgerEffects`] over a map of instances
//! behind `Arc<RwLock<>>`, so clones share one ledger. Submission executes
//! every instruction against a scratch copy of the state and commits only
//! when all of them succeed.
//!
//! Modelled: ed25519 signature checks, per-identity counters, the account
//! `fetch` command, paid spawns through a spawner instance and the creation
//! of spawner instances through a governance structure. Not modelled:
//! governance rule evaluation and contract commands beyond `fetch`.

use async_lock::RwLock;
use async_trait::async_trait;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use spawner_core::coin::decode_amount;
use spawner_core::contracts::{
    account, credential, event, governance, wager, AccountState, CredentialSet,
    EventDescription, EventPhase, EventState, Governance, WagerState, ARG_GOVERNANCE_ID,
};
use spawner_core::{
    account_id, credential_id, Coin, CoinName, ContractState, FeeSchedule, Identity,
    Instruction, InstructionKind, InstanceId, LedgerEffects, Proof, Rejection, RejectionReason,
    ResourceKind, ResourceState, SignedTransaction, SpawnError, SpawnResult, StateEntry,
    SubmissionOutcome,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    instances: BTreeMap<InstanceId, StateEntry>,
    counters: HashMap<Identity, u64>,
    block_index: u64,
}

#[derive(Debug, Default)]
struct CallLog {
    proofs: AtomicUsize,
    counters: AtomicUsize,
    submissions: AtomicUsize,
}

/// Shared in-memory ledger
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<LedgerState>>,
    calls: Arc<CallLog>,
    unreachable: Arc<AtomicBool>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `state` at `id` without going through a transaction
    pub async fn insert<S: ContractState>(
        &self,
        id: InstanceId,
        state: &S,
        governance_id: InstanceId,
    ) -> SpawnResult<()> {
        let entry = StateEntry {
            contract_id: S::CONTRACT_ID.to_string(),
            value: state.encode()?,
            governance_id,
        };
        self.insert_entry(id, entry).await;
        Ok(())
    }

    /// Store a raw entry, e.g. one with bytes no contract can decode
    pub async fn insert_entry(&self, id: InstanceId, entry: StateEntry) {
        self.state.write().await.instances.insert(id, entry);
    }

    /// Drop the instance at `id`, as a contract does when it resolves
    pub async fn remove(&self, id: &InstanceId) -> bool {
        self.state.write().await.instances.remove(id).is_some()
    }

    /// Store a governance structure at its base id
    pub async fn seed_governance(&self, governance: &Governance) -> SpawnResult<InstanceId> {
        let id = governance.base_id();
        self.insert(id, governance, id).await?;
        Ok(id)
    }

    /// Store a spawner-coin account at the id derived from `owner`
    pub async fn seed_account(&self, owner: InstanceId, balance: u64) -> SpawnResult<InstanceId> {
        let id = account_id(&owner);
        let state = AccountState {
            coin: Coin::spawner(balance),
            governance_id: owner,
        };
        self.insert(id, &state, owner).await?;
        Ok(id)
    }

    /// Store a spawner instance
    pub async fn seed_spawner(
        &self,
        id: InstanceId,
        schedule: &FeeSchedule,
        governance_id: InstanceId,
    ) -> SpawnResult<()> {
        self.insert(id, schedule, governance_id).await
    }

    /// True when something is stored at `id`
    pub async fn contains(&self, id: &InstanceId) -> bool {
        self.state.read().await.instances.contains_key(id)
    }

    /// Decoded state at `id`
    pub async fn state<S: ContractState>(&self, id: &InstanceId) -> SpawnResult<S> {
        self.proof_of(id).await.decode_as(id)
    }

    /// Balance of the account at `id`
    pub async fn balance(&self, id: &InstanceId) -> SpawnResult<u64> {
        Ok(self.state::<AccountState>(id).await?.coin.value)
    }

    /// Last accepted counter of `identity`
    pub async fn counter(&self, identity: &Identity) -> u64 {
        self.state
            .read()
            .await
            .counters
            .get(identity)
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite the counter of `identity`, as a submission from elsewhere would
    pub async fn set_counter(&self, identity: Identity, counter: u64) {
        self.state.write().await.counters.insert(identity, counter);
    }

    /// Index of the last committed block
    pub async fn block_index(&self) -> u64 {
        self.state.read().await.block_index
    }

    /// Make every ledger call fail with `NotReachable`
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of `get_proof` calls
    pub fn proof_lookups(&self) -> usize {
        self.calls.proofs.load(Ordering::SeqCst)
    }

    /// Number of `latest_counters` calls
    pub fn counter_fetches(&self) -> usize {
        self.calls.counters.load(Ordering::SeqCst)
    }

    /// Number of `submit_and_await` calls
    pub fn submissions(&self) -> usize {
        self.calls.submissions.load(Ordering::SeqCst)
    }

    /// Total number of ledger calls
    pub fn ledger_calls(&self) -> usize {
        self.proof_lookups() + self.counter_fetches() + self.submissions()
    }

    /// Zero all call counters
    pub fn reset_call_counts(&self) {
        self.calls.proofs.store(0, Ordering::SeqCst);
        self.calls.counters.store(0, Ordering::SeqCst);
        self.calls.submissions.store(0, Ordering::SeqCst);
    }

    async fn proof_of(&self, id: &InstanceId) -> Proof {
        let state = self.state.read().await;
        match state.instances.get(id) {
            Some(entry) => Proof::present(*id, entry.clone()),
            None => {
                let neighbour = state.instances.range(*id..).next().map_or(*id, |(key, _)| *key);
                Proof::absent(neighbour)
            }
        }
    }

    fn check_reachable(&self) -> SpawnResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(SpawnError::not_reachable("memory ledger switched off"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerEffects for MemoryLedger {
    async fn get_proof(&self, id: &InstanceId) -> SpawnResult<Proof> {
        self.calls.proofs.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.proof_of(id).await)
    }

    async fn latest_counters(&self, identities: &[Identity]) -> SpawnResult<Vec<u64>> {
        self.calls.counters.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let state = self.state.read().await;
        Ok(identities
            .iter()
            .map(|identity| state.counters.get(identity).copied().unwrap_or(0))
            .collect())
    }

    async fn submit_and_await(
        &self,
        transaction: &SignedTransaction,
        wait_blocks: u32,
    ) -> SpawnResult<SubmissionOutcome> {
        self.calls.submissions.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if wait_blocks == 0 {
            return Err(SpawnError::not_reachable(
                "transaction cannot be included within zero blocks",
            ));
        }

        // Block boundary: other submissions may be ordered first.
        tokio::task::yield_now().await;

        let mut state = self.state.write().await;
        let mut scratch = state.clone();
        let result = Execution::new(&mut scratch).run(transaction);
        let outcome = match result {
            Ok(()) => {
                scratch.block_index += 1;
                let block_index = scratch.block_index;
                *state = scratch;
                SubmissionOutcome::Included { block_index }
            }
            Err(rejection) => SubmissionOutcome::Rejected(rejection),
        };
        tracing::debug!(
            tx = %InstanceId(transaction.hash()),
            outcome = ?outcome,
            "memory ledger processed transaction"
        );
        Ok(outcome)
    }
}

fn reject(reason: RejectionReason, message: impl Into<String>) -> Rejection {
    Rejection::new(reason, message)
}

fn invalid(error: SpawnError) -> Rejection {
    reject(RejectionReason::InvalidArgument, error.to_string())
}

fn required<'a>(instruction: &'a Instruction, name: &str) -> Result<&'a [u8], Rejection> {
    instruction.argument(name).ok_or_else(|| {
        reject(
            RejectionReason::InvalidArgument,
            format!("missing argument '{name}'"),
        )
    })
}

fn verify_signature(identity: &Identity, digest: &[u8], signature: &[u8]) -> Result<(), Rejection> {
    let unauthorized = |detail: String| reject(RejectionReason::Unauthorized, detail);
    let key = identity
        .ed25519_key()
        .ok_or_else(|| unauthorized(format!("{identity} cannot sign directly")))?;
    let key = VerifyingKey::from_bytes(key).map_err(|e| unauthorized(format!("{identity}: {e}")))?;
    let signature =
        Signature::from_slice(signature).map_err(|e| unauthorized(format!("{identity}: {e}")))?;
    key.verify(digest, &signature)
        .map_err(|e| unauthorized(format!("bad signature from {identity}: {e}")))
}

/// One transaction being applied to a scratch state.
struct Execution<'a> {
    state: &'a mut LedgerState,
    fetched: Option<Coin>,
}

impl<'a> Execution<'a> {
    fn new(state: &'a mut LedgerState) -> Self {
        Self {
            state,
            fetched: None,
        }
    }

    fn run(mut self, transaction: &SignedTransaction) -> Result<(), Rejection> {
        for (index, instruction) in transaction.instructions().iter().enumerate() {
            self.authenticate(instruction)
                .and_then(|()| self.apply(instruction))
                .map_err(|r| reject(r.reason, format!("instruction {index}: {}", r.message)))?;
        }
        match self.fetched {
            Some(left) if left.value > 0 => Err(reject(
                RejectionReason::InvalidArgument,
                format!("{} fetched coins left unspent", left.value),
            )),
            _ => Ok(()),
        }
    }

    fn authenticate(&mut self, instruction: &Instruction) -> Result<(), Rejection> {
        let identities = instruction.signer_identities();
        let counters = instruction.signer_counters();
        let signatures = instruction.signatures();
        if identities.is_empty()
            || identities.len() != counters.len()
            || identities.len() != signatures.len()
        {
            return Err(reject(
                RejectionReason::Unauthorized,
                "signer lists are incomplete",
            ));
        }

        let digest = instruction.hash();
        for ((identity, counter), signature) in identities.iter().zip(counters).zip(signatures) {
            verify_signature(identity, &digest, signature)?;
            let expected = self
                .state
                .counters
                .get(identity)
                .copied()
                .unwrap_or(0)
                .saturating_add(1);
            if *counter != expected {
                return Err(reject(
                    RejectionReason::StaleCounter,
                    format!("{identity} used counter {counter}, expected {expected}"),
                ));
            }
            self.state.counters.insert(*identity, *counter);
        }
        Ok(())
    }

    fn apply(&mut self, instruction: &Instruction) -> Result<(), Rejection> {
        let target = self
            .state
            .instances
            .get(&instruction.instance_id)
            .cloned()
            .ok_or_else(|| {
                reject(
                    RejectionReason::InvalidArgument,
                    format!("no instance at {}", instruction.instance_id),
                )
            })?;
        match &instruction.kind {
            InstructionKind::Invoke {
                contract_id,
                command,
            } => self.invoke(instruction, &target, contract_id, command),
            InstructionKind::Spawn { contract_id } => self.spawn(instruction, &target, contract_id),
        }
    }

    fn invoke(
        &mut self,
        instruction: &Instruction,
        target: &StateEntry,
        contract_id: &str,
        command: &str,
    ) -> Result<(), Rejection> {
        if target.contract_id != contract_id {
            return Err(reject(
                RejectionReason::InvalidArgument,
                format!("instance is a '{}', not '{contract_id}'", target.contract_id),
            ));
        }
        match (contract_id, command) {
            (AccountState::CONTRACT_ID, account::FETCH_COMMAND) => self.fetch(instruction, target),
            _ => Err(reject(
                RejectionReason::Other,
                format!("{contract_id}.{command} is not supported"),
            )),
        }
    }

    fn fetch(&mut self, instruction: &Instruction, target: &StateEntry) -> Result<(), Rejection> {
        let amount = decode_amount(required(instruction, account::ARG_COINS)?).map_err(invalid)?;
        let mut state = AccountState::decode(&target.value).map_err(invalid)?;
        state.coin.value = state.coin.value.checked_sub(amount).ok_or_else(|| {
            reject(
                RejectionReason::InsufficientFunds,
                format!("balance {} is below {amount}", state.coin.value),
            )
        })?;
        let taken = Coin::new(state.coin.name, amount);
        self.fetched = Some(match self.fetched {
            Some(pool) => pool.checked_add(&taken).map_err(invalid)?,
            None => taken,
        });
        self.store(instruction.instance_id, &state, target.governance_id)
    }

    fn spawn(
        &mut self,
        instruction: &Instruction,
        target: &StateEntry,
        contract_id: &str,
    ) -> Result<(), Rejection> {
        match ResourceState::decode(&target.contract_id, &target.value).map_err(invalid)? {
            ResourceState::Spawner(schedule) => {
                self.spawn_paid(instruction, &schedule, target.governance_id, contract_id)
            }
            ResourceState::Governance(_) if contract_id == FeeSchedule::CONTRACT_ID => {
                let schedule = FeeSchedule::from_arguments(&instruction.args).map_err(invalid)?;
                self.create(instruction.derive_id(""), &schedule, instruction.instance_id)
            }
            other => Err(reject(
                RejectionReason::Unauthorized,
                format!("'{}' instances cannot spawn '{contract_id}'", other.contract_id()),
            )),
        }
    }

    fn spawn_paid(
        &mut self,
        instruction: &Instruction,
        schedule: &FeeSchedule,
        spawner_governance: InstanceId,
        contract_id: &str,
    ) -> Result<(), Rejection> {
        let kind = match contract_id {
            Governance::CONTRACT_ID => ResourceKind::Identity,
            AccountState::CONTRACT_ID => ResourceKind::Account,
            CredentialSet::CONTRACT_ID => ResourceKind::Credential,
            EventState::CONTRACT_ID => ResourceKind::Event,
            WagerState::CONTRACT_ID => ResourceKind::Wager,
            other => {
                return Err(reject(
                    RejectionReason::InvalidArgument,
                    format!("the spawner does not sell '{other}'"),
                ))
            }
        };
        self.pay(schedule.cost(kind), &schedule.beneficiary)?;

        match kind {
            ResourceKind::Identity => {
                let structure =
                    Governance::decode(required(instruction, governance::ARG_GOVERNANCE)?)
                        .map_err(invalid)?;
                let id = structure.base_id();
                self.create(id, &structure, id)
            }
            ResourceKind::Account => {
                let owner = self.governance_argument(instruction)?;
                let name = CoinName(
                    required(instruction, account::ARG_COIN_NAME)?
                        .try_into()
                        .map_err(|_| {
                            reject(RejectionReason::InvalidArgument, "coin name must be 32 bytes")
                        })?,
                );
                let balance = self.take_remaining(name)?;
                let state = AccountState {
                    coin: Coin::new(name, balance),
                    governance_id: owner,
                };
                self.create(account_id(&owner), &state, owner)
            }
            ResourceKind::Credential => {
                let owner = self.governance_argument(instruction)?;
                let set = CredentialSet::decode(required(instruction, credential::ARG_CREDENTIAL)?)
                    .map_err(invalid)?;
                self.create(credential_id(&owner), &set, owner)
            }
            ResourceKind::Event => {
                let organizers = self.governance_argument(instruction)?;
                let description =
                    EventDescription::from_bytes(required(instruction, event::ARG_DESCRIPTION)?)
                        .map_err(invalid)?;
                let mining_reward =
                    decode_amount(required(instruction, event::ARG_MINING_REWARD)?)
                        .map_err(invalid)?;
                let state = EventState {
                    phase: EventPhase::Configured,
                    description,
                    governance_id: organizers,
                    mining_reward,
                };
                self.create(instruction.derive_id(""), &state, organizers)
            }
            ResourceKind::Wager => {
                let state = WagerState::decode(required(instruction, wager::ARG_STRUCT)?)
                    .map_err(invalid)?;
                let stake = state
                    .stake
                    .checked_sub(schedule.cost(kind))
                    .map_err(invalid)?;
                self.take(&stake)?;
                self.create(instruction.derive_id(""), &state, spawner_governance)
            }
        }
    }

    fn governance_argument(&self, instruction: &Instruction) -> Result<InstanceId, Rejection> {
        let id =
            InstanceId::from_slice(required(instruction, ARG_GOVERNANCE_ID)?).map_err(invalid)?;
        match self.state.instances.get(&id) {
            Some(entry) if entry.contract_id == Governance::CONTRACT_ID => Ok(id),
            _ => Err(reject(
                RejectionReason::InvalidArgument,
                format!("no governance structure at {id}"),
            )),
        }
    }

    fn take(&mut self, amount: &Coin) -> Result<(), Rejection> {
        if amount.value == 0 {
            return Ok(());
        }
        let pool = self.fetched.as_mut().ok_or_else(|| {
            reject(RejectionReason::InsufficientFunds, "no coins were fetched")
        })?;
        if pool.name != amount.name || pool.value < amount.value {
            return Err(reject(
                RejectionReason::InsufficientFunds,
                format!("{} fetched coins cover less than {}", pool.value, amount.value),
            ));
        }
        pool.value -= amount.value;
        Ok(())
    }

    fn take_remaining(&mut self, name: CoinName) -> Result<u64, Rejection> {
        match self.fetched.take() {
            Some(pool) if pool.name == name => Ok(pool.value),
            Some(pool) => Err(reject(
                RejectionReason::InvalidArgument,
                format!("fetched {} cannot fund a {} account", pool.name.label(), name.label()),
            )),
            None => Ok(0),
        }
    }

    fn pay(&mut self, cost: &Coin, beneficiary: &InstanceId) -> Result<(), Rejection> {
        self.take(cost)?;
        let entry = self.state.instances.get(beneficiary).cloned().ok_or_else(|| {
            reject(
                RejectionReason::InvalidArgument,
                format!("beneficiary {beneficiary} does not exist"),
            )
        })?;
        let mut state = AccountState::decode(&entry.value).map_err(invalid)?;
        state.coin = state.coin.checked_add(cost).map_err(invalid)?;
        self.store(*beneficiary, &state, entry.governance_id)
    }

    fn create<S: ContractState>(
        &mut self,
        id: InstanceId,
        state: &S,
        governance_id: InstanceId,
    ) -> Result<(), Rejection> {
        if self.state.instances.contains_key(&id) {
            return Err(reject(
                RejectionReason::DuplicateInstance,
                format!("{} already exists at {id}", S::CONTRACT_ID),
            ));
        }
        self.store(id, state, governance_id)
    }

    fn store<S: ContractState>(
        &mut self,
        id: InstanceId,
        state: &S,
        governance_id: InstanceId,
    ) -> Result<(), Rejection> {
        let value = state.encode().map_err(invalid)?;
        self.state.instances.insert(
            id,
            StateEntry {
                contract_id: S::CONTRACT_ID.to_string(),
                value,
                governance_id,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::TestSigner;
    use spawner_core::{Argument, Signer, UnsignedTransaction};

    async fn funded(ledger: &MemoryLedger, signer: &TestSigner, balance: u64) -> InstanceId {
        let governance = Governance::for_user(signer.public_key(), "tester");
        let owner = ledger.seed_governance(&governance).await.expect("governance");
        ledger.seed_account(owner, balance).await.expect("account")
    }

    async fn signed(
        ledger: &MemoryLedger,
        signer: &TestSigner,
        instructions: Vec<Instruction>,
    ) -> SignedTransaction {
        let mut tx = UnsignedTransaction::new(instructions).expect("tx");
        let latest = ledger
            .latest_counters(&[signer.identity()])
            .await
            .expect("counters");
        tx.apply_counters(&[signer.identity()], &latest).expect("apply");
        tx.sign_with(&[signer]).expect("sign")
    }

    fn fetch(account: InstanceId, amount: u64) -> Instruction {
        Instruction::invoke(
            account,
            AccountState::CONTRACT_ID,
            account::FETCH_COMMAND,
            vec![Argument::amount(account::ARG_COINS, amount)],
        )
    }

    #[tokio::test]
    async fn absent_ids_produce_absence_proofs() {
        let ledger = MemoryLedger::new();
        let id = InstanceId([3; 32]);
        let proof = ledger.get_proof(&id).await.expect("proof");
        assert!(!proof.exists(&id));
        assert_eq!(ledger.proof_lookups(), 1);
    }

    #[tokio::test]
    async fn unspent_fetch_rolls_back() {
        let ledger = MemoryLedger::new();
        let signer = TestSigner::from_seed_string("payer");
        let account = funded(&ledger, &signer, 50).await;

        let tx = signed(&ledger, &signer, vec![fetch(account, 20)]).await;
        let outcome = ledger.submit_and_await(&tx, 1).await.expect("submit");

        assert!(matches!(outcome, SubmissionOutcome::Rejected(_)));
        assert_eq!(ledger.balance(&account).await.expect("balance"), 50);
        assert_eq!(ledger.counter(&signer.identity()).await, 0);
    }

    #[tokio::test]
    async fn replayed_counter_is_stale() {
        let ledger = MemoryLedger::new();
        let signer = TestSigner::from_seed_string("payer");
        let account = funded(&ledger, &signer, 50).await;
        let tx = signed(&ledger, &signer, vec![fetch(account, 20)]).await;

        ledger.set_counter(signer.identity(), 4).await;
        let outcome = ledger.submit_and_await(&tx, 1).await.expect("submit");
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected(Rejection {
                reason: RejectionReason::StaleCounter,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn foreign_signature_is_unauthorized() {
        let ledger = MemoryLedger::new();
        let signer = TestSigner::from_seed_string("payer");
        let account = funded(&ledger, &signer, 50).await;
        let mut tx = UnsignedTransaction::new(vec![fetch(account, 20)]).expect("tx");
        tx.apply_counters(&[signer.identity()], &[0]).expect("apply");

        struct Impostor(TestSigner, Identity);
        impl Signer for Impostor {
            fn identity(&self) -> Identity {
                self.1
            }
            fn sign(&self, message: &[u8]) -> SpawnResult<Vec<u8>> {
                self.0.sign(message)
            }
        }
        let impostor = Impostor(TestSigner::from_seed_string("mallory"), signer.identity());
        let tx = tx.sign_with(&[&impostor]).expect("sign");

        let outcome = ledger.submit_and_await(&tx, 1).await.expect("submit");
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected(Rejection {
                reason: RejectionReason::Unauthorized,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn wager_stake_carries_the_price() {
        let ledger = MemoryLedger::new();
        let signer = TestSigner::from_seed_string("payer");
        let account = funded(&ledger, &signer, 50).await;
        let beneficiary = ledger
            .seed_account(InstanceId([5; 32]), 0)
            .await
            .expect("beneficiary");
        let spawner = InstanceId([8; 32]);
        ledger
            .seed_spawner(spawner, &crate::sample_schedule(beneficiary), InstanceId([0; 32]))
            .await
            .expect("spawner");
        let spawn_wager = |stake: u64| {
            let state = WagerState::new("w", Coin::spawner(stake), [0; 32]);
            Instruction::spawn(
                spawner,
                WagerState::CONTRACT_ID,
                vec![Argument::new(wager::ARG_STRUCT, state.encode().expect("encode"))],
            )
        };

        let below_price = signed(&ledger, &signer, vec![fetch(account, 5), spawn_wager(3)]).await;
        let outcome = ledger.submit_and_await(&below_price, 1).await.expect("submit");
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected(Rejection {
                reason: RejectionReason::InvalidArgument,
                ..
            })
        ));
        assert_eq!(ledger.balance(&account).await.expect("balance"), 50);

        let priced = signed(&ledger, &signer, vec![fetch(account, 15), spawn_wager(15)]).await;
        let id = priced.instruction(1).expect("spawn").derive_id("");
        let outcome = ledger.submit_and_await(&priced, 1).await.expect("submit");
        assert!(matches!(outcome, SubmissionOutcome::Included { block_index: 1 }));
        assert_eq!(ledger.block_index().await, 1);
        assert_eq!(ledger.balance(&account).await.expect("balance"), 35);
        assert_eq!(ledger.balance(&beneficiary).await.expect("balance"), 5);
        let stored: WagerState = ledger.state(&id).await.expect("wager");
        assert_eq!(stored.stake.value, 15);
    }

    #[tokio::test]
    async fn only_spawners_sell_resources() {
        let ledger = MemoryLedger::new();
        let signer = TestSigner::from_seed_string("payer");
        let account = funded(&ledger, &signer, 50).await;
        let state = WagerState::new("w", Coin::spawner(5), [0; 32]);
        let spawn = Instruction::spawn(
            account,
            WagerState::CONTRACT_ID,
            vec![Argument::new(wager::ARG_STRUCT, state.encode().expect("encode"))],
        );

        let tx = signed(&ledger, &signer, vec![fetch(account, 5), spawn]).await;
        let outcome = ledger.submit_and_await(&tx, 1).await.expect("submit");
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected(Rejection {
                reason: RejectionReason::Unauthorized,
                ..
            })
        ));
        assert_eq!(ledger.block_index().await, 0);
    }

    #[tokio::test]
    async fn switched_off_ledger_is_unreachable() {
        let ledger = MemoryLedger::new();
        ledger.set_unreachable(true);
        let result = ledger.get_proof(&InstanceId([1; 32])).await;
        assert!(matches!(result, Err(SpawnError::NotReachable { .. })));
    }
}
