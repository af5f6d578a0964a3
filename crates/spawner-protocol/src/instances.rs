//! Handles on spawned resources
//!
//! A handle is a snapshot of one ledger instance: its id, the governance
//! structure controlling it and its decoded state. Handles are built from
//! proofs after a transaction is included and never refer back to the
//! transaction that created them. `update` re-reads the instance.

use crate::commitment::WagerSecret;
use async_trait::async_trait;
use spawner_core::contracts::wager::{ARG_ACCOUNT, ARG_PREHASH, CONFIRM_COMMAND};
use spawner_core::contracts::{
    AccountState, CredentialSet, EventDescription, EventPhase, EventState, Governance,
    WagerPhase, WagerState,
};
use spawner_core::{
    Argument, Coin, ContractState, Identity, InstanceId, Instruction, LedgerEffects, Proof,
    SpawnError, SpawnResult,
};

/// Common behaviour of resource handles.
#[async_trait]
pub trait InstanceHandle: Sized + Send + Sync {
    /// Contract state the handle wraps
    type State: ContractState + Send;

    /// Assemble a handle from decoded parts
    fn from_parts(id: InstanceId, governance_id: InstanceId, state: Self::State) -> Self;

    /// Instance id
    fn id(&self) -> InstanceId;

    /// Replace the cached state
    fn replace_state(&mut self, state: Self::State);

    /// Decode a handle from a proof of `id`.
    ///
    /// Fails with `Malformed` when the proof shows absence or another contract.
    fn from_proof(id: InstanceId, proof: &Proof) -> SpawnResult<Self> {
        let state = proof.decode_as::<Self::State>(&id)?;
        Ok(Self::from_parts(id, proof.entry()?.governance_id, state))
    }

    /// Look `id` up and decode it
    async fn from_ledger<L>(ledger: &L, id: InstanceId) -> SpawnResult<Self>
    where
        L: LedgerEffects + ?Sized,
    {
        let proof = ledger.get_proof(&id).await?;
        Self::from_proof(id, &proof)
    }

    /// Re-read the instance
    async fn update<L>(&mut self, ledger: &L) -> SpawnResult<()>
    where
        L: LedgerEffects + ?Sized,
    {
        let id = self.id();
        let proof = ledger.get_proof(&id).await?;
        self.replace_state(proof.decode_as(&id)?);
        Ok(())
    }
}

/// Coin account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInstance {
    id: InstanceId,
    governance_id: InstanceId,
    state: AccountState,
}

impl AccountInstance {
    /// Visible balance, as of the last read
    pub fn balance(&self) -> u64 {
        self.state.coin.value
    }

    /// Held coin
    pub fn coin(&self) -> &Coin {
        &self.state.coin
    }

    /// Owner's governance structure
    pub fn governance_id(&self) -> InstanceId {
        self.governance_id
    }
}

impl InstanceHandle for AccountInstance {
    type State = AccountState;

    fn from_parts(id: InstanceId, governance_id: InstanceId, state: AccountState) -> Self {
        Self {
            id,
            governance_id,
            state,
        }
    }

    fn id(&self) -> InstanceId {
        self.id
    }

    fn replace_state(&mut self, state: AccountState) {
        self.state = state;
    }
}

/// Credential set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialInstance {
    id: InstanceId,
    governance_id: InstanceId,
    state: CredentialSet,
}

impl CredentialInstance {
    /// Stored credentials
    pub fn credentials(&self) -> &CredentialSet {
        &self.state
    }

    /// Attribute value, if published and non-empty
    pub fn attribute(&self, credential: &str, attribute: &str) -> Option<&[u8]> {
        self.state.attribute(credential, attribute)
    }

    /// Published personhood key
    pub fn personhood_key(&self) -> Option<&[u8]> {
        self.state.personhood_key()
    }

    /// Owner's governance structure
    pub fn governance_id(&self) -> InstanceId {
        self.governance_id
    }
}

impl InstanceHandle for CredentialInstance {
    type State = CredentialSet;

    fn from_parts(id: InstanceId, governance_id: InstanceId, state: CredentialSet) -> Self {
        Self {
            id,
            governance_id,
            state,
        }
    }

    fn id(&self) -> InstanceId {
        self.id
    }

    fn replace_state(&mut self, state: CredentialSet) {
        self.state = state;
    }
}

/// Identity-governance structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceInstance {
    id: InstanceId,
    state: Governance,
}

impl GovernanceInstance {
    /// Current structure
    pub fn governance(&self) -> &Governance {
        &self.state
    }

    /// Identity other structures use to refer to this one
    pub fn identity(&self) -> Identity {
        Identity::Governance(self.id)
    }
}

impl InstanceHandle for GovernanceInstance {
    type State = Governance;

    fn from_parts(id: InstanceId, _governance_id: InstanceId, state: Governance) -> Self {
        Self { id, state }
    }

    fn id(&self) -> InstanceId {
        self.id
    }

    fn replace_state(&mut self, state: Governance) {
        self.state = state;
    }
}

/// Event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInstance {
    id: InstanceId,
    state: EventState,
}

impl EventInstance {
    /// Current phase
    pub fn phase(&self) -> EventPhase {
        self.state.phase
    }

    /// What the event is about
    pub fn description(&self) -> &EventDescription {
        &self.state.description
    }

    /// Organizers' joint governance structure
    pub fn governance_id(&self) -> InstanceId {
        self.state.governance_id
    }

    /// Reward per attendee
    pub fn mining_reward(&self) -> u64 {
        self.state.mining_reward
    }
}

impl InstanceHandle for EventInstance {
    type State = EventState;

    fn from_parts(id: InstanceId, _governance_id: InstanceId, state: EventState) -> Self {
        Self { id, state }
    }

    fn id(&self) -> InstanceId {
        self.id
    }

    fn replace_state(&mut self, state: EventState) {
        self.state = state;
    }
}

/// Rock-paper-scissors wager.
///
/// The plaintext choice and padding are only present on the handle returned
/// to the player who created the wager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerInstance {
    id: InstanceId,
    state: WagerState,
    resolved: bool,
    secret: Option<WagerSecret>,
}

impl WagerInstance {
    /// Attach the creator's plaintext
    pub fn with_secret(mut self, secret: WagerSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Last known state
    pub fn state(&self) -> &WagerState {
        &self.state
    }

    /// Priced stake as published
    pub fn stake(&self) -> &Coin {
        &self.state.stake
    }

    /// Phase, `Resolved` once the instance is gone from the ledger
    pub fn phase(&self) -> WagerPhase {
        if self.resolved {
            WagerPhase::Resolved
        } else {
            self.state.phase()
        }
    }

    /// Creator's plaintext, if this handle has it
    pub fn secret(&self) -> Option<&WagerSecret> {
        self.secret.as_ref()
    }

    /// Choice as the creator gave it, unreduced
    pub fn first_player_choice(&self) -> Option<u8> {
        self.secret.as_ref().map(|secret| secret.choice)
    }

    /// Build the reveal instruction paying out to `account`.
    ///
    /// Only the creator's handle can reveal, and only once someone joined.
    pub fn reveal_instruction(&self, account: InstanceId) -> SpawnResult<Instruction> {
        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| SpawnError::validation("only the wager creator can reveal"))?;
        match self.phase() {
            WagerPhase::Joined => {}
            phase => {
                return Err(SpawnError::validation(format!(
                    "cannot reveal a wager in phase {phase:?}"
                )))
            }
        }
        Ok(Instruction::invoke(
            self.id,
            WagerState::CONTRACT_ID,
            CONFIRM_COMMAND,
            vec![
                Argument::new(ARG_PREHASH, secret.prehash()),
                Argument::new(ARG_ACCOUNT, account.to_vec()),
            ],
        ))
    }
}

#[async_trait]
impl InstanceHandle for WagerInstance {
    type State = WagerState;

    fn from_parts(id: InstanceId, _governance_id: InstanceId, state: WagerState) -> Self {
        Self {
            id,
            state,
            resolved: false,
            secret: None,
        }
    }

    fn id(&self) -> InstanceId {
        self.id
    }

    fn replace_state(&mut self, state: WagerState) {
        self.state = state;
    }

    /// Re-read the wager; absence means the contract paid out.
    async fn update<L>(&mut self, ledger: &L) -> SpawnResult<()>
    where
        L: LedgerEffects + ?Sized,
    {
        let proof = ledger.get_proof(&self.id).await?;
        if proof.exists(&self.id) {
            self.state = proof.decode_as(&self.id)?;
            self.resolved = false;
        } else {
            self.resolved = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::{commitment_hash, PADDING_LEN};
    use spawner_core::StateEntry;
    use spawner_testkit::MemoryLedger;

    fn wager_proof(id: InstanceId, state: &WagerState) -> Proof {
        Proof::present(
            id,
            StateEntry {
                contract_id: WagerState::CONTRACT_ID.to_string(),
                value: state.encode().expect("encode"),
                governance_id: InstanceId([0; 32]),
            },
        )
    }

    #[test]
    fn handle_rejects_other_contracts() {
        let id = InstanceId([4; 32]);
        let state = WagerState::new("w", Coin::spawner(1), [0; 32]);
        let proof = wager_proof(id, &state);
        assert!(AccountInstance::from_proof(id, &proof).is_err());
        assert!(WagerInstance::from_proof(id, &proof).is_ok());
    }

    #[test]
    fn reveal_requires_secret_and_joined_phase() {
        let id = InstanceId([4; 32]);
        let padding = [9u8; PADDING_LEN];
        let hash = commitment_hash(4, &padding).expect("hash");
        let mut state = WagerState::new("w", Coin::spawner(1), hash);
        let created = WagerInstance::from_proof(id, &wager_proof(id, &state)).expect("wager");
        assert!(created.reveal_instruction(InstanceId([1; 32])).is_err());

        let secret = WagerSecret::new(4, &padding).expect("secret");
        let created = created.with_secret(secret);
        assert!(created.reveal_instruction(InstanceId([1; 32])).is_err());

        state.second_player = 0;
        let joined = WagerInstance::from_proof(id, &wager_proof(id, &state))
            .expect("wager")
            .with_secret(WagerSecret::new(4, &padding).expect("secret"));
        let reveal = joined.reveal_instruction(InstanceId([1; 32])).expect("reveal");
        assert_eq!(reveal.command(), Some(CONFIRM_COMMAND));
        assert_eq!(reveal.argument(ARG_PREHASH).map(|p| p[0]), Some(1));
        assert_eq!(joined.first_player_choice(), Some(4));
    }

    #[tokio::test]
    async fn wager_absence_means_resolved() {
        let ledger = MemoryLedger::new();
        let id = InstanceId([4; 32]);
        let state = WagerState::new("w", Coin::spawner(1), [0; 32]);
        ledger
            .insert(id, &state, InstanceId([0; 32]))
            .await
            .expect("insert");

        let mut wager = WagerInstance::from_ledger(&ledger, id).await.expect("wager");
        assert_eq!(wager.phase(), WagerPhase::Created);

        ledger.remove(&id).await;
        wager.update(&ledger).await.expect("update");
        assert_eq!(wager.phase(), WagerPhase::Resolved);
    }

    #[tokio::test]
    async fn account_update_reads_new_balance() {
        let ledger = MemoryLedger::new();
        let owner = InstanceId([2; 32]);
        let id = ledger.seed_account(owner, 10).await.expect("seed");
        let mut account = AccountInstance::from_ledger(&ledger, id).await.expect("account");
        assert_eq!(account.balance(), 10);
        assert_eq!(account.governance_id(), owner);

        ledger.seed_account(owner, 3).await.expect("reseed");
        account.update(&ledger).await.expect("update");
        assert_eq!(account.balance(), 3);
    }
}
