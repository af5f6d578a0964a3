//! Client-side transaction model
//!
//! A transaction is an ordered, non-empty list of instructions that the
//! ledger executes all-or-nothing. Building one goes through two states:
//!
//! 1. [`UnsignedTransaction`]: instructions composed, counters applied from
//!    the latest ledger state.
//! 2. [`SignedTransaction`]: one signature per signer per instruction over
//!    the instruction hash. Immutable; resubmission means rebuilding with
//!    fresh counters.
//!
//! Instruction hashes cover the signer counters, so the identifier the
//! ledger assigns to a spawned instance ([`Instruction::derive_id`]) depends
//! on the instruction's position in the signed transaction.

use crate::effects::Signer;
use crate::errors::{SpawnError, SpawnResult};
use crate::hash;
use crate::identifiers::InstanceId;
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named byte-valued instruction argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Name the target contract expects
    pub name: String,
    /// Encoded value
    pub value: Vec<u8>,
}

impl Argument {
    /// Create an argument
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Little-endian u64 argument
    pub fn amount(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, value.to_le_bytes().to_vec())
    }
}

/// What an instruction does to its target instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Create a new instance of `contract_id`, authorized by the target
    Spawn {
        /// Contract type of the new instance
        contract_id: String,
    },
    /// Call `command` on an existing instance of `contract_id`
    Invoke {
        /// Contract type of the target
        contract_id: String,
        /// Contract method
        command: String,
    },
}

/// One atomic operation within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Instance the instruction is addressed to
    pub instance_id: InstanceId,
    /// Spawn or invoke
    pub kind: InstructionKind,
    /// Ordered named arguments
    pub args: Vec<Argument>,
    signer_identities: Vec<Identity>,
    signer_counters: Vec<u64>,
    signatures: Vec<Vec<u8>>,
}

impl Instruction {
    /// Spawn a new `contract_id` instance through `instance_id`.
    pub fn spawn(
        instance_id: InstanceId,
        contract_id: impl Into<String>,
        args: Vec<Argument>,
    ) -> Self {
        Self::with_kind(
            instance_id,
            InstructionKind::Spawn {
                contract_id: contract_id.into(),
            },
            args,
        )
    }

    /// Invoke `command` on the `contract_id` instance at `instance_id`.
    pub fn invoke(
        instance_id: InstanceId,
        contract_id: impl Into<String>,
        command: impl Into<String>,
        args: Vec<Argument>,
    ) -> Self {
        Self::with_kind(
            instance_id,
            InstructionKind::Invoke {
                contract_id: contract_id.into(),
                command: command.into(),
            },
            args,
        )
    }

    fn with_kind(instance_id: InstanceId, kind: InstructionKind, args: Vec<Argument>) -> Self {
        Self {
            instance_id,
            kind,
            args,
            signer_identities: Vec::new(),
            signer_counters: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Contract id of the spawned or invoked instance
    pub fn contract_id(&self) -> &str {
        match &self.kind {
            InstructionKind::Spawn { contract_id }
            | InstructionKind::Invoke { contract_id, .. } => contract_id,
        }
    }

    /// Invoke command, if this is an invoke
    pub fn command(&self) -> Option<&str> {
        match &self.kind {
            InstructionKind::Invoke { command, .. } => Some(command),
            InstructionKind::Spawn { .. } => None,
        }
    }

    /// True for spawn instructions
    pub fn is_spawn(&self) -> bool {
        matches!(self.kind, InstructionKind::Spawn { .. })
    }

    /// Value of the named argument
    pub fn argument(&self, name: &str) -> Option<&[u8]> {
        self.args
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| arg.value.as_slice())
    }

    /// Identities that signed (or will sign) this instruction
    pub fn signer_identities(&self) -> &[Identity] {
        &self.signer_identities
    }

    /// Counter per signer, parallel to [`Self::signer_identities`]
    pub fn signer_counters(&self) -> &[u64] {
        &self.signer_counters
    }

    /// Signature per signer, parallel to [`Self::signer_identities`]
    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }

    fn ensure_unique_arguments(&self) -> SpawnResult<()> {
        let mut seen = BTreeSet::new();
        for arg in &self.args {
            if !seen.insert(arg.name.as_str()) {
                return Err(SpawnError::validation(format!(
                    "duplicate argument '{}' in {} instruction",
                    arg.name,
                    self.contract_id()
                )));
            }
        }
        Ok(())
    }

    /// Digest over everything the signers commit to.
    pub fn hash(&self) -> [u8; 32] {
        let mut h = hash::hasher();
        h.update(self.instance_id.as_bytes());
        match &self.kind {
            InstructionKind::Spawn { contract_id } => {
                h.update([0u8]);
                h.update(contract_id.as_bytes());
            }
            InstructionKind::Invoke {
                contract_id,
                command,
            } => {
                h.update([1u8]);
                h.update(contract_id.as_bytes());
                h.update(command.as_bytes());
            }
        }
        for arg in &self.args {
            h.update(arg.name.as_bytes());
            h.update(&arg.value);
        }
        for counter in &self.signer_counters {
            h.update(counter.to_le_bytes());
        }
        for identity in &self.signer_identities {
            h.update(identity.to_string().as_bytes());
        }
        h.finalize()
    }

    /// Identifier the ledger assigns to what this instruction creates.
    ///
    /// A spawned instance lives at `derive_id("")`.
    pub fn derive_id(&self, what: &str) -> InstanceId {
        InstanceId(hash::hash_parts(&[&self.hash()[..], what.as_bytes()]))
    }
}

/// Composed instructions awaiting counters and signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    instructions: Vec<Instruction>,
    counters_applied: bool,
}

impl UnsignedTransaction {
    /// Wrap a non-empty instruction list.
    pub fn new(instructions: Vec<Instruction>) -> SpawnResult<Self> {
        if instructions.is_empty() {
            return Err(SpawnError::validation(
                "a transaction needs at least one instruction",
            ));
        }
        for instruction in &instructions {
            instruction.ensure_unique_arguments()?;
        }
        Ok(Self {
            instructions,
            counters_applied: false,
        })
    }

    /// Composed instructions
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Assign counters from the latest ledger values.
    ///
    /// `latest[j]` is the last counter the ledger accepted for `signers[j]`.
    /// Instruction `i` gets `latest[j] + 1 + i` for every signer, so each
    /// instruction consumes one counter value.
    pub fn apply_counters(&mut self, signers: &[Identity], latest: &[u64]) -> SpawnResult<()> {
        if signers.is_empty() {
            return Err(SpawnError::validation("a transaction needs a signer"));
        }
        if signers.len() != latest.len() {
            return Err(SpawnError::malformed(format!(
                "ledger returned {} counters for {} signers",
                latest.len(),
                signers.len()
            )));
        }
        for (offset, instruction) in self.instructions.iter_mut().enumerate() {
            let offset = offset as u64;
            instruction.signer_identities = signers.to_vec();
            instruction.signer_counters = latest
                .iter()
                .map(|counter| counter.saturating_add(1 + offset))
                .collect();
            instruction.signatures.clear();
        }
        self.counters_applied = true;
        Ok(())
    }

    /// Sign every instruction with every signer, consuming the draft.
    ///
    /// Signers must be given in the order their counters were applied.
    pub fn sign_with(mut self, signers: &[&dyn Signer]) -> SpawnResult<SignedTransaction> {
        if !self.counters_applied {
            return Err(SpawnError::validation(
                "counters must be applied before signing",
            ));
        }
        let identities: Vec<Identity> = signers.iter().map(|s| s.identity()).collect();
        for instruction in &mut self.instructions {
            if instruction.signer_identities != identities {
                return Err(SpawnError::validation(
                    "signer set differs from the one counters were applied for",
                ));
            }
            let digest = instruction.hash();
            instruction.signatures = signers
                .iter()
                .map(|signer| signer.sign(&digest))
                .collect::<SpawnResult<Vec<_>>>()?;
        }
        Ok(SignedTransaction {
            instructions: self.instructions,
        })
    }
}

/// Finalized transaction, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    instructions: Vec<Instruction>,
}

impl SignedTransaction {
    /// Signed instructions in execution order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instruction at `index`
    pub fn instruction(&self, index: usize) -> SpawnResult<&Instruction> {
        self.instructions.get(index).ok_or_else(|| {
            SpawnError::validation(format!(
                "transaction has {} instructions, no index {index}",
                self.instructions.len()
            ))
        })
    }

    /// Digest over all instruction hashes
    pub fn hash(&self) -> [u8; 32] {
        let mut h = hash::hasher();
        for instruction in &self.instructions {
            h.update(instruction.hash());
        }
        h.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSigner(u8);

    impl Signer for FixedSigner {
        fn identity(&self) -> Identity {
            Identity::Ed25519([self.0; 32])
        }

        fn sign(&self, message: &[u8]) -> SpawnResult<Vec<u8>> {
            Ok(hash::hash_parts(&[&[self.0][..], message]).to_vec())
        }
    }

    fn draft() -> UnsignedTransaction {
        UnsignedTransaction::new(vec![
            Instruction::invoke(
                InstanceId([1; 32]),
                "account",
                "fetch",
                vec![Argument::amount("coins", 10)],
            ),
            Instruction::spawn(InstanceId([2; 32]), "wager", vec![]),
        ])
        .expect("non-empty")
    }

    #[test]
    fn empty_transaction_rejected() {
        assert!(matches!(
            UnsignedTransaction::new(vec![]),
            Err(SpawnError::Validation { .. })
        ));
    }

    #[test]
    fn duplicate_argument_names_rejected() {
        let instruction = Instruction::spawn(
            InstanceId([2; 32]),
            "account",
            vec![Argument::new("coinName", vec![1]), Argument::new("coinName", vec![2])],
        );
        assert!(UnsignedTransaction::new(vec![instruction]).is_err());
    }

    #[test]
    fn signing_requires_counters() {
        let signer = FixedSigner(5);
        assert!(matches!(
            draft().sign_with(&[&signer]),
            Err(SpawnError::Validation { .. })
        ));
    }

    #[test]
    fn counters_advance_per_instruction() {
        let signer = FixedSigner(5);
        let mut tx = draft();
        tx.apply_counters(&[signer.identity()], &[7]).expect("counters");
        let signed = tx.sign_with(&[&signer]).expect("signed");

        assert_eq!(signed.instructions()[0].signer_counters(), &[8]);
        assert_eq!(signed.instructions()[1].signer_counters(), &[9]);
        assert_eq!(signed.instructions()[0].signatures().len(), 1);
    }

    #[test]
    fn derived_ids_depend_on_counters() {
        let signer = FixedSigner(5);
        let mut first = draft();
        first.apply_counters(&[signer.identity()], &[0]).expect("counters");
        let mut second = draft();
        second.apply_counters(&[signer.identity()], &[1]).expect("counters");

        assert_ne!(
            first.instructions()[1].derive_id(""),
            second.instructions()[1].derive_id("")
        );
        assert_eq!(
            first.instructions()[1].derive_id(""),
            first.clone().instructions()[1].derive_id("")
        );
    }

    #[test]
    fn signer_mismatch_rejected() {
        let applied = FixedSigner(5);
        let other = FixedSigner(6);
        let mut tx = draft();
        tx.apply_counters(&[applied.identity()], &[0]).expect("counters");
        assert!(tx.sign_with(&[&other]).is_err());
    }

    #[test]
    fn counter_count_must_match_signers() {
        let mut tx = draft();
        let result = tx.apply_counters(&[Identity::Ed25519([1; 32])], &[]);
        assert!(matches!(result, Err(SpawnError::Malformed { .. })));
    }
}
