//! Identity-governance structures
//!
//! A governance structure maps actions (`invoke:<contract>.<command>`,
//! `spawn:<contract>`, `_sign`) to rule expressions over identities. The
//! ledger's rule engine evaluates them; this module only builds them in the
//! two shapes the spawner creates: a single user's identity and the joint
//! control structure of an event's organizers.
//!
//! The base id of a structure is the digest of its first version, so the
//! same user key and alias always produce the same identity.

use super::ContractState;
use crate::hash;
use crate::identifiers::InstanceId;
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Governance argument of a governance spawn.
pub const ARG_GOVERNANCE: &str = "governance";
/// Action allowed to evolve the structure itself.
pub const EVOLVE_ACTION: &str = "invoke:governance.evolve";
/// Action whose expression defines who signs on behalf of the structure.
pub const SIGN_ACTION: &str = "_sign";

/// Actions a user identity controls on its own account.
pub const USER_ACCOUNT_ACTIONS: [&str; 3] = [
    "invoke:account.update",
    "invoke:account.fetch",
    "invoke:account.transfer",
];

/// Actions any single organizer may take on a shared event.
pub const ORGANIZER_EVENT_ACTIONS: [&str; 3] = [
    "invoke:event.barrier",
    "invoke:event.finalize",
    "invoke:event.addParty",
];

/// How identities combine within one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOp {
    /// Every listed identity must sign
    And,
    /// Any listed identity may sign
    Or,
}

impl RuleOp {
    fn separator(self) -> &'static str {
        match self {
            Self::And => " & ",
            Self::Or => " | ",
        }
    }
}

/// One action and who may perform it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Guarded action
    pub action: String,
    /// Expression over identity strings
    pub expression: String,
}

/// Rule-based authorization data for an instance or a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Governance {
    /// Evolution counter, 0 for a fresh structure
    pub version: u64,
    /// Free-text description
    pub description: Vec<u8>,
    /// Base id, stored once the structure has evolved past version 0
    pub base_id: Option<InstanceId>,
    /// Rules in insertion order
    pub rules: Vec<Rule>,
}

impl Governance {
    /// New structure: `owners` may evolve it, `signers` sign for it.
    pub fn new(owners: &[Identity], signers: &[Identity], description: impl Into<Vec<u8>>) -> Self {
        let mut governance = Self {
            version: 0,
            description: description.into(),
            base_id: None,
            rules: Vec::new(),
        };
        for owner in owners {
            governance.add_identity(EVOLVE_ACTION, owner, RuleOp::Or);
        }
        for signer in signers {
            governance.add_identity(SIGN_ACTION, signer, RuleOp::Or);
        }
        governance
    }

    /// Identity structure of a single user key.
    pub fn for_user(public_key: [u8; 32], alias: &str) -> Self {
        let id = Identity::Ed25519(public_key);
        let mut governance = Self::new(&[id], &[id], format!("user {alias}"));
        for action in USER_ACCOUNT_ACTIONS {
            governance.add_identity(action, &id, RuleOp::And);
        }
        governance
    }

    /// Joint structure for event organizers, any of whom may act.
    pub fn for_organizers(organizers: &[InstanceId], description: &str) -> Self {
        let ids: Vec<Identity> = organizers.iter().copied().map(Identity::Governance).collect();
        let mut governance = Self::new(&ids, &ids, description.as_bytes().to_vec());
        for id in &ids {
            for action in ORGANIZER_EVENT_ACTIONS {
                governance.add_identity(action, id, RuleOp::Or);
            }
        }
        governance
    }

    /// Append `identity` to the rule for `action`, creating it if needed.
    pub fn add_identity(&mut self, action: &str, identity: &Identity, op: RuleOp) {
        let term = identity.to_string();
        match self.rules.iter_mut().find(|rule| rule.action == action) {
            Some(rule) if rule.expression.is_empty() => rule.expression = term,
            Some(rule) => {
                rule.expression.push_str(op.separator());
                rule.expression.push_str(&term);
            }
            None => self.rules.push(Rule {
                action: action.to_string(),
                expression: term,
            }),
        }
    }

    /// Expression for `action`
    pub fn rule(&self, action: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.action == action)
            .map(|rule| rule.expression.as_str())
    }

    /// Stable identifier of the structure across evolutions.
    pub fn base_id(&self) -> InstanceId {
        if let Some(base_id) = self.base_id {
            return base_id;
        }
        let mut h = hash::hasher();
        h.update(self.version.to_le_bytes());
        h.update(&self.description);
        for rule in &self.rules {
            h.update(rule.action.as_bytes());
            h.update(rule.expression.as_bytes());
        }
        InstanceId(h.finalize())
    }

    /// This structure as a signing identity
    pub fn identity(&self) -> Identity {
        Identity::Governance(self.base_id())
    }
}

impl fmt::Display for Governance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "governance {} v{} ({})",
            self.base_id(),
            self.version,
            String::from_utf8_lossy(&self.description)
        )
    }
}

impl ContractState for Governance {
    const CONTRACT_ID: &'static str = "governance";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_structure_is_content_addressed() {
        let a = Governance::for_user([1; 32], "alice");
        let b = Governance::for_user([1; 32], "alice");
        let c = Governance::for_user([1; 32], "bob");
        assert_eq!(a.base_id(), b.base_id());
        assert_ne!(a.base_id(), c.base_id());
        assert_eq!(a.description, b"user alice".to_vec());
    }

    #[test]
    fn user_rules_cover_account_actions() {
        let governance = Governance::for_user([2; 32], "carol");
        let key = Identity::Ed25519([2; 32]).to_string();
        assert_eq!(governance.rule(SIGN_ACTION), Some(key.as_str()));
        for action in USER_ACCOUNT_ACTIONS {
            assert_eq!(governance.rule(action), Some(key.as_str()));
        }
    }

    #[test]
    fn organizer_rules_join_with_or() {
        let orgs = [InstanceId([1; 32]), InstanceId([2; 32])];
        let governance = Governance::for_organizers(&orgs, "party-governance summit");
        let expected = format!(
            "{} | {}",
            Identity::Governance(orgs[0]),
            Identity::Governance(orgs[1])
        );
        assert_eq!(governance.rule("invoke:event.finalize"), Some(expected.as_str()));
        assert_eq!(governance.rule(EVOLVE_ACTION), Some(expected.as_str()));
    }

    #[test]
    fn evolved_structure_keeps_base_id() {
        let original = Governance::for_user([3; 32], "dave");
        let mut evolved = original.clone();
        evolved.version = 1;
        evolved.base_id = Some(original.base_id());
        evolved.add_identity("invoke:account.transfer", &Identity::Ed25519([4; 32]), RuleOp::And);
        assert_eq!(evolved.base_id(), original.base_id());
    }
}
