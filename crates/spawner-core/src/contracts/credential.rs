//! Credential-set contract surface
//!
//! A credential set groups named credentials, each a list of attributes.
//! Event organizers must publish their personhood key under
//! [`PERSONHOOD_CREDENTIAL`] / [`ED25519_ATTRIBUTE`] before they can
//! co-govern an event.

use super::ContractState;
use serde::{Deserialize, Serialize};

/// Credential-set argument of a credential spawn.
pub const ARG_CREDENTIAL: &str = "credential";
/// Credential holding the personhood public key.
pub const PERSONHOOD_CREDENTIAL: &str = "personhood";
/// Attribute holding an ed25519 public key.
pub const ED25519_ATTRIBUTE: &str = "ed25519";

/// Named attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Raw value
    pub value: Vec<u8>,
}

/// One named credential.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credential {
    /// Credential name
    pub name: String,
    /// Attributes in insertion order
    pub attributes: Vec<Attribute>,
}

/// All credentials of one owner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialSet {
    /// Credentials in insertion order
    pub credentials: Vec<Credential>,
}

impl CredentialSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `attribute` of `credential`; empty values count as missing.
    pub fn attribute(&self, credential: &str, attribute: &str) -> Option<&[u8]> {
        self.credentials
            .iter()
            .find(|c| c.name == credential)?
            .attributes
            .iter()
            .find(|a| a.name == attribute)
            .map(|a| a.value.as_slice())
            .filter(|value| !value.is_empty())
    }

    /// Insert or overwrite an attribute.
    pub fn set_attribute(&mut self, credential: &str, attribute: &str, value: Vec<u8>) {
        let position = match self.credentials.iter().position(|c| c.name == credential) {
            Some(position) => position,
            None => {
                self.credentials.push(Credential {
                    name: credential.to_string(),
                    attributes: Vec::new(),
                });
                self.credentials.len() - 1
            }
        };
        let entry = &mut self.credentials[position];
        match entry.attributes.iter_mut().find(|a| a.name == attribute) {
            Some(existing) => existing.value = value,
            None => entry.attributes.push(Attribute {
                name: attribute.to_string(),
                value,
            }),
        }
    }

    /// Published personhood key, if any
    pub fn personhood_key(&self) -> Option<&[u8]> {
        self.attribute(PERSONHOOD_CREDENTIAL, ED25519_ATTRIBUTE)
    }
}

impl ContractState for CredentialSet {
    const CONTRACT_ID: &'static str = "credential";
}
