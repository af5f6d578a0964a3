//! Command implementations
//!
//! Each command returns an [`Output`] that renders either as plain text or
//! as JSON.

use anyhow::{bail, Context, Result};
use rand::rngs::OsRng;
use serde::Serialize;
use spawner_core::SpawnerConfig;
use spawner_protocol::commitment::{self, random_padding, WagerSecret};

/// Result of a command
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    /// Derived resource identifier
    DerivedId {
        tag: String,
        owner: String,
        id: String,
    },
    /// Fresh wager commitment
    Commitment {
        choice: u8,
        reduced: String,
        padding: String,
        commitment: String,
    },
    /// Commitment check
    Verification { valid: bool },
    /// Effective configuration
    Config(SpawnerConfig),
}

impl Output {
    /// Render for the terminal
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(self)?);
        }
        let text = match self {
            Self::DerivedId { id, .. } => id.clone(),
            Self::Commitment {
                reduced,
                padding,
                commitment,
                ..
            } => format!("choice:     {reduced}\npadding:    {padding}\ncommitment: {commitment}"),
            Self::Verification { valid: true } => "valid".to_string(),
            Self::Verification { valid: false } => "invalid".to_string(),
            Self::Config(config) => toml::to_string_pretty(config)?,
        };
        Ok(text)
    }
}

/// `derive-id`
pub fn derive_id(tag: &str, owner: &str) -> Result<Output> {
    let owner_bytes = hex::decode(owner).context("owner must be hex")?;
    let id = spawner_core::derive_id(tag, &owner_bytes);
    tracing::debug!(tag, owner, %id, "derived identifier");
    Ok(Output::DerivedId {
        tag: tag.to_string(),
        owner: owner.to_string(),
        id: id.to_string(),
    })
}

/// `commit`
pub fn commit(choice: u8, padding: Option<&str>) -> Result<Output> {
    let padding = match padding {
        Some(padding) => hex::decode(padding).context("padding must be hex")?,
        None => random_padding(&mut OsRng).to_vec(),
    };
    let secret = WagerSecret::new(choice, &padding)?;
    Ok(Output::Commitment {
        choice,
        reduced: secret.reduced().to_string(),
        padding: hex::encode(secret.padding),
        commitment: hex::encode(secret.commitment()),
    })
}

/// `verify`
pub fn verify(choice: u8, padding: &str, hash: &str) -> Result<Output> {
    let padding = hex::decode(padding).context("padding must be hex")?;
    let hash = hex::decode(hash).context("hash must be hex")?;
    let Ok(hash) = <[u8; 32]>::try_from(hash.as_slice()) else {
        bail!("hash must be 32 bytes, got {}", hash.len());
    };
    Ok(Output::Verification {
        valid: commitment::verify(choice, &padding, &hash),
    })
}

/// `config`
pub fn show_config(config: &SpawnerConfig) -> Output {
    Output::Config(config.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn derive_id_uses_tag_and_owner() {
        let owner = hex::encode([1u8; 32]);
        let output = derive_id("account", &owner).expect("derive");
        let expected = spawner_core::account_id(&spawner_core::InstanceId([1; 32]));
        assert_eq!(output.render(false).expect("render"), expected.to_string());
        assert!(derive_id("account", "zz").is_err());
    }

    #[test]
    fn fixed_padding_commitment_verifies() {
        let padding = hex::encode([5u8; 31]);
        let Output::Commitment {
            reduced,
            commitment,
            ..
        } = commit(4, Some(&padding)).expect("commit")
        else {
            panic!("expected a commitment");
        };
        assert_eq!(reduced, "paper");

        let check = verify(1, &padding, &commitment).expect("verify");
        assert_eq!(check.render(false).expect("render"), "valid");
        let check = verify(2, &padding, &commitment).expect("verify");
        assert_eq!(check.render(false).expect("render"), "invalid");
    }

    #[test]
    fn random_padding_is_31_bytes() {
        let Output::Commitment { padding, .. } = commit(0, None).expect("commit") else {
            panic!("expected a commitment");
        };
        assert_eq!(padding.len(), 62);
        assert!(commit(0, Some("abcd")).is_err());
    }

    #[test]
    fn json_output_is_tagged() {
        let output = verify(0, &hex::encode([0u8; 31]), &hex::encode([0u8; 32])).expect("verify");
        let json = output.render(true).expect("render");
        assert!(json.contains("\"kind\": \"verification\""));
        assert!(json.contains("\"valid\": false"));
    }

    #[test]
    fn config_renders_as_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "inclusion_wait_blocks = 4").expect("write");
        let config = SpawnerConfig::load(Some(file.path())).expect("load");
        let text = show_config(&config).render(false).expect("render");
        assert!(text.contains("inclusion_wait_blocks = 4"));
        assert!(text.contains("coin_name = \"SpawnerCoin\""));
    }
}
