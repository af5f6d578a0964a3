//! Client configuration
//!
//! Configuration goes through three steps: load from a TOML file (or start
//! from defaults), merge `SPAWNER_*` environment variables, validate.
//!
//! ```toml
//! spawner_id = "9f...e1"
//! inclusion_wait_blocks = 10
//! coin_name = "SpawnerCoin"
//! log_filter = "info"
//! ```

use crate::coin::{CoinName, SPAWNER_COIN_LABEL};
use crate::errors::{SpawnError, SpawnResult};
use crate::identifiers::InstanceId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "SPAWNER_";
/// Blocks to wait for inclusion when nothing is configured.
pub const DEFAULT_INCLUSION_WAIT_BLOCKS: u32 = 10;

/// Settings of a spawner client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Hex id of the spawner instance to talk to
    pub spawner_id: Option<String>,
    /// Blocks to wait for a submitted transaction
    pub inclusion_wait_blocks: u32,
    /// Label of the coin fees are charged in
    pub coin_name: String,
    /// `tracing` filter directive for binaries
    pub log_filter: String,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawner_id: None,
            inclusion_wait_blocks: DEFAULT_INCLUSION_WAIT_BLOCKS,
            coin_name: SPAWNER_COIN_LABEL.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl SpawnerConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> SpawnResult<Self> {
        toml::from_str(content).map_err(|e| SpawnError::config(format!("invalid TOML: {e}")))
    }

    /// Load from a TOML file
    pub fn load_from_file(path: &Path) -> SpawnResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpawnError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, defaults otherwise; then merge the
    /// environment and validate.
    pub fn load(path: Option<&Path>) -> SpawnResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            _ => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SPAWNER_*` variables from the process environment.
    pub fn merge_with_env(&mut self) -> SpawnResult<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `SPAWNER_*` variables from an explicit list.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> SpawnResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match field {
                "SPAWNER_ID" => self.spawner_id = Some(value),
                "INCLUSION_WAIT_BLOCKS" => {
                    self.inclusion_wait_blocks = value.parse().map_err(|e| {
                        SpawnError::config(format!("{key} is not a block count: {e}"))
                    })?;
                }
                "COIN_NAME" => self.coin_name = value,
                "LOG_FILTER" => self.log_filter = value,
                _ => tracing::debug!(variable = %key, "ignoring unknown spawner variable"),
            }
        }
        Ok(())
    }

    /// Check field constraints.
    pub fn validate(&self) -> SpawnResult<()> {
        if self.inclusion_wait_blocks == 0 {
            return Err(SpawnError::config("inclusion_wait_blocks must be positive"));
        }
        self.coin()?;
        self.spawner_instance()?;
        Ok(())
    }

    /// Configured coin name
    pub fn coin(&self) -> SpawnResult<CoinName> {
        CoinName::from_label(&self.coin_name)
            .map_err(|e| SpawnError::config(format!("coin_name: {e}")))
    }

    /// Configured spawner id, if any
    pub fn spawner_instance(&self) -> SpawnResult<Option<InstanceId>> {
        self.spawner_id
            .as_deref()
            .map(|id| {
                id.parse::<InstanceId>()
                    .map_err(|e| SpawnError::config(format!("spawner_id: {e}")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SpawnerConfig::default();
        assert_eq!(config.inclusion_wait_blocks, 10);
        assert!(config.validate().is_ok());
        assert_eq!(config.coin().ok(), Some(CoinName::spawner()));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SpawnerConfig::from_toml_str("inclusion_wait_blocks = 3").expect("parse");
        assert_eq!(config.inclusion_wait_blocks, 3);
        assert_eq!(config.coin_name, "SpawnerCoin");
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = SpawnerConfig::default();
        config
            .merge_with_vars(vec![
                ("SPAWNER_INCLUSION_WAIT_BLOCKS".to_string(), "4".to_string()),
                ("SPAWNER_LOG_FILTER".to_string(), "debug".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ])
            .expect("merge");
        assert_eq!(config.inclusion_wait_blocks, 4);
        assert_eq!(config.log_filter, "debug");

        let bad = config.merge_with_vars(vec![(
            "SPAWNER_INCLUSION_WAIT_BLOCKS".to_string(),
            "soon".to_string(),
        )]);
        assert!(matches!(bad, Err(SpawnError::Config { .. })));
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let zero_wait = SpawnerConfig {
            inclusion_wait_blocks: 0,
            ..SpawnerConfig::default()
        };
        assert!(zero_wait.validate().is_err());

        let short_id = SpawnerConfig {
            spawner_id: Some("abcd".to_string()),
            ..SpawnerConfig::default()
        };
        assert!(short_id.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "spawner_id = \"{}\"", "11".repeat(32)).expect("write");
        let config = SpawnerConfig::load_from_file(file.path()).expect("load");
        assert_eq!(
            config.spawner_instance().ok().flatten(),
            Some(InstanceId([0x11; 32]))
        );
    }
}
