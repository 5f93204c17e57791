use crate::descriptor::OperationCatalog;
use crate::{BallotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".ballot.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub operations: OperationsConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Endpoints of the network the wallet talks to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub indexer: String,
    pub node: String,
    pub proof_server: String,
    pub network_id: String,
    /// Where the local network keeps its state; derived from `network_id`
    /// when unset.
    pub state_dir: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            indexer: "http://127.0.0.1:8088/api/v1/graphql".to_string(),
            node: "http://127.0.0.1:9944".to_string(),
            proof_server: "http://127.0.0.1:6300".to_string(),
            network_id: "undeployed".to_string(),
            state_dir: None,
        }
    }
}

impl NetworkConfig {
    pub fn resolved_state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ballot-console")
            .join(&self.network_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OperationsConfig {
    /// Operations treated as queries. Replaces the built-in list when set.
    #[serde(default)]
    pub read_only: Option<Vec<String>>,
    /// Menu descriptions, merged over the built-in ones.
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BridgeMode {
    /// Requests call the contract session directly.
    #[default]
    InProcess,
    /// Each request runs the CLI binary and parses its tagged output.
    Spawn,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    pub bind: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub mode: BridgeMode,
    /// CLI binary used in spawn mode; defaults to the running executable.
    pub cli_path: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3001,
            timeout_secs: 300,
            mode: BridgeMode::InProcess,
            cli_path: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            BallotError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            BallotError::Config(format!("Failed to parse TOML config from {:?}: {}", path, e))
        })
    }

    /// Load the config, falling back to defaults with a warning on failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }

    pub fn catalog(&self) -> OperationCatalog {
        OperationCatalog::new(
            self.operations.read_only.clone(),
            self.operations.descriptions.clone(),
        )
    }
}
