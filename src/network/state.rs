//! Persisted state of the local network, guarded by an exclusive file lock.

use super::program::BallotLedger;
use crate::session::ArgValue;
use crate::{BallotError, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

const STATE_FILE: &str = "ledger.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub tx_id: String,
    pub operation: String,
    pub args: Vec<ArgValue>,
    pub block_height: u64,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub network_id: String,
    pub deployer: String,
    pub deployed_at: String,
    pub ledger: BallotLedger,
    #[serde(default)]
    pub transactions: Vec<TxRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    pub block_height: u64,
    pub nonce: u64,
    pub contracts: BTreeMap<String, DeployedContract>,
}

/// JSON state file plus a sidecar lock file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl StateStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(STATE_FILE),
            lock_path: dir.join(format!(".{}.lock", STATE_FILE)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a consistent copy of the state under a shared lock.
    pub fn read(&self) -> Result<NetworkState> {
        let lock = self.lock_file()?;
        lock.lock_shared()?;
        let state = self.load();
        lock.unlock()?;
        state
    }

    /// Read-modify-write under an exclusive lock. The state is only written
    /// back when `f` succeeds.
    pub fn update<T>(&self, f: impl FnOnce(&mut NetworkState) -> Result<T>) -> Result<T> {
        let lock = self.lock_file()?;
        lock.lock_exclusive()?;
        let result = self.load().and_then(|mut state| {
            let value = f(&mut state)?;
            self.save(&state)?;
            Ok(value)
        });
        lock.unlock()?;
        result
    }

    fn lock_file(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.lock_path)?)
    }

    fn load(&self) -> Result<NetworkState> {
        if !self.path.exists() {
            return Ok(NetworkState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            BallotError::SessionLost(format!(
                "local network state {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, state: &NetworkState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).map_err(|e| {
            BallotError::Session(format!("failed to serialize network state: {}", e))
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = json.len(), "Network state saved");
        Ok(())
    }
}
