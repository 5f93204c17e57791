use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary environment file and network directory for one test.
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    /// A context whose environment file holds `WALLET_SEED=<seed>`.
    pub fn with_seed(seed: &str) -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        fs::write(
            temp_dir.path().join(".env"),
            format!("# test wallet\nWALLET_SEED={}\n", seed),
        )
        .expect("write env file");
        TestContext { temp_dir }
    }

    pub fn env_file(&self) -> PathBuf {
        self.temp_dir.path().join(".env")
    }

    pub fn env_contents(&self) -> String {
        fs::read_to_string(self.env_file()).expect("read env file")
    }

    /// Replace the wallet seed while keeping the rest of the file.
    pub fn switch_seed(&self, seed: &str) {
        let content = self
            .env_contents()
            .lines()
            .map(|line| {
                if line.starts_with("WALLET_SEED=") {
                    format!("WALLET_SEED={}", seed)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(self.env_file(), content + "\n").expect("write env file");
    }

    /// The binary with every path pointed into the temporary directory.
    pub fn ballot(&self) -> Command {
        self.ballot_with_contracts(&contract_dir())
    }

    pub fn ballot_with_contracts(&self, contracts: &Path) -> Command {
        let mut cmd = Command::cargo_bin("ballot").expect("Failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env_remove("BALLOT_COMMAND")
            .env_remove("WALLET_SEED")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.temp_dir.path().join(".ballot.toml"))
            .arg("--env-file")
            .arg(self.env_file())
            .arg("--contract-dir")
            .arg(contracts)
            .arg("--network-dir")
            .arg(self.temp_dir.path().join("network"));
        cmd
    }

    /// Deploy a ballot and return its address.
    pub fn deploy(&self, choices: [&str; 4]) -> String {
        let output = self
            .ballot()
            .arg("deploy")
            .args(choices)
            .output()
            .expect("run deploy");
        assert!(output.status.success(), "deploy failed: {:?}", output);
        tag_value(&String::from_utf8_lossy(&output.stdout), "CONTRACT_ADDRESS:")
            .expect("deploy prints the contract address")
    }
}

pub fn contract_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("contract")
}

pub fn tag_value(stdout: &str, tag: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(tag))
        .map(|value| value.trim().to_string())
}
