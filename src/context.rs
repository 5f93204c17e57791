//! Paths and settings shared by the CLI commands and the bridge.

use crate::commands::coerce;
use crate::config::Config;
use crate::descriptor::{discover, ContractDescriptor, Parameter, SemanticType};
use crate::envfile::{self, EnvFile};
use crate::network::{LocalNetwork, CHOICE_COUNT};
use crate::session::{
    ArgValue, BallotTally, ContractAddress, ContractSession, Providers, TxResult, Wallet,
};
use crate::{BallotError, Result};
use std::path::PathBuf;

/// Operation that casts a vote in the ballot contract.
pub const VOTE_OPERATION: &str = "vote_for";

#[derive(Debug, Clone)]
pub struct BallotContext {
    pub config: Config,
    pub env_file: PathBuf,
    pub contract_dir: PathBuf,
    pub network_dir: PathBuf,
}

impl BallotContext {
    pub fn new(config: Config, env_file: PathBuf, contract_dir: PathBuf) -> Self {
        let network_dir = config.network.resolved_state_dir();
        Self {
            config,
            env_file,
            contract_dir,
            network_dir,
        }
    }

    pub fn with_network_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.network_dir = dir;
        }
        self
    }

    pub fn env(&self) -> Result<EnvFile> {
        EnvFile::load(&self.env_file)
    }

    /// Wallet seed from the environment file, falling back to the process
    /// environment.
    pub fn providers(&self) -> Result<Providers> {
        let env = self.env()?;
        let seed = env
            .get(envfile::WALLET_SEED)
            .map(str::to_string)
            .or_else(|| std::env::var(envfile::WALLET_SEED).ok())
            .filter(|seed| !seed.trim().is_empty())
            .ok_or_else(|| {
                BallotError::EnvFile(format!(
                    "{} is not set in {}",
                    envfile::WALLET_SEED,
                    self.env_file.display()
                ))
            })?;
        let network = &self.config.network;
        Ok(Providers {
            indexer: network.indexer.clone(),
            node: network.node.clone(),
            proof_server: network.proof_server.clone(),
            network_id: network.network_id.clone(),
            wallet: Wallet::from_seed(seed)?,
        })
    }

    pub fn open_session(&self) -> Result<ContractSession<LocalNetwork>> {
        let providers = self.providers()?;
        let network = LocalNetwork::open(&self.network_dir)?;
        Ok(ContractSession::new(network, providers))
    }

    pub fn descriptor(&self) -> Result<ContractDescriptor> {
        discover(&self.contract_dir, &self.config.catalog())
    }

    /// `CONTRACT_ADDRESS` from the environment file, if present.
    pub fn default_address(&self) -> Result<Option<ContractAddress>> {
        self.env()?
            .get(envfile::CONTRACT_ADDRESS)
            .filter(|a| !a.trim().is_empty())
            .map(ContractAddress::parse)
            .transpose()
    }

    /// An explicit address, or the one recorded by the last deploy.
    pub fn resolve_address(&self, explicit: Option<&str>) -> Result<ContractAddress> {
        match explicit {
            Some(text) => ContractAddress::parse(text),
            None => self.default_address()?.ok_or_else(|| {
                BallotError::Validation(format!(
                    "no contract address given and {} has no {}",
                    self.env_file.display(),
                    envfile::CONTRACT_ADDRESS
                ))
            }),
        }
    }

    pub fn record_address(&self, address: &ContractAddress) -> Result<()> {
        EnvFile::upsert(&self.env_file, envfile::CONTRACT_ADDRESS, address.as_str())?;
        Ok(())
    }

    /// Deploy a ballot with the given labels without recording it.
    pub fn deploy(&self, choices: &[String]) -> Result<ContractAddress> {
        let mut session = self.open_session()?;
        let init_args: Vec<ArgValue> = choices.iter().cloned().map(ArgValue::Text).collect();
        Ok(session.deploy(&init_args)?.address.clone())
    }

    /// Record a freshly deployed address. The error names the address so that
    /// the contract can still be reached when the file can not be written.
    pub fn record_deployed(&self, address: &ContractAddress) -> Result<()> {
        self.record_address(address).map_err(|err| {
            BallotError::EnvFile(format!(
                "contract deployed at {} but {} could not be updated: {}",
                address,
                self.env_file.display(),
                err
            ))
        })
    }

    /// Deploy a ballot with the given labels and remember its address.
    pub fn deploy_ballot(&self, choices: &[String]) -> Result<ContractAddress> {
        let address = self.deploy(choices)?;
        self.record_deployed(&address)?;
        Ok(address)
    }

    pub fn tally(&self, address: &ContractAddress) -> Result<BallotTally> {
        let session = self.open_session()?;
        BallotTally::from_snapshot(&session.read_ledger_state(address)?)
    }

    pub fn vote(&self, address: &ContractAddress, choice: ArgValue) -> Result<TxResult> {
        let mut session = self.open_session()?;
        session.join_contract(address)?;
        session.call_operation(VOTE_OPERATION, &[choice])
    }
}

/// Coerce a textual choice index the same way generated commands do, then
/// check it names one of the ballot's choices.
pub fn parse_choice(input: &str) -> Result<ArgValue> {
    let value = coerce(&Parameter::new("index", SemanticType::Number), input)?;
    match value.as_number() {
        Some(index) if (0..CHOICE_COUNT as i128).contains(&index) => Ok(value),
        _ => Err(BallotError::Validation(format!(
            "choice index must be between 0 and {}, got {}",
            CHOICE_COUNT - 1,
            input.trim()
        ))),
    }
}
