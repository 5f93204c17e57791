//! Contract session facade.
//!
//! A [`ContractSession`] binds one wallet (the provider bundle) to at most one
//! contract handle and forwards every call to a [`ContractRuntime`]. Runtime
//! errors are returned unchanged and nothing is retried: `deploy` and
//! `call_operation` submit transactions that are not idempotent.

pub mod ledger;
pub mod value;

pub use ledger::{BallotTally, LedgerSnapshot, LedgerValue};
pub use value::ArgValue;

use crate::{logging, BallotError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Network-assigned contract address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAddress(String);

impl ContractAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Parse user-supplied text; addresses are non-empty hex strings.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if hex_part.is_empty() || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BallotError::Validation(format!(
                "`{}` is not a valid contract address (expected a hex string)",
                trimmed
            )));
        }
        Ok(Self(hex_part.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet credentials used to sign and prove transactions.
#[derive(Clone)]
pub struct Wallet {
    seed: String,
}

impl Wallet {
    pub fn from_seed(seed: impl Into<String>) -> Result<Self> {
        let seed = seed.into();
        if seed.trim().is_empty() {
            return Err(BallotError::Validation("wallet seed is empty".to_string()));
        }
        Ok(Self { seed })
    }

    /// Stable public identity derived from the seed.
    pub fn identity(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"ballot:identity:");
        hasher.update(self.seed.trim().as_bytes());
        hasher.finalize().into()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("identity", &hex::encode(&self.identity()[..8]))
            .finish_non_exhaustive()
    }
}

/// Everything needed to reach the network on behalf of one wallet.
#[derive(Debug, Clone)]
pub struct Providers {
    pub indexer: String,
    pub node: String,
    pub proof_server: String,
    pub network_id: String,
    pub wallet: Wallet,
}

/// The live binding to one deployed or joined contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub address: ContractAddress,
}

/// What the runtime reports for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedTx {
    pub tx_id: String,
    pub block_height: u64,
    pub return_value: Option<ArgValue>,
}

/// Normalized result of `call_operation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    pub operation: String,
    pub tx_id: String,
    pub block_height: u64,
    pub return_value: Option<ArgValue>,
    pub counters: BTreeMap<String, u64>,
}

/// The external wallet/contract runtime.
///
/// Implementations own proof generation, balancing and submission. They
/// report failures as [`BallotError::Session`] (or
/// [`BallotError::SessionLost`] when the connection can not be recovered).
pub trait ContractRuntime {
    fn deploy(&mut self, providers: &Providers, init_args: &[ArgValue]) -> Result<ContractAddress>;

    /// Verify that `address` hosts a contract this runtime can drive.
    fn join(&mut self, providers: &Providers, address: &ContractAddress) -> Result<()>;

    fn submit(
        &mut self,
        providers: &Providers,
        address: &ContractAddress,
        operation: &str,
        args: &[ArgValue],
    ) -> Result<SubmittedTx>;

    fn query(&self, providers: &Providers, address: &ContractAddress) -> Result<LedgerSnapshot>;
}

impl<R: ContractRuntime + ?Sized> ContractRuntime for Box<R> {
    fn deploy(&mut self, providers: &Providers, init_args: &[ArgValue]) -> Result<ContractAddress> {
        (**self).deploy(providers, init_args)
    }

    fn join(&mut self, providers: &Providers, address: &ContractAddress) -> Result<()> {
        (**self).join(providers, address)
    }

    fn submit(
        &mut self,
        providers: &Providers,
        address: &ContractAddress,
        operation: &str,
        args: &[ArgValue],
    ) -> Result<SubmittedTx> {
        (**self).submit(providers, address, operation, args)
    }

    fn query(&self, providers: &Providers, address: &ContractAddress) -> Result<LedgerSnapshot> {
        (**self).query(providers, address)
    }
}

/// One wallet's binding to at most one contract.
pub struct ContractSession<R> {
    runtime: R,
    providers: Providers,
    handle: Option<SessionHandle>,
}

impl<R: ContractRuntime> ContractSession<R> {
    pub fn new(runtime: R, providers: Providers) -> Self {
        Self {
            runtime,
            providers,
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<&SessionHandle> {
        self.handle.as_ref()
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Deploy a new contract and make it the session's handle.
    pub fn deploy(&mut self, init_args: &[ArgValue]) -> Result<&SessionHandle> {
        logging::log_deploy_start(init_args.len());
        let address = self.runtime.deploy(&self.providers, init_args)?;
        logging::log_contract_bound(address.as_str(), "deploy");
        Ok(self.handle.insert(SessionHandle { address }))
    }

    /// Join an existing contract, replacing any current handle.
    pub fn join_contract(&mut self, address: &ContractAddress) -> Result<&SessionHandle> {
        self.runtime.join(&self.providers, address)?;
        logging::log_contract_bound(address.as_str(), "join");
        Ok(self.handle.insert(SessionHandle {
            address: address.clone(),
        }))
    }

    /// Submit `name(args)` against the current handle and report the updated counters.
    ///
    /// Once the runtime accepts the transaction the result is returned even if
    /// the follow-up counter query fails; the counters are then left empty.
    pub fn call_operation(&mut self, name: &str, args: &[ArgValue]) -> Result<TxResult> {
        let address = self
            .handle
            .as_ref()
            .map(|h| h.address.clone())
            .ok_or_else(|| {
                BallotError::Session("no contract deployed or joined in this session".to_string())
            })?;

        logging::log_operation_submit(name, address.as_str(), args.len());
        let submitted = self.runtime.submit(&self.providers, &address, name, args)?;
        logging::log_operation_complete(name, &submitted.tx_id);
        let counters = match self.runtime.query(&self.providers, &address) {
            Ok(snapshot) => snapshot.counters(),
            Err(err) => {
                logging::log_counters_unavailable(name, &submitted.tx_id, &err.to_string());
                BTreeMap::new()
            }
        };

        Ok(TxResult {
            operation: name.to_string(),
            tx_id: submitted.tx_id,
            block_height: submitted.block_height,
            return_value: submitted.return_value,
            counters,
        })
    }

    /// Read any contract's ledger; does not touch the session's handle.
    pub fn read_ledger_state(&self, address: &ContractAddress) -> Result<LedgerSnapshot> {
        logging::log_ledger_query(address.as_str());
        self.runtime.query(&self.providers, address)
    }

    /// Ledger of the contract currently bound to this session.
    pub fn current_ledger(&self) -> Result<LedgerSnapshot> {
        let handle = self.handle.as_ref().ok_or_else(|| {
            BallotError::Session("no contract deployed or joined in this session".to_string())
        })?;
        self.read_ledger_state(&handle.address)
    }
}
