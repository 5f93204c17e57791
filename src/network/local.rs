use super::program::BallotLedger;
use super::state::{DeployedContract, StateStore, TxRecord};
use crate::session::{
    ArgValue, ContractAddress, ContractRuntime, LedgerSnapshot, Providers, SubmittedTx,
};
use crate::{BallotError, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Development network that hosts the ballot program in a local state file.
///
/// Every deploy and call is one block. Concurrent processes serialize on the
/// state file lock.
#[derive(Debug, Clone)]
pub struct LocalNetwork {
    store: StateStore,
}

impl LocalNetwork {
    pub fn open(dir: &Path) -> Result<Self> {
        let store = StateStore::open(dir)?;
        info!(state = %store.path().display(), "Using local network");
        Ok(Self { store })
    }
}

fn digest(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

fn not_found(address: &ContractAddress) -> BallotError {
    BallotError::Session(format!("no contract found at address {}", address))
}

impl ContractRuntime for LocalNetwork {
    fn deploy(&mut self, providers: &Providers, init_args: &[ArgValue]) -> Result<ContractAddress> {
        let ledger = BallotLedger::construct(init_args)?;
        let deployer = providers.wallet.identity();

        self.store.update(|state| {
            state.nonce += 1;
            state.block_height += 1;
            let address = digest(&[
                &b"ballot:address"[..],
                &deployer[..],
                &state.nonce.to_le_bytes()[..],
                providers.network_id.as_bytes(),
            ]);
            state.contracts.insert(
                address.clone(),
                DeployedContract {
                    network_id: providers.network_id.clone(),
                    deployer: hex::encode(deployer),
                    deployed_at: chrono::Utc::now().to_rfc3339(),
                    ledger,
                    transactions: Vec::new(),
                },
            );
            debug!(address = address.as_str(), height = state.block_height, "Contract deployed");
            Ok(ContractAddress::new(address))
        })
    }

    fn join(&mut self, providers: &Providers, address: &ContractAddress) -> Result<()> {
        let state = self.store.read()?;
        let contract = state
            .contracts
            .get(address.as_str())
            .ok_or_else(|| not_found(address))?;
        if contract.network_id != providers.network_id {
            return Err(BallotError::Session(format!(
                "contract {} belongs to network `{}`, not `{}`",
                address, contract.network_id, providers.network_id
            )));
        }
        Ok(())
    }

    fn submit(
        &mut self,
        providers: &Providers,
        address: &ContractAddress,
        operation: &str,
        args: &[ArgValue],
    ) -> Result<SubmittedTx> {
        let caller = providers.wallet.identity();

        self.store.update(|state| {
            let next_height = state.block_height + 1;
            let nonce = state.nonce + 1;
            let contract = state
                .contracts
                .get_mut(address.as_str())
                .ok_or_else(|| not_found(address))?;

            let return_value = contract.ledger.call(&caller, operation, args)?;

            let encoded_args = serde_json::to_vec(args).map_err(|e| {
                BallotError::Session(format!("failed to encode arguments: {}", e))
            })?;
            let tx_id = digest(&[
                &b"ballot:tx"[..],
                address.as_str().as_bytes(),
                operation.as_bytes(),
                &encoded_args[..],
                &nonce.to_le_bytes()[..],
            ]);
            contract.transactions.push(TxRecord {
                tx_id: tx_id.clone(),
                operation: operation.to_string(),
                args: args.to_vec(),
                block_height: next_height,
                submitted_at: chrono::Utc::now().to_rfc3339(),
            });

            state.nonce = nonce;
            state.block_height = next_height;
            Ok(SubmittedTx {
                tx_id,
                block_height: next_height,
                return_value,
            })
        })
    }

    fn query(&self, _providers: &Providers, address: &ContractAddress) -> Result<LedgerSnapshot> {
        let state = self.store.read()?;
        let contract = state
            .contracts
            .get(address.as_str())
            .ok_or_else(|| not_found(address))?;
        Ok(contract.ledger.snapshot(address, state.block_height))
    }
}
