//! HTTP bridge exposing the ballot operations as a small REST API.
//!
//! By default every request runs against the contract session in this
//! process, each on its own blocking worker with a fresh session. Spawn mode
//! runs the CLI binary per request instead and parses its tagged stdout.

pub mod routes;
pub mod spawn;

pub use routes::{router, AppState};
pub use spawn::CliRunner;

use crate::config::BridgeMode;
use crate::context::{self, BallotContext};
use crate::session::{BallotTally, ContractAddress};
use crate::{BallotError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How requests reach the contract.
#[derive(Debug, Clone)]
pub enum Backend {
    InProcess(Arc<BallotContext>),
    Spawn(Arc<CliRunner>),
}

impl Backend {
    pub fn mode(&self) -> BridgeMode {
        match self {
            Backend::InProcess(_) => BridgeMode::InProcess,
            Backend::Spawn(_) => BridgeMode::Spawn,
        }
    }

    pub async fn deploy(&self, choices: Vec<String>, limit: Duration) -> Result<ContractAddress> {
        match self {
            Backend::InProcess(ctx) => {
                let ctx = Arc::clone(ctx);
                run_blocking("deploy", limit, move || ctx.deploy_ballot(&choices)).await
            }
            Backend::Spawn(cli) => {
                let mut args = vec!["deploy".to_string()];
                args.extend(choices);
                cli.run("deploy", &args, limit).await?.address()
            }
        }
    }

    pub async fn state(&self, address: ContractAddress, limit: Duration) -> Result<BallotTally> {
        match self {
            Backend::InProcess(ctx) => {
                let ctx = Arc::clone(ctx);
                run_blocking("state", limit, move || ctx.tally(&address)).await
            }
            Backend::Spawn(cli) => {
                let args = vec!["state".to_string(), address.to_string()];
                cli.run("state", &args, limit).await?.tally()
            }
        }
    }

    /// Cast a vote and return the transaction id.
    pub async fn vote(&self, address: ContractAddress, choice: i64, limit: Duration) -> Result<String> {
        match self {
            Backend::InProcess(ctx) => {
                let ctx = Arc::clone(ctx);
                run_blocking("vote", limit, move || {
                    let index = context::parse_choice(&choice.to_string())?;
                    Ok(ctx.vote(&address, index)?.tx_id)
                })
                .await
            }
            Backend::Spawn(cli) => {
                let args = vec!["vote".to_string(), address.to_string(), choice.to_string()];
                Ok(cli.run("vote", &args, limit).await?.tx_id()?.to_string())
            }
        }
    }
}

/// Run `f` on the blocking pool, giving up after `limit`.
///
/// A timed-out worker is detached rather than cancelled; its transaction may
/// still land.
async fn run_blocking<T, F>(operation: &str, limit: Duration, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(BallotError::Session(format!(
            "{} worker failed: {}",
            operation, join_error
        ))),
        Err(_) => Err(BallotError::Timeout {
            operation: operation.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let mode = state.backend.mode();
    let server = axum::Server::try_bind(&addr)
        .map_err(|e| BallotError::Config(format!("cannot listen on {}: {}", addr, e)))?;
    info!(%addr, ?mode, "Bridge listening");

    server
        .serve(router(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down bridge");
        })
        .await
        .map_err(|e| BallotError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}
