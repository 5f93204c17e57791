//! Structured logging utilities for the ballot console.
//!
//! Helper functions keep event names and field keys consistent across the
//! CLI, the interactive loop and the bridge. Everything goes through the
//! `tracing` crate; the subscriber is installed by the binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Logs go to stderr so that stdout stays
/// reserved for tagged, machine-readable output.
pub fn init(level: &str, json: bool) {
    let fallback_filter = format!("ballot_console={}", level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to install log subscriber: {}", e);
    }
}

pub fn log_deploy_start(init_args: usize) {
    tracing::info!(init_args, "Deploying contract");
}

pub fn log_contract_bound(address: &str, via: &str) {
    tracing::info!(address, via, "Contract handle bound to session");
}

pub fn log_operation_submit(operation: &str, address: &str, args: usize) {
    tracing::info!(operation, address, args, "Submitting operation");
}

pub fn log_operation_complete(operation: &str, tx_id: &str) {
    tracing::info!(operation, tx_id, "Operation completed");
}

pub fn log_counters_unavailable(operation: &str, tx_id: &str, error: &str) {
    tracing::warn!(operation, tx_id, error, "Transaction submitted but counters could not be read");
}

pub fn log_ledger_query(address: &str) {
    tracing::debug!(address, "Querying ledger state");
}

pub fn log_menu_selection(command: &str, read_only: bool) {
    tracing::debug!(command, read_only, "Menu selection");
}

pub fn log_invalid_selection(input: &str, menu_len: usize) {
    tracing::debug!(input, menu_len, "Invalid menu selection");
}

pub fn log_command_failed(command: &str, error: &str) {
    tracing::error!(command, error, "Command failed");
}

pub fn log_env_file_written(path: &str, key: &str) {
    tracing::info!(path, key, "Environment file updated");
}

pub fn log_bridge_request(method: &str, route: &str) {
    tracing::info!(method, route, "Bridge request");
}

pub fn log_child_spawned(program: &str, args: &str) {
    tracing::debug!(program, args, "Spawned CLI child process");
}

pub fn log_interactive_mode_start(contract: &str, operations: usize) {
    tracing::info!(contract, operations, "Interactive session started");
}
