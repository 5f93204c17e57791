pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod envfile;
pub mod logging;
pub mod network;
pub mod protocol;
pub mod session;
pub mod ui;

use miette::Diagnostic;

pub use commands::{generate, Command};
pub use descriptor::{extract, ContractDescriptor, OperationDescriptor, SemanticType};
pub use dispatcher::Dispatcher;
pub use session::{ContractRuntime, ContractSession};

/// Result type alias for the ballot console
pub type Result<T> = std::result::Result<T, BallotError>;

/// Error types for the ballot console
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum BallotError {
    #[error("Failed to extract contract interface: {0}")]
    #[diagnostic(
        code(ballot::extraction_failed),
        help("Recompile the contract so that `managed/<name>/contract/index.d.cts` is regenerated, and check that `--contract-dir` points at the directory holding the `.compact` source.")
    )]
    Extraction(String),

    #[error("Invalid input: {0}")]
    #[diagnostic(
        code(ballot::invalid_input),
        help("Check the number and types of the arguments. Use `ballot inspect` to list every operation with its parameters.")
    )]
    Validation(String),

    #[error("Contract session failed: {0}")]
    #[diagnostic(
        code(ballot::session_failed),
        help("The contract runtime rejected the request. Check the network endpoints, the wallet balance and the contract address.")
    )]
    Session(String),

    #[error("Contract session lost: {0}")]
    #[diagnostic(
        code(ballot::session_lost),
        help("The connection to the contract can not be recovered in this run. Restart and join the contract again.")
    )]
    SessionLost(String),

    #[error("Timed out after {seconds}s: {operation}")]
    #[diagnostic(
        code(ballot::timeout),
        help("Raise `bridge.timeout_secs` in `.ballot.toml` if transactions legitimately take longer.")
    )]
    Timeout { operation: String, seconds: u64 },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(ballot::config_error),
        help("Fix or remove `.ballot.toml`; every section is optional.")
    )]
    Config(String),

    #[error("Environment file error: {0}")]
    #[diagnostic(
        code(ballot::env_file_error),
        help("Environment files hold one `KEY=VALUE` pair per line.")
    )]
    EnvFile(String),

    #[error("File operation failed: {0}")]
    #[diagnostic(
        code(ballot::file_error),
        help("Check if you have necessary permissions and that the path exists.")
    )]
    Io(#[from] std::io::Error),
}

impl BallotError {
    /// Whether the interactive loop may keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BallotError::SessionLost(_))
    }

    /// Whether the error was caused by user input rather than the runtime.
    pub fn is_validation(&self) -> bool {
        matches!(self, BallotError::Validation(_))
    }
}
