use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ballot")]
#[command(about = "Deploy, join and vote on a ballot contract", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file
    #[arg(long, global = true, default_value = ".ballot.toml")]
    pub config: PathBuf,

    /// Environment file holding WALLET_SEED and CONTRACT_ADDRESS
    #[arg(long, global = true, default_value = ".env", env = "BALLOT_ENV_FILE")]
    pub env_file: PathBuf,

    /// Directory containing the `.compact` source and its `managed/` output
    #[arg(long, global = true, default_value = "contract")]
    pub contract_dir: PathBuf,

    /// State directory of the local network (overrides `network.state_dir`)
    #[arg(long, global = true, env = "BALLOT_NETWORK_DIR")]
    pub network_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a new ballot with four choices
    Deploy(DeployArgs),

    /// Print the tally as machine-readable lines
    State(AddressArgs),

    /// Cast a vote for a choice index
    Vote(VoteArgs),

    /// Show the tally with bars
    Display(AddressArgs),

    /// Call any contract operation by name
    Call(CallArgs),

    /// Start the interactive menu (default when no subcommand is given)
    Interactive,

    /// Show the operations and ledger fields extracted from the contract
    Inspect(InspectArgs),

    /// Serve the HTTP bridge
    Serve(ServeArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct DeployArgs {
    /// Choice labels, in index order
    #[arg(num_args = 4, value_names = ["CHOICE_0", "CHOICE_1", "CHOICE_2", "CHOICE_3"], required = true)]
    pub choices: Vec<String>,
}

#[derive(Args)]
pub struct AddressArgs {
    /// Contract address (defaults to CONTRACT_ADDRESS from the environment file)
    pub address: Option<String>,
}

#[derive(Args)]
pub struct VoteArgs {
    /// Contract address
    pub address: String,

    /// Choice index, starting at 0
    #[arg(allow_hyphen_values = true)]
    pub index: String,
}

#[derive(Args)]
pub struct CallArgs {
    /// Contract address
    pub address: String,

    /// Operation name as listed by `inspect`
    pub operation: String,

    /// Arguments in declared parameter order
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Print the descriptor as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides `bridge.bind`)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides `bridge.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Run the CLI binary per request instead of calling the session directly
    #[arg(long)]
    pub spawn: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }
}
