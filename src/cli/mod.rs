pub mod args;
pub mod commands;

pub use args::{
    AddressArgs, CallArgs, Cli, Commands, CompletionsArgs, DeployArgs, InspectArgs, ServeArgs,
    Verbosity, VoteArgs,
};
