use crate::bridge::{self, AppState, Backend, CliRunner};
use crate::cli::args::{
    AddressArgs, CallArgs, Cli, CompletionsArgs, DeployArgs, InspectArgs, ServeArgs, VoteArgs,
};
use crate::config::BridgeMode;
use crate::context::{self, BallotContext};
use crate::descriptor::ContractDescriptor;
use crate::dispatcher::{self, establish, Console, Dispatcher, SetupOutcome, TerminalConsole};
use crate::protocol::{tally_tags, Tag};
use crate::session::{ContractAddress, ContractRuntime, ContractSession};
use crate::ui::formatter::Formatter;
use crate::ui::progress::with_spinner;
use crate::{generate, logging, BallotError, Result};
use clap::CommandFactory;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Deploy a ballot, print its address, then record it in the environment file.
pub fn deploy(ctx: &BallotContext, args: DeployArgs) -> Result<()> {
    let address = with_spinner("Deploying ballot...", || ctx.deploy(&args.choices))?;
    println!("{}", Tag::ContractAddress(address.to_string()));
    ctx.record_deployed(&address)
}

/// Print the tally as tag lines.
pub fn state(ctx: &BallotContext, args: AddressArgs) -> Result<()> {
    let address = ctx.resolve_address(args.address.as_deref())?;
    let tally = ctx.tally(&address)?;
    for tag in tally_tags(&tally) {
        println!("{}", tag);
    }
    Ok(())
}

pub fn vote(ctx: &BallotContext, args: VoteArgs) -> Result<()> {
    let address = ContractAddress::parse(&args.address)?;
    let choice = context::parse_choice(&args.index)?;
    let result = with_spinner("Submitting vote...", || ctx.vote(&address, choice))?;
    println!("{}", Tag::VoteSuccess(result.tx_id));
    Ok(())
}

pub fn display(ctx: &BallotContext, args: AddressArgs) -> Result<()> {
    let address = ctx.resolve_address(args.address.as_deref())?;
    let tally = ctx.tally(&address)?;
    for line in Formatter::format_tally(address.as_str(), &tally) {
        println!("{}", line);
    }
    Ok(())
}

/// Run one generated operation against an existing contract.
pub fn call(ctx: &BallotContext, args: CallArgs) -> Result<()> {
    let descriptor = ctx.descriptor()?;
    let commands = generate(&descriptor);
    let address = ContractAddress::parse(&args.address)?;

    let mut session = ctx.open_session()?;
    session.join_contract(&address)?;
    let outcome = dispatcher::execute_once(&mut session, &commands, &args.operation, &args.args)?;
    for line in Formatter::format_outcome(&outcome) {
        println!("{}", line);
    }
    Ok(())
}

pub fn interactive(ctx: &BallotContext) -> Result<()> {
    let descriptor = ctx.descriptor()?;
    let mut session = ctx.open_session()?;
    let mut console = TerminalConsole::new()?;
    println!(
        "{}",
        Formatter::info(format!(
            "Ballot console ({} on {})",
            descriptor.contract_name,
            session.providers().network_id
        ))
    );
    run_interactive(ctx, &mut session, &descriptor, &mut console)
}

/// Setup menu, then the generated operation menu until the user exits.
pub fn run_interactive<R: ContractRuntime>(
    ctx: &BallotContext,
    session: &mut ContractSession<R>,
    descriptor: &ContractDescriptor,
    console: &mut dyn Console,
) -> Result<()> {
    let default_address = ctx.default_address()?;
    match establish(session, console, default_address.as_ref())? {
        SetupOutcome::Deployed(address) => ctx.record_deployed(&address)?,
        SetupOutcome::Joined(_) => {}
        SetupOutcome::Exit => return Ok(()),
    }

    logging::log_interactive_mode_start(&descriptor.contract_name, descriptor.operations.len());
    Dispatcher::new(session, generate(descriptor))
        .with_title(format!("Operations of `{}`:", descriptor.contract_name))
        .run(console)
}

pub fn inspect(ctx: &BallotContext, args: InspectArgs) -> Result<()> {
    let descriptor = ctx.descriptor()?;
    if args.json {
        let json = serde_json::to_string_pretty(&descriptor).map_err(|e| {
            BallotError::Extraction(format!("failed to serialize descriptor: {}", e))
        })?;
        println!("{}", json);
    } else {
        for line in Formatter::format_descriptor(&descriptor) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Serve the HTTP bridge until Ctrl-C.
pub fn serve(ctx: BallotContext, config_path: &Path, args: ServeArgs) -> Result<()> {
    let bridge = ctx.config.bridge.clone();
    let mode = if args.spawn {
        BridgeMode::Spawn
    } else {
        bridge.mode
    };
    let host = args.bind.clone().unwrap_or_else(|| bridge.bind.clone());
    let port = args.port.unwrap_or(bridge.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| BallotError::Config(format!("invalid bind address {}:{}: {}", host, port, e)))?;

    let timeout = Duration::from_secs(bridge.timeout_secs);
    let network_id = ctx.config.network.network_id.clone();
    let backend = match mode {
        BridgeMode::InProcess => Backend::InProcess(Arc::new(ctx)),
        BridgeMode::Spawn => {
            let program = match &bridge.cli_path {
                Some(path) => path.clone(),
                None => std::env::current_exe()?,
            };
            Backend::Spawn(Arc::new(CliRunner::new(
                program,
                spawn_global_args(&ctx, config_path),
            )))
        }
    };

    let state = AppState {
        backend,
        timeout,
        network_id,
    };
    let runtime = tokio::runtime::Runtime::new()?;
    eprintln!(
        "{}",
        Formatter::success(format!("Bridge listening on http://{}", addr))
    );
    runtime.block_on(bridge::serve(state, addr))
}

/// Global flags that make a spawned CLI see the same files as this process.
fn spawn_global_args(ctx: &BallotContext, config_path: &Path) -> Vec<String> {
    let mut args = Vec::new();
    for (flag, path) in [
        ("--config", config_path),
        ("--env-file", ctx.env_file.as_path()),
        ("--contract-dir", ctx.contract_dir.as_path()),
        ("--network-dir", ctx.network_dir.as_path()),
    ] {
        args.push(flag.to_string());
        args.push(path.to_string_lossy().into_owned());
    }
    args
}

pub fn completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "ballot", &mut std::io::stdout());
    Ok(())
}
