use ballot_console::cli::commands;
use ballot_console::cli::{Cli, Commands};
use ballot_console::config::Config;
use ballot_console::context::BallotContext;
use ballot_console::ui::formatter::Formatter;
use ballot_console::{logging, BallotError};
use clap::Parser;
use miette::Diagnostic;

/// Environment switch holding a full command line, e.g. `state abc123`.
const COMMAND_ENV: &str = "BALLOT_COMMAND";
const LOG_JSON_ENV: &str = "BALLOT_LOG_JSON";

/// Parse arguments; usage errors exit with status 1 like every other failure.
fn parse_from<I, T>(argv: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprintln!("ERROR: {}", Formatter::error("invalid command line"));
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

fn parse_cli() -> Cli {
    let cli = parse_from(std::env::args_os());
    if cli.command.is_some() {
        return cli;
    }
    let Ok(line) = std::env::var(COMMAND_ENV) else {
        return cli;
    };
    match shlex::split(&line) {
        Some(words) if !words.is_empty() => {
            parse_from(std::env::args_os().chain(words.into_iter().map(std::ffi::OsString::from)))
        }
        _ => {
            eprintln!(
                "ERROR: {}",
                Formatter::error(format!("{} is not a valid command line", COMMAND_ENV))
            );
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> ballot_console::Result<()> {
    let config = Config::load_or_default(&cli.config);
    let ctx = BallotContext::new(config, cli.env_file.clone(), cli.contract_dir.clone())
        .with_network_dir(cli.network_dir.clone());

    match cli.command {
        Some(Commands::Deploy(args)) => commands::deploy(&ctx, args),
        Some(Commands::State(args)) => commands::state(&ctx, args),
        Some(Commands::Vote(args)) => commands::vote(&ctx, args),
        Some(Commands::Display(args)) => commands::display(&ctx, args),
        Some(Commands::Call(args)) => commands::call(&ctx, args),
        Some(Commands::Inspect(args)) => commands::inspect(&ctx, args),
        Some(Commands::Serve(args)) => commands::serve(ctx, &cli.config, args),
        Some(Commands::Completions(args)) => commands::completions(args),
        Some(Commands::Interactive) | None => commands::interactive(&ctx),
    }
}

/// The `ERROR:` prefix is never styled so that callers can match on it.
fn report(err: &BallotError) {
    eprintln!("ERROR: {}", Formatter::error(err.to_string()));
    if let Some(help) = err.help() {
        eprintln!("  help: {}", help);
    }
}

fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let cli = parse_cli();
    logging::init(
        cli.verbosity().to_log_level(),
        std::env::var_os(LOG_JSON_ENV).is_some(),
    );

    if let Err(err) = run(cli) {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}
