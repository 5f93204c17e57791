//! Interactive menu loop and single-shot dispatch.
//!
//! The loop moves through `AwaitingSelection → Executing →
//! (AwaitingSelection | Terminated)`. Bad input never ends the loop; only the
//! `exit` entry, end of input, or a [`BallotError::SessionLost`] does.

pub mod console;
pub mod setup;

pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use setup::{establish, SetupOutcome};

use crate::commands::{resolve, ArgSource, Command, CommandOutcome};
use crate::session::{ContractRuntime, ContractSession};
use crate::ui::formatter::Formatter;
use crate::{logging, BallotError, Result};

/// Error fragments that mean "this identity already did this one-time action".
const MEMBERSHIP_CONFLICT_SIGNATURES: &[&str] = &["already a member", "already voted"];

const MEMBERSHIP_CONFLICT_HINT: &str =
    "Hint: this identity has already performed this one-time action (for example, it has already voted).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    AwaitingSelection,
    Executing(usize),
    Terminated,
}

pub struct Dispatcher<'s, R> {
    session: &'s mut ContractSession<R>,
    commands: Vec<Command>,
    title: String,
    state: DispatchState,
}

impl<'s, R: ContractRuntime> Dispatcher<'s, R> {
    pub fn new(session: &'s mut ContractSession<R>, commands: Vec<Command>) -> Self {
        Self {
            session,
            commands,
            title: "Choose an operation:".to_string(),
            state: DispatchState::AwaitingSelection,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Run until `Terminated`. Returns an error only for unrecoverable
    /// session failures.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        while self.state != DispatchState::Terminated {
            self.step(console)?;
        }
        Ok(())
    }

    /// Perform one state transition.
    pub fn step(&mut self, console: &mut dyn Console) -> Result<DispatchState> {
        self.state = match self.state {
            DispatchState::AwaitingSelection => self.await_selection(console)?,
            DispatchState::Executing(index) => self.execute(index, console)?,
            DispatchState::Terminated => DispatchState::Terminated,
        };
        Ok(self.state)
    }

    fn await_selection(&mut self, console: &mut dyn Console) -> Result<DispatchState> {
        for line in Formatter::format_menu(&self.title, &self.commands) {
            console.print(&line);
        }

        let Some(input) = console.read_line("Which would you like to do? ")? else {
            return Ok(DispatchState::Terminated);
        };

        match parse_selection(&input, self.commands.len()) {
            Some(index) => {
                let cmd = &self.commands[index];
                logging::log_menu_selection(&cmd.id, cmd.is_read_only);
                Ok(DispatchState::Executing(index))
            }
            None => {
                logging::log_invalid_selection(input.trim(), self.commands.len());
                console.print(&Formatter::error(format!(
                    "Invalid choice: {}. Enter a number between 1 and {}.",
                    input.trim(),
                    self.commands.len()
                )));
                Ok(DispatchState::AwaitingSelection)
            }
        }
    }

    fn execute(&mut self, index: usize, console: &mut dyn Console) -> Result<DispatchState> {
        let cmd = &self.commands[index];
        if cmd.is_exit() {
            console.print(&Formatter::info("Goodbye!"));
            return Ok(DispatchState::Terminated);
        }

        match cmd.invoke(&mut *self.session, ArgSource::Prompt(&mut *console)) {
            Ok(outcome) => {
                for line in Formatter::format_outcome(&outcome) {
                    console.print(&line);
                }
                Ok(DispatchState::AwaitingSelection)
            }
            Err(err) => {
                logging::log_command_failed(&cmd.id, &err.to_string());
                report_error(console, &err);
                if err.is_recoverable() {
                    Ok(DispatchState::AwaitingSelection)
                } else {
                    self.state = DispatchState::Terminated;
                    Err(err)
                }
            }
        }
    }
}

/// Resolve one operation by name, run it once with positional arguments.
pub fn execute_once<R: ContractRuntime>(
    session: &mut ContractSession<R>,
    commands: &[Command],
    operation: &str,
    args: &[String],
) -> Result<CommandOutcome> {
    let cmd = resolve(commands, operation)?;
    logging::log_menu_selection(&cmd.id, cmd.is_read_only);
    cmd.invoke(session, ArgSource::Positional(args))
}

/// Parse a 1-based menu selection into a 0-based index.
pub fn parse_selection(input: &str, menu_len: usize) -> Option<usize> {
    let choice = input.trim().parse::<usize>().ok()?;
    (1..=menu_len).contains(&choice).then(|| choice - 1)
}

/// Hint for errors that carry the membership-conflict signature.
pub fn conflict_hint(message: &str) -> Option<&'static str> {
    let lower = message.to_ascii_lowercase();
    MEMBERSHIP_CONFLICT_SIGNATURES
        .iter()
        .any(|sig| lower.contains(sig))
        .then_some(MEMBERSHIP_CONFLICT_HINT)
}

fn report_error(console: &mut dyn Console, err: &BallotError) {
    console.print(&format!("ERROR: {}", Formatter::error(err.to_string())));
    if let Some(hint) = conflict_hint(&err.to_string()) {
        console.print(&Formatter::warning(hint));
    }
}
