//! First menu of an interactive run: deploy a new ballot or join one.

use super::console::Console;
use super::{parse_selection, report_error};
use crate::network::program::CHOICE_COUNT;
use crate::session::{ArgValue, ContractAddress, ContractRuntime, ContractSession};
use crate::ui::formatter::Formatter;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Deployed(ContractAddress),
    Joined(ContractAddress),
    Exit,
}

const ENTRIES: &[&str] = &[
    "Deploy a new ballot contract",
    "Join an existing ballot contract",
    "Exit",
];

/// Loop until the session holds a contract handle or the user leaves.
///
/// Failed deploys and joins are reported and the menu is shown again; a
/// deploy is never re-submitted without a new selection.
pub fn establish<R: ContractRuntime>(
    session: &mut ContractSession<R>,
    console: &mut dyn Console,
    default_address: Option<&ContractAddress>,
) -> Result<SetupOutcome> {
    loop {
        console.print("");
        console.print(&Formatter::success("You can do one of the following:"));
        for (i, entry) in ENTRIES.iter().enumerate() {
            console.print(&format!("  {}. {}", i + 1, entry));
        }

        let Some(input) = console.read_line("Which would you like to do? ")? else {
            return Ok(SetupOutcome::Exit);
        };

        let attempt = match parse_selection(&input, ENTRIES.len()) {
            Some(0) => deploy(session, console),
            Some(1) => join(session, console, default_address),
            Some(_) => return Ok(SetupOutcome::Exit),
            None => {
                console.print(&Formatter::error(format!(
                    "Invalid choice: {}. Enter a number between 1 and {}.",
                    input.trim(),
                    ENTRIES.len()
                )));
                continue;
            }
        };

        match attempt {
            Ok(Some(outcome)) => return Ok(outcome),
            Ok(None) => return Ok(SetupOutcome::Exit),
            Err(err) if err.is_recoverable() => report_error(console, &err),
            Err(err) => return Err(err),
        }
    }
}

fn deploy<R: ContractRuntime>(
    session: &mut ContractSession<R>,
    console: &mut dyn Console,
) -> Result<Option<SetupOutcome>> {
    let mut choices = Vec::with_capacity(CHOICE_COUNT);
    for i in 0..CHOICE_COUNT {
        let Some(label) = console.read_line(&format!("Enter label for choice {}: ", i))? else {
            return Ok(None);
        };
        choices.push(ArgValue::Text(label.trim().to_string()));
    }

    let address = session.deploy(&choices)?.address.clone();
    console.print(&Formatter::success(format!("Deployed contract at address: {}", address)));
    Ok(Some(SetupOutcome::Deployed(address)))
}

fn join<R: ContractRuntime>(
    session: &mut ContractSession<R>,
    console: &mut dyn Console,
    default_address: Option<&ContractAddress>,
) -> Result<Option<SetupOutcome>> {
    let prompt = match default_address {
        Some(addr) => format!("Enter the contract address (blank for {}): ", addr),
        None => "Enter the contract address: ".to_string(),
    };
    let Some(input) = console.read_line(&prompt)? else {
        return Ok(None);
    };

    let address = match (input.trim().is_empty(), default_address) {
        (true, Some(addr)) => addr.clone(),
        _ => ContractAddress::parse(&input)?,
    };

    session.join_contract(&address)?;
    console.print(&Formatter::success(format!("Joined contract at address: {}", address)));
    Ok(Some(SetupOutcome::Joined(address)))
}
