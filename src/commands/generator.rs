use super::coerce::{coerce, coerce_all};
use crate::descriptor::{ContractDescriptor, OperationDescriptor};
use crate::dispatcher::console::Console;
use crate::session::{ArgValue, ContractRuntime, ContractSession, TxResult};
use crate::ui::progress;
use crate::{BallotError, Result};
use itertools::Itertools;

pub const EXIT_ID: &str = "exit";

/// Where an invocation takes its arguments from.
pub enum ArgSource<'a> {
    /// Prompt once per parameter, in declared order.
    Prompt(&'a mut dyn Console),
    /// Consume positional arguments in declared order.
    Positional(&'a [String]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Operation(OperationDescriptor),
    Exit,
}

/// A generated menu entry / subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub label: String,
    pub is_read_only: bool,
    action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Executed(TxResult),
    Exit,
}

impl Command {
    fn for_operation(op: &OperationDescriptor) -> Self {
        let tag = if op.is_read_only { "query" } else { "transaction" };
        Self {
            id: op.name.clone(),
            label: format!("{} [{}] - {}", op.signature(), tag, op.description),
            is_read_only: op.is_read_only,
            action: Action::Operation(op.clone()),
        }
    }

    fn exit() -> Self {
        Self {
            id: EXIT_ID.to_string(),
            label: "Exit".to_string(),
            is_read_only: true,
            action: Action::Exit,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.action == Action::Exit
    }

    pub fn operation(&self) -> Option<&OperationDescriptor> {
        match &self.action {
            Action::Operation(op) => Some(op),
            Action::Exit => None,
        }
    }

    /// Gather and coerce arguments. Nothing is submitted if this fails.
    pub fn collect_args(&self, source: ArgSource<'_>) -> Result<Vec<ArgValue>> {
        let Some(op) = self.operation() else {
            return Ok(Vec::new());
        };
        match source {
            ArgSource::Positional(inputs) => Ok(coerce_all(&op.parameters, inputs)?),
            ArgSource::Prompt(console) => {
                let mut values = Vec::with_capacity(op.parameters.len());
                for param in &op.parameters {
                    let prompt = format!("Enter {} ({}): ", param.name, param.ty);
                    let line = console.read_line(&prompt)?.ok_or_else(|| {
                        BallotError::Validation(format!(
                            "input closed while reading `{}`",
                            param.name
                        ))
                    })?;
                    values.push(coerce(param, &line)?);
                }
                Ok(values)
            }
        }
    }

    /// Collect arguments, then submit the operation once.
    pub fn invoke<R: ContractRuntime>(
        &self,
        session: &mut ContractSession<R>,
        source: ArgSource<'_>,
    ) -> Result<CommandOutcome> {
        let Some(op) = self.operation() else {
            return Ok(CommandOutcome::Exit);
        };
        let args = self.collect_args(source)?;
        let message = format!("Submitting {}...", op.name);
        let result = progress::with_spinner(&message, || session.call_operation(&op.name, &args))?;
        Ok(CommandOutcome::Executed(result))
    }
}

/// Turn a descriptor into menu commands; `exit` is always last.
pub fn generate(descriptor: &ContractDescriptor) -> Vec<Command> {
    descriptor
        .operations
        .iter()
        .map(Command::for_operation)
        .chain(std::iter::once(Command::exit()))
        .collect()
}

/// Find the command for `name` among generated commands.
pub fn resolve<'a>(commands: &'a [Command], name: &str) -> Result<&'a Command> {
    commands
        .iter()
        .find(|c| !c.is_exit() && c.id == name)
        .ok_or_else(|| {
            let known = commands
                .iter()
                .filter(|c| !c.is_exit())
                .map(|c| c.id.as_str())
                .join(", ");
            BallotError::Validation(format!(
                "unknown operation `{}` (available: {})",
                name, known
            ))
        })
}
