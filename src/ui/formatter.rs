use crate::commands::{Command, CommandOutcome};
use crate::descriptor::ContractDescriptor;
use crate::session::{BallotTally, TxResult};
use crossterm::style::Stylize;
use is_terminal::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

const BAR_WIDTH: usize = 30;

/// Pretty printing utilities for console output
pub struct Formatter;

impl Formatter {
    /// Numbered menu lines, 1-based.
    pub fn format_menu(title: &str, commands: &[Command]) -> Vec<String> {
        let mut lines = vec![String::new(), Self::success(title)];
        lines.extend(
            commands
                .iter()
                .enumerate()
                .map(|(i, cmd)| format!("  {}. {}", i + 1, cmd.label)),
        );
        lines
    }

    pub fn format_tx_result(result: &TxResult) -> Vec<String> {
        let mut lines = vec![Self::success(format!(
            "Transaction {} added in block {}",
            result.tx_id, result.block_height
        ))];
        if let Some(value) = &result.return_value {
            lines.push(format!("  Result: {}", value));
        }
        lines.extend(
            result
                .counters
                .iter()
                .map(|(name, value)| format!("  {} = {}", name, value)),
        );
        lines
    }

    pub fn format_outcome(outcome: &CommandOutcome) -> Vec<String> {
        match outcome {
            CommandOutcome::Executed(result) => Self::format_tx_result(result),
            CommandOutcome::Exit => vec![Self::info("Goodbye!")],
        }
    }

    /// Operations and ledger shape, as printed by `inspect`.
    pub fn format_descriptor(descriptor: &ContractDescriptor) -> Vec<String> {
        let heavy = "═".repeat(54);
        let mut lines = vec![
            heavy.clone(),
            format!("  Contract: {}", descriptor.contract_name),
            heavy.clone(),
            String::new(),
            "  Operations".to_string(),
        ];
        if descriptor.operations.is_empty() {
            lines.push("    (none)".to_string());
        }
        for op in &descriptor.operations {
            let kind = if op.is_read_only { "query" } else { "transaction" };
            lines.push(format!("    • {} [{}]", op.signature(), kind));
            lines.push(format!("        {}", op.description));
        }
        lines.push(String::new());
        lines.push("  Ledger".to_string());
        if descriptor.ledger_fields.is_empty() {
            lines.push("    (none)".to_string());
        }
        for (name, ty) in &descriptor.ledger_fields {
            lines.push(format!("    • {}: {}", name, ty));
        }
        lines.push(heavy);
        lines
    }

    /// Human-readable tally with one bar per choice.
    pub fn format_tally(address: &str, tally: &BallotTally) -> Vec<String> {
        let mut lines = vec![
            Self::success(format!("Ballot {}", address)),
            format!("  Total voters: {}", tally.total_voters),
        ];
        let max = tally.vote_counts.iter().copied().max().unwrap_or(0);
        for (i, (label, count)) in tally.choices.iter().zip(&tally.vote_counts).enumerate() {
            let filled = if max == 0 {
                0
            } else {
                (*count as usize * BAR_WIDTH) / max as usize
            };
            lines.push(format!(
                "  {}. {:<16} {:>5} {}",
                i,
                label,
                count,
                "█".repeat(filled)
            ));
        }
        lines
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Info)
    }

    /// Format a success message in green.
    pub fn success(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Success)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Warning)
    }

    /// Format an error message in red.
    pub fn error(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Error)
    }

    /// Configure whether ANSI colors are enabled.
    pub fn configure_colors(enable: bool) {
        COLOR_ENABLED.store(enable, Ordering::Relaxed);
    }

    /// Colors only when `NO_COLOR` is unset and both streams are terminals.
    pub fn configure_colors_from_env() {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let terminal = std::io::stdout().is_terminal() && std::io::stderr().is_terminal();
        Self::configure_colors(!no_color && terminal);
    }

    fn apply_color(message: &str, kind: ColorKind) -> String {
        if !COLOR_ENABLED.load(Ordering::Relaxed) {
            return message.to_string();
        }

        match kind {
            ColorKind::Info => format!("{}", message.blue()),
            ColorKind::Success => format!("{}", message.green()),
            ColorKind::Warning => format!("{}", message.yellow()),
            ColorKind::Error => format!("{}", message.red()),
        }
    }
}

#[derive(Copy, Clone)]
enum ColorKind {
    Info,
    Success,
    Warning,
    Error,
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_bars_scale_to_leader() {
        let tally = BallotTally {
            total_voters: 3,
            choices: vec!["YES".into(), "NO".into()],
            vote_counts: vec![2, 1],
        };
        let lines = Formatter::format_tally("ab", &tally);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with(&"█".repeat(BAR_WIDTH)));
        assert!(lines[3].ends_with(&"█".repeat(BAR_WIDTH / 2)));
    }

    #[test]
    fn test_empty_tally_has_no_bars() {
        let tally = BallotTally {
            total_voters: 0,
            choices: vec!["A".into()],
            vote_counts: vec![0],
        };
        let lines = Formatter::format_tally("ab", &tally);
        assert!(!lines[2].contains('█'));
    }
}
