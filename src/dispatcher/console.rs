//! Line-oriented input/output used by the interactive loop.

use crate::ui::formatter::Formatter;
use crate::{BallotError, Result};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{DefaultEditor, Editor};
use std::collections::VecDeque;
use std::path::PathBuf;

pub trait Console {
    /// Read one line. `Ok(None)` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn print(&mut self, line: &str);
}

/// Readline-backed terminal console with persistent history.
pub struct TerminalConsole {
    editor: Editor<(), FileHistory>,
    history_path: PathBuf,
}

impl TerminalConsole {
    pub fn new() -> Result<Self> {
        let history_path = dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".ballot_history");

        let mut editor = DefaultEditor::new().map_err(|e| {
            BallotError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("failed to initialize line editor: {}", e),
            ))
        })?;
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", Formatter::info("Use the exit entry or Ctrl+D to quit"));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => {
                    return Err(BallotError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e.to_string(),
                    )))
                }
            }
        }
    }

    fn print(&mut self, line: &str) {
        println!("{}", line);
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        let _ = self.editor.save_history(&self.history_path);
    }
}

/// Console fed from a fixed list of lines; records everything printed.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }

    fn print(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
