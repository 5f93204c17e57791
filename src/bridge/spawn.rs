//! Runs the CLI binary once per request and reads its tagged stdout.

use crate::protocol::TaggedOutput;
use crate::{logging, BallotError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CliRunner {
    program: PathBuf,
    /// Global flags passed before every subcommand.
    global_args: Vec<String>,
}

impl CliRunner {
    pub fn new(program: PathBuf, global_args: Vec<String>) -> Self {
        Self {
            program,
            global_args,
        }
    }

    /// Run one subcommand. The child is killed when `limit` expires.
    pub async fn run(&self, operation: &str, args: &[String], limit: Duration) -> Result<TaggedOutput> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.global_args)
            .args(args)
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            BallotError::Session(format!(
                "failed to start {}: {}",
                self.program.display(),
                e
            ))
        })?;
        logging::log_child_spawned(&self.program.to_string_lossy(), &args.join(" "));

        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| BallotError::Timeout {
                operation: operation.to_string(),
                seconds: limit.as_secs(),
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BallotError::Session(child_error(&stderr, &stdout)));
        }
        Ok(TaggedOutput::parse(&stdout))
    }
}

/// Display prefix of [`BallotError::Session`]; the child's message already
/// carries it and the caller wraps it again.
const SESSION_PREFIX: &str = "Contract session failed:";

/// The child's `ERROR:` line, or its trimmed stderr when it printed none.
fn child_error(stderr: &str, stdout: &str) -> String {
    stderr
        .lines()
        .chain(stdout.lines())
        .find_map(|line| line.strip_prefix("ERROR:"))
        .map(|message| {
            let message = message.trim();
            message
                .strip_prefix(SESSION_PREFIX)
                .unwrap_or(message)
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| match stderr.trim() {
            "" => "CLI exited with an error and no message".to_string(),
            text => text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_error_prefers_error_line() {
        let stderr = "2024 INFO deploying\nERROR: Invalid input: bad index\n";
        assert_eq!(child_error(stderr, ""), "Invalid input: bad index");
        assert_eq!(child_error("  boom \n", ""), "boom");
        assert_eq!(
            child_error("", ""),
            "CLI exited with an error and no message"
        );
    }

    #[test]
    fn test_child_session_error_is_not_wrapped_twice() {
        let stderr = "ERROR: Contract session failed: failed assert: voter is already a member\n";
        let err = BallotError::Session(child_error(stderr, ""));
        assert_eq!(
            err.to_string(),
            "Contract session failed: failed assert: voter is already a member"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_parses_tagged_stdout() {
        let runner = CliRunner::new(PathBuf::from("sh"), vec!["-c".to_string()]);
        let output = runner
            .run(
                "state",
                &["printf 'noise\\nTOTAL_VOTERS:2\\nCHOICE_0:A:2\\n'".to_string()],
                Duration::from_secs(10),
            )
            .await
            .unwrap();
        assert_eq!(output.tally().unwrap().vote_counts, vec![2]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_times_out() {
        let runner = CliRunner::new(PathBuf::from("sleep"), Vec::new());
        let err = runner
            .run("vote", &["5".to_string()], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, BallotError::Timeout { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_reports_failure() {
        let runner = CliRunner::new(PathBuf::from("sh"), vec!["-c".to_string()]);
        let err = runner
            .run(
                "vote",
                &["echo 'ERROR: already voted' >&2; exit 1".to_string()],
                Duration::from_secs(10),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Contract session failed: already voted");
    }
}
