use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use std::time::Duration;

/// Run `f` while a spinner ticks on stderr. Without a terminal the spinner is
/// skipped so that piped output stays clean.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    if !std::io::stderr().is_terminal() {
        return f();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = f();
    spinner.finish_and_clear();
    result
}
