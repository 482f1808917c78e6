use stacks_catalog::{Confirm, Prompt};
use std::io::{BufRead, Write};

/// Asks on the terminal, unless `--yes` was given.
///
/// Anything other than `y` or `yes` (case-insensitive) is a no, including
/// end of input.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirm {
    assume_yes: bool,
}
impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}
impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &Prompt<'_>) -> bool {
        if self.assume_yes {
            tracing::debug!(%prompt, "Assuming yes");
            return true;
        }
        let mut stderr = std::io::stderr().lock();
        if write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(%err, "Could not read answer; treating it as no");
                false
            },
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
