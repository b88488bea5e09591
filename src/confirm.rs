//! Confirmation seam for destructive actions.
//!
//! The controller asks a [`Confirmer`] before deleting anything, so the
//! interactive shell can prompt on stdin while `--yes` and tests plug in
//! canned answers.

use std::io::{BufRead, Write};

/// Decides whether a destructive action proceeds.
pub trait Confirmer {
    /// Returns `true` to proceed with the described action.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Approves everything. Used by `--yes` flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysApprove;

impl Confirmer for AlwaysApprove {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Prompts on stdin, accepting `y` or `yes` (case-insensitive).
/// Anything else, including EOF, declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
