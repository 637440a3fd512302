//! Confirmation gate for recoverable requests

/// Asks the user a yes/no question
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Fixed answer, for non-interactive callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Prompt shown when the line table cannot load a file
pub const SET_ANYWAY_PROMPT: &str = "Set breakpoint anyway? (y/n) ";

/// Prompt shown before deleting every breakpoint
pub const DELETE_ALL_PROMPT: &str = "Delete all breakpoints? (y or n) ";
