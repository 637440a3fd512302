//! Caller context passed to resolution

use serde::{Deserialize, Serialize};

/// What the debugger knows about the current stop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    pub has_active_frame: bool,
    pub current_file: Option<String>,
    pub current_line: Option<usize>,
}

impl CallerContext {
    /// Context for a program stopped at `file:line`
    pub fn active(file: impl Into<String>, line: usize) -> Self {
        Self {
            has_active_frame: true,
            current_file: Some(file.into()),
            current_line: Some(line),
        }
    }

    /// No program is running
    pub fn detached() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_context() {
        let ctx = CallerContext::active("a.rb", 4);
        assert!(ctx.has_active_frame);
        assert_eq!(ctx.current_file.as_deref(), Some("a.rb"));
        assert_eq!(ctx.current_line, Some(4));
    }

    #[test]
    fn test_detached_context() {
        let ctx = CallerContext::detached();
        assert!(!ctx.has_active_frame);
        assert!(ctx.current_file.is_none());
    }
}
