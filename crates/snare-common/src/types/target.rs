//! Parsed breakpoint requests

use serde::{Deserialize, Serialize};

/// Structured form of a location string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakpointTarget {
    /// `file:line`, a bare line, or nothing at all.
    ///
    /// A missing file means the current file; a missing line means the
    /// current line. `line` is kept as raw text because a non-numeric
    /// token after `file:` names a method on a class called `file`.
    FileLine {
        file: Option<String>,
        line: Option<String>,
    },
    /// `Class.method` or `Class#method`
    ClassMethod { class_name: String, method: String },
}

impl BreakpointTarget {
    /// The current file and line of the active frame
    pub fn current() -> Self {
        BreakpointTarget::FileLine {
            file: None,
            line: None,
        }
    }
}

/// Target plus the raw guard expression, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointRequest {
    pub target: BreakpointTarget,
    pub condition: Option<String>,
}

impl BreakpointRequest {
    pub fn new(target: BreakpointTarget) -> Self {
        Self {
            target,
            condition: None,
        }
    }
}
