//! Breakpoint-related types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Breakpoint ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreakpointId(pub u32);

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Where a breakpoint stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// Canonical source path and line
    Line { file: String, line: usize },
    /// Class (or module) and method name
    Method { class_name: String, method: String },
}

impl Location {
    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Location::Line {
            file: file.into(),
            line,
        }
    }

    pub fn method(class_name: impl Into<String>, method: impl Into<String>) -> Self {
        Location::Method {
            class_name: class_name.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line { file, line } => write!(f, "{}:{}", file, line),
            Location::Method { class_name, method } => write!(f, "{}::{}", class_name, method),
        }
    }
}

/// Bookkeeping owned by the tracing engine
///
/// The registry never interprets these fields; it only keeps them alive with
/// the breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakpointExtension {
    pub hit_count: u64,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A breakpoint before the registry has assigned it an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBreakpoint {
    pub location: Location,
    pub condition: Option<String>,
    pub enabled: bool,
    /// False when the line table could not load the file and the user
    /// confirmed creation anyway
    pub validated: bool,
}

impl NewBreakpoint {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            condition: None,
            enabled: true,
            validated: true,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn unvalidated(mut self) -> Self {
        self.validated = false;
        self
    }
}

/// Breakpoint information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub location: Location,
    pub condition: Option<String>,
    pub enabled: bool,
    pub validated: bool,
    #[serde(default)]
    pub extension: BreakpointExtension,
}

impl Breakpoint {
    pub fn from_new(id: BreakpointId, new: NewBreakpoint) -> Self {
        Self {
            id,
            location: new.location,
            condition: new.condition,
            enabled: new.enabled,
            validated: new.validated,
            extension: BreakpointExtension::default(),
        }
    }
}

/// Non-fatal notice attached to a successful creation or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    /// The guard expression does not parse; the breakpoint is disabled
    InvalidConditionSyntax { id: BreakpointId, expr: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::InvalidConditionSyntax { expr, .. } => write!(
                f,
                "Expression \"{}\" syntactically incorrect; breakpoint disabled",
                expr
            ),
        }
    }
}
