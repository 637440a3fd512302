//! Error types for snare
//!
//! Display strings double as the one-line messages shown to the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Trailing text after the location is not a well-formed `if <expr>` clause
    #[error("{}", malformed_condition_message(*after_location, text))]
    MalformedCondition { text: String, after_location: bool },

    /// No active frame to take defaults from or to register against
    #[error("We are not in a state {0}")]
    NoActiveContext(&'static str),

    #[error("Unknown class {0}")]
    UnknownClass(String),

    #[error("There are only {total_lines} lines in file {file}")]
    LineOutOfRange { total_lines: usize, file: String },

    #[error("Line {line} is not a stopping point in file {file}")]
    NotAStopPoint { line: usize, file: String },

    /// The line table could not load the file; recoverable through confirmation
    #[error("No source file named {0}")]
    FileNotLoadable(String),

    #[error("No breakpoint number {0}")]
    NoSuchId(u32),

    #[error("Breakpoint number must be a positive integer; got: {0}")]
    InvalidId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Messages for [`Error::NoActiveContext`]
pub const NO_FILE_CONTEXT: &str = "that has an associated file";
pub const NO_BREAKPOINT_CONTEXT: &str = "we can add breakpoints";

fn malformed_condition_message(after_location: bool, text: &str) -> String {
    if after_location {
        format!("Expecting \"if\" in breakpoint condition; got: {}", text)
    } else {
        format!("Invalid breakpoint location: {}", text)
    }
}

impl Error {
    /// Whether the caller may offer a confirmation and retry the request
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::FileNotLoadable(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
