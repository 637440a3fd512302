//! snare common types
//!
//! Breakpoint records, errors, logging and configuration shared by the
//! resolution core and the command loop.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{ConfirmPolicy, SessionConfig};
pub use error::{Error, Result};
pub use logging::{get_log_file_path, init_logging, LogConfig};
pub use types::*;

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};
