//! Common types used across snare components
//!
//! - `breakpoint` - Breakpoint records, ids, locations and advisories
//! - `target` - Parsed location requests
//! - `context` - Caller context for resolution

pub mod breakpoint;
pub mod context;
pub mod target;

pub use breakpoint::*;
pub use context::*;
pub use target::*;
