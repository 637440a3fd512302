//! snare core library
//!
//! Resolves `break` locations to validated breakpoints and keeps the
//! session's breakpoint registry. Line tables and static name lookup come
//! from the embedding debugger through the traits in [`traits`].

pub mod confirm;
pub mod line_table;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod symbols;
pub mod syntax;
pub mod traits;

pub use confirm::{AutoConfirm, Confirm};
pub use line_table::{SourceLineCache, StaticLineTable};
pub use parser::parse;
pub use registry::BreakpointRegistry;
pub use resolver::{Resolution, Resolver};
pub use session::{BreakpointOutcome, DebugSession};
pub use snare_common::{Error, Result};
pub use symbols::SymbolTable;
pub use traits::*;
