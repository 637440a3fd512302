//! Collaborator interfaces
//!
//! The core never builds line tables or evaluates code itself. It queries
//! these traits, which the embedding debugger implements (or uses the
//! in-crate [`StaticLineTable`](crate::StaticLineTable),
//! [`SourceLineCache`](crate::SourceLineCache) and
//! [`SymbolTable`](crate::SymbolTable)).

use serde::{Deserialize, Serialize};
use snare_common::CallerContext;
use std::collections::BTreeSet;

/// Source line information for the debuggee
pub trait LineTableOracle: Send + Sync {
    /// Load (or confirm cached) the file; false if it cannot be read
    fn load(&self, file: &str) -> bool;

    /// Number of lines in a loaded file
    fn line_count(&self, file: &str) -> usize;

    /// Lines at which execution can stop
    fn stop_points(&self, file: &str) -> BTreeSet<usize>;

    /// Stable key for a file. Defaults to the path as given.
    fn canonical_path(&self, file: &str) -> String {
        file.to_string()
    }
}

/// Kind of a reflective module handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Class,
    Module,
}

/// A class or module known to the debuggee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHandle {
    /// Fully qualified name, e.g. `Foo::Bar`
    pub name: String,
    pub kind: ModuleKind,
}

/// What a bareword names in the static scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticReference {
    Module(ModuleHandle),
    /// Something that is not a class or module (a constant, a local, ...)
    Value { type_name: String },
}

impl StaticReference {
    pub fn as_module(&self) -> Option<&ModuleHandle> {
        match self {
            StaticReference::Module(handle) => Some(handle),
            StaticReference::Value { .. } => None,
        }
    }
}

/// Guard expression checks and static name lookup
pub trait GuardValidator: Send + Sync {
    /// Whether `expr` parses in the target language
    fn is_syntactically_valid(&self, expr: &str) -> bool;

    /// Look up `token` without running any debuggee code
    fn resolve_static_reference(&self, token: &str, context: &CallerContext)
        -> Option<StaticReference>;
}
