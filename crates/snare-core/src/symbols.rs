//! Pre-registered symbol table
//!
//! Resolves class and module names without evaluating debuggee code.

use crate::syntax::check_guard_syntax;
use crate::traits::{GuardValidator, ModuleHandle, ModuleKind, StaticReference};
use snare_common::CallerContext;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, StaticReference>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.insert_module(name, ModuleKind::Class);
        self
    }

    pub fn with_module(mut self, name: impl Into<String>) -> Self {
        self.insert_module(name, ModuleKind::Module);
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.insert_value(name, type_name);
        self
    }

    pub fn insert_module(&mut self, name: impl Into<String>, kind: ModuleKind) {
        let name = name.into();
        self.entries.insert(
            name.clone(),
            StaticReference::Module(ModuleHandle { name, kind }),
        );
    }

    pub fn insert_value(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.entries.insert(
            name.into(),
            StaticReference::Value {
                type_name: type_name.into(),
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GuardValidator for SymbolTable {
    fn is_syntactically_valid(&self, expr: &str) -> bool {
        match check_guard_syntax(expr) {
            Ok(()) => true,
            Err(issue) => {
                trace!(expr, %issue, "Guard expression rejected");
                false
            }
        }
    }

    fn resolve_static_reference(
        &self,
        token: &str,
        _context: &CallerContext,
    ) -> Option<StaticReference> {
        // `::Foo` names the top-level constant `Foo`
        let name = token.strip_prefix("::").unwrap_or(token);
        self.entries.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::new()
            .with_class("MyClass")
            .with_module("Foo::Bar")
            .with_value("LIMIT", "Integer")
    }

    #[test]
    fn test_resolves_classes_and_modules() {
        let ctx = CallerContext::detached();
        let symbols = table();
        let class = symbols.resolve_static_reference("MyClass", &ctx).unwrap();
        assert_eq!(
            class.as_module().map(|h| h.kind),
            Some(ModuleKind::Class)
        );
        let module = symbols.resolve_static_reference("::Foo::Bar", &ctx).unwrap();
        assert_eq!(module.as_module().unwrap().name, "Foo::Bar");
    }

    #[test]
    fn test_value_is_not_a_module() {
        let ctx = CallerContext::detached();
        let found = table().resolve_static_reference("LIMIT", &ctx).unwrap();
        assert!(found.as_module().is_none());
    }

    #[test]
    fn test_unknown_name() {
        let ctx = CallerContext::detached();
        assert!(table().resolve_static_reference("Nope", &ctx).is_none());
    }

    #[test]
    fn test_syntax_validation() {
        let symbols = table();
        assert!(symbols.is_syntactically_valid("x > 1"));
        assert!(!symbols.is_syntactically_valid("x > bad syntax("));
    }
}
