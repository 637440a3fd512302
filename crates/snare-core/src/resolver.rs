//! Breakpoint resolver
//!
//! Turns a parsed request into a breakpoint ready for registration, checking
//! line targets against the line table and class targets against the static
//! scope. Nothing here touches the registry, so a failed resolution can never
//! leave a partial breakpoint behind.

use crate::confirm::{Confirm, SET_ANYWAY_PROMPT};
use crate::traits::{GuardValidator, LineTableOracle, StaticReference};
use snare_common::error::{NO_BREAKPOINT_CONTEXT, NO_FILE_CONTEXT};
use snare_common::{
    BreakpointRequest, BreakpointTarget, CallerContext, Error, Location, NewBreakpoint, Result,
};
use tracing::{debug, warn};

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub breakpoint: NewBreakpoint,
    /// The guard expression failed the syntax check; the breakpoint is
    /// disabled
    pub condition_rejected: bool,
}

pub struct Resolver<'a> {
    lines: &'a dyn LineTableOracle,
    guards: &'a dyn GuardValidator,
}

impl<'a> Resolver<'a> {
    pub fn new(lines: &'a dyn LineTableOracle, guards: &'a dyn GuardValidator) -> Self {
        Self { lines, guards }
    }

    /// Resolve a request against the caller's current stop.
    ///
    /// `confirm` is asked only when the line table cannot load the file;
    /// declining yields [`Error::FileNotLoadable`].
    pub fn resolve(
        &self,
        request: BreakpointRequest,
        context: &CallerContext,
        confirm: &mut dyn Confirm,
    ) -> Result<Resolution> {
        let mut breakpoint = match request.target {
            BreakpointTarget::FileLine { file, line } => {
                self.resolve_file_line(file, line, context, confirm)?
            }
            BreakpointTarget::ClassMethod { class_name, method } => {
                self.resolve_method(&class_name, method, context)?
            }
        };

        let mut condition_rejected = false;
        if let Some(expr) = request.condition {
            if !self.guards.is_syntactically_valid(&expr) {
                warn!(expr = %expr, location = %breakpoint.location, "Guard expression invalid, breakpoint disabled");
                breakpoint.enabled = false;
                condition_rejected = true;
            }
            breakpoint.condition = Some(expr);
        }

        debug!(location = %breakpoint.location, validated = breakpoint.validated, "Breakpoint resolved");
        Ok(Resolution {
            breakpoint,
            condition_rejected,
        })
    }

    fn resolve_file_line(
        &self,
        file: Option<String>,
        line: Option<String>,
        context: &CallerContext,
        confirm: &mut dyn Confirm,
    ) -> Result<NewBreakpoint> {
        let (file, line) = match file {
            None => {
                let file = current_file(context)?;
                let line = match line {
                    Some(token) => parse_line(&token)?,
                    None => current_line(context)?,
                };
                (file, line)
            }
            Some(file) => match line {
                Some(token) if !is_plain_integer(&token) => {
                    // `Foo:bar` names method `bar` of class `Foo`
                    return self.resolve_method(&file, token, context);
                }
                Some(token) => {
                    let line = parse_line(&token)?;
                    (file, line)
                }
                None => {
                    current_file(context)?;
                    (file, current_line(context)?)
                }
            },
        };

        let validated = self.check_line(&file, line, confirm)?;

        if !context.has_active_frame {
            return Err(Error::NoActiveContext(NO_BREAKPOINT_CONTEXT));
        }

        let location = Location::line(self.lines.canonical_path(&file), line);
        let breakpoint = NewBreakpoint::new(location);
        Ok(if validated {
            breakpoint
        } else {
            breakpoint.unvalidated()
        })
    }

    /// Validate `line` in `file`. Ok(false) means the file could not be
    /// loaded and the user chose to continue.
    fn check_line(&self, file: &str, line: usize, confirm: &mut dyn Confirm) -> Result<bool> {
        if !self.lines.load(file) {
            let prompt = format!("{}. {}", Error::FileNotLoadable(file.to_string()), SET_ANYWAY_PROMPT);
            if confirm.confirm(&prompt) {
                debug!(file, line, "Creating breakpoint in unloadable file");
                return Ok(false);
            }
            return Err(Error::FileNotLoadable(file.to_string()));
        }

        let total_lines = self.lines.line_count(file);
        if line > total_lines {
            return Err(Error::LineOutOfRange {
                total_lines,
                file: file.to_string(),
            });
        }
        if !self.lines.stop_points(file).contains(&line) {
            return Err(Error::NotAStopPoint {
                line,
                file: file.to_string(),
            });
        }
        Ok(true)
    }

    fn resolve_method(
        &self,
        class_token: &str,
        method: String,
        context: &CallerContext,
    ) -> Result<NewBreakpoint> {
        match self.guards.resolve_static_reference(class_token, context) {
            Some(StaticReference::Module(handle)) => {
                Ok(NewBreakpoint::new(Location::method(handle.name, method)))
            }
            Some(StaticReference::Value { type_name }) => {
                debug!(token = class_token, type_name = %type_name, "Token is not a class or module");
                Err(Error::UnknownClass(class_token.to_string()))
            }
            None => Err(Error::UnknownClass(class_token.to_string())),
        }
    }
}

fn is_plain_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_line(token: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| Error::MalformedCondition {
            text: token.to_string(),
            after_location: false,
        })
}

fn current_file(context: &CallerContext) -> Result<String> {
    if !context.has_active_frame {
        return Err(Error::NoActiveContext(NO_FILE_CONTEXT));
    }
    context
        .current_file
        .clone()
        .ok_or(Error::NoActiveContext(NO_FILE_CONTEXT))
}

fn current_line(context: &CallerContext) -> Result<usize> {
    context
        .current_line
        .ok_or(Error::NoActiveContext(NO_FILE_CONTEXT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AutoConfirm;
    use crate::line_table::StaticLineTable;
    use crate::parser::parse;
    use crate::symbols::SymbolTable;

    fn lines() -> StaticLineTable {
        StaticLineTable::new()
            .with_file("a.rb", 50, [1, 4, 10, 12])
            .with_file("b.rb", 20, [3])
    }

    fn symbols() -> SymbolTable {
        SymbolTable::new()
            .with_class("MyClass")
            .with_module("Util")
            .with_value("LIMIT", "Integer")
    }

    fn resolve(raw: &str, ctx: &CallerContext) -> Result<Resolution> {
        let lines = lines();
        let symbols = symbols();
        Resolver::new(&lines, &symbols).resolve(parse(raw)?, ctx, &mut AutoConfirm(false))
    }

    #[test]
    fn test_bare_line_uses_current_file() {
        let res = resolve("10", &CallerContext::active("a.rb", 4)).unwrap();
        assert_eq!(res.breakpoint.location, Location::line("a.rb", 10));
        assert!(res.breakpoint.enabled);
        assert!(res.breakpoint.condition.is_none());
        assert!(!res.condition_rejected);
    }

    #[test]
    fn test_empty_uses_current_line() {
        let res = resolve("", &CallerContext::active("a.rb", 12)).unwrap();
        assert_eq!(res.breakpoint.location, Location::line("a.rb", 12));
    }

    #[test]
    fn test_file_without_line_uses_current_line() {
        let res = resolve("b.rb:", &CallerContext::active("b.rb", 3)).unwrap();
        assert_eq!(res.breakpoint.location, Location::line("b.rb", 3));
    }

    #[test]
    fn test_bare_line_without_frame() {
        let err = resolve("10", &CallerContext::detached()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "We are not in a state that has an associated file"
        );
    }

    #[test]
    fn test_explicit_file_still_needs_frame() {
        let err = resolve("a.rb:10", &CallerContext::detached()).unwrap_err();
        assert_eq!(err.to_string(), "We are not in a state we can add breakpoints");
    }

    #[test]
    fn test_line_out_of_range() {
        let err = resolve("a.rb:999", &CallerContext::active("a.rb", 1)).unwrap_err();
        match err {
            Error::LineOutOfRange { total_lines, file } => {
                assert_eq!(total_lines, 50);
                assert_eq!(file, "a.rb");
            }
            other => panic!("Expected LineOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_not_a_stop_point() {
        let err = resolve("a.rb:11", &CallerContext::active("a.rb", 1)).unwrap_err();
        assert!(matches!(err, Error::NotAStopPoint { line: 11, .. }));
    }

    #[test]
    fn test_unloadable_file_declined() {
        let err = resolve("missing.rb:3", &CallerContext::active("a.rb", 1)).unwrap_err();
        assert!(matches!(err, Error::FileNotLoadable(ref f) if f == "missing.rb"));
    }

    #[test]
    fn test_unloadable_file_confirmed() {
        let lines = lines();
        let symbols = symbols();
        let mut prompts = Vec::new();
        let mut gate = |prompt: &str| {
            prompts.push(prompt.to_string());
            true
        };
        let res = Resolver::new(&lines, &symbols)
            .resolve(
                parse("missing.rb:3").unwrap(),
                &CallerContext::active("a.rb", 1),
                &mut gate,
            )
            .unwrap();
        assert_eq!(res.breakpoint.location, Location::line("missing.rb", 3));
        assert!(!res.breakpoint.validated);
        assert_eq!(
            prompts,
            vec!["No source file named missing.rb. Set breakpoint anyway? (y/n) ".to_string()]
        );
    }

    #[test]
    fn test_class_method() {
        let res = resolve("MyClass#run", &CallerContext::detached()).unwrap();
        assert_eq!(res.breakpoint.location, Location::method("MyClass", "run"));
    }

    #[test]
    fn test_unknown_class() {
        let err = resolve("Missing#run", &CallerContext::detached()).unwrap_err();
        assert!(matches!(err, Error::UnknownClass(ref c) if c == "Missing"));
    }

    #[test]
    fn test_value_is_unknown_class() {
        let err = resolve("LIMIT.to_s", &CallerContext::detached()).unwrap_err();
        assert!(matches!(err, Error::UnknownClass(ref c) if c == "LIMIT"));
    }

    #[test]
    fn test_colon_method_redispatches_to_class() {
        let res = resolve("Util:helper", &CallerContext::detached()).unwrap();
        assert_eq!(res.breakpoint.location, Location::method("Util", "helper"));

        let err = resolve("a.rb:helper", &CallerContext::active("a.rb", 1)).unwrap_err();
        assert!(matches!(err, Error::UnknownClass(ref c) if c == "a.rb"));

        // A known name that is a plain value, not a class or module
        let err = resolve("LIMIT:max", &CallerContext::active("a.rb", 1)).unwrap_err();
        assert!(matches!(err, Error::UnknownClass(ref c) if c == "LIMIT"));
    }

    #[test]
    fn test_invalid_condition_disables() {
        let res = resolve(
            "a.rb:12 if x > bad syntax(",
            &CallerContext::active("a.rb", 1),
        )
        .unwrap();
        assert!(res.condition_rejected);
        assert!(!res.breakpoint.enabled);
        assert_eq!(
            res.breakpoint.condition.as_deref(),
            Some("x > bad syntax(")
        );
    }

    #[test]
    fn test_valid_condition_on_method() {
        let res = resolve("MyClass.run if x > 1", &CallerContext::detached()).unwrap();
        assert!(res.breakpoint.enabled);
        assert_eq!(res.breakpoint.condition.as_deref(), Some("x > 1"));
    }
}
