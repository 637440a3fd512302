//! Debug session management
//!
//! The caller-facing API: creation from raw `break` text, deletion, clearing,
//! listing and per-breakpoint updates. The session owns the registry; the
//! line table and validator are shared with the rest of the debugger.

use crate::confirm::{AutoConfirm, Confirm, DELETE_ALL_PROMPT};
use crate::parser;
use crate::registry::BreakpointRegistry;
use crate::resolver::Resolver;
use crate::traits::{GuardValidator, LineTableOracle};
use snare_common::{Advisory, Breakpoint, BreakpointId, CallerContext, Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A breakpoint returned from a create or update, with any advisory
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointOutcome {
    pub breakpoint: Breakpoint,
    pub advisory: Option<Advisory>,
}

pub struct DebugSession {
    registry: BreakpointRegistry,
    lines: Arc<dyn LineTableOracle>,
    guards: Arc<dyn GuardValidator>,
}

impl DebugSession {
    pub fn new(lines: Arc<dyn LineTableOracle>, guards: Arc<dyn GuardValidator>) -> Self {
        Self {
            registry: BreakpointRegistry::new(),
            lines,
            guards,
        }
    }

    /// Create a breakpoint from `break` argument text.
    ///
    /// Breakpoints in files the line table cannot load are refused; use
    /// [`create_breakpoint_with`](Self::create_breakpoint_with) to ask the
    /// user instead.
    pub fn create_breakpoint(&self, raw: &str, context: &CallerContext) -> Result<BreakpointOutcome> {
        self.create_breakpoint_with(raw, context, &mut AutoConfirm(false))
    }

    pub fn create_breakpoint_with(
        &self,
        raw: &str,
        context: &CallerContext,
        confirm: &mut dyn Confirm,
    ) -> Result<BreakpointOutcome> {
        let resolution = parser::parse(raw)
            .and_then(|request| {
                Resolver::new(self.lines.as_ref(), self.guards.as_ref())
                    .resolve(request, context, confirm)
            })
            .map_err(|e| {
                warn!(raw, error = %e, "Breakpoint request rejected");
                e
            })?;

        let breakpoint = self.registry.add(resolution.breakpoint);
        let advisory = if resolution.condition_rejected {
            breakpoint
                .condition
                .clone()
                .map(|expr| Advisory::InvalidConditionSyntax {
                    id: breakpoint.id,
                    expr,
                })
        } else {
            None
        };

        Ok(BreakpointOutcome {
            breakpoint,
            advisory,
        })
    }

    /// Delete one breakpoint; false if there is no such id
    pub fn delete_breakpoint(&self, id: BreakpointId) -> bool {
        self.registry.remove(id)
    }

    /// Delete every id in a space/tab separated list.
    ///
    /// Missing ids are reported and skipped. An argument that is not a
    /// positive integer is reported and ends the batch.
    pub fn delete_breakpoints(&self, ids: &str) -> Vec<Result<BreakpointId>> {
        let mut results = Vec::new();
        for token in ids.split([' ', '\t']).filter(|t| !t.is_empty()) {
            let id = match token.parse::<u32>() {
                Ok(n) if n >= 1 => BreakpointId(n),
                _ => {
                    results.push(Err(Error::InvalidId(token.to_string())));
                    break;
                }
            };
            if self.registry.remove(id) {
                results.push(Ok(id));
            } else {
                results.push(Err(Error::NoSuchId(id.0)));
            }
        }
        results
    }

    /// Remove every breakpoint
    pub fn clear_all(&self) {
        self.registry.clear();
    }

    /// Remove every breakpoint if the user agrees
    pub fn clear_all_confirmed(&self, confirm: &mut dyn Confirm) -> bool {
        if confirm.confirm(DELETE_ALL_PROMPT) {
            self.clear_all();
            true
        } else {
            false
        }
    }

    pub fn list_breakpoints(&self) -> Vec<Breakpoint> {
        self.registry.list()
    }

    pub fn find_breakpoint(&self, id: BreakpointId) -> Option<Breakpoint> {
        self.registry.find(id)
    }

    /// Enable a breakpoint. A breakpoint whose condition does not parse
    /// stays disabled and the advisory says why.
    pub fn enable_breakpoint(&self, id: BreakpointId) -> Result<BreakpointOutcome> {
        loop {
            let current = self.registry.find(id).ok_or(Error::NoSuchId(id.0))?;
            if let Some(expr) = current.condition.as_deref() {
                if !self.guards.is_syntactically_valid(expr) {
                    return Ok(BreakpointOutcome {
                        advisory: Some(Advisory::InvalidConditionSyntax {
                            id,
                            expr: expr.to_string(),
                        }),
                        breakpoint: current,
                    });
                }
            }

            // Only enable if the condition checked above is still the stored one
            let mut enabled = false;
            let breakpoint = self
                .registry
                .modify(id, |bp| {
                    if bp.condition == current.condition {
                        bp.enabled = true;
                        enabled = true;
                    }
                })
                .ok_or(Error::NoSuchId(id.0))?;
            if enabled {
                info!(id = %id, "Breakpoint enabled");
                return Ok(BreakpointOutcome {
                    breakpoint,
                    advisory: None,
                });
            }
            debug!(id = %id, "Condition changed while enabling, checking again");
        }
    }

    pub fn disable_breakpoint(&self, id: BreakpointId) -> Result<Breakpoint> {
        let breakpoint = self
            .registry
            .set_enabled(id, false)
            .ok_or(Error::NoSuchId(id.0))?;
        info!(id = %id, "Breakpoint disabled");
        Ok(breakpoint)
    }

    /// Replace the guard expression; `None` makes the breakpoint
    /// unconditional. An expression that does not parse is stored and the
    /// breakpoint disabled.
    pub fn set_condition(&self, id: BreakpointId, condition: Option<&str>) -> Result<BreakpointOutcome> {
        let condition = condition.map(str::trim).filter(|c| !c.is_empty());
        let rejected = condition.is_some_and(|expr| !self.guards.is_syntactically_valid(expr));

        let breakpoint = self
            .registry
            .modify(id, |bp| {
                bp.condition = condition.map(str::to_string);
                if rejected {
                    bp.enabled = false;
                }
            })
            .ok_or(Error::NoSuchId(id.0))?;

        let advisory = match (&breakpoint.condition, rejected) {
            (Some(expr), true) => Some(Advisory::InvalidConditionSyntax {
                id,
                expr: expr.clone(),
            }),
            _ => None,
        };
        Ok(BreakpointOutcome {
            breakpoint,
            advisory,
        })
    }

    /// Direct registry access for the tracing engine
    pub fn registry(&self) -> &BreakpointRegistry {
        &self.registry
    }
}
