//! Command loop
//!
//! Recognizes the breakpoint commands and routes their arguments to the
//! session. Errors are printed as `*** message` and never end the loop.

use snare_common::{Breakpoint, BreakpointId, CallerContext, ConfirmPolicy, Error, Result};
use snare_core::{Confirm, DebugSession};
use std::io::{BufRead, Write};
use tracing::debug;

const BREAK_HELP: &str = "\
b[reak] file:line [if expr]
b[reak] class(.|#)method [if expr]

Set breakpoint to some position, (optionally) if expr == true
";

const DELETE_HELP: &str = "\
del[ete][ nnn...]

Without argument, deletes all breakpoints. With integer numbers,
deletes specific breakpoints.
";

const HELP: &str = "\
Commands:
  b[reak] [location] [if expr]   set a breakpoint
  del[ete] [n...]                delete breakpoints (all when no ids)
  info [breakpoints]             list breakpoints
  enable n...                    enable breakpoints
  disable n...                   disable breakpoints
  condition n [expr]             set or remove a breakpoint condition
  frame file:line | frame none   move the current stop
  help                           this text
  q[uit]                         leave
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Answers confirmations from the configured policy, prompting on `Ask`
pub struct PromptConfirm<'a, R: BufRead, W: Write> {
    policy: ConfirmPolicy,
    input: &'a mut R,
    output: W,
}

impl<'a, R: BufRead, W: Write> PromptConfirm<'a, R, W> {
    pub fn new(policy: ConfirmPolicy, input: &'a mut R, output: W) -> Self {
        Self {
            policy,
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<'_, R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        let _ = write!(self.output, "{}", prompt);
        match self.policy {
            // Echo the automatic answer so the transcript shows it
            ConfirmPolicy::Always => {
                let _ = writeln!(self.output, "y");
                true
            }
            ConfirmPolicy::Never => {
                let _ = writeln!(self.output, "n");
                false
            }
            ConfirmPolicy::Ask => {
                let _ = self.output.flush();
                let mut answer = String::new();
                if self.input.read_line(&mut answer).is_err() {
                    return false;
                }
                matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
            }
        }
    }
}

pub struct Repl {
    session: DebugSession,
    context: CallerContext,
    json: bool,
}

impl Repl {
    pub fn new(session: DebugSession, context: CallerContext, json: bool) -> Self {
        Self {
            session,
            context,
            json,
        }
    }

    pub fn session(&self) -> &DebugSession {
        &self.session
    }

    pub fn context(&self) -> &CallerContext {
        &self.context
    }

    /// Run one command line
    pub fn execute<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        confirm: &mut dyn Confirm,
    ) -> Result<Flow> {
        let line = line.trim();
        let (command, args) = match line.find(char::is_whitespace) {
            Some(idx) => (&line[..idx], line[idx..].trim()),
            None => (line, ""),
        };
        debug!(command, args, "Executing command");

        match command {
            "" => {}
            "break" if args.is_empty() => write!(out, "{}", BREAK_HELP)?,
            "b" | "break" => self.add_breakpoint(args, out, confirm)?,
            "del" | "delete" => self.delete(args, out, confirm)?,
            "i" | "info" => self.info(args, out)?,
            "enable" => self.toggle(args, true, out)?,
            "disable" => self.toggle(args, false, out)?,
            "condition" => self.condition(args, out)?,
            "frame" => self.frame(args, out)?,
            "h" | "help" => {
                if matches!(args, "delete" | "del") {
                    write!(out, "{}", DELETE_HELP)?;
                } else if matches!(args, "break" | "b") {
                    write!(out, "{}", BREAK_HELP)?;
                } else {
                    write!(out, "{}", HELP)?;
                }
            }
            "q" | "quit" | "exit" => return Ok(Flow::Quit),
            other => errmsg(out, format!("Unknown command: \"{}\". Try \"help\".", other))?,
        }
        Ok(Flow::Continue)
    }

    fn add_breakpoint<W: Write>(
        &mut self,
        args: &str,
        out: &mut W,
        confirm: &mut dyn Confirm,
    ) -> Result<()> {
        match self
            .session
            .create_breakpoint_with(args, &self.context, confirm)
        {
            Ok(created) => {
                writeln!(
                    out,
                    "Created breakpoint {} at {}",
                    created.breakpoint.id, created.breakpoint.location
                )?;
                if let Some(advisory) = created.advisory {
                    errmsg(out, advisory)?;
                }
            }
            // A declined confirmation has already been reported in the prompt
            Err(Error::FileNotLoadable(_)) => {}
            Err(e) => errmsg(out, e)?,
        }
        Ok(())
    }

    fn delete<W: Write>(&mut self, args: &str, out: &mut W, confirm: &mut dyn Confirm) -> Result<()> {
        if !self.context.has_active_frame {
            return errmsg(out, "We are not in a state we can delete breakpoints.");
        }
        if args.is_empty() {
            self.session.clear_all_confirmed(confirm);
            return Ok(());
        }
        for result in self.session.delete_breakpoints(args) {
            if let Err(e) = result {
                errmsg(out, e)?;
            }
        }
        Ok(())
    }

    fn info<W: Write>(&self, args: &str, out: &mut W) -> Result<()> {
        if !matches!(args, "" | "b" | "break" | "breakpoints") {
            return errmsg(out, format!("Undefined info command: \"{}\".", args));
        }
        let breakpoints = self.session.list_breakpoints();
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&breakpoints)?)?;
            return Ok(());
        }
        if breakpoints.is_empty() {
            writeln!(out, "No breakpoints.")?;
            return Ok(());
        }
        writeln!(out, "Num Enb What")?;
        for bp in &breakpoints {
            writeln!(out, "{}", format_row(bp))?;
        }
        Ok(())
    }

    fn toggle<W: Write>(&mut self, args: &str, enable: bool, out: &mut W) -> Result<()> {
        if args.is_empty() {
            return errmsg(out, "Expecting breakpoint numbers.");
        }
        for token in args.split_whitespace() {
            let id = match parse_id(token) {
                Ok(id) => id,
                Err(e) => return errmsg(out, e),
            };
            if enable {
                match self.session.enable_breakpoint(id) {
                    Ok(outcome) => {
                        if let Some(advisory) = outcome.advisory {
                            errmsg(out, advisory)?;
                        }
                    }
                    Err(e) => errmsg(out, e)?,
                }
            } else if let Err(e) = self.session.disable_breakpoint(id) {
                errmsg(out, e)?;
            }
        }
        Ok(())
    }

    fn condition<W: Write>(&mut self, args: &str, out: &mut W) -> Result<()> {
        let (id_text, expr) = match args.find(char::is_whitespace) {
            Some(idx) => (&args[..idx], Some(args[idx..].trim())),
            None => (args, None),
        };
        let id = match parse_id(id_text) {
            Ok(id) => id,
            Err(e) => return errmsg(out, e),
        };
        match self.session.set_condition(id, expr) {
            Ok(outcome) => {
                if let Some(advisory) = outcome.advisory {
                    errmsg(out, advisory)?;
                }
            }
            Err(e) => errmsg(out, e)?,
        }
        Ok(())
    }

    fn frame<W: Write>(&mut self, args: &str, out: &mut W) -> Result<()> {
        if args == "none" {
            self.context = CallerContext::detached();
            return Ok(());
        }
        match parse_frame(args) {
            Some(context) => {
                self.context = context;
                Ok(())
            }
            None => errmsg(out, format!("Expecting file:line; got: {}", args)),
        }
    }
}

/// Parse `file:line` into an active context
pub fn parse_frame(text: &str) -> Option<CallerContext> {
    let (file, line) = text.trim().rsplit_once(':')?;
    let line = line.parse::<usize>().ok()?;
    if file.is_empty() {
        return None;
    }
    Some(CallerContext::active(file, line))
}

fn parse_id(token: &str) -> Result<BreakpointId> {
    match token.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(BreakpointId(n)),
        _ => Err(Error::InvalidId(token.to_string())),
    }
}

fn format_row(bp: &Breakpoint) -> String {
    let mut row = format!(
        "{:<3} {:<3} at {}",
        bp.id,
        if bp.enabled { "y" } else { "n" },
        bp.location
    );
    if let Some(condition) = &bp.condition {
        row.push_str(&format!(" if {}", condition));
    }
    if !bp.validated {
        row.push_str(" (unverified)");
    }
    if bp.extension.hit_count > 0 {
        row.push_str(&format!("\n\tbreakpoint already hit {} time(s)", bp.extension.hit_count));
    }
    row
}

fn errmsg<W: Write>(out: &mut W, message: impl std::fmt::Display) -> Result<()> {
    writeln!(out, "*** {}", message)?;
    Ok(())
}
