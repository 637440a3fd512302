//! Position parser
//!
//! Splits `break` arguments into a location and an optional `if <expr>`
//! guard:
//!
//! ```text
//! 10                     bare line in the current file
//! lib/a.rb:10            file and line
//! lib/a.rb:              file, current line
//! Foo::Bar#run           class and method ('.' works too)
//! a.rb:12 if x > 1       any of the above with a guard
//! if x > 1               current file and line with a guard
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use snare_common::{BreakpointRequest, BreakpointTarget, Error, Result};

/// A location token. `scope` is lazy, so the split happens at the last
/// separator.
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<line>\d+)|(?P<scope>.+?)(?P<sep>[:.#])(?P<member>[^.:#\s]*))$")
        .expect("location pattern is valid")
});

static GUARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^if\s+(?P<expr>\S.*)$").expect("guard pattern is valid"));

/// Parse the argument text of a `break` command
pub fn parse(raw: &str) -> Result<BreakpointRequest> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(BreakpointRequest::new(BreakpointTarget::current()));
    }

    let (first, rest) = match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim_start()),
        None => (text, ""),
    };

    let (target, condition) = match parse_location(first) {
        Some(target) => (target, parse_guard(rest, true)?),
        None => (BreakpointTarget::current(), parse_guard(text, false)?),
    };

    Ok(BreakpointRequest { target, condition })
}

fn parse_location(token: &str) -> Option<BreakpointTarget> {
    let caps = LOCATION_RE.captures(token)?;

    if let Some(line) = caps.name("line") {
        // Reject lines that do not fit rather than wrapping them
        line.as_str().parse::<usize>().ok()?;
        return Some(BreakpointTarget::FileLine {
            file: None,
            line: Some(line.as_str().to_string()),
        });
    }

    let scope = caps.name("scope")?.as_str();
    let sep = caps.name("sep")?.as_str();
    let member = caps.name("member").map_or("", |m| m.as_str());

    // `Foo::Bar` alone: the last `:` belongs to a namespace, not a separator
    if scope.ends_with(':') {
        return None;
    }

    if sep == ":" || member.bytes().all(|b| b.is_ascii_digit()) {
        if member.is_empty() && sep != ":" {
            return None;
        }
        return Some(BreakpointTarget::FileLine {
            file: Some(scope.to_string()),
            line: (!member.is_empty()).then(|| member.to_string()),
        });
    }

    Some(BreakpointTarget::ClassMethod {
        class_name: scope.to_string(),
        method: member.to_string(),
    })
}

fn parse_guard(text: &str, after_location: bool) -> Result<Option<String>> {
    if text.is_empty() {
        return Ok(None);
    }
    match GUARD_RE.captures(text) {
        Some(caps) => Ok(Some(caps["expr"].trim_end().to_string())),
        None => Err(Error::MalformedCondition {
            text: text.to_string(),
            after_location,
        }),
    }
}
