//! Breakpoint lifecycle tests
//!
//! Drives `DebugSession` the way the command loop does: raw `break` text in,
//! breakpoints or errors out.

use snare_common::{Advisory, BreakpointId, CallerContext, Error, Location};
use snare_core::{AutoConfirm, DebugSession, SourceLineCache, StaticLineTable, SymbolTable};
use std::io::Write;
use std::sync::Arc;

fn session() -> DebugSession {
    let lines = StaticLineTable::new()
        .with_file("a.rb", 50, [1, 2, 10, 12, 30])
        .with_file("lib/util.rb", 8, [2, 5]);
    let symbols = SymbolTable::new()
        .with_class("Worker")
        .with_module("Util");
    DebugSession::new(Arc::new(lines), Arc::new(symbols))
}

fn in_a() -> CallerContext {
    CallerContext::active("a.rb", 2)
}

#[test]
fn test_bare_line_in_current_file() {
    let session = session();
    let created = session.create_breakpoint("10", &in_a()).unwrap();
    let bp = created.breakpoint;
    assert_eq!(bp.location, Location::line("a.rb", 10));
    assert_eq!(bp.condition, None);
    assert!(bp.enabled);
    assert!(created.advisory.is_none());
}

#[test]
fn test_line_out_of_range_creates_nothing() {
    let session = session();
    let err = session.create_breakpoint("a.rb:999", &in_a()).unwrap_err();
    assert!(matches!(
        err,
        Error::LineOutOfRange { total_lines: 50, ref file } if file == "a.rb"
    ));
    assert!(session.list_breakpoints().is_empty());
}

#[test]
fn test_empty_condition_is_malformed() {
    let session = session();
    session.create_breakpoint("12", &in_a()).unwrap();
    let before = session.list_breakpoints();

    let err = session.create_breakpoint("a.rb:12 if", &in_a()).unwrap_err();
    assert!(matches!(err, Error::MalformedCondition { .. }));
    assert_eq!(session.list_breakpoints(), before);
}

#[test]
fn test_invalid_condition_is_registered_disabled() {
    let session = session();
    let created = session
        .create_breakpoint("a.rb:12 if x > bad syntax(", &in_a())
        .unwrap();
    assert!(!created.breakpoint.enabled);
    assert!(matches!(
        created.advisory,
        Some(Advisory::InvalidConditionSyntax { .. })
    ));

    let stored = session.list_breakpoints();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, created.breakpoint.id);
    assert_eq!(stored[0].condition.as_deref(), Some("x > bad syntax("));
}

#[test]
fn test_ids_never_reset_after_clear() {
    let session = session();
    let mut issued = Vec::new();
    for raw in ["1", "2", "10"] {
        issued.push(session.create_breakpoint(raw, &in_a()).unwrap().breakpoint.id);
    }
    assert!(session.delete_breakpoint(issued[1]));

    session.clear_all();
    assert!(session.list_breakpoints().is_empty());

    let next = session.create_breakpoint("30", &in_a()).unwrap().breakpoint.id;
    assert!(issued.iter().all(|id| next > *id));
    assert_eq!(next, BreakpointId(4));
}

#[test]
fn test_ids_strictly_increase_with_deletions() {
    let session = session();
    let mut last = BreakpointId(0);
    for raw in ["1", "2", "10", "12", "30", "Worker#run"] {
        let id = session.create_breakpoint(raw, &in_a()).unwrap().breakpoint.id;
        assert!(id > last);
        session.delete_breakpoint(id);
        last = id;
    }
}

#[test]
fn test_delete_missing_id_is_noop() {
    let session = session();
    session.create_breakpoint("10", &in_a()).unwrap();
    let before = session.list_breakpoints();
    assert!(!session.delete_breakpoint(BreakpointId(77)));
    assert_eq!(session.list_breakpoints(), before);
}

#[test]
fn test_unknown_class() {
    let session = session();
    let err = session.create_breakpoint("MyClass#run", &in_a()).unwrap_err();
    assert!(matches!(err, Error::UnknownClass(ref name) if name == "MyClass"));
    assert!(session.list_breakpoints().is_empty());
}

#[test]
fn test_method_breakpoint_needs_no_frame() {
    let session = session();
    let created = session
        .create_breakpoint("Util.helper if n > 2", &CallerContext::detached())
        .unwrap();
    assert_eq!(created.breakpoint.location, Location::method("Util", "helper"));
    assert_eq!(created.breakpoint.condition.as_deref(), Some("n > 2"));
    assert!(created.breakpoint.enabled);
}

#[test]
fn test_file_relative_to_other_frame() {
    let session = session();
    let created = session.create_breakpoint("lib/util.rb:5", &in_a()).unwrap();
    assert_eq!(created.breakpoint.location, Location::line("lib/util.rb", 5));

    let err = session.create_breakpoint("lib/util.rb:3", &in_a()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Line 3 is not a stopping point in file lib/util.rb"
    );
}

#[test]
fn test_unloadable_file_respects_confirmation() {
    let session = session();
    let err = session
        .create_breakpoint_with("gone.rb:4", &in_a(), &mut AutoConfirm(false))
        .unwrap_err();
    assert!(err.is_recoverable());
    assert!(session.list_breakpoints().is_empty());

    let created = session
        .create_breakpoint_with("gone.rb:4", &in_a(), &mut AutoConfirm(true))
        .unwrap();
    assert!(!created.breakpoint.validated);
    assert_eq!(session.list_breakpoints().len(), 1);
}

#[test]
fn test_source_cache_backed_session() {
    let mut file = tempfile::Builder::new().suffix(".rb").tempfile().unwrap();
    writeln!(file, "# worker").unwrap();
    writeln!(file, "def work").unwrap();
    writeln!(file, "  step").unwrap();
    writeln!(file, "end").unwrap();
    file.flush().unwrap();

    let session = DebugSession::new(
        Arc::new(SourceLineCache::with_options(true, "#")),
        Arc::new(SymbolTable::new()),
    );
    let path = file.path().to_string_lossy().into_owned();
    let ctx = CallerContext::active(path.clone(), 2);

    let created = session.create_breakpoint(&format!("{}:3", path), &ctx).unwrap();
    let canonical = std::fs::canonicalize(file.path()).unwrap();
    assert_eq!(
        created.breakpoint.location,
        Location::line(canonical.to_string_lossy(), 3)
    );

    let err = session.create_breakpoint("4", &ctx).unwrap_err();
    assert!(matches!(err, Error::NotAStopPoint { line: 4, .. }));

    let err = session.create_breakpoint("9", &ctx).unwrap_err();
    assert!(matches!(err, Error::LineOutOfRange { total_lines: 4, .. }));
}

#[test]
fn test_concurrent_creation_and_deletion() {
    let session = Arc::new(session());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            std::thread::spawn(move || {
                let ctx = CallerContext::active("a.rb", 2);
                let mut ids = Vec::new();
                for _ in 0..25 {
                    let id = session.create_breakpoint("10", &ctx).unwrap().breakpoint.id;
                    ids.push(id);
                    session.delete_breakpoint(id);
                }
                ids
            })
        })
        .collect();

    let mut all: Vec<BreakpointId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);
    assert!(session.list_breakpoints().is_empty());
}
