//! snare command loop
//!
//! Reads breakpoint commands from stdin and applies them to a debug session.
//!
//! Line tables and symbols come from one of:
//! - a program manifest (`--manifest`), for replaying a known program
//! - the source files on disk, when no manifest is given

mod manifest;
mod repl;

use clap::Parser;
use manifest::ProgramManifest;
use repl::{parse_frame, Flow, PromptConfirm, Repl};
use snare_common::{get_log_file_path, init_logging, CallerContext, LogConfig, SessionConfig};
use snare_core::{DebugSession, GuardValidator, LineTableOracle, SourceLineCache, SymbolTable};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "snare")]
#[command(about = "Breakpoint manager - resolve and track debugger breakpoints")]
#[command(version)]
struct Args {
    /// Session configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Program manifest with line tables and symbols (TOML)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Initial stop as file:line (no active frame when omitted)
    #[arg(short, long)]
    frame: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,

    /// Print `info` listings as JSON
    #[arg(long)]
    json: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match SessionConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("snare: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SessionConfig::default(),
    };
    if args.yes {
        config.confirm_unloadable = snare_common::ConfirmPolicy::Always;
    }

    let mut log_config = if args.verbose {
        LogConfig::debug()
    } else {
        config.logging.clone()
    };
    if let Some(path) = &args.log_file {
        log_config = log_config.with_file(&path.to_string_lossy());
    }
    init_logging(&log_config);
    if let Some(path) = get_log_file_path() {
        info!(path = %path.display(), "Logging to file");
    }

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "snare exited with an error");
            eprintln!("snare: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &SessionConfig) -> snare_common::Result<()> {
    let (lines, guards) = match &args.manifest {
        Some(path) => {
            let manifest = ProgramManifest::from_file(path)?;
            info!(
                files = manifest.files.len(),
                symbols = manifest.symbols.len(),
                "Loaded program manifest"
            );
            let lines: Arc<dyn LineTableOracle> = Arc::new(manifest.line_table());
            let guards: Arc<dyn GuardValidator> = Arc::new(manifest.symbol_table());
            (lines, guards)
        }
        None => {
            let lines: Arc<dyn LineTableOracle> = Arc::new(SourceLineCache::new(config));
            let guards: Arc<dyn GuardValidator> = Arc::new(SymbolTable::new());
            (lines, guards)
        }
    };

    let context = match args.frame.as_deref() {
        Some(frame) => parse_frame(frame).ok_or_else(|| {
            snare_common::Error::Config(format!("--frame expects file:line; got: {}", frame))
        })?,
        None => CallerContext::detached(),
    };

    let mut repl = Repl::new(DebugSession::new(lines, guards), context, args.json);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        if interactive {
            write!(stdout, "(snare) ")?;
            stdout.flush()?;
        }
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let mut confirm = PromptConfirm::new(config.confirm_unloadable, &mut input, io::stdout());
        if repl.execute(&line, &mut stdout, &mut confirm)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
