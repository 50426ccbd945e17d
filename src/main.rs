//! Gridfill - a spreadsheet grid engine with pattern-continuing autofill.
//!
//! Drives a sheet from commands given with `-c`, a script file, or stdin.

mod app;
mod clipboard;
mod gateway;
mod logging;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gridfill_core::{Sheet, load_config};

use crate::app::App;
use crate::clipboard::{ClipboardProvider, FallbackClipboard, MemoryClipboard};

#[derive(Parser, Debug)]
#[command(name = "gridfill", version, about, after_long_help = app::COMMANDS)]
struct CliArgs {
    /// Command script to run (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns
    #[arg(long)]
    cols: Option<usize>,

    /// Run a command (can be repeated); skips the script and stdin
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,

    /// Keep copied text in-process instead of the system clipboard
    #[arg(long)]
    no_system_clipboard: bool,
}

fn main() -> ExitCode {
    logging::init();
    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let (mut config, warnings) = load_config(args.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }

    let gateway = gateway::from_config(&config.autofill)?;
    let sheet = Sheet::with_config(config)?;
    let clipboard: Box<dyn ClipboardProvider> = if args.no_system_clipboard {
        Box::new(MemoryClipboard::default())
    } else {
        Box::new(FallbackClipboard::default())
    };
    let mut app = App::new(sheet, clipboard, gateway);

    if !args.commands.is_empty() {
        for command in &args.commands {
            emit(app.run_line(command)?);
        }
    } else if let Some(path) = &args.script {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        for (n, line) in script.lines().enumerate() {
            let out = app
                .run_line(line)
                .with_context(|| format!("{}:{}", path.display(), n + 1))?;
            emit(out);
        }
    } else {
        for line in io::stdin().lock().lines() {
            emit(app.run_line(&line?)?);
        }
    }

    emit(app.finish()?);
    Ok(())
}

fn emit(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
