//! `bpelc`: parse BPEL process definitions and report diagnostics.

use anyhow::Result;
use bpel_check::{check_file, log_filter, FileReport, Tally};
use bpel_parser::{Grammar, ParseOptions};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bpelc")]
#[command(version)]
#[command(about = "Check BPEL4WS 1.1 and WS-BPEL 2.0 process definitions")]
struct Cli {
    /// Stop each file at its first ERROR.
    #[arg(long)]
    fail_fast: bool,

    /// Print each report, model included, as JSON.
    #[arg(long)]
    json: bool,

    /// Extension namespace this tool understands; repeatable.
    #[arg(long, value_name = "NS")]
    understand: Vec<String>,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("bpelc: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file passed.
fn run(cli: &Cli) -> Result<bool> {
    let grammar = Grammar::new()?;
    let options = options(cli);

    let mut passed = true;
    let mut tally = Tally::default();
    for path in &cli.files {
        let report = match check_file(&grammar, path, &options) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("bpelc: {:#}", e);
                passed = false;
                continue;
            }
        };
        emit(cli, &report)?;
        tally.add(&report);
        passed &= !report.failed();
    }
    if cli.files.len() > 1 {
        eprintln!("bpelc: {}", tally.summary());
    }
    Ok(passed)
}

fn options(cli: &Cli) -> ParseOptions {
    let mut options = ParseOptions::new();
    if cli.fail_fast {
        options = options.fail_fast();
    }
    for namespace in &cli.understand {
        options = options.understand(namespace.clone());
    }
    options
}

fn emit(cli: &Cli, report: &FileReport) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for line in report.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
