//! BPEL Check
//!
//! File-level checking on top of `bpel-parser`: parse one document, keep the
//! model if one came out, and render the collected diagnostics.

use anyhow::{Context, Result};
use bpel_core::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
use bpel_model::Process;
use bpel_parser::{Grammar, ParseOptions};
use serde::Serialize;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG: &str = "warn";

/// Log filter for the CLI: `-v` forces debug, otherwise `rust_log` (the
/// value of `RUST_LOG`) applies as given, falling back to warnings only.
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

/// Outcome of checking a single document.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub process: Option<Process>,
    pub diagnostics: Diagnostics,
}

impl FileReport {
    /// No model was produced, or at least one ERROR was reported.
    pub fn failed(&self) -> bool {
        self.process.is_none() || self.diagnostics.has_errors()
    }

    /// One rendered line per diagnostic, in report order.
    pub fn lines(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| format_diagnostic(&self.file, d))
            .collect()
    }
}

/// `file:line: severity [key] <element> args`
pub fn format_diagnostic(file: &str, diagnostic: &Diagnostic) -> String {
    let mut line = format!(
        "{}:{}: {} [{}]",
        file, diagnostic.location.line, diagnostic.severity, diagnostic.key
    );
    if !diagnostic.location.element.is_empty() {
        line.push_str(&format!(" <{}>", diagnostic.location.element));
    }
    if !diagnostic.args.is_empty() {
        line.push(' ');
        line.push_str(&diagnostic.args.join(", "));
    }
    if let Some(message) = &diagnostic.message {
        line.push_str(": ");
        line.push_str(message);
    }
    line
}

/// Check a document already held in memory.
pub fn check_source(
    grammar: &Grammar,
    file: &str,
    source: &str,
    options: &ParseOptions,
) -> FileReport {
    match grammar.parse(source, options) {
        Ok(parsed) => FileReport {
            file: file.to_string(),
            process: Some(parsed.process),
            diagnostics: parsed.diagnostics,
        },
        Err(failure) => FileReport {
            file: file.to_string(),
            process: None,
            diagnostics: failure.diagnostics,
        },
    }
}

/// Severity counts across every checked file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub files: usize,
    pub failed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub fatal: usize,
}

impl Tally {
    pub fn add(&mut self, report: &FileReport) {
        self.files += 1;
        if report.failed() {
            self.failed += 1;
        }
        report.diagnostics.forward_to(self);
    }

    /// One-line summary, e.g. `2 file(s), 1 failed: 3 error(s), 1 warning(s), 0 fatal`.
    pub fn summary(&self) -> String {
        format!(
            "{} file(s), {} failed: {} error(s), {} warning(s), {} fatal",
            self.files, self.failed, self.errors, self.warnings, self.fatal
        )
    }
}

impl DiagnosticSink for Tally {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
            Severity::Fatal => self.fatal += 1,
        }
    }
}

/// Read and check a document from disk; the path becomes the base URI.
pub fn check_file(grammar: &Grammar, path: &Path, options: &ParseOptions) -> Result<FileReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file = path.display().to_string();
    debug!(file = %file, bytes = source.len(), "checking");
    let options = options.clone().with_base_uri(file.clone());
    Ok(check_source(grammar, &file, &source, &options))
}
