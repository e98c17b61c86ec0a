//! Diagnostics produced while reading a process definition.
//!
//! Diagnostics are structured values: a severity, a key from a closed
//! taxonomy, a location and positional arguments. Presentation and
//! localization belong to whoever consumes them through a [`DiagnosticSink`].

use crate::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level. WARNING and ERROR accumulate; FATAL aborts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        })
    }
}

/// Diagnostic keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKey {
    // =========================================================================
    // Names
    // =========================================================================
    MalformedQualifiedName,
    NamespacePrefixUnresolved,

    // =========================================================================
    // Attributes
    // =========================================================================
    InvalidAttributeCombination,
    MissingRequiredAttribute,
    InvalidAttributeValue,

    // =========================================================================
    // Structure
    // =========================================================================
    MissingRequiredChild,
    DuplicateChild,
    UnexpectedElement,
    UnexpectedContent,
    UnsupportedConstruct,
    MalformedInput,

    // =========================================================================
    // Input
    // =========================================================================
    XmlSyntax,
}

impl DiagnosticKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKey::MalformedQualifiedName => "malformed_qualified_name",
            DiagnosticKey::NamespacePrefixUnresolved => "namespace_prefix_unresolved",
            DiagnosticKey::InvalidAttributeCombination => "invalid_attribute_combination",
            DiagnosticKey::MissingRequiredAttribute => "missing_required_attribute",
            DiagnosticKey::InvalidAttributeValue => "invalid_attribute_value",
            DiagnosticKey::MissingRequiredChild => "missing_required_child",
            DiagnosticKey::DuplicateChild => "duplicate_child",
            DiagnosticKey::UnexpectedElement => "unexpected_element",
            DiagnosticKey::UnexpectedContent => "unexpected_content",
            DiagnosticKey::UnsupportedConstruct => "unsupported_construct",
            DiagnosticKey::MalformedInput => "malformed_input",
            DiagnosticKey::XmlSyntax => "xml_syntax",
        }
    }
}

impl fmt::Display for DiagnosticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub key: DiagnosticKey,
    pub location: Location,
    /// Positional arguments for the message catalog.
    pub args: Vec<String>,
    /// Free-text fallback for problems the taxonomy does not classify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, key: DiagnosticKey, location: Location) -> Self {
        Self {
            severity,
            key,
            location,
            args: Vec::new(),
            message: None,
        }
    }

    pub fn warning(key: DiagnosticKey, location: Location) -> Self {
        Self::new(Severity::Warning, key, location)
    }

    pub fn error(key: DiagnosticKey, location: Location) -> Self {
        Self::new(Severity::Error, key, location)
    }

    pub fn fatal(key: DiagnosticKey, location: Location) -> Self {
        Self::new(Severity::Fatal, key, location)
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    /// ERROR or worse.
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.location, self.severity, self.key)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.join(", "))?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Receives diagnostics as they are raised.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collecting sink, kept in report order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    pub fn with_key(&self, key: DiagnosticKey) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.key == key)
    }

    /// Hand every collected diagnostic to another sink, in order.
    pub fn forward_to(&self, sink: &mut dyn DiagnosticSink) {
        for d in &self.items {
            sink.report(d.clone());
        }
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
