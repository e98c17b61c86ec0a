//! Per-parse state shared by every parse node.

use crate::{NodeError, ParseOptions, StartElement};
use bpel_core::{
    Diagnostic, DiagnosticKey, DiagnosticSink, Diagnostics, Location, QName, QNameError, Severity,
};
use bpel_model::{Dialect, Expression};
use tracing::debug;

/// State for one parse: options, dialect, the current location and the
/// diagnostics collected so far. Created per document and dropped with it.
#[derive(Debug)]
pub struct ParseContext {
    dialect: Dialect,
    options: ParseOptions,
    diagnostics: Diagnostics,
    location: Location,
    /// Process-level `expressionLanguage`, the default for attribute expressions.
    expression_language: Option<String>,
    /// Process-level `queryLanguage`, the default for `query` attributes.
    query_language: Option<String>,
}

impl ParseContext {
    pub fn new(dialect: Dialect, options: ParseOptions) -> Self {
        Self {
            dialect,
            options,
            diagnostics: Diagnostics::new(),
            location: Location::default(),
            expression_language: None,
            query_language: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    /// Namespace of the dialect being parsed.
    pub fn namespace(&self) -> &'static str {
        self.dialect.namespace()
    }

    /// A name in the dialect's namespace.
    pub fn qname(&self, local: &str) -> QName {
        QName::new(self.namespace(), local)
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.options.base_uri.as_deref()
    }

    /// Record the languages the process element declares.
    pub(crate) fn set_process_languages(
        &mut self,
        expression_language: Option<String>,
        query_language: Option<String>,
    ) {
        self.expression_language = expression_language;
        self.query_language = query_language;
    }

    /// Location of the element whose node is currently being called.
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    // ==================== Reporting ====================

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(
            severity = %diagnostic.severity,
            key = %diagnostic.key,
            line = diagnostic.location.line,
            element = %diagnostic.location.element,
            "diagnostic"
        );
        self.diagnostics.report(diagnostic);
    }

    fn raise(&mut self, severity: Severity, key: DiagnosticKey, location: Location, args: &[&str]) {
        let d = Diagnostic::new(severity, key, location).with_args(args.iter().copied());
        self.report(d);
    }

    /// Report a WARNING at the current location.
    pub fn warning(&mut self, key: DiagnosticKey, args: &[&str]) {
        let location = self.location.clone();
        self.raise(Severity::Warning, key, location, args);
    }

    /// Report an ERROR at the current location.
    pub fn error(&mut self, key: DiagnosticKey, args: &[&str]) {
        let location = self.location.clone();
        self.raise(Severity::Error, key, location, args);
    }

    pub fn error_at(&mut self, el: &StartElement, key: DiagnosticKey, args: &[&str]) {
        self.raise(Severity::Error, key, el.location(), args);
    }

    /// Build a FATAL diagnostic for a node to return. The driver records it.
    pub fn fatal(&self, location: Location, key: DiagnosticKey, args: &[&str]) -> NodeError {
        NodeError::Fatal(Diagnostic::fatal(key, location).with_args(args.iter().copied()))
    }

    /// True once the error mode says the parse must stop.
    pub fn should_abort(&self) -> bool {
        self.options.error_mode == crate::ErrorMode::FailFast && self.diagnostics.has_errors()
    }

    // ==================== Attributes ====================

    pub fn attr(&self, el: &StartElement, name: &str) -> Option<String> {
        el.attr(name).map(str::to_string)
    }

    /// A required attribute. Missing values are reported and read as "".
    pub fn required_attr(&mut self, el: &StartElement, name: &str) -> String {
        match el.attr(name) {
            Some(value) => value.to_string(),
            None => {
                self.error_at(el, DiagnosticKey::MissingRequiredAttribute, &[name]);
                String::new()
            }
        }
    }

    /// Resolve a prefixed name in the scope of `el`.
    pub fn resolve_qname(&mut self, el: &StartElement, value: &str) -> Option<QName> {
        let resolver = self.options.resolver.clone();
        match resolver.resolve(value, el) {
            Ok(q) => Some(q),
            Err(QNameError::Malformed(v)) => {
                self.error_at(el, DiagnosticKey::MalformedQualifiedName, &[&v]);
                None
            }
            Err(QNameError::UnresolvedPrefix { prefix, value }) => {
                self.error_at(
                    el,
                    DiagnosticKey::NamespacePrefixUnresolved,
                    &[&prefix, &value],
                );
                None
            }
        }
    }

    pub fn qname_attr(&mut self, el: &StartElement, name: &str) -> Option<QName> {
        let value = el.attr(name)?.to_string();
        self.resolve_qname(el, &value)
    }

    pub fn required_qname_attr(&mut self, el: &StartElement, name: &str) -> Option<QName> {
        if !el.has_attr(name) {
            self.error_at(el, DiagnosticKey::MissingRequiredAttribute, &[name]);
            return None;
        }
        self.qname_attr(el, name)
    }

    /// A whitespace-separated list of prefixed names.
    pub fn qname_list_attr(&mut self, el: &StartElement, name: &str) -> Vec<QName> {
        let Some(value) = el.attr(name).map(str::to_string) else {
            return Vec::new();
        };
        value
            .split_whitespace()
            .filter_map(|item| self.resolve_qname(el, item))
            .collect()
    }

    /// A `yes`/`no` attribute. Other values are reported and read as unset.
    pub fn yes_no_attr(&mut self, el: &StartElement, name: &str) -> Option<bool> {
        match el.attr(name)? {
            "yes" => Some(true),
            "no" => Some(false),
            other => {
                let other = other.to_string();
                self.error_at(el, DiagnosticKey::InvalidAttributeValue, &[name, &other]);
                None
            }
        }
    }

    /// An expression held in an attribute, as BPEL4WS 1.1 writes them. The
    /// attribute cannot name a language, so the process default applies:
    /// `queryLanguage` for `query`, `expressionLanguage` otherwise.
    pub fn expression_attr(&mut self, el: &StartElement, name: &str) -> Option<Expression> {
        let language = if name == "query" {
            &self.query_language
        } else {
            &self.expression_language
        };
        el.attr(name)
            .map(|text| Expression::new(text, language.clone(), el.source_info()))
    }

    /// Like [`expression_attr`](Self::expression_attr) but reported when missing.
    pub fn required_expression_attr(
        &mut self,
        el: &StartElement,
        name: &str,
    ) -> Option<Expression> {
        let expr = self.expression_attr(el, name);
        if expr.is_none() {
            self.error_at(el, DiagnosticKey::MissingRequiredAttribute, &[name]);
        }
        expr
    }
}
