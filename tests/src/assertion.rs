//! Assertion types and builders for checking a parse outcome.

use bpel_core::{Diagnostic, DiagnosticKey, Diagnostics, Severity};
use bpel_model::{Dialect, Process};
use bpel_parser::{ParseFailure, Parsed};

use crate::error::{ScenarioError, ScenarioResult};

/// What a scenario expects of its parse.
#[derive(Default)]
pub struct Assertion {
    // Outcome
    pub succeeds: Option<bool>,
    pub dialect: Option<Dialect>,

    // Diagnostics
    pub clean: bool,
    pub errors: Option<usize>,
    pub warnings: Option<usize>,
    pub keys: Vec<DiagnosticKey>,
    pub keys_at: Vec<(DiagnosticKey, usize)>,
    pub absent_keys: Vec<DiagnosticKey>,
    pub diagnostic_pattern: Option<String>,

    // Model
    pub activities: Vec<(String, String)>,
    pub activity_count: Option<usize>,

    // Custom check on the model
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&Process) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("succeeds", &self.succeeds)
            .field("dialect", &self.dialect)
            .field("clean", &self.clean)
            .field("errors", &self.errors)
            .field("warnings", &self.warnings)
            .field("keys", &self.keys)
            .field("activities", &self.activities)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

fn render(diagnostics: &Diagnostics) -> String {
    let lines: Vec<String> = diagnostics.iter().map(Diagnostic::to_string).collect();
    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("; ")
    }
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the assertion against a parse outcome.
    pub fn verify(
        &self,
        scenario: &str,
        outcome: &Result<Parsed, ParseFailure>,
    ) -> ScenarioResult<()> {
        let fail = |message: String| Err(ScenarioError::expectation_failed(scenario, message));

        let (process, diagnostics) = match outcome {
            Ok(parsed) => (Some(&parsed.process), &parsed.diagnostics),
            Err(failure) => (None, &failure.diagnostics),
        };

        match (self.succeeds, process) {
            (Some(true), None) => {
                return fail(format!("expected a model, parse failed: {}", render(diagnostics)))
            }
            (Some(false), Some(_)) => return fail("expected the parse to fail".to_string()),
            _ => {}
        }

        if self.clean && !diagnostics.is_empty() {
            return fail(format!("expected no diagnostics, got: {}", render(diagnostics)));
        }
        if let Some(expected) = self.errors {
            let actual = diagnostics.iter().filter(|d| d.is_error()).count();
            if actual != expected {
                return fail(format!(
                    "expected {} error(s), got {}: {}",
                    expected,
                    actual,
                    render(diagnostics)
                ));
            }
        }
        if let Some(expected) = self.warnings {
            let actual = diagnostics.count(Severity::Warning);
            if actual != expected {
                return fail(format!(
                    "expected {} warning(s), got {}: {}",
                    expected,
                    actual,
                    render(diagnostics)
                ));
            }
        }
        for key in &self.keys {
            if diagnostics.with_key(*key).next().is_none() {
                return fail(format!("expected a {} diagnostic, got: {}", key, render(diagnostics)));
            }
        }
        for (key, line) in &self.keys_at {
            if !diagnostics.with_key(*key).any(|d| d.location.line == *line) {
                return fail(format!(
                    "expected a {} diagnostic on line {}, got: {}",
                    key,
                    line,
                    render(diagnostics)
                ));
            }
        }
        for key in &self.absent_keys {
            if diagnostics.with_key(*key).next().is_some() {
                return fail(format!("unexpected {} diagnostic: {}", key, render(diagnostics)));
            }
        }
        if let Some(pattern) = &self.diagnostic_pattern {
            let re = regex_lite::Regex::new(pattern)
                .map_err(|e| ScenarioError::expectation_failed(scenario, format!("invalid regex pattern: {}", e)))?;
            if !diagnostics.iter().any(|d| re.is_match(&d.to_string())) {
                return fail(format!(
                    "no diagnostic matches '{}': {}",
                    pattern,
                    render(diagnostics)
                ));
            }
        }

        let needs_model = self.dialect.is_some()
            || !self.activities.is_empty()
            || self.activity_count.is_some()
            || self.custom.is_some();
        if !needs_model {
            return Ok(());
        }
        let Some(process) = process else {
            return fail(format!("no model to inspect: {}", render(diagnostics)));
        };

        if let Some(dialect) = self.dialect {
            if process.dialect != dialect {
                return fail(format!("expected dialect {}, got {}", dialect, process.dialect));
            }
        }
        for (name, kind) in &self.activities {
            match process.find_activity(name) {
                None => return fail(format!("no activity named '{}'", name)),
                Some(a) if a.kind_name() != kind => {
                    return fail(format!(
                        "activity '{}' is a {}, expected {}",
                        name,
                        a.kind_name(),
                        kind
                    ))
                }
                Some(_) => {}
            }
        }
        if let Some(expected) = self.activity_count {
            let actual = process.activity_count();
            if actual != expected {
                return fail(format!("expected {} activities, got {}", expected, actual));
            }
        }
        if let Some(check) = &self.custom {
            if !check(process) {
                return fail("custom check returned false".to_string());
            }
        }
        Ok(())
    }
}

/// Builder for [`Assertion`].
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self {
            assertion: Assertion::new(),
        }
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }

    /// A model was produced.
    pub fn ok(mut self) -> Self {
        self.assertion.succeeds = Some(true);
        self
    }

    /// The parse failed.
    pub fn fails(mut self) -> Self {
        self.assertion.succeeds = Some(false);
        self
    }

    /// A model was produced with no diagnostics at all.
    pub fn clean(mut self) -> Self {
        self.assertion.succeeds = Some(true);
        self.assertion.clean = true;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.assertion.dialect = Some(dialect);
        self
    }

    /// Exactly N diagnostics of ERROR severity or worse.
    pub fn errors(mut self, n: usize) -> Self {
        self.assertion.errors = Some(n);
        self
    }

    pub fn warnings(mut self, n: usize) -> Self {
        self.assertion.warnings = Some(n);
        self
    }

    /// At least one diagnostic with this key.
    pub fn diagnostic(mut self, key: DiagnosticKey) -> Self {
        self.assertion.keys.push(key);
        self
    }

    pub fn diagnostic_at(mut self, key: DiagnosticKey, line: usize) -> Self {
        self.assertion.keys_at.push((key, line));
        self
    }

    pub fn no_diagnostic(mut self, key: DiagnosticKey) -> Self {
        self.assertion.absent_keys.push(key);
        self
    }

    /// Some rendered diagnostic matches a regex.
    pub fn diagnostic_matches(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.diagnostic_pattern = Some(pattern.into());
        self
    }

    /// The activity named `name` exists and is of kind `kind` (`"invoke"`, ...).
    pub fn activity(mut self, name: &str, kind: &str) -> Self {
        self.assertion
            .activities
            .push((name.to_string(), kind.to_string()));
        self
    }

    pub fn activity_count(mut self, n: usize) -> Self {
        self.assertion.activity_count = Some(n);
        self
    }

    pub fn assert_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Process) -> bool + Send + Sync + 'static,
    {
        self.assertion.custom = Some(Box::new(f));
        self
    }
}

impl Default for AssertionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpel_core::Location;

    fn failure(diagnostics: Vec<Diagnostic>) -> Result<Parsed, ParseFailure> {
        let mut collected = Diagnostics::new();
        for d in diagnostics {
            bpel_core::DiagnosticSink::report(&mut collected, d);
        }
        Err(ParseFailure {
            diagnostics: collected,
        })
    }

    #[test]
    fn test_fails_accepts_failure() {
        let outcome = failure(vec![Diagnostic::fatal(
            DiagnosticKey::MalformedInput,
            Location::new(1, "process"),
        )]);

        let assertion = AssertionBuilder::new()
            .fails()
            .diagnostic(DiagnosticKey::MalformedInput)
            .diagnostic_at(DiagnosticKey::MalformedInput, 1)
            .build();

        assert!(assertion.verify("t", &outcome).is_ok());
    }

    #[test]
    fn test_ok_rejects_failure() {
        let outcome = failure(Vec::new());

        let err = AssertionBuilder::new().ok().build().verify("t", &outcome).unwrap_err();

        assert!(err.to_string().contains("expected a model"));
    }

    #[test]
    fn test_pattern_matches_rendered_diagnostic() {
        let outcome = failure(vec![Diagnostic::error(
            DiagnosticKey::UnexpectedElement,
            Location::new(4, "bogus"),
        )
        .with_arg("{urn:x}bogus")]);

        let assertion = AssertionBuilder::new()
            .diagnostic_matches(r"line 4 <bogus>: error \[unexpected_element\]")
            .build();

        assert!(assertion.verify("t", &outcome).is_ok());
    }
}
