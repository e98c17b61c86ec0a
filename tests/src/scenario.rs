//! Scenario definitions.

use bpel_parser::ParseOptions;

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::{ScenarioError, ScenarioResult};
use crate::loader::load_fixture;
use crate::runner::Runner;

/// Where a scenario's document comes from.
#[derive(Debug, Clone)]
pub enum Document {
    /// Path relative to the fixtures directory.
    Fixture(String),
    Inline(String),
}

/// One document, the options to parse it with, and what must come out.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    document: Option<Document>,
    options: ParseOptions,
    assertion: Assertion,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: None,
            options: ParseOptions::default(),
            assertion: Assertion::new(),
        }
    }

    pub fn fixture(mut self, path: impl Into<String>) -> Self {
        self.document = Some(Document::Fixture(path.into()));
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.document = Some(Document::Inline(source.into()));
        self
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fail_fast(mut self) -> Self {
        self.options = self.options.fail_fast();
        self
    }

    pub fn understand(mut self, namespace: impl Into<String>) -> Self {
        self.options = self.options.understand(namespace);
        self
    }

    pub fn expect<F>(mut self, f: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.assertion = f(AssertionBuilder::new()).build();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn assertion(&self) -> &Assertion {
        &self.assertion
    }

    /// The document text.
    pub fn load_document(&self) -> ScenarioResult<String> {
        match &self.document {
            Some(Document::Fixture(path)) => load_fixture(path),
            Some(Document::Inline(source)) => Ok(source.clone()),
            None => Err(ScenarioError::NoDocument {
                scenario: self.name.clone(),
            }),
        }
    }

    /// Parse and verify.
    pub fn run(&self) -> ScenarioResult<()> {
        Runner::new(self)?.run()
    }
}
