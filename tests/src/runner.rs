//! Scenario runner.

use bpel_parser::{Grammar, ParseFailure, Parsed};

use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::Scenario;

/// Parses a scenario's document and checks its assertion.
pub struct Runner<'s> {
    scenario: &'s Scenario,
    grammar: Grammar,
    source: String,
}

impl<'s> Runner<'s> {
    pub fn new(scenario: &'s Scenario) -> ScenarioResult<Self> {
        let source = scenario.load_document()?;
        let grammar = Grammar::new().map_err(|e| ScenarioError::Grammar(e.to_string()))?;
        Ok(Self {
            scenario,
            grammar,
            source,
        })
    }

    /// The raw parse outcome, for tests that inspect the model directly.
    pub fn parse(&self) -> Result<Parsed, ParseFailure> {
        self.grammar.parse(&self.source, self.scenario.parse_options())
    }

    pub fn run(&self) -> ScenarioResult<()> {
        let outcome = self.parse();
        self.scenario
            .assertion()
            .verify(self.scenario.name(), &outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::scenario::Scenario;

    const MINIMAL: &str = r#"<process name="p" targetNamespace="urn:t"
    xmlns="http://docs.oasis-open.org/wsbpel/2.0/process/executable">
  <empty name="only"/>
</process>"#;

    #[test]
    fn test_runner_with_inline_source() {
        let scenario = Scenario::new("inline")
            .source(MINIMAL)
            .expect(|e| e.clean().activity("only", "empty").activity_count(1));

        scenario.run().unwrap();
    }

    #[test]
    fn test_scenario_without_document() {
        let err = Scenario::new("empty").run().unwrap_err();

        assert!(err.to_string().contains("has no document"));
    }
}
