//! Errors raised while loading or checking a scenario.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read fixture '{path}': {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scenario '{scenario}' has no document")]
    NoDocument { scenario: String },

    #[error("grammar construction failed: {0}")]
    Grammar(String),

    #[error("[{scenario}] expectation failed: {message}")]
    ExpectationFailed { scenario: String, message: String },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

impl ScenarioError {
    pub fn fixture_read(path: &Path, source: std::io::Error) -> Self {
        Self::FixtureRead {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn expectation_failed(scenario: &str, message: impl Into<String>) -> Self {
        Self::ExpectationFailed {
            scenario: scenario.to_string(),
            message: message.into(),
        }
    }
}
