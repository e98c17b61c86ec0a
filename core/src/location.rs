//! Source locations.

use crate::NamespaceContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a diagnostic was raised: a 1-based line and the element's local name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub element: String,
}

impl Location {
    pub fn new(line: usize, element: impl Into<String>) -> Self {
        Self {
            line,
            element: element.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.element.is_empty() {
            write!(f, "line {}", self.line)
        } else {
            write!(f, "line {} <{}>", self.line, self.element)
        }
    }
}

/// Context captured at the source element of every model fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub line: usize,
    pub namespaces: NamespaceContext,
}

impl SourceInfo {
    pub fn new(line: usize, namespaces: NamespaceContext) -> Self {
        Self { line, namespaces }
    }
}
