//! Parse events.

use bpel_core::{Location, NamespaceContext, QName, SourceInfo};
use bpel_model::XmlAttribute;
use std::collections::BTreeMap;

/// An opened element with its attributes split by qualification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    pub name: QName,
    /// Unqualified attributes by local name.
    pub attributes: BTreeMap<String, String>,
    /// Attributes in a namespace, `xml:*` included.
    pub extension_attributes: Vec<XmlAttribute>,
    /// Bindings in scope at this element.
    pub namespaces: NamespaceContext,
    pub line: usize,
}

impl StartElement {
    pub fn new(name: QName, line: usize) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
            extension_attributes: Vec::new(),
            namespaces: NamespaceContext::new(),
            line,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_namespaces(mut self, namespaces: NamespaceContext) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.name.local.clone())
    }

    pub fn source_info(&self) -> SourceInfo {
        SourceInfo::new(self.line, self.namespaces.clone())
    }
}

/// A document-ordered parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    Start(StartElement),
    /// Character data, adjacent text and CDATA merged. `line` is where the
    /// first non-whitespace character sits.
    Text { content: String, line: usize },
    End,
}
