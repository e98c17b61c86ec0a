//! Namespace contexts and scope management.

use crate::{split_prefixed, QName, QNameError, XML_NS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The prefix bindings in scope at one element. The empty prefix holds the
/// default namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceContext {
    bindings: BTreeMap<String, String>,
}

impl NamespaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`, replacing any earlier binding.
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    /// Look up the namespace bound to `prefix`. The `xml` prefix is always bound.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NS);
        }
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.bindings.get("").map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve an attribute value of the form `prefix:local`.
    ///
    /// An unprefixed value takes the default namespace, following the
    /// XML Schema rules for `xs:QName` content.
    pub fn resolve_prefixed(&self, value: &str) -> Result<QName, QNameError> {
        let (prefix, local) = split_prefixed(value)?;
        match prefix {
            Some(prefix) => match self.lookup(prefix) {
                Some(uri) => Ok(QName::new(uri, local)),
                None => Err(QNameError::UnresolvedPrefix {
                    prefix: prefix.to_string(),
                    value: value.to_string(),
                }),
            },
            None => Ok(QName::new(self.default_namespace().unwrap_or(""), local)),
        }
    }
}

/// Stack of namespace declaration frames, one per open element.
#[derive(Debug)]
pub struct NamespaceStack {
    /// Each frame holds the declarations made on one element.
    frames: Vec<Vec<(String, String)>>,
}

impl NamespaceStack {
    /// Create a stack with an empty root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Vec::new()],
        }
    }

    /// Push a frame for a newly opened element.
    pub fn push(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Pop the frame of the element being closed. The root frame stays.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Declare a binding in the current frame. An empty `uri` on a prefixed
    /// declaration is kept as-is; lookups treat it as unbinding.
    pub fn declare(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push((prefix.into(), uri.into()));
        }
    }

    /// Look up a prefix, searching from the innermost frame outwards.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NS);
        }
        for frame in self.frames.iter().rev() {
            if let Some((_, uri)) = frame.iter().rev().find(|(p, _)| p == prefix) {
                return if uri.is_empty() { None } else { Some(uri) };
            }
        }
        None
    }

    /// Get the current depth (number of pushed frames).
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Flatten the visible bindings into a context snapshot.
    pub fn snapshot(&self) -> NamespaceContext {
        let mut ctx = NamespaceContext::new();
        for frame in &self.frames {
            for (prefix, uri) in frame {
                if uri.is_empty() {
                    ctx.bindings.remove(prefix);
                } else {
                    ctx.bind(prefix.clone(), uri.clone());
                }
            }
        }
        ctx
    }
}

impl Default for NamespaceStack {
    fn default() -> Self {
        Self::new()
    }
}
