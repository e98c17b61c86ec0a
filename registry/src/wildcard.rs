//! Namespace wildcards for extensibility and capture edges.

use std::fmt;

/// Which element namespaces a wildcard edge accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamespaceMatch {
    /// Elements in exactly this namespace.
    Exactly(String),
    /// Elements in any namespace except this one. Unqualified elements do
    /// not match.
    OtherThan(String),
    /// Every element, qualified or not.
    Any,
}

impl NamespaceMatch {
    pub fn exactly(ns: impl Into<String>) -> Self {
        NamespaceMatch::Exactly(ns.into())
    }

    pub fn other_than(ns: impl Into<String>) -> Self {
        NamespaceMatch::OtherThan(ns.into())
    }

    pub fn matches(&self, namespace: &str) -> bool {
        match self {
            NamespaceMatch::Exactly(ns) => ns == namespace,
            NamespaceMatch::OtherThan(ns) => !namespace.is_empty() && ns != namespace,
            NamespaceMatch::Any => true,
        }
    }
}

impl fmt::Display for NamespaceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceMatch::Exactly(ns) => write!(f, "{{{}}}*", ns),
            NamespaceMatch::OtherThan(ns) => write!(f, "{{not {}}}*", ns),
            NamespaceMatch::Any => f.write_str("*"),
        }
    }
}
