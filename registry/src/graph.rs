//! The TransitionGraph - immutable element dispatch table.

use crate::{NamespaceMatch, NodeKind};
use bpel_core::QName;
use std::collections::HashMap;
use std::fmt;

/// A resolved transition: the child kind and the factory that creates it.
#[derive(Debug)]
pub struct Transition<'g, F> {
    pub kind: NodeKind,
    pub factory: &'g F,
}

/// The TransitionGraph maps (parent kind, child element name) to the child
/// kind and its factory. It is immutable after construction and can be
/// shared freely between concurrent parses.
pub struct TransitionGraph<F> {
    /// Node factories by kind.
    factories: HashMap<NodeKind, F>,
    /// Exact edges by parent kind.
    edges: HashMap<NodeKind, HashMap<QName, NodeKind>>,
    /// Wildcard edges by parent kind, in registration order.
    wildcards: HashMap<NodeKind, Vec<(NamespaceMatch, NodeKind)>>,
    /// Document element names.
    roots: HashMap<QName, NodeKind>,
}

impl<F> TransitionGraph<F> {
    pub(crate) fn new(
        factories: HashMap<NodeKind, F>,
        edges: HashMap<NodeKind, HashMap<QName, NodeKind>>,
        wildcards: HashMap<NodeKind, Vec<(NamespaceMatch, NodeKind)>>,
        roots: HashMap<QName, NodeKind>,
    ) -> Self {
        Self {
            factories,
            edges,
            wildcards,
            roots,
        }
    }

    // ==================== Lookups ====================

    /// Find the transition for element `name` opened under a `parent` node.
    ///
    /// Exact edges are consulted first, then the parent's wildcard edges in
    /// registration order. There is no backtracking.
    pub fn transition(&self, parent: NodeKind, name: &QName) -> Option<Transition<'_, F>> {
        let kind = self
            .edges
            .get(&parent)
            .and_then(|children| children.get(name))
            .copied()
            .or_else(|| self.wildcard(parent, &name.namespace))?;
        self.resolve(kind)
    }

    fn wildcard(&self, parent: NodeKind, namespace: &str) -> Option<NodeKind> {
        self.wildcards
            .get(&parent)?
            .iter()
            .find(|(m, _)| m.matches(namespace))
            .map(|(_, kind)| *kind)
    }

    /// Find the transition for a document element.
    pub fn root(&self, name: &QName) -> Option<Transition<'_, F>> {
        self.roots.get(name).copied().and_then(|kind| self.resolve(kind))
    }

    fn resolve(&self, kind: NodeKind) -> Option<Transition<'_, F>> {
        self.factories
            .get(&kind)
            .map(|factory| Transition { kind, factory })
    }

    /// Get the factory for a kind.
    pub fn factory(&self, kind: NodeKind) -> Option<&F> {
        self.factories.get(&kind)
    }

    /// Whether `parent` tolerates foreign content from `namespace`.
    pub fn is_extensibility_point(&self, parent: NodeKind, namespace: &str) -> bool {
        self.wildcard(parent, namespace) == Some(NodeKind::ExtensibilityBucket)
    }

    /// Get the number of exact edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashMap::len).sum()
    }
}

impl<F> fmt::Debug for TransitionGraph<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionGraph")
            .field("factories", &self.factories.len())
            .field("edges", &self.edge_count())
            .field("roots", &self.roots.keys().collect::<Vec<_>>())
            .finish()
    }
}
