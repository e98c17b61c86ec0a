//! GraphBuilder for constructing an immutable TransitionGraph.

use crate::{NamespaceMatch, NodeKind, TransitionGraph};
use bpel_core::QName;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Duplicate factory for node kind {0}")]
    DuplicateFactory(NodeKind),

    #[error("Conflicting edge {parent} -> {name}: routes to {existing}, cannot also route to {requested}")]
    ConflictingEdge {
        parent: NodeKind,
        name: QName,
        existing: NodeKind,
        requested: NodeKind,
    },

    #[error("Duplicate root element: {0}")]
    DuplicateRoot(QName),

    #[error("No factory registered for node kind {0}")]
    MissingFactory(NodeKind),

    #[error("Node kind {0} does not produce an activity")]
    NotAnActivity(NodeKind),
}

/// Builder for constructing an immutable TransitionGraph.
pub struct GraphBuilder<F> {
    /// Node factories by kind.
    factories: HashMap<NodeKind, F>,
    /// Exact edges: parent kind, then child element name.
    edges: HashMap<NodeKind, HashMap<QName, NodeKind>>,
    /// Wildcard edges per parent, tried in registration order.
    wildcards: HashMap<NodeKind, Vec<(NamespaceMatch, NodeKind)>>,
    /// Registered activities with the element name each answers to.
    activities: Vec<(QName, NodeKind)>,
    /// Parents that accept any activity. Expanded in `build`.
    bulk_parents: Vec<NodeKind>,
    /// Document element names.
    roots: HashMap<QName, NodeKind>,
}

impl<F> Default for GraphBuilder<F> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
            edges: HashMap::new(),
            wildcards: HashMap::new(),
            activities: Vec::new(),
            bulk_parents: Vec::new(),
            roots: HashMap::new(),
        }
    }
}

impl<F> GraphBuilder<F> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory that creates nodes of `kind`.
    pub fn register_factory(&mut self, kind: NodeKind, factory: F) -> Result<&mut Self, GraphError> {
        if self.factories.contains_key(&kind) {
            return Err(GraphError::DuplicateFactory(kind));
        }
        self.factories.insert(kind, factory);
        Ok(self)
    }

    /// Register an activity: its factory and the element name bulk edges use.
    pub fn register_activity(
        &mut self,
        kind: NodeKind,
        name: QName,
        factory: F,
    ) -> Result<&mut Self, GraphError> {
        if !kind.is_activity() {
            return Err(GraphError::NotAnActivity(kind));
        }
        self.register_factory(kind, factory)?;
        self.activities.push((name, kind));
        Ok(self)
    }

    /// Route `name` under `parent` to `child`.
    pub fn register_edge(
        &mut self,
        parent: NodeKind,
        name: QName,
        child: NodeKind,
    ) -> Result<&mut Self, GraphError> {
        let children = self.edges.entry(parent).or_default();
        match children.get(&name) {
            Some(&existing) if existing != child => Err(GraphError::ConflictingEdge {
                parent,
                name,
                existing,
                requested: child,
            }),
            _ => {
                children.insert(name, child);
                Ok(self)
            }
        }
    }

    /// Let every registered activity appear under `parent`, including
    /// activities registered after this call.
    pub fn register_bulk_activity_edges(&mut self, parent: NodeKind) -> &mut Self {
        if !self.bulk_parents.contains(&parent) {
            self.bulk_parents.push(parent);
        }
        self
    }

    /// Route elements whose namespace matches `namespaces` under `parent`
    /// to the extensibility bucket.
    pub fn register_extensibility_edge(
        &mut self,
        parent: NodeKind,
        namespaces: NamespaceMatch,
    ) -> &mut Self {
        self.register_wildcard_edge(parent, namespaces, NodeKind::ExtensibilityBucket)
    }

    /// Route elements whose namespace matches `namespaces` under `parent`
    /// to `child`. Exact edges always win over wildcards.
    pub fn register_wildcard_edge(
        &mut self,
        parent: NodeKind,
        namespaces: NamespaceMatch,
        child: NodeKind,
    ) -> &mut Self {
        let entries = self.wildcards.entry(parent).or_default();
        if !entries.iter().any(|(m, k)| m == &namespaces && *k == child) {
            entries.push((namespaces, child));
        }
        self
    }

    /// Route every element under `parent`, whatever its namespace, to `child`.
    pub fn register_any_edge(&mut self, parent: NodeKind, child: NodeKind) -> &mut Self {
        self.register_wildcard_edge(parent, NamespaceMatch::Any, child)
    }

    /// Accept `name` as a document element handled by `kind`.
    pub fn register_root(&mut self, name: QName, kind: NodeKind) -> Result<&mut Self, GraphError> {
        if self.roots.contains_key(&name) {
            return Err(GraphError::DuplicateRoot(name));
        }
        self.roots.insert(name, kind);
        Ok(self)
    }

    /// Build the immutable graph.
    pub fn build(mut self) -> Result<TransitionGraph<F>, GraphError> {
        // Expand bulk activity edges
        let bulk_parents = std::mem::take(&mut self.bulk_parents);
        let activities = std::mem::take(&mut self.activities);
        for parent in &bulk_parents {
            for (name, kind) in &activities {
                self.register_edge(*parent, name.clone(), *kind)?;
            }
        }

        // Every reachable kind needs a factory
        let targets = self
            .edges
            .values()
            .flat_map(|children| children.values())
            .chain(self.wildcards.values().flatten().map(|(_, k)| k))
            .chain(self.roots.values());
        for kind in targets {
            if !self.factories.contains_key(kind) {
                return Err(GraphError::MissingFactory(*kind));
            }
        }

        let edge_count: usize = self.edges.values().map(HashMap::len).sum();
        tracing::debug!(
            factories = self.factories.len(),
            edges = edge_count,
            activities = activities.len(),
            "transition graph built"
        );

        Ok(TransitionGraph::new(
            self.factories,
            self.edges,
            self.wildcards,
            self.roots,
        ))
    }
}
