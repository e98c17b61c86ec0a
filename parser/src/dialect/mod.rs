//! Dialect graph providers.
//!
//! Each provider fills a [`GraphBuilder`] with the element names, factories
//! and extensibility points of one dialect. [`Grammar`] builds all of them
//! once; the result is immutable and shared by every parse.

mod bpel11;
mod bpel20;

use crate::driver::{self, ParseFailure, Parsed};
use crate::{read_events, Factory, ParseOptions};
use bpel_core::QName;
use bpel_model::Dialect;
use bpel_registry::{GraphBuilder, GraphError, NamespaceMatch, NodeKind, TransitionGraph};
use tracing::debug;

pub(crate) type Graph = TransitionGraph<Factory>;

/// The transition graphs of every supported dialect.
#[derive(Debug)]
pub struct Grammar {
    bpel11: Graph,
    bpel20: Graph,
    bpel20_draft: Graph,
}

impl Grammar {
    /// Build every dialect graph.
    pub fn new() -> Result<Self, GraphError> {
        let grammar = Self {
            bpel11: bpel11::graph()?,
            bpel20: bpel20::graph(Dialect::Bpel20)?,
            bpel20_draft: bpel20::graph(Dialect::Bpel20Draft)?,
        };
        debug!(
            bpel11_edges = grammar.bpel11.edge_count(),
            bpel20_edges = grammar.bpel20.edge_count(),
            draft_edges = grammar.bpel20_draft.edge_count(),
            "grammar built"
        );
        Ok(grammar)
    }

    pub fn graph(&self, dialect: Dialect) -> &TransitionGraph<Factory> {
        match dialect {
            Dialect::Bpel11 => &self.bpel11,
            Dialect::Bpel20 => &self.bpel20,
            Dialect::Bpel20Draft => &self.bpel20_draft,
        }
    }

    /// Parse a whole document held in memory.
    pub fn parse(&self, source: &str, options: &ParseOptions) -> Result<Parsed, ParseFailure> {
        driver::run(self, read_events(source), options)
    }
}

/// Registration helpers shared by the providers. Names are taken in the
/// provider's own namespace.
struct Provider {
    namespace: &'static str,
    builder: GraphBuilder<Factory>,
    activities: Vec<NodeKind>,
}

impl Provider {
    fn new(dialect: Dialect) -> Self {
        Self {
            namespace: dialect.namespace(),
            builder: GraphBuilder::new(),
            activities: Vec::new(),
        }
    }

    fn q(&self, local: &str) -> QName {
        QName::new(self.namespace, local)
    }

    fn factories(&mut self, entries: &[(NodeKind, Factory)]) -> Result<(), GraphError> {
        for (kind, factory) in entries {
            self.builder.register_factory(*kind, *factory)?;
        }
        Ok(())
    }

    fn activities(&mut self, entries: &[(NodeKind, &str, Factory)]) -> Result<(), GraphError> {
        for (kind, local, factory) in entries {
            let name = self.q(local);
            self.builder.register_activity(*kind, name, *factory)?;
            self.activities.push(*kind);
        }
        Ok(())
    }

    fn edges(&mut self, parent: NodeKind, entries: &[(&str, NodeKind)]) -> Result<(), GraphError> {
        for (local, child) in entries {
            let name = self.q(local);
            self.builder.register_edge(parent, name, *child)?;
        }
        Ok(())
    }

    /// The same edges under each of `parents`.
    fn edges_under(
        &mut self,
        parents: &[NodeKind],
        entries: &[(&str, NodeKind)],
    ) -> Result<(), GraphError> {
        for parent in parents {
            self.edges(*parent, entries)?;
        }
        Ok(())
    }

    /// The same edges under every activity registered so far.
    fn activity_edges(&mut self, entries: &[(&str, NodeKind)]) -> Result<(), GraphError> {
        let activities = self.activities.clone();
        self.edges_under(&activities, entries)
    }

    /// Any activity may appear under each of `parents`.
    fn any_activity(&mut self, parents: &[NodeKind]) {
        for parent in parents {
            self.builder.register_bulk_activity_edges(*parent);
        }
    }

    /// Foreign-namespace children of `parents` are swallowed. Activities
    /// are always extensible.
    fn extensible(&mut self, parents: &[NodeKind]) {
        let all = parents.iter().chain(self.activities.iter());
        for parent in all {
            self.builder
                .register_extensibility_edge(*parent, NamespaceMatch::other_than(self.namespace));
        }
    }

    /// Every child of `parent` is kept as raw XML.
    fn capture(&mut self, parent: NodeKind) {
        self.builder.register_any_edge(parent, NodeKind::XmlCapture);
    }

    fn build(mut self) -> Result<Graph, GraphError> {
        let root = self.q("process");
        self.builder.register_root(root, NodeKind::Process)?;
        self.builder.build()
    }
}
