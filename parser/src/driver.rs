//! The parse driver.
//!
//! Keeps the stack of open parse nodes and moves each event through the
//! dialect's transition graph. The root element picks the dialect; every
//! later start element is looked up under the kind of the node on top of
//! the stack.

use crate::dialect::Graph;
use crate::node::BucketNode;
use crate::{Fragment, Grammar, NodeError, ParseContext, ParseNode, ParseOptions, ReadError};
use crate::{StartElement, XmlEvent};
use bpel_core::{Diagnostic, DiagnosticKey, Diagnostics, Location};
use bpel_model::{Dialect, Process, BPEL20_ABSTRACT_NS};
use bpel_registry::NodeKind;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// A successfully parsed document. `diagnostics` holds the warnings and,
/// in collect-all mode, the errors that did not stop the parse.
#[derive(Debug)]
pub struct Parsed {
    pub process: Process,
    pub diagnostics: Diagnostics,
}

/// A parse that was aborted. The diagnostics are never empty.
#[derive(Debug, Error)]
#[error("parse failed with {} diagnostic(s)", .diagnostics.len())]
pub struct ParseFailure {
    pub diagnostics: Diagnostics,
}

/// Parse a stream of already-read events.
pub fn parse_events<I>(
    grammar: &Grammar,
    events: I,
    options: &ParseOptions,
) -> Result<Parsed, ParseFailure>
where
    I: IntoIterator<Item = XmlEvent>,
{
    run(grammar, events.into_iter().map(Ok), options)
}

pub(crate) fn run<I>(grammar: &Grammar, events: I, options: &ParseOptions) -> Result<Parsed, ParseFailure>
where
    I: Iterator<Item = Result<XmlEvent, ReadError>>,
{
    let mut driver = Driver::new(grammar, options);
    for event in events {
        let step = match event {
            Ok(XmlEvent::Start(el)) => driver.start(el),
            Ok(XmlEvent::Text { content, line }) => driver.content(&content, line),
            Ok(XmlEvent::End) => driver.end(),
            Err(e) => Err(driver.read_failure(e)),
        };
        if let Err(fatal) = step {
            return Err(driver.abort(fatal));
        }
        if driver.ctx.should_abort() {
            warn!("stopping at first error");
            return Err(driver.fail());
        }
    }
    driver.finish()
}

struct Frame {
    node: Box<dyn ParseNode>,
    location: Location,
}

struct Driver<'g> {
    grammar: &'g Grammar,
    graph: Option<&'g Graph>,
    ctx: ParseContext,
    stack: Vec<Frame>,
    result: Option<Fragment>,
}

impl<'g> Driver<'g> {
    fn new(grammar: &'g Grammar, options: &ParseOptions) -> Self {
        Self {
            grammar,
            graph: None,
            // Replaced once the root element names the dialect.
            ctx: ParseContext::new(Dialect::Bpel20, options.clone()),
            stack: Vec::new(),
            result: None,
        }
    }

    // ==================== Events ====================

    fn start(&mut self, el: StartElement) -> Result<(), Diagnostic> {
        let location = el.location();
        self.ctx.set_location(location.clone());

        let Some(parent) = self.stack.last().map(|frame| frame.node.kind()) else {
            return self.start_root(el, location);
        };

        // Everything below a bucket is swallowed with it.
        if parent.is_bucket() {
            self.push(Box::new(BucketNode::new(parent)), location);
            return Ok(());
        }

        let Some(graph) = self.graph else {
            return Err(Diagnostic::fatal(DiagnosticKey::MalformedInput, location));
        };
        match graph.transition(parent, &el.name) {
            Some(transition) => match (transition.factory)(&mut self.ctx, &el) {
                Ok(node) => self.push(node, location),
                Err(e) => {
                    self.node_failure(e)?;
                    self.push(Box::new(BucketNode::new(NodeKind::Bucket)), location);
                }
            },
            None => {
                self.ctx
                    .error(DiagnosticKey::UnexpectedElement, &[&el.name.to_string()]);
                self.push(Box::new(BucketNode::new(NodeKind::Bucket)), location);
            }
        }
        Ok(())
    }

    fn start_root(&mut self, el: StartElement, location: Location) -> Result<(), Diagnostic> {
        let namespace = el.name.namespace.as_str();
        if self.result.is_some() || namespace == BPEL20_ABSTRACT_NS {
            return Err(Diagnostic::fatal(DiagnosticKey::UnsupportedConstruct, location)
                .with_arg(namespace));
        }
        let Some(dialect) = Dialect::from_namespace(namespace) else {
            return Err(Diagnostic::fatal(DiagnosticKey::UnsupportedConstruct, location)
                .with_arg(namespace));
        };
        debug!(%dialect, "dialect selected");
        self.ctx.set_dialect(dialect);
        let graph = self.grammar.graph(dialect);
        self.graph = Some(graph);

        let Some(transition) = graph.root(&el.name) else {
            return Err(Diagnostic::fatal(DiagnosticKey::UnexpectedElement, location)
                .with_arg(el.name.to_string()));
        };
        match (transition.factory)(&mut self.ctx, &el) {
            Ok(node) => {
                self.push(node, location);
                Ok(())
            }
            Err(e) => {
                self.node_failure(e)?;
                Err(Diagnostic::fatal(DiagnosticKey::MalformedInput, location))
            }
        }
    }

    /// Character data, reported at its own line under the enclosing element.
    fn content(&mut self, text: &str, line: usize) -> Result<(), Diagnostic> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        self.ctx
            .set_location(Location::new(line, frame.location.element.clone()));
        match frame.node.on_content(&mut self.ctx, text) {
            Ok(()) => Ok(()),
            Err(e) => self.node_failure(e),
        }
    }

    fn end(&mut self) -> Result<(), Diagnostic> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let kind = frame.node.kind();
        trace!(%kind, depth = self.stack.len(), "pop");
        self.ctx.set_location(frame.location.clone());
        let fragment = match frame.node.finalize(&mut self.ctx) {
            Ok(fragment) => fragment,
            Err(e) => return self.node_failure(e),
        };

        let Some(parent) = self.stack.last_mut() else {
            self.result = Some(fragment);
            return Ok(());
        };
        if kind.is_bucket() || parent.node.kind().is_bucket() || matches!(fragment, Fragment::Ignored) {
            return Ok(());
        }
        match parent.node.on_child_finalized(&mut self.ctx, kind, fragment) {
            Ok(()) => Ok(()),
            Err(e) => self.node_failure(e),
        }
    }

    fn push(&mut self, node: Box<dyn ParseNode>, location: Location) {
        trace!(kind = %node.kind(), depth = self.stack.len(), "push");
        self.stack.push(Frame { node, location });
    }

    // ==================== Failures ====================

    /// Record a recoverable node error, or hand back a fatal one.
    fn node_failure(&mut self, error: NodeError) -> Result<(), Diagnostic> {
        match error {
            NodeError::UnrecognizedChild { .. } => {
                let element = self.ctx.location().element.clone();
                self.ctx
                    .error(DiagnosticKey::UnexpectedElement, &[element.as_str()]);
                Ok(())
            }
            NodeError::Fatal(diagnostic) => Err(diagnostic),
        }
    }

    fn read_failure(&self, error: ReadError) -> Diagnostic {
        let key = match error {
            ReadError::UnboundPrefix { .. } => DiagnosticKey::NamespacePrefixUnresolved,
            _ => DiagnosticKey::XmlSyntax,
        };
        let element = self.ctx.location().element.clone();
        Diagnostic::fatal(key, Location::new(error.line(), element))
            .with_message(error.to_string())
    }

    fn abort(mut self, fatal: Diagnostic) -> ParseFailure {
        warn!(
            key = %fatal.key,
            line = fatal.location.line,
            "parse aborted"
        );
        self.ctx.report(fatal);
        self.fail()
    }

    fn fail(self) -> ParseFailure {
        ParseFailure {
            diagnostics: self.ctx.into_diagnostics(),
        }
    }

    fn finish(mut self) -> Result<Parsed, ParseFailure> {
        if !self.stack.is_empty() {
            let location = self.ctx.location().clone();
            return Err(self.abort(Diagnostic::fatal(DiagnosticKey::MalformedInput, location)));
        }
        match self.result.take() {
            Some(Fragment::Process(process)) => Ok(Parsed {
                process: *process,
                diagnostics: self.ctx.into_diagnostics(),
            }),
            _ => Err(self.abort(Diagnostic::fatal(
                DiagnosticKey::MalformedInput,
                Location::default(),
            ))),
        }
    }
}
