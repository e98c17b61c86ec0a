//! Parse nodes: one per open element.
//!
//! A node is created by its factory when the driver dispatches a start
//! element, receives content and finalized children in document order, and
//! is consumed by [`ParseNode::finalize`] when its element closes. The
//! resulting [`Fragment`] is handed to the parent node.

mod assign;
mod common;
mod correlation;
mod decls;
mod expression;
mod handlers;
mod links;
mod messaging;
mod process;
mod simple;
mod structured;

pub(crate) use assign::*;
pub(crate) use common::*;
pub(crate) use correlation::*;
pub(crate) use decls::*;
pub(crate) use expression::*;
pub(crate) use handlers::*;
pub(crate) use links::*;
pub(crate) use messaging::*;
pub(crate) use process::*;
pub(crate) use simple::*;
pub(crate) use structured::*;

use crate::{ParseContext, StartElement};
use bpel_core::{Diagnostic, DiagnosticKey};
use bpel_model::{
    Activity, AssignCopy, Branches, Case, Catch, CatchAll, CompensationHandler,
    CompletionCondition, Correlation, CorrelationSet, EventHandlers, Expression, ExtensionDecl,
    FaultHandler, Import, Link, LinkSource, LinkTarget, Literal, OnAlarm, OnEvent, OnMessage,
    Partner, PartnerLink, Process, TerminationHandler, ValueRef, Variable, XmlElement,
};
use bpel_registry::NodeKind;
use thiserror::Error;

/// Creates the node for a dispatched start element.
pub type Factory = fn(&mut ParseContext, &StartElement) -> NodeResult<Box<dyn ParseNode>>;

/// Failures a node hands back to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// A finalized child the parent has no place for.
    #[error("{child} is not accepted under {parent}")]
    UnrecognizedChild { parent: NodeKind, child: NodeKind },

    /// Abort the parse with this diagnostic.
    #[error("{0}")]
    Fatal(Diagnostic),
}

pub type NodeResult<T> = Result<T, NodeError>;

/// A finalized model fragment on its way to the parent node.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Process(Box<Process>),
    Activity(Activity),

    Import(Import),
    Extensions(Vec<ExtensionDecl>),
    Extension(ExtensionDecl),
    PartnerLinks(Vec<PartnerLink>),
    PartnerLink(PartnerLink),
    Partners(Vec<Partner>),
    Partner(Partner),
    PartnerLinkRef(String),
    Variables(Vec<Variable>),
    Variable(Variable),
    CorrelationSets(Vec<CorrelationSet>),
    CorrelationSet(CorrelationSet),
    Correlations(Vec<Correlation>),
    Correlation(Correlation),

    FaultHandler(FaultHandler),
    Catch(Catch),
    CatchAll(CatchAll),
    CompensationHandler(CompensationHandler),
    TerminationHandler(TerminationHandler),
    EventHandlers(EventHandlers),
    OnEvent(OnEvent),
    OnMessage(OnMessage),
    OnAlarm(OnAlarm),

    Copy(AssignCopy),
    /// `None` when the value could not be built; the cause is already reported.
    From(Option<ValueRef>),
    To(Option<ValueRef>),
    Literal(Literal),
    Links(Vec<Link>),
    Link(Link),
    Sources(Vec<LinkSource>),
    Source(LinkSource),
    /// Targets with the 2.0 join condition that travels with them.
    Targets(Option<Expression>, Vec<LinkTarget>),
    Target(LinkTarget),
    Case(Case),
    CompletionCondition(CompletionCondition),
    Branches(Branches),
    Expression(Expression),
    Xml(XmlElement),

    /// An invalid child, already reported, that the parent still counts.
    Dropped,

    /// Contributes nothing to the model.
    Ignored,
}

/// One open element's parse state.
pub trait ParseNode {
    fn kind(&self) -> NodeKind;

    /// Character data directly inside the element.
    fn on_content(&mut self, ctx: &mut ParseContext, text: &str) -> NodeResult<()> {
        if !text.trim().is_empty() {
            ctx.error(DiagnosticKey::UnexpectedContent, &[text.trim()]);
        }
        Ok(())
    }

    /// A nested element has been finalized.
    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        _fragment: Fragment,
    ) -> NodeResult<()> {
        Err(unrecognized(self.kind(), kind))
    }

    /// The element has closed.
    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment>;
}

pub(crate) fn unrecognized(parent: NodeKind, child: NodeKind) -> NodeError {
    NodeError::UnrecognizedChild { parent, child }
}
