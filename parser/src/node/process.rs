//! The document element and its top-level declarations.

use super::{set_once, unrecognized, ActivitySlot, Fragment, ListNode, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::{DiagnosticKey, SourceInfo};
use bpel_model::{
    CompensationHandler, CorrelationSet, Dialect, EventHandlers, ExtensionDecl, FaultHandler,
    Import, Partner, PartnerLink, Process, TerminationHandler, Variable, XmlAttribute,
};
use bpel_registry::NodeKind;
use tracing::debug;

/// `<process>`.
#[derive(Debug)]
pub(crate) struct ProcessNode {
    name: String,
    target_namespace: String,
    query_language: Option<String>,
    expression_language: Option<String>,
    suppress_join_failure: Option<bool>,
    exit_on_standard_fault: Option<bool>,
    imports: Vec<Import>,
    extensions: Option<Vec<ExtensionDecl>>,
    partner_links: Option<Vec<PartnerLink>>,
    partners: Option<Vec<Partner>>,
    variables: Option<Vec<Variable>>,
    correlation_sets: Option<Vec<CorrelationSet>>,
    fault_handler: Option<FaultHandler>,
    compensation_handler: Option<CompensationHandler>,
    termination_handler: Option<TerminationHandler>,
    event_handlers: Option<EventHandlers>,
    activity: ActivitySlot,
    extension_attributes: Vec<XmlAttribute>,
    info: SourceInfo,
}

pub(crate) fn process(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    if ctx.dialect() == Dialect::Bpel11 && el.attr("abstractProcess") == Some("yes") {
        return Err(ctx.fatal(
            el.location(),
            DiagnosticKey::UnsupportedConstruct,
            &["abstractProcess"],
        ));
    }
    let name = ctx.required_attr(el, "name");
    debug!(process = %name, dialect = %ctx.dialect(), "process element opened");
    let query_language = ctx.attr(el, "queryLanguage");
    let expression_language = ctx.attr(el, "expressionLanguage");
    ctx.set_process_languages(expression_language.clone(), query_language.clone());
    Ok(Box::new(ProcessNode {
        name,
        target_namespace: ctx.required_attr(el, "targetNamespace"),
        query_language,
        expression_language,
        suppress_join_failure: ctx.yes_no_attr(el, "suppressJoinFailure"),
        exit_on_standard_fault: ctx.yes_no_attr(el, "exitOnStandardFault"),
        imports: Vec::new(),
        extensions: None,
        partner_links: None,
        partners: None,
        variables: None,
        correlation_sets: None,
        fault_handler: None,
        compensation_handler: None,
        termination_handler: None,
        event_handlers: None,
        activity: ActivitySlot::default(),
        extension_attributes: el.extension_attributes.clone(),
        info: el.source_info(),
    }))
}

impl ParseNode for ProcessNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Process
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Import(import) => self.imports.push(import),
            Fragment::Extensions(v) => set_once(ctx, &mut self.extensions, v, "extensions"),
            Fragment::PartnerLinks(v) => set_once(ctx, &mut self.partner_links, v, "partnerLinks"),
            Fragment::Partners(v) => set_once(ctx, &mut self.partners, v, "partners"),
            Fragment::Variables(v) => set_once(ctx, &mut self.variables, v, "variables"),
            Fragment::CorrelationSets(v) => {
                set_once(ctx, &mut self.correlation_sets, v, "correlationSets")
            }
            Fragment::FaultHandler(h) => set_once(ctx, &mut self.fault_handler, h, "faultHandlers"),
            Fragment::CompensationHandler(h) => {
                set_once(ctx, &mut self.compensation_handler, h, "compensationHandler")
            }
            Fragment::TerminationHandler(h) => {
                set_once(ctx, &mut self.termination_handler, h, "terminationHandler")
            }
            Fragment::EventHandlers(h) => {
                set_once(ctx, &mut self.event_handlers, h, "eventHandlers")
            }
            Fragment::Activity(activity) => self.activity.fill(ctx, activity),
            _ => return Err(unrecognized(NodeKind::Process, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let activity = node.activity.take_or_empty(ctx, &node.info);
        Ok(Fragment::Process(Box::new(Process {
            name: node.name,
            target_namespace: node.target_namespace,
            dialect: ctx.dialect(),
            base_uri: ctx.base_uri().map(str::to_string),
            query_language: node.query_language,
            expression_language: node.expression_language,
            suppress_join_failure: node.suppress_join_failure,
            exit_on_standard_fault: node.exit_on_standard_fault,
            imports: node.imports,
            extensions: node.extensions.unwrap_or_default(),
            partner_links: node.partner_links.unwrap_or_default(),
            partners: node.partners.unwrap_or_default(),
            variables: node.variables.unwrap_or_default(),
            correlation_sets: node.correlation_sets.unwrap_or_default(),
            fault_handler: node.fault_handler,
            compensation_handler: node.compensation_handler,
            termination_handler: node.termination_handler,
            event_handlers: node.event_handlers,
            activity,
            extension_attributes: node.extension_attributes,
            info: node.info,
        })))
    }
}

// ==================== Imports ====================

#[derive(Debug)]
struct ImportNode(Import);

impl ParseNode for ImportNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Import
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Import(self.0))
    }
}

pub(crate) fn import(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(ImportNode(Import {
        namespace: ctx.attr(el, "namespace"),
        location: ctx.attr(el, "location"),
        import_type: ctx.required_attr(el, "importType"),
        info: el.source_info(),
    })))
}

// ==================== Extensions ====================

#[derive(Debug)]
struct ExtensionNode(ExtensionDecl);

impl ParseNode for ExtensionNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Extension
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Extension(self.0))
    }
}

/// A declared extension. One that must be understood but is not aborts.
pub(crate) fn extension(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    let namespace = ctx.required_attr(el, "namespace");
    let must_understand = ctx.yes_no_attr(el, "mustUnderstand").unwrap_or(false);
    if must_understand && !ctx.options().understands(&namespace) {
        return Err(ctx.fatal(
            el.location(),
            DiagnosticKey::UnsupportedConstruct,
            &[&namespace],
        ));
    }
    Ok(Box::new(ExtensionNode(ExtensionDecl {
        namespace,
        must_understand,
        info: el.source_info(),
    })))
}

pub(crate) fn extensions(_: &mut ParseContext, _: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::Extensions,
        |f| match f {
            Fragment::Extension(e) => Some(e),
            _ => None,
        },
        Fragment::Extensions,
    )
}
