//! `invoke`, `receive` and `reply`.

use super::{
    force_inbound, set_once, unrecognized, ActivityCore, Fragment, NodeResult, ParseNode,
};
use crate::{ParseContext, StartElement};
use bpel_core::QName;
use bpel_model::{
    ActivityKind, Catch, CatchAll, CompensationHandler, Correlation, Dialect, Invoke, Receive,
    Reply,
};
use bpel_registry::NodeKind;

/// The operation triple every messaging activity names.
#[derive(Debug)]
struct Endpoint {
    partner_link: String,
    port_type: Option<QName>,
    operation: String,
}

impl Endpoint {
    /// `portType` is optional from 2.0 on.
    fn read(ctx: &mut ParseContext, el: &StartElement) -> Self {
        let partner_link = ctx.required_attr(el, "partnerLink");
        let port_type = if ctx.dialect() == Dialect::Bpel11 {
            ctx.required_qname_attr(el, "portType")
        } else {
            ctx.qname_attr(el, "portType")
        };
        Self {
            partner_link,
            port_type,
            operation: ctx.required_attr(el, "operation"),
        }
    }
}

// ==================== Invoke ====================

#[derive(Debug)]
struct InvokeNode {
    core: ActivityCore,
    endpoint: Endpoint,
    input_variable: Option<String>,
    output_variable: Option<String>,
    correlations: Option<Vec<Correlation>>,
    catches: Vec<Catch>,
    catch_all: Option<CatchAll>,
    compensation_handler: Option<CompensationHandler>,
}

impl ParseNode for InvokeNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Invoke
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        let Some(fragment) = self.core.absorb(fragment) else {
            return Ok(());
        };
        match fragment {
            Fragment::Correlations(v) => set_once(ctx, &mut self.correlations, v, "correlations"),
            Fragment::Catch(c) => self.catches.push(c),
            Fragment::CatchAll(c) => set_once(ctx, &mut self.catch_all, c, "catchAll"),
            Fragment::CompensationHandler(h) => {
                set_once(ctx, &mut self.compensation_handler, h, "compensationHandler")
            }
            _ => return Err(unrecognized(NodeKind::Invoke, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let invoke = Invoke {
            partner_link: node.endpoint.partner_link,
            port_type: node.endpoint.port_type,
            operation: node.endpoint.operation,
            input_variable: node.input_variable,
            output_variable: node.output_variable,
            correlations: node.correlations.unwrap_or_default(),
            catches: node.catches,
            catch_all: node.catch_all.map(Box::new),
            compensation_handler: node.compensation_handler.map(Box::new),
        };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Invoke(invoke)),
        ))
    }
}

pub(crate) fn invoke(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(InvokeNode {
        core: ActivityCore::new(ctx, el),
        endpoint: Endpoint::read(ctx, el),
        input_variable: ctx.attr(el, "inputVariable"),
        output_variable: ctx.attr(el, "outputVariable"),
        correlations: None,
        catches: Vec::new(),
        catch_all: None,
        compensation_handler: None,
    }))
}

// ==================== Receive and reply ====================

/// `receive` and `reply` differ only in a few attributes.
#[derive(Debug)]
struct ExchangeNode {
    kind: NodeKind,
    core: ActivityCore,
    endpoint: Endpoint,
    variable: Option<String>,
    create_instance: bool,
    fault_name: Option<QName>,
    message_exchange: Option<String>,
    correlations: Option<Vec<Correlation>>,
}

impl ExchangeNode {
    fn boxed(
        kind: NodeKind,
        ctx: &mut ParseContext,
        el: &StartElement,
    ) -> NodeResult<Box<dyn ParseNode>> {
        let core = ActivityCore::new(ctx, el);
        let endpoint = Endpoint::read(ctx, el);
        let (create_instance, fault_name) = if kind == NodeKind::Receive {
            (ctx.yes_no_attr(el, "createInstance").unwrap_or(false), None)
        } else {
            (false, ctx.qname_attr(el, "faultName"))
        };
        Ok(Box::new(Self {
            kind,
            core,
            endpoint,
            variable: ctx.attr(el, "variable"),
            create_instance,
            fault_name,
            message_exchange: ctx.attr(el, "messageExchange"),
            correlations: None,
        }))
    }
}

impl ParseNode for ExchangeNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => Ok(()),
            Some(Fragment::Correlations(v)) => {
                set_once(ctx, &mut self.correlations, v, "correlations");
                Ok(())
            }
            Some(_) => Err(unrecognized(self.kind, kind)),
        }
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let mut correlations = node.correlations.unwrap_or_default();
        let kind = if node.kind == NodeKind::Receive {
            force_inbound(ctx, &mut correlations);
            ActivityKind::Receive(Receive {
                partner_link: node.endpoint.partner_link,
                port_type: node.endpoint.port_type,
                operation: node.endpoint.operation,
                variable: node.variable,
                create_instance: node.create_instance,
                message_exchange: node.message_exchange,
                correlations,
            })
        } else {
            ActivityKind::Reply(Reply {
                partner_link: node.endpoint.partner_link,
                port_type: node.endpoint.port_type,
                operation: node.endpoint.operation,
                variable: node.variable,
                fault_name: node.fault_name,
                message_exchange: node.message_exchange,
                correlations,
            })
        };
        Ok(Fragment::Activity(node.core.into_activity(kind)))
    }
}

pub(crate) fn receive(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ExchangeNode::boxed(NodeKind::Receive, ctx, el)
}

pub(crate) fn reply(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ExchangeNode::boxed(NodeKind::Reply, ctx, el)
}
