//! Fault, compensation, termination and event handlers.

use super::{
    force_inbound, set_once, unrecognized, ActivitySlot, Fragment, NodeResult, ParseNode,
};
use crate::{ParseContext, StartElement};
use bpel_core::{DiagnosticKey, QName, SourceInfo};
use bpel_model::{
    AlarmTiming, Catch, CatchAll, CompensationHandler, Correlation, Dialect, EventHandlers,
    Expression, FaultHandler, OnAlarm, OnEvent, OnMessage, TerminationHandler,
};
use bpel_registry::NodeKind;
use bpel_shape::{AttrShape, Selection, ShapeSelector};

// ==================== Timing ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimingForm {
    For,
    Until,
}

/// 1.1 timing: exactly one of the `for` and `until` attributes.
pub(crate) fn timing_from_attributes(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> Option<AlarmTiming> {
    let selector = ShapeSelector::new()
        .alternative(TimingForm::For, AttrShape::required(&["for"]))
        .alternative(TimingForm::Until, AttrShape::required(&["until"]));
    match selector.select(el.attribute_names()) {
        Selection::Matched(TimingForm::For) => {
            ctx.expression_attr(el, "for").map(AlarmTiming::For)
        }
        Selection::Matched(TimingForm::Until) => {
            ctx.expression_attr(el, "until").map(AlarmTiming::Until)
        }
        Selection::Inline => {
            ctx.error_at(el, DiagnosticKey::MissingRequiredAttribute, &["for|until"]);
            None
        }
        invalid => {
            let offending: Vec<&str> = invalid.offending().iter().map(String::as_str).collect();
            ctx.error_at(el, DiagnosticKey::InvalidAttributeCombination, &offending);
            None
        }
    }
}

/// 2.0 timing carried by `<for>`, `<until>` and `<repeatEvery>` children.
#[derive(Debug, Default)]
pub(crate) struct TimingChildren {
    pub timing: Option<AlarmTiming>,
    pub repeat_every: Option<Expression>,
}

impl TimingChildren {
    /// Take a timing expression. Returns it back for any other kind.
    pub fn accept(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> Option<Fragment> {
        let Fragment::Expression(expr) = fragment else {
            return Some(fragment);
        };
        match kind {
            NodeKind::For => set_once(ctx, &mut self.timing, AlarmTiming::For(expr), "for|until"),
            NodeKind::Until => {
                set_once(ctx, &mut self.timing, AlarmTiming::Until(expr), "for|until")
            }
            NodeKind::RepeatEvery => set_once(ctx, &mut self.repeat_every, expr, "repeatEvery"),
            _ => return Some(Fragment::Expression(expr)),
        }
        None
    }
}

// ==================== Fault handlers ====================

#[derive(Debug)]
struct FaultHandlersNode(FaultHandler);

impl ParseNode for FaultHandlersNode {
    fn kind(&self) -> NodeKind {
        NodeKind::FaultHandlers
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Catch(c) => self.0.catches.push(c),
            Fragment::CatchAll(c) => set_once(ctx, &mut self.0.catch_all, c, "catchAll"),
            _ => return Err(unrecognized(NodeKind::FaultHandlers, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::FaultHandler(self.0))
    }
}

pub(crate) fn fault_handlers(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(FaultHandlersNode(FaultHandler::new(el.source_info()))))
}

#[derive(Debug)]
struct CatchNode {
    fault_name: Option<QName>,
    fault_variable: Option<String>,
    fault_message_type: Option<QName>,
    fault_element: Option<QName>,
    activity: ActivitySlot,
    info: SourceInfo,
}

impl ParseNode for CatchNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Catch
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Activity(a) => {
                self.activity.fill(ctx, a);
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::Catch, kind)),
        }
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        Ok(Fragment::Catch(Catch {
            fault_name: node.fault_name,
            fault_variable: node.fault_variable,
            fault_message_type: node.fault_message_type,
            fault_element: node.fault_element,
            activity: node.activity.take_or_empty(ctx, &node.info),
            info: node.info,
        }))
    }
}

pub(crate) fn catch(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(CatchNode {
        fault_name: ctx.qname_attr(el, "faultName"),
        fault_variable: ctx.attr(el, "faultVariable"),
        fault_message_type: ctx.qname_attr(el, "faultMessageType"),
        fault_element: ctx.qname_attr(el, "faultElement"),
        activity: ActivitySlot::default(),
        info: el.source_info(),
    }))
}

// ==================== Single-activity handlers ====================

/// `catchAll`, `compensationHandler` and `terminationHandler`: one activity each.
#[derive(Debug)]
struct HandlerBodyNode {
    kind: NodeKind,
    activity: ActivitySlot,
    info: SourceInfo,
}

impl HandlerBodyNode {
    fn boxed(kind: NodeKind, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
        Ok(Box::new(Self {
            kind,
            activity: ActivitySlot::default(),
            info: el.source_info(),
        }))
    }
}

impl ParseNode for HandlerBodyNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Activity(a) => {
                self.activity.fill(ctx, a);
                Ok(())
            }
            _ => Err(unrecognized(self.kind, kind)),
        }
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let HandlerBodyNode {
            kind,
            activity,
            info,
        } = *self;
        let activity = activity.take_or_empty(ctx, &info);
        Ok(match kind {
            NodeKind::CatchAll => Fragment::CatchAll(CatchAll { activity, info }),
            NodeKind::TerminationHandler => {
                Fragment::TerminationHandler(TerminationHandler { activity, info })
            }
            _ => Fragment::CompensationHandler(CompensationHandler { activity, info }),
        })
    }
}

pub(crate) fn catch_all(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    HandlerBodyNode::boxed(NodeKind::CatchAll, el)
}

pub(crate) fn compensation_handler(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    HandlerBodyNode::boxed(NodeKind::CompensationHandler, el)
}

pub(crate) fn termination_handler(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    HandlerBodyNode::boxed(NodeKind::TerminationHandler, el)
}

// ==================== Event handlers ====================

#[derive(Debug)]
struct EventHandlersNode(EventHandlers);

impl ParseNode for EventHandlersNode {
    fn kind(&self) -> NodeKind {
        NodeKind::EventHandlers
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::OnEvent(e) => self.0.on_events.push(e),
            Fragment::OnMessage(m) => self.0.on_events.push(on_event_from(m)),
            Fragment::OnAlarm(a) => self.0.on_alarms.push(a),
            _ => return Err(unrecognized(NodeKind::EventHandlers, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::EventHandlers(self.0))
    }
}

/// 1.1 event handlers use `onMessage`; the model keeps them as events.
fn on_event_from(m: OnMessage) -> OnEvent {
    OnEvent {
        partner_link: m.partner_link,
        port_type: m.port_type,
        operation: m.operation,
        variable: m.variable,
        message_type: None,
        element: None,
        message_exchange: m.message_exchange,
        correlations: m.correlations,
        activity: m.activity,
        info: m.info,
    }
}

pub(crate) fn event_handlers(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(EventHandlersNode(EventHandlers::new(el.source_info()))))
}

// ==================== Inbound messages ====================

/// `onMessage` (pick and 1.1 event handlers) and `onEvent`.
#[derive(Debug)]
struct InboundNode {
    kind: NodeKind,
    partner_link: String,
    port_type: Option<QName>,
    operation: String,
    variable: Option<String>,
    message_type: Option<QName>,
    element: Option<QName>,
    message_exchange: Option<String>,
    correlations: Option<Vec<Correlation>>,
    activity: ActivitySlot,
    info: SourceInfo,
}

impl InboundNode {
    fn boxed(
        kind: NodeKind,
        ctx: &mut ParseContext,
        el: &StartElement,
    ) -> NodeResult<Box<dyn ParseNode>> {
        let port_type = if ctx.dialect() == Dialect::Bpel11 {
            ctx.required_qname_attr(el, "portType")
        } else {
            ctx.qname_attr(el, "portType")
        };
        let (message_type, element) = if kind == NodeKind::OnEvent {
            (
                ctx.qname_attr(el, "messageType"),
                ctx.qname_attr(el, "element"),
            )
        } else {
            (None, None)
        };
        Ok(Box::new(Self {
            kind,
            partner_link: ctx.required_attr(el, "partnerLink"),
            port_type,
            operation: ctx.required_attr(el, "operation"),
            variable: ctx.attr(el, "variable"),
            message_type,
            element,
            message_exchange: ctx.attr(el, "messageExchange"),
            correlations: None,
            activity: ActivitySlot::default(),
            info: el.source_info(),
        }))
    }
}

impl ParseNode for InboundNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Correlations(v) => set_once(ctx, &mut self.correlations, v, "correlations"),
            Fragment::Activity(a) => self.activity.fill(ctx, a),
            _ => return Err(unrecognized(self.kind, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let mut correlations = node.correlations.unwrap_or_default();
        force_inbound(ctx, &mut correlations);
        let activity = node.activity.take_or_empty(ctx, &node.info);
        Ok(if node.kind == NodeKind::OnEvent {
            Fragment::OnEvent(OnEvent {
                partner_link: node.partner_link,
                port_type: node.port_type,
                operation: node.operation,
                variable: node.variable,
                message_type: node.message_type,
                element: node.element,
                message_exchange: node.message_exchange,
                correlations,
                activity,
                info: node.info,
            })
        } else {
            Fragment::OnMessage(OnMessage {
                partner_link: node.partner_link,
                port_type: node.port_type,
                operation: node.operation,
                variable: node.variable,
                message_exchange: node.message_exchange,
                correlations,
                activity,
                info: node.info,
            })
        })
    }
}

pub(crate) fn on_message(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    InboundNode::boxed(NodeKind::OnMessage, ctx, el)
}

pub(crate) fn on_event(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    InboundNode::boxed(NodeKind::OnEvent, ctx, el)
}

// ==================== Alarms ====================

#[derive(Debug)]
struct OnAlarmNode {
    timing: TimingChildren,
    /// Timing came from attributes and was checked there.
    from_attributes: bool,
    activity: ActivitySlot,
    info: SourceInfo,
}

impl ParseNode for OnAlarmNode {
    fn kind(&self) -> NodeKind {
        NodeKind::OnAlarm
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.timing.accept(ctx, kind, fragment) {
            None => {}
            Some(Fragment::Activity(a)) => self.activity.fill(ctx, a),
            Some(_) => return Err(unrecognized(NodeKind::OnAlarm, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        if !node.from_attributes
            && node.timing.timing.is_none()
            && node.timing.repeat_every.is_none()
        {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["for|until|repeatEvery"]);
        }
        Ok(Fragment::OnAlarm(OnAlarm {
            timing: node.timing.timing,
            repeat_every: node.timing.repeat_every,
            activity: node.activity.take_or_empty(ctx, &node.info),
            info: node.info,
        }))
    }
}

pub(crate) fn on_alarm(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let from_attributes = ctx.dialect() == Dialect::Bpel11;
    let mut timing = TimingChildren::default();
    if from_attributes {
        timing.timing = timing_from_attributes(ctx, el);
    }
    Ok(Box::new(OnAlarmNode {
        timing,
        from_attributes,
        activity: ActivitySlot::default(),
        info: el.source_info(),
    }))
}
