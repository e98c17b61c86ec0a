//! Structured activities: sequence, flow, switch and if, loops, pick,
//! scope and forEach.

use super::{set_once, unrecognized, ActivityCore, ActivitySlot, Fragment, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::{DiagnosticKey, SourceInfo};
use bpel_model::{
    Activity, ActivityKind, Branches, Case, CompensationHandler, CompletionCondition,
    CorrelationSet, Dialect, EventHandlers, Expression, FaultHandler, Flow, ForEach, Link, Loop,
    OnAlarm, OnMessage, PartnerLink, Pick, Scope, Sequence, Switch, TerminationHandler, Variable,
};
use bpel_registry::NodeKind;

/// Report a missing expression child and stand in an empty one.
fn missing_expression(ctx: &mut ParseContext, element: &str, info: &SourceInfo) -> Expression {
    ctx.error(DiagnosticKey::MissingRequiredChild, &[element]);
    Expression::new("", None, info.clone())
}

/// Report an empty activity list and stand in an `empty` activity.
fn require_activities(ctx: &mut ParseContext, activities: &mut Vec<Activity>, info: &SourceInfo) {
    if activities.is_empty() {
        ctx.error(DiagnosticKey::MissingRequiredChild, &["activity"]);
        activities.push(Activity::empty(info.clone()));
    }
}

// ==================== Sequence ====================

#[derive(Debug)]
struct SequenceNode {
    core: ActivityCore,
    activities: Vec<Activity>,
}

impl ParseNode for SequenceNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => Ok(()),
            Some(Fragment::Activity(a)) => {
                self.activities.push(a);
                Ok(())
            }
            Some(_) => Err(unrecognized(NodeKind::Sequence, kind)),
        }
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let mut node = *self;
        require_activities(ctx, &mut node.activities, node.core.info());
        let sequence = Sequence {
            activities: node.activities,
        };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Sequence(sequence)),
        ))
    }
}

pub(crate) fn sequence(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(SequenceNode {
        core: ActivityCore::new(ctx, el),
        activities: Vec::new(),
    }))
}

// ==================== Flow ====================

#[derive(Debug)]
struct FlowNode {
    core: ActivityCore,
    links: Option<Vec<Link>>,
    activities: Vec<Activity>,
}

impl ParseNode for FlowNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Flow
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => {}
            Some(Fragment::Links(links)) => set_once(ctx, &mut self.links, links, "links"),
            Some(Fragment::Activity(a)) => self.activities.push(a),
            Some(_) => return Err(unrecognized(NodeKind::Flow, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let mut node = *self;
        require_activities(ctx, &mut node.activities, node.core.info());
        let flow = Flow {
            links: node.links.unwrap_or_default(),
            activities: node.activities,
        };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Flow(flow)),
        ))
    }
}

pub(crate) fn flow(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(FlowNode {
        core: ActivityCore::new(ctx, el),
        links: None,
        activities: Vec::new(),
    }))
}

// ==================== Branches ====================

/// `case`, `otherwise`, `then`, `elseif` and `else`: an optional condition
/// guarding one activity.
#[derive(Debug)]
struct BranchNode {
    kind: NodeKind,
    condition: Option<Expression>,
    /// The condition arrives as a `<condition>` child.
    condition_child: bool,
    activity: ActivitySlot,
    info: SourceInfo,
}

impl BranchNode {
    fn boxed(kind: NodeKind, el: &StartElement, condition: Option<Expression>, condition_child: bool)
        -> NodeResult<Box<dyn ParseNode>>
    {
        Ok(Box::new(Self {
            kind,
            condition,
            condition_child,
            activity: ActivitySlot::default(),
            info: el.source_info(),
        }))
    }
}

impl ParseNode for BranchNode {
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
            Fragment::Expression(e) if kind == NodeKind::Condition && self.condition_child => {
                set_once(ctx, &mut self.condition, e, "condition")
            }
            Fragment::Activity(a) => self.activity.fill(ctx, a),
            _ => return Err(unrecognized(self.kind, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let condition = match node.condition {
            None if node.condition_child => Some(missing_expression(ctx, "condition", &node.info)),
            condition => condition,
        };
        Ok(Fragment::Case(Case {
            condition,
            activity: node.activity.take_or_empty(ctx, &node.info),
            info: node.info,
        }))
    }
}

/// 1.1 writes the case condition as an attribute; the 2.0 draft as a child.
pub(crate) fn case(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    if ctx.dialect() == Dialect::Bpel11 {
        let condition = ctx.required_expression_attr(el, "condition");
        BranchNode::boxed(NodeKind::Case, el, condition, false)
    } else {
        BranchNode::boxed(NodeKind::Case, el, None, true)
    }
}

pub(crate) fn otherwise(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    BranchNode::boxed(NodeKind::Otherwise, el, None, false)
}

pub(crate) fn then(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    BranchNode::boxed(NodeKind::Then, el, None, false)
}

pub(crate) fn else_if(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    BranchNode::boxed(NodeKind::ElseIf, el, None, true)
}

pub(crate) fn else_branch(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    BranchNode::boxed(NodeKind::Else, el, None, false)
}

// ==================== Switch ====================

#[derive(Debug)]
struct SwitchNode {
    core: ActivityCore,
    cases: Vec<Case>,
    closed: bool,
}

impl ParseNode for SwitchNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Switch
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => {}
            Some(Fragment::Case(case)) => {
                if self.closed {
                    // Nothing may follow `otherwise`.
                    ctx.error(DiagnosticKey::UnexpectedElement, &[&kind.to_string()]);
                } else {
                    self.closed = kind == NodeKind::Otherwise;
                    self.cases.push(case);
                }
            }
            Some(_) => return Err(unrecognized(NodeKind::Switch, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        if node.cases.is_empty() {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["case"]);
        }
        let switch = Switch { cases: node.cases };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Switch(switch)),
        ))
    }
}

pub(crate) fn switch(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(SwitchNode {
        core: ActivityCore::new(ctx, el),
        cases: Vec::new(),
        closed: false,
    }))
}

// ==================== If ====================

/// 2.0 `if`, kept in the model as a switch whose first case is the `if`
/// branch itself.
#[derive(Debug)]
struct IfNode {
    core: ActivityCore,
    condition: Option<Expression>,
    /// The final standard nests the activity directly, the draft in `<then>`.
    then: ActivitySlot,
    alternatives: Vec<Case>,
    closed: bool,
}

impl ParseNode for IfNode {
    fn kind(&self) -> NodeKind {
        NodeKind::If
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => {}
            Some(Fragment::Expression(e)) if kind == NodeKind::Condition => {
                set_once(ctx, &mut self.condition, e, "condition")
            }
            Some(Fragment::Activity(a)) => self.then.fill(ctx, a),
            Some(Fragment::Case(case)) if kind == NodeKind::Then => {
                self.then.fill(ctx, case.activity)
            }
            Some(Fragment::Case(case)) => {
                if self.closed {
                    ctx.error(DiagnosticKey::UnexpectedElement, &[&kind.to_string()]);
                } else {
                    self.closed = kind == NodeKind::Else;
                    self.alternatives.push(case);
                }
            }
            Some(_) => return Err(unrecognized(NodeKind::If, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let info = node.core.info().clone();
        let condition = match node.condition {
            Some(c) => c,
            None => missing_expression(ctx, "condition", &info),
        };
        let first = Case {
            condition: Some(condition),
            activity: node.then.take_or_empty(ctx, &info),
            info,
        };
        let cases = std::iter::once(first).chain(node.alternatives).collect();
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Switch(Switch { cases })),
        ))
    }
}

pub(crate) fn if_activity(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(IfNode {
        core: ActivityCore::new(ctx, el),
        condition: None,
        then: ActivitySlot::default(),
        alternatives: Vec::new(),
        closed: false,
    }))
}

// ==================== Loops ====================

/// `while` and `repeatUntil`.
#[derive(Debug)]
struct LoopNode {
    kind: NodeKind,
    core: ActivityCore,
    condition: Option<Expression>,
    activity: ActivitySlot,
}

impl ParseNode for LoopNode {
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
            None => {}
            Some(Fragment::Expression(e)) if kind == NodeKind::Condition => {
                set_once(ctx, &mut self.condition, e, "condition")
            }
            Some(Fragment::Activity(a)) => self.activity.fill(ctx, a),
            Some(_) => return Err(unrecognized(self.kind, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let condition = match node.condition {
            Some(c) => c,
            None => missing_expression(ctx, "condition", node.core.info()),
        };
        let body = Loop {
            condition,
            activity: Box::new(node.activity.take_or_empty(ctx, node.core.info())),
        };
        let kind = if node.kind == NodeKind::RepeatUntil {
            ActivityKind::RepeatUntil(body)
        } else {
            ActivityKind::While(body)
        };
        Ok(Fragment::Activity(node.core.into_activity(kind)))
    }
}

/// 1.1 writes the loop condition as an attribute.
pub(crate) fn while_loop(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let core = ActivityCore::new(ctx, el);
    let condition = if ctx.dialect() == Dialect::Bpel11 {
        Some(
            ctx.required_expression_attr(el, "condition")
                .unwrap_or_else(|| Expression::new("", None, el.source_info())),
        )
    } else {
        None
    };
    Ok(Box::new(LoopNode {
        kind: NodeKind::While,
        core,
        condition,
        activity: ActivitySlot::default(),
    }))
}

pub(crate) fn repeat_until(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(LoopNode {
        kind: NodeKind::RepeatUntil,
        core: ActivityCore::new(ctx, el),
        condition: None,
        activity: ActivitySlot::default(),
    }))
}

// ==================== Pick ====================

#[derive(Debug)]
struct PickNode {
    core: ActivityCore,
    create_instance: bool,
    on_messages: Vec<OnMessage>,
    on_alarms: Vec<OnAlarm>,
}

impl ParseNode for PickNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Pick
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => {}
            Some(Fragment::OnMessage(m)) => self.on_messages.push(m),
            Some(Fragment::OnAlarm(a)) => self.on_alarms.push(a),
            Some(_) => return Err(unrecognized(NodeKind::Pick, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        if node.on_messages.is_empty() {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["onMessage"]);
        }
        let pick = Pick {
            create_instance: node.create_instance,
            on_messages: node.on_messages,
            on_alarms: node.on_alarms,
        };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Pick(pick)),
        ))
    }
}

pub(crate) fn pick(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(PickNode {
        core: ActivityCore::new(ctx, el),
        create_instance: ctx.yes_no_attr(el, "createInstance").unwrap_or(false),
        on_messages: Vec::new(),
        on_alarms: Vec::new(),
    }))
}

// ==================== Scope ====================

#[derive(Debug)]
struct ScopeNode {
    core: ActivityCore,
    isolated: bool,
    exit_on_standard_fault: Option<bool>,
    variables: Option<Vec<Variable>>,
    partner_links: Option<Vec<PartnerLink>>,
    correlation_sets: Option<Vec<CorrelationSet>>,
    fault_handler: Option<FaultHandler>,
    compensation_handler: Option<CompensationHandler>,
    termination_handler: Option<TerminationHandler>,
    event_handlers: Option<EventHandlers>,
    activity: ActivitySlot,
}

impl ParseNode for ScopeNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Scope
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
            Fragment::Variables(v) => set_once(ctx, &mut self.variables, v, "variables"),
            Fragment::PartnerLinks(v) => set_once(ctx, &mut self.partner_links, v, "partnerLinks"),
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
            Fragment::Activity(a) => self.activity.fill(ctx, a),
            _ => return Err(unrecognized(NodeKind::Scope, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let activity = node.activity.take_or_empty(ctx, node.core.info());
        let scope = Scope {
            isolated: node.isolated,
            exit_on_standard_fault: node.exit_on_standard_fault,
            variables: node.variables.unwrap_or_default(),
            partner_links: node.partner_links.unwrap_or_default(),
            correlation_sets: node.correlation_sets.unwrap_or_default(),
            fault_handler: node.fault_handler,
            compensation_handler: node.compensation_handler,
            termination_handler: node.termination_handler,
            event_handlers: node.event_handlers,
            activity,
        };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Scope(Box::new(scope))),
        ))
    }
}

/// 1.1 calls isolation `variableAccessSerializable`.
pub(crate) fn scope(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let isolated_attr = if ctx.dialect() == Dialect::Bpel11 {
        "variableAccessSerializable"
    } else {
        "isolated"
    };
    Ok(Box::new(ScopeNode {
        core: ActivityCore::new(ctx, el),
        isolated: ctx.yes_no_attr(el, isolated_attr).unwrap_or(false),
        exit_on_standard_fault: ctx.yes_no_attr(el, "exitOnStandardFault"),
        variables: None,
        partner_links: None,
        correlation_sets: None,
        fault_handler: None,
        compensation_handler: None,
        termination_handler: None,
        event_handlers: None,
        activity: ActivitySlot::default(),
    }))
}

// ==================== ForEach ====================

#[derive(Debug)]
struct ForEachNode {
    core: ActivityCore,
    counter_name: String,
    parallel: bool,
    start_counter: Option<Expression>,
    final_counter: Option<Expression>,
    completion_condition: Option<CompletionCondition>,
    scope: ActivitySlot,
}

impl ParseNode for ForEachNode {
    fn kind(&self) -> NodeKind {
        NodeKind::ForEach
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match (kind, self.core.absorb(fragment)) {
            (_, None) => {}
            (NodeKind::StartCounterValue, Some(Fragment::Expression(e))) => {
                set_once(ctx, &mut self.start_counter, e, "startCounterValue")
            }
            (NodeKind::FinalCounterValue, Some(Fragment::Expression(e))) => {
                set_once(ctx, &mut self.final_counter, e, "finalCounterValue")
            }
            (_, Some(Fragment::CompletionCondition(c))) => {
                set_once(ctx, &mut self.completion_condition, c, "completionCondition")
            }
            (NodeKind::Scope, Some(Fragment::Activity(a))) => self.scope.fill(ctx, a),
            _ => return Err(unrecognized(NodeKind::ForEach, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let info = node.core.info().clone();
        let start_counter = match node.start_counter {
            Some(e) => e,
            None => missing_expression(ctx, "startCounterValue", &info),
        };
        let final_counter = match node.final_counter {
            Some(e) => e,
            None => missing_expression(ctx, "finalCounterValue", &info),
        };
        let for_each = ForEach {
            counter_name: node.counter_name,
            parallel: node.parallel,
            start_counter,
            final_counter,
            completion_condition: node.completion_condition,
            scope: node.scope.take_or_empty(ctx, &info),
        };
        Ok(Fragment::Activity(
            node.core
                .into_activity(ActivityKind::ForEach(Box::new(for_each))),
        ))
    }
}

pub(crate) fn for_each(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let core = ActivityCore::new(ctx, el);
    let counter_name = ctx.required_attr(el, "counterName");
    let parallel = match ctx.yes_no_attr(el, "parallel") {
        Some(p) => p,
        None => {
            if !el.has_attr("parallel") {
                ctx.error_at(el, DiagnosticKey::MissingRequiredAttribute, &["parallel"]);
            }
            false
        }
    };
    Ok(Box::new(ForEachNode {
        core,
        counter_name,
        parallel,
        start_counter: None,
        final_counter: None,
        completion_condition: None,
        scope: ActivitySlot::default(),
    }))
}

#[derive(Debug)]
struct CompletionConditionNode(CompletionCondition);

impl ParseNode for CompletionConditionNode {
    fn kind(&self) -> NodeKind {
        NodeKind::CompletionCondition
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Branches(b) => {
                set_once(ctx, &mut self.0.branches, b, "branches");
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::CompletionCondition, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::CompletionCondition(self.0))
    }
}

pub(crate) fn completion_condition(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(CompletionConditionNode(CompletionCondition {
        branches: None::<Branches>,
        info: el.source_info(),
    })))
}
