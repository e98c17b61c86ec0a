//! Flow links and the link references activities carry.

use super::{set_once, unrecognized, Fragment, ListNode, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_model::{Dialect, Expression, Link, LinkSource, LinkTarget};
use bpel_registry::NodeKind;

#[derive(Debug)]
struct LinkNode(Link);

impl ParseNode for LinkNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Link
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Link(self.0))
    }
}

pub(crate) fn link(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(LinkNode(Link {
        name: ctx.required_attr(el, "name"),
        info: el.source_info(),
    })))
}

pub(crate) fn links(_: &mut ParseContext, _: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::Links,
        |f| match f {
            Fragment::Link(l) => Some(l),
            _ => None,
        },
        Fragment::Links,
    )
}

// ==================== Sources ====================

#[derive(Debug)]
struct SourceNode(LinkSource);

impl ParseNode for SourceNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Source
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Expression(e) if kind == NodeKind::TransitionCondition => {
                set_once(ctx, &mut self.0.transition_condition, e, "transitionCondition");
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::Source, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Source(self.0))
    }
}

/// 1.1 writes the transition condition as an attribute, 2.0 as a child.
pub(crate) fn source(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let transition_condition = if ctx.dialect() == Dialect::Bpel11 {
        ctx.expression_attr(el, "transitionCondition")
    } else {
        None
    };
    Ok(Box::new(SourceNode(LinkSource {
        link_name: ctx.required_attr(el, "linkName"),
        transition_condition,
        info: el.source_info(),
    })))
}

pub(crate) fn sources(_: &mut ParseContext, _: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::Sources,
        |f| match f {
            Fragment::Source(s) => Some(s),
            _ => None,
        },
        Fragment::Sources,
    )
}

// ==================== Targets ====================

#[derive(Debug)]
struct TargetNode(LinkTarget);

impl ParseNode for TargetNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Target
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Target(self.0))
    }
}

pub(crate) fn target(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(TargetNode(LinkTarget {
        link_name: ctx.required_attr(el, "linkName"),
        info: el.source_info(),
    })))
}

/// 2.0 `<targets>`: the join condition travels with the target list.
#[derive(Debug, Default)]
struct TargetsNode {
    join_condition: Option<Expression>,
    targets: Vec<LinkTarget>,
}

impl ParseNode for TargetsNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Targets
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Target(t) => self.targets.push(t),
            Fragment::Expression(e) if kind == NodeKind::JoinCondition => {
                set_once(ctx, &mut self.join_condition, e, "joinCondition")
            }
            _ => return Err(unrecognized(NodeKind::Targets, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        Ok(Fragment::Targets(node.join_condition, node.targets))
    }
}

pub(crate) fn targets(_: &mut ParseContext, _: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::<TargetsNode>::default())
}
