//! Activities without activity children.

use super::{
    timing_from_attributes, unrecognized, ActivityCore, Fragment, NodeResult, ParseNode,
    TimingChildren,
};
use crate::{ParseContext, StartElement};
use bpel_core::DiagnosticKey;
use bpel_model::{
    ActivityKind, Compensate, Dialect, ExtensionActivity, Throw, Wait, XmlElement,
};
use bpel_registry::NodeKind;

/// An activity whose whole content is its header and attributes.
#[derive(Debug)]
struct LeafNode {
    kind: NodeKind,
    core: ActivityCore,
    activity: ActivityKind,
}

impl LeafNode {
    fn boxed(
        kind: NodeKind,
        ctx: &mut ParseContext,
        el: &StartElement,
        activity: impl FnOnce(&mut ParseContext) -> ActivityKind,
    ) -> NodeResult<Box<dyn ParseNode>> {
        let core = ActivityCore::new(ctx, el);
        let activity = activity(ctx);
        Ok(Box::new(Self {
            kind,
            core,
            activity,
        }))
    }
}

impl ParseNode for LeafNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => Ok(()),
            Some(_) => Err(unrecognized(self.kind, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        Ok(Fragment::Activity(node.core.into_activity(node.activity)))
    }
}

pub(crate) fn empty(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    LeafNode::boxed(NodeKind::Empty, ctx, el, |_| ActivityKind::Empty)
}

pub(crate) fn throw(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    LeafNode::boxed(NodeKind::Throw, ctx, el, |ctx| {
        ActivityKind::Throw(Throw {
            fault_name: ctx.required_qname_attr(el, "faultName"),
            fault_variable: ctx.attr(el, "faultVariable"),
        })
    })
}

pub(crate) fn rethrow(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    LeafNode::boxed(NodeKind::Rethrow, ctx, el, |_| ActivityKind::Rethrow)
}

/// `exit`, and `terminate` in 1.1.
pub(crate) fn exit(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    LeafNode::boxed(NodeKind::Exit, ctx, el, |_| ActivityKind::Exit)
}

/// 1.1 `compensate`, and 2.0 `compensate` which has no target.
pub(crate) fn compensate(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    LeafNode::boxed(NodeKind::Compensate, ctx, el, |ctx| {
        ActivityKind::Compensate(Compensate {
            scope: ctx.attr(el, "scope"),
        })
    })
}

pub(crate) fn compensate_scope(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    LeafNode::boxed(NodeKind::CompensateScope, ctx, el, |ctx| {
        ActivityKind::Compensate(Compensate {
            scope: Some(ctx.required_attr(el, "target")),
        })
    })
}

// ==================== Wait ====================

#[derive(Debug)]
struct WaitNode {
    core: ActivityCore,
    timing: TimingChildren,
    from_attributes: bool,
}

impl ParseNode for WaitNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Wait
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
        match self.timing.accept(ctx, kind, fragment) {
            None => Ok(()),
            Some(_) => Err(unrecognized(NodeKind::Wait, kind)),
        }
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        if !node.from_attributes && node.timing.timing.is_none() {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["for|until"]);
        }
        let wait = Wait {
            timing: node.timing.timing,
        };
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Wait(wait)),
        ))
    }
}

/// 1.1 waits on a `for` or `until` attribute; 2.0 on a child element.
pub(crate) fn wait(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let core = ActivityCore::new(ctx, el);
    let from_attributes = ctx.dialect() == Dialect::Bpel11;
    let timing = TimingChildren {
        timing: if from_attributes {
            timing_from_attributes(ctx, el)
        } else {
            None
        },
        repeat_every: None,
    };
    Ok(Box::new(WaitNode {
        core,
        timing,
        from_attributes,
    }))
}

// ==================== Extension activity ====================

/// Keeps the single foreign element inside `<extensionActivity>`.
#[derive(Debug)]
struct ExtensionActivityNode {
    core: ActivityCore,
    element: Option<XmlElement>,
}

impl ParseNode for ExtensionActivityNode {
    fn kind(&self) -> NodeKind {
        NodeKind::ExtensionActivity
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None => {}
            Some(Fragment::Xml(element)) => {
                if self.element.is_some() {
                    ctx.error(
                        DiagnosticKey::DuplicateChild,
                        &[&element.name.to_string()],
                    );
                } else {
                    self.element = Some(element);
                }
            }
            Some(_) => return Err(unrecognized(NodeKind::ExtensionActivity, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        let element = match node.element {
            Some(element) => element,
            None => {
                ctx.error(DiagnosticKey::MissingRequiredChild, &["extension element"]);
                XmlElement::new(ctx.qname("extensionActivity"))
            }
        };
        Ok(Fragment::Activity(node.core.into_activity(
            ActivityKind::Extension(ExtensionActivity { element }),
        )))
    }
}

pub(crate) fn extension_activity(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(ExtensionActivityNode {
        core: ActivityCore::new(ctx, el),
        element: None,
    }))
}
