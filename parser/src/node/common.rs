//! Pieces shared by many nodes: the activity header, the single-activity
//! slot, homogeneous lists, buckets and raw XML capture.

use super::{unrecognized, Fragment, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::{DiagnosticKey, QName, SourceInfo};
use bpel_model::{
    Activity, ActivityKind, Dialect, Expression, LinkSource, LinkTarget, XmlAttribute, XmlElement,
};
use bpel_registry::NodeKind;

// ==================== Activity header ====================

/// Attributes and link references common to every activity.
#[derive(Debug)]
pub(crate) struct ActivityCore {
    name: Option<String>,
    join_condition: Option<Expression>,
    suppress_join_failure: Option<bool>,
    targets: Vec<LinkTarget>,
    sources: Vec<LinkSource>,
    extension_attributes: Vec<XmlAttribute>,
    info: SourceInfo,
}

impl ActivityCore {
    pub fn new(ctx: &mut ParseContext, el: &StartElement) -> Self {
        let join_condition = if ctx.dialect() == Dialect::Bpel11 {
            ctx.expression_attr(el, "joinCondition")
        } else {
            None
        };
        Self {
            name: ctx.attr(el, "name"),
            join_condition,
            suppress_join_failure: ctx.yes_no_attr(el, "suppressJoinFailure"),
            targets: Vec::new(),
            sources: Vec::new(),
            extension_attributes: el.extension_attributes.clone(),
            info: el.source_info(),
        }
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    /// Take link references out of `fragment`, handing anything else back.
    pub fn absorb(&mut self, fragment: Fragment) -> Option<Fragment> {
        match fragment {
            Fragment::Source(source) => self.sources.push(source),
            Fragment::Sources(sources) => self.sources.extend(sources),
            Fragment::Target(target) => self.targets.push(target),
            Fragment::Targets(join_condition, targets) => {
                if join_condition.is_some() {
                    self.join_condition = join_condition;
                }
                self.targets.extend(targets);
            }
            other => return Some(other),
        }
        None
    }

    pub fn into_activity(self, kind: ActivityKind) -> Activity {
        Activity {
            name: self.name,
            join_condition: self.join_condition,
            suppress_join_failure: self.suppress_join_failure,
            targets: self.targets,
            sources: self.sources,
            extension_attributes: self.extension_attributes,
            info: self.info,
            kind,
        }
    }
}

// ==================== Single activity ====================

/// Holds the one activity a container element allows.
#[derive(Debug, Default)]
pub(crate) struct ActivitySlot(Option<Activity>);

impl ActivitySlot {
    pub fn fill(&mut self, ctx: &mut ParseContext, activity: Activity) {
        if self.0.is_some() {
            ctx.error(DiagnosticKey::DuplicateChild, &[activity.kind_name()]);
        } else {
            self.0 = Some(activity);
        }
    }

    /// The activity, or an `empty` placeholder after reporting its absence.
    pub fn take_or_empty(self, ctx: &mut ParseContext, info: &SourceInfo) -> Activity {
        match self.0 {
            Some(activity) => activity,
            None => {
                ctx.error(DiagnosticKey::MissingRequiredChild, &["activity"]);
                Activity::empty(info.clone())
            }
        }
    }
}

/// Store `value` unless the section was already seen.
pub(crate) fn set_once<T>(ctx: &mut ParseContext, slot: &mut Option<T>, value: T, element: &str) {
    if slot.is_some() {
        ctx.error(DiagnosticKey::DuplicateChild, &[element]);
    } else {
        *slot = Some(value);
    }
}

// ==================== Lists ====================

/// A wrapper element whose children are all of one kind.
pub(crate) struct ListNode<T> {
    kind: NodeKind,
    extract: fn(Fragment) -> Option<T>,
    wrap: fn(Vec<T>) -> Fragment,
    items: Vec<T>,
}

impl<T> ListNode<T> {
    pub fn boxed(
        kind: NodeKind,
        extract: fn(Fragment) -> Option<T>,
        wrap: fn(Vec<T>) -> Fragment,
    ) -> NodeResult<Box<dyn ParseNode>>
    where
        T: 'static,
    {
        Ok(Box::new(Self {
            kind,
            extract,
            wrap,
            items: Vec::new(),
        }))
    }
}

impl<T> ParseNode for ListNode<T> {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        let item = (self.extract)(fragment).ok_or_else(|| unrecognized(self.kind, kind))?;
        self.items.push(item);
        Ok(())
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok((self.wrap)(self.items))
    }
}

// ==================== Buckets ====================

/// Swallows an element and everything inside it.
#[derive(Debug)]
pub(crate) struct BucketNode {
    kind: NodeKind,
}

impl BucketNode {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind }
    }
}

impl ParseNode for BucketNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_content(&mut self, _ctx: &mut ParseContext, _text: &str) -> NodeResult<()> {
        Ok(())
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        _kind: NodeKind,
        _fragment: Fragment,
    ) -> NodeResult<()> {
        Ok(())
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Ignored)
    }
}

pub(crate) fn extensibility_bucket(
    _ctx: &mut ParseContext,
    _el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(BucketNode::new(NodeKind::ExtensibilityBucket)))
}

// ==================== Raw XML ====================

/// Rebuild the element as data: unqualified attributes first, then
/// namespaced ones, each in source order.
pub(crate) fn capture_element(el: &StartElement) -> XmlElement {
    let mut element = XmlElement::new(el.name.clone());
    element.attributes = el
        .attributes
        .iter()
        .map(|(name, value)| XmlAttribute::new(QName::unqualified(name.as_str()), value.as_str()))
        .chain(el.extension_attributes.iter().cloned())
        .collect();
    element
}

/// Keeps an arbitrary subtree, text and all.
#[derive(Debug)]
pub(crate) struct XmlCaptureNode {
    element: XmlElement,
}

impl XmlCaptureNode {
    pub fn new(element: XmlElement) -> Self {
        Self { element }
    }
}

impl ParseNode for XmlCaptureNode {
    fn kind(&self) -> NodeKind {
        NodeKind::XmlCapture
    }

    fn on_content(&mut self, _ctx: &mut ParseContext, text: &str) -> NodeResult<()> {
        self.element.push_text(text);
        Ok(())
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Xml(child) => {
                self.element.push_element(child);
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::XmlCapture, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Xml(self.element))
    }
}

pub(crate) fn xml_capture(
    _ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(XmlCaptureNode::new(capture_element(el))))
}
