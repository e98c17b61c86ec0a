//! Partner links, partners, variables and correlation sets.

use super::{unrecognized, Fragment, ListNode, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::DiagnosticKey;
use bpel_model::{CorrelationSet, Partner, PartnerLink, Variable, VariableType};
use bpel_registry::NodeKind;
use bpel_shape::{AttrShape, Selection, ShapeSelector};

// ==================== Partner links ====================

#[derive(Debug)]
struct PartnerLinkNode(PartnerLink);

impl ParseNode for PartnerLinkNode {
    fn kind(&self) -> NodeKind {
        NodeKind::PartnerLink
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::PartnerLink(self.0))
    }
}

pub(crate) fn partner_link(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(PartnerLinkNode(PartnerLink {
        name: ctx.required_attr(el, "name"),
        partner_link_type: ctx.required_qname_attr(el, "partnerLinkType"),
        my_role: ctx.attr(el, "myRole"),
        partner_role: ctx.attr(el, "partnerRole"),
        initialize_partner_role: ctx.yes_no_attr(el, "initializePartnerRole"),
        info: el.source_info(),
    })))
}

pub(crate) fn partner_links(
    _: &mut ParseContext,
    _: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::PartnerLinks,
        |f| match f {
            Fragment::PartnerLink(p) => Some(p),
            _ => None,
        },
        Fragment::PartnerLinks,
    )
}

// ==================== Partners ====================

/// A 1.1 `<partner>` grouping partner links by name.
#[derive(Debug)]
struct PartnerNode(Partner);

impl ParseNode for PartnerNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Partner
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::PartnerLinkRef(name) => {
                self.0.partner_links.push(name);
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::Partner, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Partner(self.0))
    }
}

pub(crate) fn partner(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(PartnerNode(Partner {
        name: ctx.required_attr(el, "name"),
        partner_links: Vec::new(),
        info: el.source_info(),
    })))
}

#[derive(Debug)]
struct PartnerLinkRefNode(String);

impl ParseNode for PartnerLinkRefNode {
    fn kind(&self) -> NodeKind {
        NodeKind::PartnerLinkRef
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::PartnerLinkRef(self.0))
    }
}

pub(crate) fn partner_link_ref(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(PartnerLinkRefNode(ctx.required_attr(el, "name"))))
}

pub(crate) fn partners(_: &mut ParseContext, _: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::Partners,
        |f| match f {
            Fragment::Partner(p) => Some(p),
            _ => None,
        },
        Fragment::Partners,
    )
}

// ==================== Variables ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeForm {
    MessageType,
    Type,
    Element,
}

impl TypeForm {
    fn attribute(self) -> &'static str {
        match self {
            TypeForm::MessageType => "messageType",
            TypeForm::Type => "type",
            TypeForm::Element => "element",
        }
    }
}

fn type_selector() -> ShapeSelector<TypeForm> {
    [TypeForm::MessageType, TypeForm::Type, TypeForm::Element]
        .into_iter()
        .fold(ShapeSelector::new(), |sel, form| {
            sel.alternative(form, AttrShape::required(&[form.attribute()]))
        })
}

#[derive(Debug)]
struct VariableNode(Variable);

impl ParseNode for VariableNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Variable
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::From(value) => {
                if self.0.initializer.is_some() {
                    ctx.error(DiagnosticKey::DuplicateChild, &["from"]);
                } else {
                    self.0.initializer = value;
                }
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::Variable, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Variable(self.0))
    }
}

/// A variable typed by exactly one of `messageType`, `type` or `element`.
pub(crate) fn variable(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    let name = ctx.required_attr(el, "name");
    let ty = match type_selector().select(el.attribute_names()) {
        Selection::Matched(form) => ctx.qname_attr(el, form.attribute()).map(|q| match form {
            TypeForm::MessageType => VariableType::MessageType(q),
            TypeForm::Type => VariableType::Type(q),
            TypeForm::Element => VariableType::Element(q),
        }),
        Selection::Inline => {
            ctx.error_at(
                el,
                DiagnosticKey::MissingRequiredAttribute,
                &["messageType|type|element"],
            );
            None
        }
        invalid => {
            let offending: Vec<&str> = invalid.offending().iter().map(String::as_str).collect();
            ctx.error_at(el, DiagnosticKey::InvalidAttributeCombination, &offending);
            None
        }
    };
    Ok(Box::new(VariableNode(Variable {
        name,
        ty,
        initializer: None,
        info: el.source_info(),
    })))
}

pub(crate) fn variables(_: &mut ParseContext, _: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::Variables,
        |f| match f {
            Fragment::Variable(v) => Some(v),
            _ => None,
        },
        Fragment::Variables,
    )
}

// ==================== Correlation sets ====================

#[derive(Debug)]
struct CorrelationSetNode(CorrelationSet);

impl ParseNode for CorrelationSetNode {
    fn kind(&self) -> NodeKind {
        NodeKind::CorrelationSet
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::CorrelationSet(self.0))
    }
}

pub(crate) fn correlation_set(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    let name = ctx.required_attr(el, "name");
    if !el.has_attr("properties") {
        ctx.error_at(el, DiagnosticKey::MissingRequiredAttribute, &["properties"]);
    }
    Ok(Box::new(CorrelationSetNode(CorrelationSet {
        name,
        properties: ctx.qname_list_attr(el, "properties"),
        info: el.source_info(),
    })))
}

pub(crate) fn correlation_sets(
    _: &mut ParseContext,
    _: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::CorrelationSets,
        |f| match f {
            Fragment::CorrelationSet(c) => Some(c),
            _ => None,
        },
        Fragment::CorrelationSets,
    )
}
