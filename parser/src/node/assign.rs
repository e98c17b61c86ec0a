//! `<assign>`, its copies and the `from`/`to` value references.
//!
//! `from` and `to` are the densest shape problem in the grammar: the same
//! element names a variable, a property, a partner link endpoint, an
//! expression or a literal depending on which attributes are present. The
//! legal forms per dialect are [`ShapeSelector`]s; when no form attribute is
//! present the element carries its value as content.

use super::{capture_element, set_once, unrecognized, ActivityCore, Fragment, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::{DiagnosticKey, SourceInfo};
use bpel_model::{
    ActivityKind, Assign, AssignCopy, Dialect, EndpointReference, Expression, Literal, ValueRef,
    XmlElement, XmlNode,
};
use bpel_registry::NodeKind;
use bpel_shape::{AttrShape, Selection, ShapeSelector};

// ==================== Assign ====================

#[derive(Debug)]
struct AssignNode {
    core: ActivityCore,
    assign: Assign,
    copies_seen: usize,
}

impl ParseNode for AssignNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Assign
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match self.core.absorb(fragment) {
            None | Some(Fragment::Ignored) => Ok(()),
            Some(Fragment::Copy(copy)) => {
                self.copies_seen += 1;
                self.assign.copies.push(copy);
                Ok(())
            }
            Some(Fragment::Dropped) => {
                self.copies_seen += 1;
                Ok(())
            }
            Some(_) => Err(unrecognized(NodeKind::Assign, kind)),
        }
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        if node.copies_seen == 0 {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["copy"]);
        }
        Ok(Fragment::Activity(
            node.core.into_activity(ActivityKind::Assign(node.assign)),
        ))
    }
}

pub(crate) fn assign(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(AssignNode {
        core: ActivityCore::new(ctx, el),
        assign: Assign {
            validate: ctx.yes_no_attr(el, "validate").unwrap_or(false),
            copies: Vec::new(),
        },
        copies_seen: 0,
    }))
}

// ==================== Copy ====================

#[derive(Debug)]
struct CopyNode {
    from: Option<Option<ValueRef>>,
    to: Option<Option<ValueRef>>,
    keep_src_element_name: bool,
    ignore_missing_from_data: bool,
    info: SourceInfo,
}

impl ParseNode for CopyNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Copy
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::From(v) => set_once(ctx, &mut self.from, v, "from"),
            Fragment::To(v) => set_once(ctx, &mut self.to, v, "to"),
            _ => return Err(unrecognized(NodeKind::Copy, kind)),
        }
        Ok(())
    }

    /// A copy missing either side, or with an unusable one, is reported and dropped.
    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let node = *self;
        if node.from.is_none() {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["from"]);
        }
        if node.to.is_none() {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["to"]);
        }
        match (node.from.flatten(), node.to.flatten()) {
            (Some(from), Some(to)) => Ok(Fragment::Copy(AssignCopy {
                from,
                to,
                keep_src_element_name: node.keep_src_element_name,
                ignore_missing_from_data: node.ignore_missing_from_data,
                info: node.info,
            })),
            _ => Ok(Fragment::Dropped),
        }
    }
}

pub(crate) fn copy(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(CopyNode {
        from: None,
        to: None,
        keep_src_element_name: ctx.yes_no_attr(el, "keepSrcElementName").unwrap_or(false),
        ignore_missing_from_data: ctx
            .yes_no_attr(el, "ignoreMissingFromData")
            .unwrap_or(false),
        info: el.source_info(),
    }))
}

// ==================== Value forms ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueForm {
    Variable,
    Property,
    PartnerLink,
    Expression,
    Opaque,
}

/// Value attributes that 2.0 replaced with child elements or dropped.
const BPEL11_ONLY: &[&str] = &["expression", "opaque", "query"];

/// The attribute forms `from` (or `to`) accepts in `dialect`.
fn value_selector(dialect: Dialect, kind: NodeKind) -> ShapeSelector<ValueForm> {
    let bpel11 = dialect == Dialect::Bpel11;
    let variable = if bpel11 {
        AttrShape::required(&["variable"]).optional(&["part", "query"])
    } else {
        AttrShape::required(&["variable"]).optional(&["part"])
    };
    let partner_link = match (bpel11, kind) {
        (_, NodeKind::To) => AttrShape::required(&["partnerLink"]),
        (true, _) => AttrShape::required(&["partnerLink"]).optional(&["endpointReference"]),
        (false, _) => AttrShape::required(&["partnerLink", "endpointReference"]),
    };
    let selector = ShapeSelector::new()
        .alternative(ValueForm::Variable, variable)
        .alternative(
            ValueForm::Property,
            AttrShape::required(&["variable", "property"]),
        )
        .alternative(ValueForm::PartnerLink, partner_link);
    if bpel11 && kind == NodeKind::From {
        selector
            .alternative(ValueForm::Expression, AttrShape::required(&["expression"]))
            .alternative(ValueForm::Opaque, AttrShape::required(&["opaque"]))
    } else {
        selector
    }
}

/// Build the value an attribute form names. `None` once a problem is reported.
fn value_from_attributes(
    ctx: &mut ParseContext,
    el: &StartElement,
    form: ValueForm,
) -> Option<ValueRef> {
    let variable = || el.attr("variable").unwrap_or_default().to_string();
    match form {
        ValueForm::Variable => Some(ValueRef::Variable {
            variable: variable(),
            part: ctx.attr(el, "part"),
            query: ctx.expression_attr(el, "query"),
        }),
        ValueForm::Property => ctx
            .qname_attr(el, "property")
            .map(|property| ValueRef::Property {
                variable: variable(),
                property,
            }),
        ValueForm::PartnerLink => {
            let endpoint_reference = match el.attr("endpointReference") {
                None => None,
                Some("myRole") => Some(EndpointReference::MyRole),
                Some("partnerRole") => Some(EndpointReference::PartnerRole),
                Some(other) => {
                    let other = other.to_string();
                    ctx.error_at(
                        el,
                        DiagnosticKey::InvalidAttributeValue,
                        &["endpointReference", &other],
                    );
                    return None;
                }
            };
            Some(ValueRef::PartnerLink {
                partner_link: ctx.required_attr(el, "partnerLink"),
                endpoint_reference,
            })
        }
        ValueForm::Expression => ctx.expression_attr(el, "expression").map(ValueRef::Expression),
        ValueForm::Opaque => {
            ctx.error_at(el, DiagnosticKey::UnsupportedConstruct, &["opaque"]);
            None
        }
    }
}

/// Drop formatting whitespace between captured elements. Pure text is kept
/// exactly as written.
fn literal_from(children: Vec<XmlNode>) -> Literal {
    let has_elements = children.iter().any(|c| matches!(c, XmlNode::Element(_)));
    let children = if has_elements {
        children
            .into_iter()
            .filter(|c| !matches!(c, XmlNode::Text(t) if t.trim().is_empty()))
            .collect()
    } else {
        children
    };
    Literal::wrap(children)
}

fn has_content(content: &XmlElement) -> bool {
    content.children.iter().any(|c| match c {
        XmlNode::Element(_) => true,
        XmlNode::Text(t) => !t.trim().is_empty(),
    })
}

// ==================== From and to ====================

/// How the element carries its value.
#[derive(Debug)]
enum ValueState {
    /// Named by attributes.
    Attributes(Option<ValueRef>),
    /// No form attribute: the value is the element content.
    Inline,
}

#[derive(Debug)]
struct ValueNode {
    kind: NodeKind,
    dialect: Dialect,
    state: ValueState,
    /// Inline text and, in 1.1, captured elements in document order.
    content: XmlElement,
    literal: Option<Literal>,
    query: Option<Expression>,
    language: Option<String>,
    info: SourceInfo,
}

impl ValueNode {
    fn boxed(
        kind: NodeKind,
        ctx: &mut ParseContext,
        el: &StartElement,
    ) -> NodeResult<Box<dyn ParseNode>> {
        let dialect = ctx.dialect();
        let legacy: Vec<&str> = if dialect == Dialect::Bpel11 {
            Vec::new()
        } else {
            BPEL11_ONLY.iter().copied().filter(|name| el.has_attr(name)).collect()
        };
        let state = match value_selector(dialect, kind).select(el.attribute_names()) {
            _ if !legacy.is_empty() => {
                ctx.error_at(el, DiagnosticKey::InvalidAttributeCombination, &legacy);
                ValueState::Attributes(None)
            }
            Selection::Inline => ValueState::Inline,
            Selection::Matched(form) => ValueState::Attributes(value_from_attributes(ctx, el, form)),
            invalid => {
                let offending: Vec<&str> = invalid.offending().iter().map(String::as_str).collect();
                ctx.error_at(el, DiagnosticKey::InvalidAttributeCombination, &offending);
                ValueState::Attributes(None)
            }
        };
        Ok(Box::new(Self {
            kind,
            dialect,
            state,
            content: XmlElement::new(el.name.clone()),
            literal: None,
            query: None,
            language: ctx.attr(el, "expressionLanguage"),
            info: el.source_info(),
        }))
    }

    /// The value carried as content.
    fn inline_value(self, ctx: &mut ParseContext) -> Option<ValueRef> {
        if self.query.is_some() {
            ctx.error(DiagnosticKey::UnexpectedElement, &["query"]);
        }
        let content = self.content;
        if let Some(literal) = self.literal {
            if has_content(&content) {
                ctx.error(DiagnosticKey::UnexpectedContent, &[content.text().trim()]);
            }
            return Some(ValueRef::Literal(literal));
        }
        match (self.dialect, self.kind) {
            (Dialect::Bpel11, NodeKind::From) => {
                if !has_content(&content) {
                    ctx.error(DiagnosticKey::MissingRequiredChild, &["literal"]);
                }
                Some(ValueRef::Literal(literal_from(content.children)))
            }
            (Dialect::Bpel11, _) => {
                ctx.error(
                    DiagnosticKey::MissingRequiredAttribute,
                    &["variable|partnerLink"],
                );
                None
            }
            (_, kind) => {
                let text = content.text();
                let text = text.trim();
                if !text.is_empty() {
                    Some(ValueRef::Expression(Expression::new(
                        text,
                        self.language,
                        self.info,
                    )))
                } else if kind == NodeKind::From {
                    ctx.error(DiagnosticKey::MissingRequiredChild, &["literal"]);
                    Some(ValueRef::Literal(Literal::wrap(Vec::new())))
                } else {
                    ctx.error(
                        DiagnosticKey::MissingRequiredAttribute,
                        &["variable|partnerLink"],
                    );
                    None
                }
            }
        }
    }

    /// The value named by attributes, joined with a `query` child.
    fn attribute_value(self, ctx: &mut ParseContext, value: Option<ValueRef>) -> Option<ValueRef> {
        if self.literal.is_some() {
            ctx.error(DiagnosticKey::UnexpectedElement, &["literal"]);
        }
        match (value, self.query) {
            (Some(ValueRef::Variable { variable, part, .. }), Some(query)) => {
                Some(ValueRef::Variable {
                    variable,
                    part,
                    query: Some(query),
                })
            }
            (Some(value), Some(_)) => {
                ctx.error(DiagnosticKey::UnexpectedElement, &["query"]);
                Some(value)
            }
            (value, _) => value,
        }
    }
}

impl ParseNode for ValueNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_content(&mut self, ctx: &mut ParseContext, text: &str) -> NodeResult<()> {
        match self.state {
            ValueState::Inline => {
                self.content.push_text(text);
                Ok(())
            }
            ValueState::Attributes(_) => {
                if !text.trim().is_empty() {
                    ctx.error(DiagnosticKey::UnexpectedContent, &[text.trim()]);
                }
                Ok(())
            }
        }
    }

    fn on_child_finalized(
        &mut self,
        ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Xml(element) => match self.state {
                ValueState::Inline => self.content.push_element(element),
                ValueState::Attributes(_) => {
                    ctx.error(DiagnosticKey::UnexpectedElement, &[&element.name.local]);
                }
            },
            Fragment::Literal(literal) => set_once(ctx, &mut self.literal, literal, "literal"),
            Fragment::Expression(query) if kind == NodeKind::Query => {
                set_once(ctx, &mut self.query, query, "query")
            }
            _ => return Err(unrecognized(self.kind, kind)),
        }
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let mut node = *self;
        let kind = node.kind;
        let value = match std::mem::replace(&mut node.state, ValueState::Inline) {
            ValueState::Inline => node.inline_value(ctx),
            ValueState::Attributes(value) => node.attribute_value(ctx, value),
        };
        Ok(if kind == NodeKind::From {
            Fragment::From(value)
        } else {
            Fragment::To(value)
        })
    }
}

pub(crate) fn from(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ValueNode::boxed(NodeKind::From, ctx, el)
}

pub(crate) fn to(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ValueNode::boxed(NodeKind::To, ctx, el)
}

// ==================== Literal ====================

/// The 2.0 `<literal>` wrapper. Its content is kept verbatim.
#[derive(Debug)]
struct LiteralNode {
    content: XmlElement,
}

impl ParseNode for LiteralNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Literal
    }

    fn on_content(&mut self, _ctx: &mut ParseContext, text: &str) -> NodeResult<()> {
        self.content.push_text(text);
        Ok(())
    }

    fn on_child_finalized(
        &mut self,
        _ctx: &mut ParseContext,
        kind: NodeKind,
        fragment: Fragment,
    ) -> NodeResult<()> {
        match fragment {
            Fragment::Xml(element) => {
                self.content.push_element(element);
                Ok(())
            }
            _ => Err(unrecognized(NodeKind::Literal, kind)),
        }
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Literal(literal_from(self.content.children)))
    }
}

pub(crate) fn literal(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(LiteralNode {
        content: capture_element(el),
    }))
}
