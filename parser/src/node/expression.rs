//! Text-bearing expression elements (2.0 and the 2004 draft).

use super::{Fragment, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::{DiagnosticKey, SourceInfo};
use bpel_model::{Branches, Expression};
use bpel_registry::NodeKind;

/// Buffers the element text and yields an [`Expression`] on close.
#[derive(Debug)]
pub(crate) struct ExpressionNode {
    kind: NodeKind,
    language: Option<String>,
    text: String,
    info: SourceInfo,
}

impl ExpressionNode {
    fn new(kind: NodeKind, el: &StartElement) -> Self {
        let language_attr = if kind == NodeKind::Query {
            "queryLanguage"
        } else {
            "expressionLanguage"
        };
        Self {
            kind,
            language: el.attr(language_attr).map(str::to_string),
            text: String::new(),
            info: el.source_info(),
        }
    }

    fn boxed(kind: NodeKind, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
        Ok(Box::new(Self::new(kind, el)))
    }

    /// The trimmed text, reported when blank.
    fn into_expression(self, ctx: &mut ParseContext) -> Expression {
        let text = self.text.trim();
        if text.is_empty() {
            ctx.error(DiagnosticKey::MissingRequiredChild, &["expression"]);
        }
        Expression::new(text, self.language, self.info)
    }
}

impl ParseNode for ExpressionNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn on_content(&mut self, _ctx: &mut ParseContext, text: &str) -> NodeResult<()> {
        self.text.push_str(text);
        Ok(())
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Expression(self.into_expression(ctx)))
    }
}

pub(crate) fn condition(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::Condition, el)
}

pub(crate) fn join_condition(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::JoinCondition, el)
}

pub(crate) fn transition_condition(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::TransitionCondition, el)
}

pub(crate) fn for_duration(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::For, el)
}

pub(crate) fn until_deadline(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::Until, el)
}

pub(crate) fn repeat_every(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::RepeatEvery, el)
}

pub(crate) fn start_counter_value(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::StartCounterValue, el)
}

pub(crate) fn final_counter_value(
    _: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::FinalCounterValue, el)
}

pub(crate) fn query(_: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    ExpressionNode::boxed(NodeKind::Query, el)
}

/// `<branches>` inside a `forEach` completion condition.
#[derive(Debug)]
pub(crate) struct BranchesNode {
    expression: ExpressionNode,
    successful_branches_only: bool,
}

impl ParseNode for BranchesNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Branches
    }

    fn on_content(&mut self, ctx: &mut ParseContext, text: &str) -> NodeResult<()> {
        self.expression.on_content(ctx, text)
    }

    fn finalize(self: Box<Self>, ctx: &mut ParseContext) -> NodeResult<Fragment> {
        let BranchesNode {
            expression,
            successful_branches_only,
        } = *self;
        Ok(Fragment::Branches(Branches {
            expression: expression.into_expression(ctx),
            successful_branches_only,
        }))
    }
}

pub(crate) fn branches(ctx: &mut ParseContext, el: &StartElement) -> NodeResult<Box<dyn ParseNode>> {
    Ok(Box::new(BranchesNode {
        expression: ExpressionNode::new(NodeKind::Branches, el),
        successful_branches_only: ctx
            .yes_no_attr(el, "successfulBranchesOnly")
            .unwrap_or(false),
    }))
}
