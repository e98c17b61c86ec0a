//! `<correlations>` and the inbound pattern rule.

use super::{Fragment, ListNode, NodeResult, ParseNode};
use crate::{ParseContext, StartElement};
use bpel_core::{Diagnostic, DiagnosticKey, Location};
use bpel_model::{Correlation, CorrelationPattern, Dialect, Initiate};
use bpel_registry::NodeKind;

#[derive(Debug)]
struct CorrelationNode(Correlation);

impl ParseNode for CorrelationNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Correlation
    }

    fn finalize(self: Box<Self>, _ctx: &mut ParseContext) -> NodeResult<Fragment> {
        Ok(Fragment::Correlation(self.0))
    }
}

/// Map a `pattern` token. Both the 1.1 and the 2.0 vocabularies are accepted.
fn parse_pattern(token: &str) -> Option<CorrelationPattern> {
    match token {
        "out" | "request" => Some(CorrelationPattern::Out),
        "in" | "response" => Some(CorrelationPattern::In),
        _ => None,
    }
}

pub(crate) fn correlation(
    ctx: &mut ParseContext,
    el: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    let pattern = match el.attr("pattern") {
        None => None,
        Some(token) => match parse_pattern(token) {
            Some(p) => Some(p),
            None => {
                return Err(ctx.fatal(
                    el.location(),
                    DiagnosticKey::MalformedInput,
                    &["pattern", token],
                ))
            }
        },
    };
    let initiate = match el.attr("initiate") {
        None | Some("no") => Initiate::No,
        Some("yes") => Initiate::Yes,
        Some("join") if ctx.dialect() != Dialect::Bpel11 => Initiate::Join,
        Some(other) => {
            let other = other.to_string();
            ctx.error_at(el, DiagnosticKey::InvalidAttributeValue, &["initiate", &other]);
            Initiate::No
        }
    };
    Ok(Box::new(CorrelationNode(Correlation {
        set: ctx.required_attr(el, "set"),
        initiate,
        pattern,
        info: el.source_info(),
    })))
}

pub(crate) fn correlations(
    _: &mut ParseContext,
    _: &StartElement,
) -> NodeResult<Box<dyn ParseNode>> {
    ListNode::boxed(
        NodeKind::Correlations,
        |f| match f {
            Fragment::Correlation(c) => Some(c),
            _ => None,
        },
        Fragment::Correlations,
    )
}

/// Inbound messages only ever correlate `in`. Any other declared pattern
/// is overridden with a warning.
pub(crate) fn force_inbound(ctx: &mut ParseContext, correlations: &mut [Correlation]) {
    for c in correlations.iter_mut() {
        if let Some(declared) = c.pattern.filter(|p| *p != CorrelationPattern::In) {
            let location = Location::new(c.info.line, "correlation");
            ctx.report(
                Diagnostic::warning(DiagnosticKey::InvalidAttributeValue, location)
                    .with_arg("pattern")
                    .with_arg(format!("{:?}", declared).to_lowercase()),
            );
        }
        c.pattern = Some(CorrelationPattern::In);
    }
}
