//! WS-BPEL 2.0, final and working draft. The draft keeps `switch` and
//! wraps the `if` branch in `<then>`; everything else is shared.

use super::{Graph, Provider};
use crate::node::*;
use bpel_model::Dialect;
use bpel_registry::{GraphError, NodeKind};

/// Kinds that swallow foreign-namespace children and `<documentation>`.
/// Activities are added by the provider.
const EXTENSIBLE: &[NodeKind] = &[
    NodeKind::Process,
    NodeKind::Import,
    NodeKind::Extensions,
    NodeKind::Extension,
    NodeKind::PartnerLinks,
    NodeKind::PartnerLink,
    NodeKind::Variables,
    NodeKind::Variable,
    NodeKind::CorrelationSets,
    NodeKind::CorrelationSet,
    NodeKind::Correlations,
    NodeKind::Correlation,
    NodeKind::FaultHandlers,
    NodeKind::Catch,
    NodeKind::CatchAll,
    NodeKind::CompensationHandler,
    NodeKind::TerminationHandler,
    NodeKind::EventHandlers,
    NodeKind::OnEvent,
    NodeKind::OnMessage,
    NodeKind::OnAlarm,
    NodeKind::Copy,
    NodeKind::Links,
    NodeKind::Link,
    NodeKind::Sources,
    NodeKind::Source,
    NodeKind::Targets,
    NodeKind::Target,
    NodeKind::ElseIf,
    NodeKind::Else,
    NodeKind::CompletionCondition,
    NodeKind::Branches,
    NodeKind::Condition,
    NodeKind::JoinCondition,
    NodeKind::TransitionCondition,
    NodeKind::For,
    NodeKind::Until,
    NodeKind::RepeatEvery,
    NodeKind::Query,
    NodeKind::StartCounterValue,
    NodeKind::FinalCounterValue,
];

const DRAFT_EXTENSIBLE: &[NodeKind] = &[NodeKind::Then, NodeKind::Case, NodeKind::Otherwise];

pub(super) fn graph(dialect: Dialect) -> Result<Graph, GraphError> {
    let draft = dialect == Dialect::Bpel20Draft;
    let mut p = Provider::new(dialect);

    p.activities(&[
        (NodeKind::Empty, "empty", empty),
        (NodeKind::Invoke, "invoke", invoke),
        (NodeKind::Receive, "receive", receive),
        (NodeKind::Reply, "reply", reply),
        (NodeKind::Assign, "assign", assign),
        (NodeKind::Wait, "wait", wait),
        (NodeKind::Throw, "throw", throw),
        (NodeKind::Rethrow, "rethrow", rethrow),
        (NodeKind::Exit, "exit", exit),
        (NodeKind::Flow, "flow", flow),
        (NodeKind::If, "if", if_activity),
        (NodeKind::While, "while", while_loop),
        (NodeKind::RepeatUntil, "repeatUntil", repeat_until),
        (NodeKind::Sequence, "sequence", sequence),
        (NodeKind::Pick, "pick", pick),
        (NodeKind::Scope, "scope", scope),
        (NodeKind::Compensate, "compensate", compensate),
        (NodeKind::CompensateScope, "compensateScope", compensate_scope),
        (NodeKind::ForEach, "forEach", for_each),
        (NodeKind::ExtensionActivity, "extensionActivity", extension_activity),
    ])?;
    if draft {
        p.activities(&[(NodeKind::Switch, "switch", switch)])?;
    }

    p.factories(&[
        (NodeKind::Process, process),
        (NodeKind::Import, import),
        (NodeKind::Extensions, extensions),
        (NodeKind::Extension, extension),
        (NodeKind::PartnerLinks, partner_links),
        (NodeKind::PartnerLink, partner_link),
        (NodeKind::Variables, variables),
        (NodeKind::Variable, variable),
        (NodeKind::CorrelationSets, correlation_sets),
        (NodeKind::CorrelationSet, correlation_set),
        (NodeKind::Correlations, correlations),
        (NodeKind::Correlation, correlation),
        (NodeKind::FaultHandlers, fault_handlers),
        (NodeKind::Catch, catch),
        (NodeKind::CatchAll, catch_all),
        (NodeKind::CompensationHandler, compensation_handler),
        (NodeKind::TerminationHandler, termination_handler),
        (NodeKind::EventHandlers, event_handlers),
        (NodeKind::OnEvent, on_event),
        (NodeKind::OnMessage, on_message),
        (NodeKind::OnAlarm, on_alarm),
        (NodeKind::Copy, copy),
        (NodeKind::From, from),
        (NodeKind::To, to),
        (NodeKind::Literal, literal),
        (NodeKind::Query, query),
        (NodeKind::Links, links),
        (NodeKind::Link, link),
        (NodeKind::Sources, sources),
        (NodeKind::Source, source),
        (NodeKind::Targets, targets),
        (NodeKind::Target, target),
        (NodeKind::ElseIf, else_if),
        (NodeKind::Else, else_branch),
        (NodeKind::CompletionCondition, completion_condition),
        (NodeKind::Branches, branches),
        (NodeKind::Condition, condition),
        (NodeKind::JoinCondition, join_condition),
        (NodeKind::TransitionCondition, transition_condition),
        (NodeKind::For, for_duration),
        (NodeKind::Until, until_deadline),
        (NodeKind::RepeatEvery, repeat_every),
        (NodeKind::StartCounterValue, start_counter_value),
        (NodeKind::FinalCounterValue, final_counter_value),
        (NodeKind::ExtensibilityBucket, extensibility_bucket),
        (NodeKind::XmlCapture, xml_capture),
    ])?;
    if draft {
        p.factories(&[
            (NodeKind::Then, then),
            (NodeKind::Case, case),
            (NodeKind::Otherwise, otherwise),
        ])?;
    }

    // ==================== Links ====================
    p.activity_edges(&[("sources", NodeKind::Sources), ("targets", NodeKind::Targets)])?;
    p.edges(NodeKind::Sources, &[("source", NodeKind::Source)])?;
    p.edges(NodeKind::Source, &[("transitionCondition", NodeKind::TransitionCondition)])?;
    p.edges(
        NodeKind::Targets,
        &[("joinCondition", NodeKind::JoinCondition), ("target", NodeKind::Target)],
    )?;
    p.edges(NodeKind::Flow, &[("links", NodeKind::Links)])?;
    p.edges(NodeKind::Links, &[("link", NodeKind::Link)])?;

    // ==================== Declarations ====================
    p.edges(
        NodeKind::Process,
        &[
            ("import", NodeKind::Import),
            ("extensions", NodeKind::Extensions),
            ("partnerLinks", NodeKind::PartnerLinks),
            ("variables", NodeKind::Variables),
            ("correlationSets", NodeKind::CorrelationSets),
            ("faultHandlers", NodeKind::FaultHandlers),
            ("compensationHandler", NodeKind::CompensationHandler),
            ("terminationHandler", NodeKind::TerminationHandler),
            ("eventHandlers", NodeKind::EventHandlers),
        ],
    )?;
    p.edges(
        NodeKind::Scope,
        &[
            ("partnerLinks", NodeKind::PartnerLinks),
            ("variables", NodeKind::Variables),
            ("correlationSets", NodeKind::CorrelationSets),
            ("faultHandlers", NodeKind::FaultHandlers),
            ("compensationHandler", NodeKind::CompensationHandler),
            ("terminationHandler", NodeKind::TerminationHandler),
            ("eventHandlers", NodeKind::EventHandlers),
        ],
    )?;
    p.edges(NodeKind::Extensions, &[("extension", NodeKind::Extension)])?;
    p.edges(NodeKind::PartnerLinks, &[("partnerLink", NodeKind::PartnerLink)])?;
    p.edges(NodeKind::Variables, &[("variable", NodeKind::Variable)])?;
    p.edges(NodeKind::Variable, &[("from", NodeKind::From)])?;
    p.edges(NodeKind::CorrelationSets, &[("correlationSet", NodeKind::CorrelationSet)])?;
    p.edges(NodeKind::Correlations, &[("correlation", NodeKind::Correlation)])?;

    // ==================== Handlers ====================
    p.edges(
        NodeKind::FaultHandlers,
        &[("catch", NodeKind::Catch), ("catchAll", NodeKind::CatchAll)],
    )?;
    p.edges(
        NodeKind::EventHandlers,
        &[("onEvent", NodeKind::OnEvent), ("onAlarm", NodeKind::OnAlarm)],
    )?;
    p.edges_under(
        &[NodeKind::OnEvent, NodeKind::OnMessage],
        &[("correlations", NodeKind::Correlations)],
    )?;
    p.edges(
        NodeKind::OnAlarm,
        &[
            ("for", NodeKind::For),
            ("until", NodeKind::Until),
            ("repeatEvery", NodeKind::RepeatEvery),
        ],
    )?;

    // ==================== Activities ====================
    p.edges(
        NodeKind::Invoke,
        &[
            ("correlations", NodeKind::Correlations),
            ("catch", NodeKind::Catch),
            ("catchAll", NodeKind::CatchAll),
            ("compensationHandler", NodeKind::CompensationHandler),
        ],
    )?;
    p.edges_under(
        &[NodeKind::Receive, NodeKind::Reply],
        &[("correlations", NodeKind::Correlations)],
    )?;
    p.edges(NodeKind::Assign, &[("copy", NodeKind::Copy)])?;
    p.edges(NodeKind::Copy, &[("from", NodeKind::From), ("to", NodeKind::To)])?;
    p.edges(
        NodeKind::From,
        &[("literal", NodeKind::Literal), ("query", NodeKind::Query)],
    )?;
    p.edges(NodeKind::To, &[("query", NodeKind::Query)])?;
    p.edges(NodeKind::Wait, &[("for", NodeKind::For), ("until", NodeKind::Until)])?;
    p.edges_under(
        &[NodeKind::While, NodeKind::RepeatUntil, NodeKind::If, NodeKind::ElseIf],
        &[("condition", NodeKind::Condition)],
    )?;
    p.edges(
        NodeKind::If,
        &[("elseif", NodeKind::ElseIf), ("else", NodeKind::Else)],
    )?;
    p.edges(
        NodeKind::Pick,
        &[("onMessage", NodeKind::OnMessage), ("onAlarm", NodeKind::OnAlarm)],
    )?;
    p.edges(
        NodeKind::ForEach,
        &[
            ("startCounterValue", NodeKind::StartCounterValue),
            ("finalCounterValue", NodeKind::FinalCounterValue),
            ("completionCondition", NodeKind::CompletionCondition),
            ("scope", NodeKind::Scope),
        ],
    )?;
    p.edges(NodeKind::CompletionCondition, &[("branches", NodeKind::Branches)])?;
    p.any_activity(&[
        NodeKind::Process,
        NodeKind::Catch,
        NodeKind::CatchAll,
        NodeKind::CompensationHandler,
        NodeKind::TerminationHandler,
        NodeKind::OnEvent,
        NodeKind::OnMessage,
        NodeKind::OnAlarm,
        NodeKind::Sequence,
        NodeKind::Flow,
        NodeKind::While,
        NodeKind::RepeatUntil,
        NodeKind::Scope,
        NodeKind::ElseIf,
        NodeKind::Else,
    ]);

    if draft {
        p.edges(NodeKind::If, &[("then", NodeKind::Then)])?;
        p.edges(
            NodeKind::Switch,
            &[("case", NodeKind::Case), ("otherwise", NodeKind::Otherwise)],
        )?;
        p.edges(NodeKind::Case, &[("condition", NodeKind::Condition)])?;
        p.any_activity(&[NodeKind::Then, NodeKind::Case, NodeKind::Otherwise]);
    } else {
        p.any_activity(&[NodeKind::If]);
    }

    // Literal values and extension activities hold raw XML. These come
    // before the extensibility wildcards so they win the lookup.
    p.capture(NodeKind::Literal);
    p.capture(NodeKind::ExtensionActivity);
    p.capture(NodeKind::XmlCapture);

    let mut documented = EXTENSIBLE.to_vec();
    if draft {
        documented.extend_from_slice(DRAFT_EXTENSIBLE);
    }
    p.extensible(&documented);

    documented.extend_from_slice(&[NodeKind::From, NodeKind::To]);
    let documentation = [("documentation", NodeKind::ExtensibilityBucket)];
    p.edges_under(&documented, &documentation)?;
    p.activity_edges(&documentation)?;

    p.build()
}
