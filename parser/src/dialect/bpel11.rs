//! BPEL4WS 1.1.

use super::{Graph, Provider};
use crate::node::*;
use bpel_model::Dialect;
use bpel_registry::{GraphError, NodeKind};

pub(super) fn graph() -> Result<Graph, GraphError> {
    let mut p = Provider::new(Dialect::Bpel11);

    p.activities(&[
        (NodeKind::Empty, "empty", empty),
        (NodeKind::Invoke, "invoke", invoke),
        (NodeKind::Receive, "receive", receive),
        (NodeKind::Reply, "reply", reply),
        (NodeKind::Assign, "assign", assign),
        (NodeKind::Wait, "wait", wait),
        (NodeKind::Throw, "throw", throw),
        (NodeKind::Exit, "terminate", exit),
        (NodeKind::Flow, "flow", flow),
        (NodeKind::Switch, "switch", switch),
        (NodeKind::While, "while", while_loop),
        (NodeKind::Sequence, "sequence", sequence),
        (NodeKind::Pick, "pick", pick),
        (NodeKind::Scope, "scope", scope),
    ])?;

    p.factories(&[
        (NodeKind::Process, process),
        (NodeKind::PartnerLinks, partner_links),
        (NodeKind::PartnerLink, partner_link),
        (NodeKind::Partners, partners),
        (NodeKind::Partner, partner),
        (NodeKind::PartnerLinkRef, partner_link_ref),
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
        (NodeKind::EventHandlers, event_handlers),
        (NodeKind::OnMessage, on_message),
        (NodeKind::OnAlarm, on_alarm),
        (NodeKind::Compensate, compensate),
        (NodeKind::Copy, copy),
        (NodeKind::From, from),
        (NodeKind::To, to),
        (NodeKind::Links, links),
        (NodeKind::Link, link),
        (NodeKind::Source, source),
        (NodeKind::Target, target),
        (NodeKind::Case, case),
        (NodeKind::Otherwise, otherwise),
        (NodeKind::ExtensibilityBucket, extensibility_bucket),
        (NodeKind::XmlCapture, xml_capture),
    ])?;

    // Links attach to every activity, compensate included.
    p.activity_edges(&[("source", NodeKind::Source), ("target", NodeKind::Target)])?;
    p.edges(
        NodeKind::Compensate,
        &[("source", NodeKind::Source), ("target", NodeKind::Target)],
    )?;

    // ==================== Declarations ====================
    p.edges(
        NodeKind::Process,
        &[
            ("partnerLinks", NodeKind::PartnerLinks),
            ("partners", NodeKind::Partners),
            ("variables", NodeKind::Variables),
            ("correlationSets", NodeKind::CorrelationSets),
            ("faultHandlers", NodeKind::FaultHandlers),
            ("compensationHandler", NodeKind::CompensationHandler),
            ("eventHandlers", NodeKind::EventHandlers),
        ],
    )?;
    p.edges(
        NodeKind::Scope,
        &[
            ("variables", NodeKind::Variables),
            ("correlationSets", NodeKind::CorrelationSets),
            ("faultHandlers", NodeKind::FaultHandlers),
            ("compensationHandler", NodeKind::CompensationHandler),
            ("eventHandlers", NodeKind::EventHandlers),
        ],
    )?;
    p.edges(NodeKind::PartnerLinks, &[("partnerLink", NodeKind::PartnerLink)])?;
    p.edges(NodeKind::Partners, &[("partner", NodeKind::Partner)])?;
    p.edges(NodeKind::Partner, &[("partnerLink", NodeKind::PartnerLinkRef)])?;
    p.edges(NodeKind::Variables, &[("variable", NodeKind::Variable)])?;
    p.edges(NodeKind::CorrelationSets, &[("correlationSet", NodeKind::CorrelationSet)])?;
    p.edges(NodeKind::Correlations, &[("correlation", NodeKind::Correlation)])?;

    // ==================== Handlers ====================
    p.edges(
        NodeKind::FaultHandlers,
        &[("catch", NodeKind::Catch), ("catchAll", NodeKind::CatchAll)],
    )?;
    p.edges(
        NodeKind::EventHandlers,
        &[("onMessage", NodeKind::OnMessage), ("onAlarm", NodeKind::OnAlarm)],
    )?;
    p.edges(NodeKind::OnMessage, &[("correlations", NodeKind::Correlations)])?;
    // compensate is only legal directly inside these handlers.
    p.edges_under(
        &[NodeKind::Catch, NodeKind::CatchAll, NodeKind::CompensationHandler],
        &[("compensate", NodeKind::Compensate)],
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
    p.edges(NodeKind::Flow, &[("links", NodeKind::Links)])?;
    p.edges(NodeKind::Links, &[("link", NodeKind::Link)])?;
    p.edges(
        NodeKind::Switch,
        &[("case", NodeKind::Case), ("otherwise", NodeKind::Otherwise)],
    )?;
    p.edges(
        NodeKind::Pick,
        &[("onMessage", NodeKind::OnMessage), ("onAlarm", NodeKind::OnAlarm)],
    )?;
    p.any_activity(&[
        NodeKind::Process,
        NodeKind::Catch,
        NodeKind::CatchAll,
        NodeKind::CompensationHandler,
        NodeKind::OnMessage,
        NodeKind::OnAlarm,
        NodeKind::Case,
        NodeKind::Otherwise,
        NodeKind::Sequence,
        NodeKind::Flow,
        NodeKind::While,
        NodeKind::Scope,
    ]);

    // Inline literal content of from is data, whatever its namespace.
    p.capture(NodeKind::From);
    p.capture(NodeKind::XmlCapture);

    p.extensible(&[
        NodeKind::Process,
        NodeKind::PartnerLinks,
        NodeKind::PartnerLink,
        NodeKind::Partners,
        NodeKind::Partner,
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
        NodeKind::EventHandlers,
        NodeKind::OnMessage,
        NodeKind::OnAlarm,
        NodeKind::Compensate,
        NodeKind::Copy,
        NodeKind::Links,
        NodeKind::Link,
        NodeKind::Source,
        NodeKind::Target,
        NodeKind::Case,
        NodeKind::Otherwise,
    ]);

    p.build()
}
