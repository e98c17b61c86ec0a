//! The root of the model.

use crate::{
    Activity, CompensationHandler, CorrelationSet, Dialect, EventHandlers, ExtensionDecl,
    FaultHandler, Import, Partner, PartnerLink, TerminationHandler, Variable, XmlAttribute,
};
use bpel_core::SourceInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    pub target_namespace: String,
    pub dialect: Dialect,
    /// Where the document was read from; relative import locations resolve against it.
    pub base_uri: Option<String>,
    pub query_language: Option<String>,
    pub expression_language: Option<String>,
    pub suppress_join_failure: Option<bool>,
    pub exit_on_standard_fault: Option<bool>,
    pub imports: Vec<Import>,
    pub extensions: Vec<ExtensionDecl>,
    pub partner_links: Vec<PartnerLink>,
    pub partners: Vec<Partner>,
    pub variables: Vec<Variable>,
    pub correlation_sets: Vec<CorrelationSet>,
    pub fault_handler: Option<FaultHandler>,
    pub compensation_handler: Option<CompensationHandler>,
    pub termination_handler: Option<TerminationHandler>,
    pub event_handlers: Option<EventHandlers>,
    pub activity: Activity,
    pub extension_attributes: Vec<XmlAttribute>,
    pub info: SourceInfo,
}

impl Process {
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn partner_link(&self, name: &str) -> Option<&PartnerLink> {
        self.partner_links.iter().find(|p| p.name == name)
    }

    pub fn correlation_set(&self, name: &str) -> Option<&CorrelationSet> {
        self.correlation_sets.iter().find(|c| c.name == name)
    }
}
