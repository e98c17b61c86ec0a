//! Activities.

use crate::{
    AlarmTiming, AssignCopy, Catch, CatchAll, CompensationHandler, Correlation, CorrelationSet,
    EventHandlers, Expression, FaultHandler, Link, LinkSource, LinkTarget, OnAlarm, OnMessage,
    PartnerLink, TerminationHandler, Variable, XmlAttribute, XmlElement,
};
use bpel_core::{QName, SourceInfo};
use serde::{Deserialize, Serialize};

/// One executable step. The header fields are common to every activity;
/// the shape-specific part lives in [`ActivityKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: Option<String>,
    pub join_condition: Option<Expression>,
    /// Explicit yes/no, or `None` when inherited.
    pub suppress_join_failure: Option<bool>,
    pub targets: Vec<LinkTarget>,
    pub sources: Vec<LinkSource>,
    /// Attributes in foreign namespaces.
    pub extension_attributes: Vec<XmlAttribute>,
    pub info: SourceInfo,
    pub kind: ActivityKind,
}

impl Activity {
    pub fn new(kind: ActivityKind, info: SourceInfo) -> Self {
        Self {
            name: None,
            join_condition: None,
            suppress_join_failure: None,
            targets: Vec::new(),
            sources: Vec::new(),
            extension_attributes: Vec::new(),
            info,
            kind,
        }
    }

    /// Placeholder used where a required child activity is missing.
    pub fn empty(info: SourceInfo) -> Self {
        Self::new(ActivityKind::Empty, info)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Empty,
    Invoke(Invoke),
    Receive(Receive),
    Reply(Reply),
    Assign(Assign),
    Wait(Wait),
    Throw(Throw),
    Rethrow,
    /// `<exit>`, or `<terminate>` in BPEL4WS 1.1.
    Exit,
    Flow(Flow),
    /// `<switch>`, and also `<if>`/`<elseif>`/`<else>`.
    Switch(Switch),
    While(Loop),
    RepeatUntil(Loop),
    Sequence(Sequence),
    Pick(Pick),
    Scope(Box<Scope>),
    Compensate(Compensate),
    ForEach(Box<ForEach>),
    /// `<extensionActivity>` content, kept as captured XML.
    Extension(ExtensionActivity),
}

impl ActivityKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActivityKind::Empty => "empty",
            ActivityKind::Invoke(_) => "invoke",
            ActivityKind::Receive(_) => "receive",
            ActivityKind::Reply(_) => "reply",
            ActivityKind::Assign(_) => "assign",
            ActivityKind::Wait(_) => "wait",
            ActivityKind::Throw(_) => "throw",
            ActivityKind::Rethrow => "rethrow",
            ActivityKind::Exit => "exit",
            ActivityKind::Flow(_) => "flow",
            ActivityKind::Switch(_) => "switch",
            ActivityKind::While(_) => "while",
            ActivityKind::RepeatUntil(_) => "repeatUntil",
            ActivityKind::Sequence(_) => "sequence",
            ActivityKind::Pick(_) => "pick",
            ActivityKind::Scope(_) => "scope",
            ActivityKind::Compensate(_) => "compensate",
            ActivityKind::ForEach(_) => "forEach",
            ActivityKind::Extension(_) => "extensionActivity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoke {
    pub partner_link: String,
    pub port_type: Option<QName>,
    pub operation: String,
    pub input_variable: Option<String>,
    pub output_variable: Option<String>,
    pub correlations: Vec<Correlation>,
    pub catches: Vec<Catch>,
    pub catch_all: Option<Box<CatchAll>>,
    pub compensation_handler: Option<Box<CompensationHandler>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receive {
    pub partner_link: String,
    pub port_type: Option<QName>,
    pub operation: String,
    pub variable: Option<String>,
    pub create_instance: bool,
    pub message_exchange: Option<String>,
    pub correlations: Vec<Correlation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub partner_link: String,
    pub port_type: Option<QName>,
    pub operation: String,
    pub variable: Option<String>,
    pub fault_name: Option<QName>,
    pub message_exchange: Option<String>,
    pub correlations: Vec<Correlation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assign {
    pub validate: bool,
    pub copies: Vec<AssignCopy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wait {
    /// `None` only when the source declared neither form.
    pub timing: Option<AlarmTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throw {
    pub fault_name: Option<QName>,
    pub fault_variable: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub links: Vec<Link>,
    pub activities: Vec<Activity>,
}

/// One branch of a conditional. The last branch may have no condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub condition: Option<Expression>,
    pub activity: Activity,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub cases: Vec<Case>,
}

impl Switch {
    pub fn otherwise(&self) -> Option<&Case> {
        self.cases.last().filter(|c| c.condition.is_none())
    }
}

/// Body and condition of `<while>` and `<repeatUntil>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loop {
    pub condition: Expression,
    pub activity: Box<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub create_instance: bool,
    pub on_messages: Vec<OnMessage>,
    pub on_alarms: Vec<OnAlarm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// `isolated` in 2.0, `variableAccessSerializable` in 1.1.
    pub isolated: bool,
    pub exit_on_standard_fault: Option<bool>,
    pub variables: Vec<Variable>,
    pub partner_links: Vec<PartnerLink>,
    pub correlation_sets: Vec<CorrelationSet>,
    pub fault_handler: Option<FaultHandler>,
    pub compensation_handler: Option<CompensationHandler>,
    pub termination_handler: Option<TerminationHandler>,
    pub event_handlers: Option<EventHandlers>,
    pub activity: Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compensate {
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branches {
    pub expression: Expression,
    pub successful_branches_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCondition {
    pub branches: Option<Branches>,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForEach {
    pub counter_name: String,
    pub parallel: bool,
    pub start_counter: Expression,
    pub final_counter: Expression,
    pub completion_condition: Option<CompletionCondition>,
    /// The body; always a `scope` activity.
    pub scope: Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionActivity {
    pub element: XmlElement,
}
