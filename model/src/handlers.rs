//! Fault, compensation, termination and event handlers.

use crate::{Activity, Correlation, Expression};
use bpel_core::{QName, SourceInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catch {
    pub fault_name: Option<QName>,
    pub fault_variable: Option<String>,
    pub fault_message_type: Option<QName>,
    pub fault_element: Option<QName>,
    pub activity: Activity,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchAll {
    pub activity: Activity,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultHandler {
    pub catches: Vec<Catch>,
    pub catch_all: Option<CatchAll>,
    pub info: SourceInfo,
}

impl FaultHandler {
    pub fn new(info: SourceInfo) -> Self {
        Self {
            catches: Vec::new(),
            catch_all: None,
            info,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.catches.is_empty() && self.catch_all.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationHandler {
    pub activity: Activity,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationHandler {
    pub activity: Activity,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmTiming {
    For(Expression),
    Until(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnAlarm {
    /// Absent only for event-handler alarms that just repeat.
    pub timing: Option<AlarmTiming>,
    pub repeat_every: Option<Expression>,
    pub activity: Activity,
    pub info: SourceInfo,
}

/// `<onMessage>` of a `<pick>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnMessage {
    pub partner_link: String,
    pub port_type: Option<QName>,
    pub operation: String,
    pub variable: Option<String>,
    pub message_exchange: Option<String>,
    pub correlations: Vec<Correlation>,
    pub activity: Activity,
    pub info: SourceInfo,
}

/// `<onEvent>` (or a 1.1 event-handler `<onMessage>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnEvent {
    pub partner_link: String,
    pub port_type: Option<QName>,
    pub operation: String,
    pub variable: Option<String>,
    pub message_type: Option<QName>,
    pub element: Option<QName>,
    pub message_exchange: Option<String>,
    pub correlations: Vec<Correlation>,
    pub activity: Activity,
    pub info: SourceInfo,
}

/// Event handlers keep message events and alarms apart, each in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHandlers {
    pub on_events: Vec<OnEvent>,
    pub on_alarms: Vec<OnAlarm>,
    pub info: SourceInfo,
}

impl EventHandlers {
    pub fn new(info: SourceInfo) -> Self {
        Self {
            on_events: Vec::new(),
            on_alarms: Vec::new(),
            info,
        }
    }
}
