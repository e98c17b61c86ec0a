//! Parse node discriminants.

use std::fmt;

/// The kind of a parse node. Both dialects share kinds where the element
/// semantics coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    // ==================== Process structure ====================
    Process,
    Import,
    Extensions,
    Extension,

    // ==================== Declarations ====================
    PartnerLinks,
    PartnerLink,
    Partners,
    Partner,
    /// `<partnerLink>` reference inside a BPEL4WS 1.1 `<partner>`.
    PartnerLinkRef,
    Variables,
    Variable,
    CorrelationSets,
    CorrelationSet,
    Correlations,
    Correlation,

    // ==================== Handlers ====================
    FaultHandlers,
    Catch,
    CatchAll,
    CompensationHandler,
    TerminationHandler,
    EventHandlers,
    OnEvent,
    OnMessage,
    OnAlarm,

    // ==================== Activities ====================
    Empty,
    Invoke,
    Receive,
    Reply,
    Assign,
    Wait,
    Throw,
    Rethrow,
    Exit,
    Flow,
    Switch,
    If,
    While,
    RepeatUntil,
    Sequence,
    Pick,
    Scope,
    Compensate,
    CompensateScope,
    ForEach,
    ExtensionActivity,

    // ==================== Activity parts ====================
    Copy,
    From,
    To,
    Literal,
    Query,
    Links,
    Link,
    Sources,
    Source,
    Targets,
    Target,
    Case,
    Otherwise,
    Then,
    ElseIf,
    Else,
    CompletionCondition,
    Branches,

    // ==================== Expressions ====================
    Condition,
    JoinCondition,
    TransitionCondition,
    For,
    Until,
    RepeatEvery,
    StartCounterValue,
    FinalCounterValue,

    // ==================== Content ====================
    /// Silently swallows foreign-namespace content at an extensibility point.
    ExtensibilityBucket,
    /// Swallows the subtree of an element the grammar does not allow.
    Bucket,
    /// Keeps an arbitrary element subtree as data.
    XmlCapture,
}

impl NodeKind {
    /// Kinds whose nodes produce an activity.
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            NodeKind::Empty
                | NodeKind::Invoke
                | NodeKind::Receive
                | NodeKind::Reply
                | NodeKind::Assign
                | NodeKind::Wait
                | NodeKind::Throw
                | NodeKind::Rethrow
                | NodeKind::Exit
                | NodeKind::Flow
                | NodeKind::Switch
                | NodeKind::If
                | NodeKind::While
                | NodeKind::RepeatUntil
                | NodeKind::Sequence
                | NodeKind::Pick
                | NodeKind::Scope
                | NodeKind::Compensate
                | NodeKind::CompensateScope
                | NodeKind::ForEach
                | NodeKind::ExtensionActivity
        )
    }

    /// Kinds whose subtree contributes nothing to the model.
    pub fn is_bucket(&self) -> bool {
        matches!(self, NodeKind::ExtensibilityBucket | NodeKind::Bucket)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
