//! Declarations: imports, extensions, partner links, variables and correlation.

use crate::ValueRef;
use bpel_core::{QName, SourceInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub namespace: Option<String>,
    pub location: Option<String>,
    pub import_type: String,
    pub info: SourceInfo,
}

/// A declared language extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDecl {
    pub namespace: String,
    pub must_understand: bool,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerLink {
    pub name: String,
    pub partner_link_type: Option<QName>,
    pub my_role: Option<String>,
    pub partner_role: Option<String>,
    pub initialize_partner_role: Option<bool>,
    pub info: SourceInfo,
}

/// BPEL4WS 1.1 `<partner>`: a named group of partner links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    pub partner_links: Vec<String>,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableType {
    MessageType(QName),
    Type(QName),
    Element(QName),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// `None` only when the declaration was invalid.
    pub ty: Option<VariableType>,
    /// WS-BPEL 2.0 inline initializer.
    pub initializer: Option<ValueRef>,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationSet {
    pub name: String,
    pub properties: Vec<QName>,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initiate {
    Yes,
    #[default]
    No,
    Join,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationPattern {
    In,
    Out,
}

/// A correlation set used by a messaging activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    pub set: String,
    pub initiate: Initiate,
    pub pattern: Option<CorrelationPattern>,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSource {
    pub link_name: String,
    pub transition_condition: Option<crate::Expression>,
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub link_name: String,
    pub info: SourceInfo,
}
