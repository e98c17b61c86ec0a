//! Expressions, literals and the value references used by `<assign>`.

use crate::{XmlElement, XmlNode, BPEL20_NS};
use bpel_core::{QName, SourceInfo};
use serde::{Deserialize, Serialize};

/// An expression captured as opaque text. Never evaluated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// Explicit language URI, when the source element declares one.
    pub language: Option<String>,
    pub text: String,
    pub info: SourceInfo,
}

impl Expression {
    pub fn new(text: impl Into<String>, language: Option<String>, info: SourceInfo) -> Self {
        Self {
            language,
            text: text.into(),
            info,
        }
    }
}

/// A literal value, always wrapped in a `literal` element of the 2.0
/// executable namespace regardless of the source dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub element: XmlElement,
}

impl Literal {
    pub const LOCAL_NAME: &'static str = "literal";

    /// Wrap captured content in the unified literal element.
    pub fn wrap(children: Vec<XmlNode>) -> Self {
        let mut element = XmlElement::new(QName::new(BPEL20_NS, Self::LOCAL_NAME));
        element.children = children;
        Self { element }
    }

    pub fn content(&self) -> &[XmlNode] {
        &self.element.children
    }

    pub fn text(&self) -> String {
        self.element.text()
    }
}

/// Which role of a partner link an endpoint reference is copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointReference {
    MyRole,
    PartnerRole,
}

/// Source or destination of a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueRef {
    Variable {
        variable: String,
        part: Option<String>,
        query: Option<Expression>,
    },
    Property {
        variable: String,
        property: QName,
    },
    PartnerLink {
        partner_link: String,
        endpoint_reference: Option<EndpointReference>,
    },
    Expression(Expression),
    Literal(Literal),
}

impl ValueRef {
    pub fn variable(name: impl Into<String>) -> Self {
        ValueRef::Variable {
            variable: name.into(),
            part: None,
            query: None,
        }
    }
}

/// One `<copy>` of an `<assign>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignCopy {
    pub from: ValueRef,
    pub to: ValueRef,
    pub keep_src_element_name: bool,
    pub ignore_missing_from_data: bool,
    pub info: SourceInfo,
}
