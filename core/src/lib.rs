//! BPEL Core Types
//!
//! This crate provides the vocabulary shared by every stage of the front end:
//! - Qualified names and NCName checks
//! - Namespace contexts and the scope stack used while reading a document
//! - Source locations attached to model fragments
//! - The diagnostic taxonomy and the sink collaborators report into

mod diagnostic;
mod location;
mod namespace;
mod qname;

pub use diagnostic::*;
pub use location::*;
pub use namespace::*;
pub use qname::*;

/// Namespace of the `xml:` prefix, bound implicitly in every document.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declarations themselves.
pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";
