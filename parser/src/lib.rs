//! BPEL Parser
//!
//! This crate turns a process-definition document into the unified model:
//! - XML events read with `quick-xml`, namespaces resolved per element
//! - Dialect graphs for BPEL4WS 1.1 and WS-BPEL 2.0 (final and draft)
//! - Parse nodes, one per open element, driven through the transition graph
//! - Diagnostics accumulated across the whole document
//!
//! ```no_run
//! use bpel_parser::{Grammar, ParseOptions};
//!
//! let grammar = Grammar::new().expect("grammar builds");
//! let source = std::fs::read_to_string("order.bpel").expect("readable");
//! match grammar.parse(&source, &ParseOptions::default()) {
//!     Ok(parsed) => println!("{} activities", parsed.process.activity_count()),
//!     Err(failure) => eprintln!("{}", failure),
//! }
//! ```

mod context;
mod dialect;
mod driver;
mod event;
mod node;
mod options;
mod reader;

pub use context::ParseContext;
pub use dialect::Grammar;
pub use driver::{parse_events, ParseFailure, Parsed};
pub use event::{StartElement, XmlEvent};
pub use node::{Factory, Fragment, NodeError, NodeResult, ParseNode};
pub use options::{ErrorMode, ParseOptions, QNameResolver, ScopeResolver};
pub use reader::{read_events, EventReader, ReadError};
