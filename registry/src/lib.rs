//! BPEL Transition Graph
//!
//! The table that drives element-to-node dispatch:
//! - [`NodeKind`] discriminates parse nodes
//! - [`GraphBuilder`] collects factories and edges from a dialect provider
//! - [`TransitionGraph`] is the immutable result shared by every parse
//!
//! The graph is generic over the factory type so that it knows nothing about
//! parse nodes themselves.

mod builder;
mod graph;
mod kind;
mod wildcard;

pub use builder::*;
pub use graph::*;
pub use kind::*;
pub use wildcard::*;
