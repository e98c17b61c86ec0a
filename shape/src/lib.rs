//! Attribute-shape predicates.
//!
//! Several BPEL elements have mutually exclusive legal forms that differ only
//! in which attributes are present. An [`AttrShape`] describes one such form;
//! a [`ShapeSelector`] picks the unique form an element instance uses.

mod selector;
mod shape;

pub use selector::*;
pub use shape::*;
