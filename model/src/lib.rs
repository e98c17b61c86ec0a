//! BPEL Object Model
//!
//! The unified, dialect-independent representation of a parsed process
//! definition. These are plain data holders; the parser builds them and
//! later stages consume them.
//!
//! - [`Process`] is the root
//! - [`Activity`] is a header plus a closed [`ActivityKind`] union
//! - Declarations, handlers, value references and captured XML hang off both

mod activity;
mod decls;
mod dialect;
mod handlers;
mod process;
mod value;
mod walk;
mod xml;

pub use activity::*;
pub use decls::*;
pub use dialect::*;
pub use handlers::*;
pub use process::*;
pub use value::*;
pub use xml::*;
