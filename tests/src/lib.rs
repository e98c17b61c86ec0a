//! BPEL Tests
//!
//! Scenario harness for the BPEL front end: fixture documents on disk or
//! inline, parse options, and expectations on the diagnostics and the model.
//!
//! ```ignore
//! use bpel_tests::prelude::*;
//!
//! Scenario::new("purchase")
//!     .fixture("bpel20/purchase.bpel")
//!     .expect(|e| e.clean().activity("receiveOrder", "receive"))
//!     .run()
//!     .unwrap();
//! ```

pub mod assertion;
pub mod error;
pub mod runner;
pub mod scenario;

pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::loader::{fixture_path, fixtures_in, load_fixture};
    pub use crate::runner::Runner;
    pub use crate::scenario::{Document, Scenario};

    pub use bpel_core::{DiagnosticKey, Severity};
    pub use bpel_model::*;
    pub use bpel_parser::{Grammar, ParseFailure, ParseOptions, Parsed};
}
