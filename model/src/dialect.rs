//! Supported language dialects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// BPEL4WS 1.1.
pub const BPEL11_NS: &str = "http://schemas.xmlsoap.org/ws/2003/03/business-process/";
/// WS-BPEL 2.0 working draft.
pub const BPEL20_DRAFT_NS: &str = "http://schemas.xmlsoap.org/ws/2004/03/business-process/";
/// WS-BPEL 2.0 executable processes.
pub const BPEL20_NS: &str = "http://docs.oasis-open.org/wsbpel/2.0/process/executable";
/// WS-BPEL 2.0 abstract processes. Recognized only to be rejected.
pub const BPEL20_ABSTRACT_NS: &str = "http://docs.oasis-open.org/wsbpel/2.0/process/abstract";

/// The dialect a document was written in, identified by its root namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Bpel11,
    Bpel20Draft,
    Bpel20,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Bpel11, Dialect::Bpel20Draft, Dialect::Bpel20];

    pub fn namespace(&self) -> &'static str {
        match self {
            Dialect::Bpel11 => BPEL11_NS,
            Dialect::Bpel20Draft => BPEL20_DRAFT_NS,
            Dialect::Bpel20 => BPEL20_NS,
        }
    }

    pub fn from_namespace(ns: &str) -> Option<Dialect> {
        Dialect::ALL.into_iter().find(|d| d.namespace() == ns)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Bpel11 => "BPEL4WS 1.1",
            Dialect::Bpel20Draft => "WS-BPEL 2.0 (draft)",
            Dialect::Bpel20 => "WS-BPEL 2.0",
        })
    }
}
