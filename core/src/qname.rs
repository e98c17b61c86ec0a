//! Qualified names.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

const NCNAME_PATTERN: &str =
    r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_.\-\x{80}-\x{10FFFF}]*$";

static NCNAME: OnceLock<Option<Regex>> = OnceLock::new();

/// Check whether `s` is a non-colonized XML name.
pub fn is_ncname(s: &str) -> bool {
    NCNAME
        .get_or_init(|| Regex::new(NCNAME_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

/// A namespace-qualified name. An empty namespace means "no namespace".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    pub namespace: String,
    pub local: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A name in no namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

/// Errors raised while turning a `prefix:local` string into a [`QName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QNameError {
    #[error("Malformed qualified name: '{0}'")]
    Malformed(String),

    #[error("Unresolved namespace prefix '{prefix}' in '{value}'")]
    UnresolvedPrefix { prefix: String, value: String },
}

/// Split `prefix:local` into its parts, checking both against the NCName production.
pub fn split_prefixed(value: &str) -> Result<(Option<&str>, &str), QNameError> {
    let value_trimmed = value.trim();
    let (prefix, local) = match value_trimmed.split_once(':') {
        Some((p, l)) => (Some(p), l),
        None => (None, value_trimmed),
    };
    if !is_ncname(local) || prefix.is_some_and(|p| !is_ncname(p)) {
        return Err(QNameError::Malformed(value.to_string()));
    }
    Ok((prefix, local))
}
