//! Parse configuration.

use crate::StartElement;
use bpel_core::{QName, QNameError};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// How the driver reacts to ERROR diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Keep going and report every problem in one pass.
    #[default]
    CollectAll,
    /// Stop at the first ERROR.
    FailFast,
}

/// Resolves attribute values of the form `prefix:local`.
pub trait QNameResolver: Send + Sync {
    fn resolve(&self, prefixed: &str, element: &StartElement) -> Result<QName, QNameError>;
}

/// Resolves against the namespaces in scope at the element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver;

impl QNameResolver for ScopeResolver {
    fn resolve(&self, prefixed: &str, element: &StartElement) -> Result<QName, QNameError> {
        element.namespaces.resolve_prefixed(prefixed)
    }
}

#[derive(Clone)]
pub struct ParseOptions {
    pub error_mode: ErrorMode,
    /// Base URI of the document, recorded for relative import locations.
    pub base_uri: Option<String>,
    /// Extension namespaces accepted when declared `mustUnderstand="yes"`.
    pub understood_extensions: BTreeSet<String>,
    pub resolver: Arc<dyn QNameResolver>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_fast(mut self) -> Self {
        self.error_mode = ErrorMode::FailFast;
        self
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    pub fn understand(mut self, namespace: impl Into<String>) -> Self {
        self.understood_extensions.insert(namespace.into());
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn QNameResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn understands(&self, namespace: &str) -> bool {
        self.understood_extensions.contains(namespace)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::default(),
            base_uri: None,
            understood_extensions: BTreeSet::new(),
            resolver: Arc::new(ScopeResolver),
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("error_mode", &self.error_mode)
            .field("base_uri", &self.base_uri)
            .field("understood_extensions", &self.understood_extensions)
            .finish_non_exhaustive()
    }
}
