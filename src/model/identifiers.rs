//! Component identifiers.
//!
//! A [`BomRef`] is the opaque string key naming a component, service, or
//! dependency target within one document. It may be declared explicitly
//! (`bom-ref`), recovered heuristically by the resolver, or synthesized from
//! a content hash when no plausible match exists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a component within a single SBOM document.
///
/// Equality and ordering are plain string semantics; no normalization is
/// applied here. Identifier disambiguation is the resolver's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BomRef(String);

impl BomRef {
    /// Create a new identifier from any string-like value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BomRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BomRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for BomRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for BomRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}
