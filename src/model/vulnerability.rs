//! Canonical vulnerability records and aggregation types.

use super::{BomRef, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A normalized vulnerability as attached to a component.
///
/// Produced by the rating normalizer: exactly one severity/score/vector
/// triple survives per raw vulnerability, chosen by methodology priority and
/// source rank. Every field is always populated (`"-"` for an absent vector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// Advisory identifier (e.g. CVE-2021-44228)
    pub id: String,
    /// Normalized severity
    pub severity: Severity,
    /// Numeric score from the winning rating, 0.0 when absent
    pub score: f64,
    /// Vector string from the winning rating, "-" when absent
    pub vector: String,
}

impl Vulnerability {
    /// Create a fully populated record
    pub fn new(id: impl Into<String>, severity: Severity, score: f64, vector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            score,
            vector: vector.into(),
        }
    }

    /// Key used by the aggregation map.
    ///
    /// The same advisory id can legitimately appear with different ratings
    /// in one document, so severity and score are part of the key.
    #[must_use]
    pub fn aggregation_key(&self) -> String {
        format!("{}-{}-{}", self.id, self.severity, self.score)
    }
}

/// One entry of the vulnerability aggregation map: a vulnerability plus the
/// components it affects directly and transitively.
#[derive(Debug, Clone, Serialize)]
pub struct VulnerabilityAggregate {
    pub id: String,
    pub severity: Severity,
    pub score: f64,
    pub vector: String,
    /// Components carrying this vulnerability in their direct list
    pub directly_affected: BTreeSet<BomRef>,
    /// Components inheriting it through a dependency subtree
    pub transitively_affected: BTreeSet<BomRef>,
}

impl VulnerabilityAggregate {
    /// Seed an aggregate from a normalized record, with empty component sets
    #[must_use]
    pub fn from_vulnerability(vuln: &Vulnerability) -> Self {
        Self {
            id: vuln.id.clone(),
            severity: vuln.severity,
            score: vuln.score,
            vector: vuln.vector.clone(),
            directly_affected: BTreeSet::new(),
            transitively_affected: BTreeSet::new(),
        }
    }
}

/// Global counts of unique aggregated vulnerabilities by severity.
///
/// The information bucket absorbs unknown-severity entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub information: usize,
}

impl SeverityCounts {
    /// Record one unique vulnerability
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            _ => self.information += 1,
        }
    }

    /// Total unique vulnerabilities counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.information
    }
}
