//! The document transform pipeline.
//!
//! Wires the graph stages together in their fixed order: parse, build,
//! collapse duplicates, propagate, aggregate. This module is the library's
//! primary entry point; everything below it is usable on its own for
//! callers that need a partial pipeline.

use crate::error::{Result, SbomGraphError};
use crate::graph::{self, PropagationStats};
use crate::model::{DependencyGraph, MetadataSummary, SeverityCounts, VulnerabilityAggregate};
use crate::parsers::{self, RawBom};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

/// Everything the presentation layer needs from one document.
#[derive(Debug, Clone)]
pub struct TransformedSbom {
    /// Collapsed component map with propagation completed
    pub components: DependencyGraph,
    /// Aggregation map keyed by (id, severity, score)
    pub vulnerabilities: IndexMap<String, VulnerabilityAggregate>,
    /// Unique-vulnerability counts by severity
    pub severity_counts: SeverityCounts,
    /// Document metadata, passed through verbatim
    pub metadata: MetadataSummary,
    /// Traversal statistics from the propagation pass
    pub propagation: PropagationStats,
}

/// Run the full transform over an already-parsed document.
///
/// Infallible by design: every irregularity past the parse boundary is
/// recovered with a placeholder or default and logged.
pub fn transform(bom: &RawBom) -> TransformedSbom {
    let metadata = MetadataSummary::from_document(bom);

    let mut components = graph::build(bom);
    debug!(components = components.len(), "dependency graph built");

    let collapsed = graph::collapse_duplicates(&mut components);
    if collapsed > 0 {
        debug!(collapsed, "duplicate components merged");
    }

    let propagation = graph::propagate(&mut components);
    let (vulnerabilities, severity_counts) = graph::aggregate(&components);

    info!(
        components = components.len(),
        vulnerabilities = vulnerabilities.len(),
        cycles = propagation.cycle_count,
        "transform complete"
    );

    TransformedSbom {
        components,
        vulnerabilities,
        severity_counts,
        metadata,
        propagation,
    }
}

/// Parse and transform a document held in a string.
pub fn transform_str(content: &str) -> Result<TransformedSbom> {
    let bom = parsers::parse_str(content)?;
    Ok(transform(&bom))
}

/// Parse and transform a document held in raw bytes.
pub fn transform_slice(content: &[u8]) -> Result<TransformedSbom> {
    let bom = parsers::parse_slice(content)?;
    Ok(transform(&bom))
}

/// Read, parse, and transform a document from disk.
pub fn transform_file(path: &Path) -> Result<TransformedSbom> {
    let content = std::fs::read_to_string(path).map_err(|e| SbomGraphError::io(path, e))?;
    transform_str(&content)
}
