//! **Normalized dependency graphs from real-world SBOM documents.**
//!
//! `sbom-graph` ingests a CycloneDX-style software bill of materials and
//! produces a query-ready dependency graph: identifier-keyed component
//! records with bidirectional edges, per-component direct and transitive
//! vulnerability sets, and a per-advisory aggregation map.
//!
//! Real-world SBOMs are messy. Components are declared without identifiers,
//! dependency references never match a declaration verbatim, the same
//! library shows up under three different identifiers, one vulnerability
//! carries five conflicting ratings, and dependency cycles are routine.
//! The library absorbs all of that:
//!
//! - **Identifier resolution**: missing or dangling identifiers are
//!   recovered by textual heuristics over the document's identifier
//!   universe, falling back to deterministic synthetic placeholders.
//!   Ambiguity is never guessed.
//! - **Duplicate collapsing**: components sharing (name, version, group)
//!   under distinct identifiers are merged, with every edge rewritten to
//!   the surviving record.
//! - **Rating normalization**: one canonical severity/score/vector per
//!   vulnerability, chosen by methodology priority and source rank.
//! - **Cycle-safe propagation**: every component learns which
//!   vulnerabilities it inherits from its dependency subtree, with bounded
//!   traversal through circular dependencies.
//!
//! Only a malformed document is an error; everything else is recovered and
//! reported through [`tracing`] diagnostics.
//!
//! ## Getting started
//!
//! ```
//! use sbom_graph::transform_str;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = transform_str(r#"{
//!         "components": [
//!             {"bom-ref": "app", "name": "app", "version": "1.0"},
//!             {"bom-ref": "lib", "name": "lib", "version": "2.0"}
//!         ],
//!         "dependencies": [{"ref": "app", "dependsOn": ["lib"]}],
//!         "vulnerabilities": [{
//!             "id": "CVE-2024-0001",
//!             "ratings": [{"method": "CVSSv31", "score": 9.8}],
//!             "affects": [{"ref": "lib"}]
//!         }]
//!     }"#)?;
//!
//!     let app = &result.components.components["app"];
//!     assert!(app.has_transitive_vulnerabilities);
//!     assert_eq!(result.severity_counts.critical, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`model`]: the normalized data model ([`DependencyGraph`],
//!   [`Component`], [`Vulnerability`], [`Severity`]).
//! - [`parsers`]: the typed deserialization boundary for CycloneDX JSON.
//! - [`graph`]: the individual analysis stages, usable on their own.
//! - [`pipeline`]: the end-to-end transform ([`transform_str`],
//!   [`transform_file`]).

pub mod error;
pub mod graph;
pub mod model;
pub mod parsers;
pub mod pipeline;

pub use error::{Result, SbomGraphError};
pub use model::{
    BomRef, Component, DependencyGraph, MetadataSummary, Severity, SeverityCounts, Vulnerability,
    VulnerabilityAggregate,
};
pub use pipeline::{transform, transform_file, transform_slice, transform_str, TransformedSbom};
