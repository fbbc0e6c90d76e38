//! Vulnerability aggregation: re-indexing the finished graph by advisory.

use crate::model::{DependencyGraph, SeverityCounts, VulnerabilityAggregate};
use indexmap::IndexMap;

/// Index the finished graph by vulnerability instead of by component.
///
/// Pure re-indexing, no traversal: each component's direct and transitive
/// lists are folded into a map keyed by (id, severity, score), recording
/// which components carry the vulnerability directly versus by inheritance.
/// Severity counters count unique map entries, not occurrences.
pub fn aggregate(
    graph: &DependencyGraph,
) -> (IndexMap<String, VulnerabilityAggregate>, SeverityCounts) {
    let mut aggregates: IndexMap<String, VulnerabilityAggregate> = IndexMap::new();
    let mut counts = SeverityCounts::default();

    for (id, component) in &graph.components {
        if !component.is_vulnerable() {
            continue;
        }

        for vuln in &component.direct_vulnerabilities {
            let entry = aggregates.entry(vuln.aggregation_key()).or_insert_with(|| {
                counts.record(vuln.severity);
                VulnerabilityAggregate::from_vulnerability(vuln)
            });
            entry.directly_affected.insert(id.clone());
        }

        for vuln in &component.transitive_vulnerabilities {
            let entry = aggregates.entry(vuln.aggregation_key()).or_insert_with(|| {
                counts.record(vuln.severity);
                VulnerabilityAggregate::from_vulnerability(vuln)
            });
            entry.transitively_affected.insert(id.clone());
        }
    }

    (aggregates, counts)
}
