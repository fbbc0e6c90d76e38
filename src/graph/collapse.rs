//! Duplicate collapsing: one record per (name, version, group).
//!
//! Generators that merge several lockfiles or scanners into one document
//! routinely declare the same component under distinct identifiers. The
//! collapsor detects these, keeps the first-encountered record as survivor,
//! and rewrites every edge so losers disappear without breaking the graph.

use crate::model::{BomRef, DependencyGraph};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Merge components that share (name, version, group) under distinct
/// identifiers.
///
/// Two phases: detection over the whole graph completes before any rewrite,
/// so results never depend on iteration order mid-mutation. Survivors keep
/// their own attributes; losers' records are dropped, their edge sets folded
/// into the survivor, and every edge that pointed at a loser is redirected
/// to its survivor. Set-valued edges make the rewrite idempotent, and edge
/// inverses still hold afterwards.
///
/// Returns the number of records removed.
pub fn collapse_duplicates(graph: &mut DependencyGraph) -> usize {
    let mut first_seen: HashMap<(String, String, String), BomRef> = HashMap::new();
    let mut losers: IndexMap<BomRef, BomRef> = IndexMap::new();

    for (id, component) in &graph.components {
        match first_seen.entry(component.identity_key()) {
            std::collections::hash_map::Entry::Occupied(survivor) => {
                losers.insert(id.clone(), survivor.get().clone());
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }
    }

    for (loser, survivor) in &losers {
        debug!(loser = %loser, survivor = %survivor, "collapsing duplicate component");
        let Some(removed) = graph.components.shift_remove(loser) else {
            continue;
        };
        if let Some(record) = graph.components.get_mut(survivor) {
            record.depends_on.extend(removed.depends_on);
            record.dependency_of.extend(removed.dependency_of);
        }
    }

    for (loser, survivor) in &losers {
        for component in graph.components.values_mut() {
            if component.depends_on.remove(loser) {
                component.depends_on.insert(survivor.clone());
            }
            if component.dependency_of.remove(loser) {
                component.dependency_of.insert(survivor.clone());
            }
        }
    }

    // Folding a duplicate-of-a-dependency can leave a self edge behind
    let ids: Vec<BomRef> = losers.values().cloned().collect();
    for id in ids {
        if let Some(component) = graph.components.get_mut(&id) {
            component.depends_on.remove(&id);
            component.dependency_of.remove(&id);
        }
    }

    losers.len()
}
