//! Cycle-safe transitive vulnerability propagation.

use crate::model::{BomRef, DependencyGraph};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Traversal statistics, useful for downstream sizing and diagnostics
#[derive(Debug, Clone, Default)]
pub struct PropagationStats {
    /// Subtree weight per traversal root, in processing order
    pub root_weights: IndexMap<BomRef, u64>,
    /// Closed cycles encountered
    pub cycle_count: usize,
    /// Components unreached from any natural root (cycle-bound) that the
    /// second pass promoted to roots
    pub rescued_roots: Vec<BomRef>,
}

/// Fill every component's transitive vulnerability data, in place.
///
/// Depth-first from every root (no dependents), carrying the ordered path of
/// ancestor identifiers. A child already on the path closes a cycle: the
/// traversal stops there, so recursion depth is bounded by the number of
/// distinct identifiers and termination is guaranteed.
///
/// Components reachable only from inside a cycle have no natural root; a
/// second pass promotes any component left unvisited to a root of its own,
/// so no vulnerability data is lost to traversal order.
pub fn propagate(graph: &mut DependencyGraph) -> PropagationStats {
    let mut stats = PropagationStats::default();

    for root in graph.roots() {
        let weight = process_root(graph, &root, &mut stats);
        stats.root_weights.insert(root, weight);
    }

    let unvisited: Vec<BomRef> = graph
        .components
        .iter()
        .filter(|(_, comp)| !comp.visited)
        .map(|(id, _)| id.clone())
        .collect();
    for root in unvisited {
        // A later rescue may have visited this one already
        if graph.components[&root].visited {
            continue;
        }
        debug!(identifier = %root, "component unreached from any root, promoting to root");
        let weight = process_root(graph, &root, &mut stats);
        stats.root_weights.insert(root.clone(), weight);
        stats.rescued_roots.push(root);
    }

    stats
}

fn process_root(graph: &mut DependencyGraph, root: &BomRef, stats: &mut PropagationStats) -> u64 {
    if let Some(component) = graph.components.get_mut(root) {
        component.visited = true;
    }
    let mut path = vec![root.clone()];
    let (weight, subtree_vulnerable) = visit(graph, root, &mut path, stats);

    // The subtree may have filled children's transitive sets after this
    // root's own union ran; sweep the direct children once more
    if subtree_vulnerable {
        let children: Vec<BomRef> = graph.components[root].depends_on.iter().cloned().collect();
        for child_id in &children {
            let child = &graph.components[child_id];
            if !child.is_vulnerable() {
                continue;
            }
            let direct = child.direct_vulnerabilities.clone();
            let transitive = child.transitive_vulnerabilities.clone();
            if let Some(component) = graph.components.get_mut(root) {
                component.has_transitive_vulnerabilities = true;
                component.extend_transitive(&direct);
                component.extend_transitive(&transitive);
            }
        }
    }

    weight
}

/// Recurse through `id`'s children, filling transitive data bottom-up.
///
/// Returns the subtree weight (leaves count 1) and whether anything in the
/// subtree, including `id` itself, carries vulnerabilities.
fn visit(
    graph: &mut DependencyGraph,
    id: &BomRef,
    path: &mut Vec<BomRef>,
    stats: &mut PropagationStats,
) -> (u64, bool) {
    let mut weight = 0u64;
    let mut subtree_vulnerable = !graph.components[id].direct_vulnerabilities.is_empty();

    let children: Vec<BomRef> = graph.components[id].depends_on.iter().cloned().collect();
    for child_id in children {
        if let Some(child) = graph.components.get_mut(&child_id) {
            child.visited = true;
        }

        if !path.contains(&child_id) {
            path.push(child_id.clone());
            let (child_weight, child_subtree_vulnerable) = visit(graph, &child_id, path, stats);
            path.pop();
            weight += child_weight;

            let child = &graph.components[&child_id];
            if !child.direct_vulnerabilities.is_empty()
                || child.has_transitive_vulnerabilities
                || child_subtree_vulnerable
            {
                subtree_vulnerable = true;
                let direct = child.direct_vulnerabilities.clone();
                let transitive = child.transitive_vulnerabilities.clone();
                if let Some(component) = graph.components.get_mut(id) {
                    component.has_transitive_vulnerabilities = true;
                    component.extend_transitive(&direct);
                    component.extend_transitive(&transitive);
                }
            }
        } else {
            stats.cycle_count += 1;
            warn!(
                identifier = %child_id,
                chain = %format_dependency_chain(path, &child_id),
                "circular dependency detected"
            );
            weight += 1;

            // Not recursing past the repeated node would silently drop its
            // children's data; union one level up instead of a full
            // cross-cycle fixed point
            let grandchildren: Vec<BomRef> =
                graph.components[&child_id].depends_on.iter().cloned().collect();
            for grandchild_id in grandchildren {
                let grandchild = &graph.components[&grandchild_id];
                if grandchild.direct_vulnerabilities.is_empty()
                    && !grandchild.has_transitive_vulnerabilities
                {
                    continue;
                }
                let direct = grandchild.direct_vulnerabilities.clone();
                let transitive = grandchild.transitive_vulnerabilities.clone();
                if let Some(component) = graph.components.get_mut(&child_id) {
                    component.has_transitive_vulnerabilities = true;
                    component.extend_transitive(&direct);
                    component.extend_transitive(&transitive);
                }
            }
        }
    }

    (weight.max(1), subtree_vulnerable)
}

fn format_dependency_chain(path: &[BomRef], repeated: &BomRef) -> String {
    let mut chain: Vec<&str> = path.iter().map(BomRef::as_str).collect();
    chain.push(repeated.as_str());
    chain.join(" --> ")
}
