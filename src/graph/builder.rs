//! Component graph assembly from declaration trees and edge lists.

use super::catalog::RefCatalog;
use super::normalizer;
use super::resolver::Resolver;
use crate::model::{BomRef, Component, DependencyGraph};
use crate::parsers::{RawBom, RawComponent};
use tracing::warn;

/// Assemble the dependency graph from a parsed document.
///
/// Declarations are instantiated first (recursing into nested trees), then
/// dependency edges are recorded, then vulnerabilities attached, so edge and
/// vulnerability targets can resolve against the full set of declarations.
/// Each declaration list goes through all three phases before the next list
/// starts; the global `dependencies` and `vulnerabilities` sections follow.
pub fn build(bom: &RawBom) -> DependencyGraph {
    let (catalog, metadata_tied_in) = RefCatalog::collect(bom);
    let mut resolver = Resolver::new();
    let mut graph = DependencyGraph::new();

    // The metadata main component participates only when its identifier is
    // actually referenced by the graph
    if metadata_tied_in {
        if let Some(main) = bom.metadata.as_ref().and_then(|m| m.component.as_ref()) {
            let id = resolver.resolve(main, &catalog);
            let record = Component::from_declaration(main, &id);
            graph.declare(id, record);
        }
    }

    for list in bom.declaration_lists() {
        for component in list {
            declare_tree(&mut graph, &mut resolver, &catalog, component);
        }
        for component in list {
            record_embedded_edges(&mut graph, &mut resolver, &catalog, component);
        }
        for component in list {
            attach_embedded_vulnerabilities(&mut graph, &mut resolver, &catalog, component);
        }
    }

    for dependency in bom.dependencies.as_deref().unwrap_or_default() {
        let Some(raw_dependent) = &dependency.ref_field else {
            continue;
        };
        let dependent = resolve_endpoint(
            &mut graph,
            &mut resolver,
            &catalog,
            raw_dependent,
            "dependency 'ref'",
        );
        for raw_target in dependency.depends_on.as_deref().unwrap_or_default() {
            let target = resolve_endpoint(
                &mut graph,
                &mut resolver,
                &catalog,
                raw_target,
                "dependency 'dependsOn'",
            );
            graph.add_edge(&dependent, &target);
        }
    }

    for vulnerability in bom.vulnerabilities.as_deref().unwrap_or_default() {
        let vuln = normalizer::normalize(vulnerability);
        for affects in vulnerability.affects.as_deref().unwrap_or_default() {
            let target = resolve_endpoint(
                &mut graph,
                &mut resolver,
                &catalog,
                &affects.ref_field,
                "vulnerability 'affects'",
            );
            if let Some(component) = graph.components.get_mut(&target) {
                component.push_direct(vuln.clone());
            }
        }
    }

    graph
}

/// Declare a component and its nested components/services, all depths
fn declare_tree(
    graph: &mut DependencyGraph,
    resolver: &mut Resolver,
    catalog: &RefCatalog,
    component: &RawComponent,
) {
    let id = resolver.resolve(component, catalog);
    let record = Component::from_declaration(component, &id);
    graph.declare(id, record);
    for list in component.nested_lists() {
        for nested in list {
            declare_tree(graph, resolver, catalog, nested);
        }
    }
}

/// Record dependency edges declared inside a component tree.
///
/// An embedded dependency entry names a target of the enclosing component;
/// `dependsOn` lists only appear in the global section.
fn record_embedded_edges(
    graph: &mut DependencyGraph,
    resolver: &mut Resolver,
    catalog: &RefCatalog,
    component: &RawComponent,
) {
    let dependent = resolver.resolve(component, catalog);
    for dependency in component.dependencies.as_deref().unwrap_or_default() {
        let Some(raw_target) = &dependency.ref_field else {
            continue;
        };
        let target = resolve_endpoint(
            graph,
            resolver,
            catalog,
            raw_target,
            "embedded dependency 'ref'",
        );
        graph.add_edge(&dependent, &target);
    }
    for list in component.nested_lists() {
        for nested in list {
            record_embedded_edges(graph, resolver, catalog, nested);
        }
    }
}

/// Attach vulnerabilities declared inside a component tree to the
/// enclosing component
fn attach_embedded_vulnerabilities(
    graph: &mut DependencyGraph,
    resolver: &mut Resolver,
    catalog: &RefCatalog,
    component: &RawComponent,
) {
    let id = resolver.resolve(component, catalog);
    for vulnerability in component.vulnerabilities.as_deref().unwrap_or_default() {
        let vuln = normalizer::normalize(vulnerability);
        if let Some(record) = graph.components.get_mut(&id) {
            record.push_direct(vuln);
        }
    }
    for list in component.nested_lists() {
        for nested in list {
            attach_embedded_vulnerabilities(graph, resolver, catalog, nested);
        }
    }
}

/// Resolve an edge or vulnerability endpoint to a graph key, synthesizing a
/// placeholder component when nothing matches. Never fails.
fn resolve_endpoint(
    graph: &mut DependencyGraph,
    resolver: &mut Resolver,
    catalog: &RefCatalog,
    raw_ref: &str,
    context: &str,
) -> BomRef {
    if graph.contains_str(raw_ref) {
        return BomRef::from(raw_ref);
    }

    warn!(raw_ref, context, "reference is not a declared component, searching for a match");
    match resolver.normalize_reference(raw_ref, catalog) {
        Some(id) => {
            // A heuristic match can name an identifier that was cataloged
            // but never declared as a full component
            if !graph.contains(&id) {
                graph.declare(id.clone(), Component::placeholder(id.as_str()));
            }
            id
        }
        None => {
            warn!(raw_ref, "no match found, creating a placeholder");
            let id = BomRef::from(raw_ref);
            graph.declare(id.clone(), Component::placeholder(raw_ref));
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::parsers::parse_str;

    fn build_from(doc: &str) -> DependencyGraph {
        build(&parse_str(doc).unwrap())
    }

    #[test]
    fn test_declarations_and_global_edges() {
        let graph = build_from(
            r#"{
                "components": [
                    {"bom-ref": "a", "name": "a", "version": "1"},
                    {"bom-ref": "b", "name": "b", "version": "2"}
                ],
                "dependencies": [{"ref": "a", "dependsOn": ["b"]}]
            }"#,
        );
        assert_eq!(graph.len(), 2);
        assert!(graph.components["a"].depends_on.contains(&BomRef::from("b")));
        assert!(graph.components["b"].dependency_of.contains(&BomRef::from("a")));
    }

    #[test]
    fn test_nested_declarations_all_depths() {
        let graph = build_from(
            r#"{
                "components": [
                    {"bom-ref": "outer", "name": "outer", "version": "1", "components": [
                        {"bom-ref": "mid", "name": "mid", "version": "1", "services": [
                            {"bom-ref": "leaf", "name": "leaf", "version": "1"}
                        ]}
                    ]}
                ]
            }"#,
        );
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.components["leaf"].name, "leaf");
    }

    #[test]
    fn test_dangling_edge_creates_placeholder() {
        let graph = build_from(
            r#"{
                "components": [{"bom-ref": "a", "name": "a", "version": "1"}],
                "dependencies": [{"ref": "a", "dependsOn": ["pkg:generic/missing@0.0"]}]
            }"#,
        );
        let ghost = &graph.components["pkg:generic/missing@0.0"];
        assert_eq!(ghost.name, "pkg:generic/missing@0.0");
        assert_eq!(ghost.version, "-");
        assert!(ghost.licenses.is_empty());
        assert!(ghost.direct_vulnerabilities.is_empty());
        assert_eq!(ghost.max_direct_severity, Severity::Clean);
        assert!(ghost.dependency_of.contains(&BomRef::from("a")));
    }

    #[test]
    fn test_edge_reference_resolves_heuristically() {
        // The dependsOn value spells out b's name/version instead of its
        // declared identifier
        let graph = build_from(
            r#"{
                "components": [
                    {"bom-ref": "comp-a", "name": "a", "version": "1.0"},
                    {"bom-ref": "comp-b", "name": "b", "version": "2.0"}
                ],
                "dependencies": [{"ref": "comp-a", "dependsOn": ["pkg:npm/b@2.0"]}]
            }"#,
        );
        assert_eq!(graph.len(), 2);
        assert!(graph.components["comp-a"]
            .depends_on
            .contains(&BomRef::from("comp-b")));
    }

    #[test]
    fn test_embedded_dependencies_and_vulnerabilities() {
        let graph = build_from(
            r#"{
                "components": [
                    {"bom-ref": "a", "name": "a", "version": "1",
                     "dependencies": [{"ref": "b"}],
                     "vulnerabilities": [{"id": "CVE-1", "ratings": [{"method": "CVSSv31", "score": 8.0}]}]},
                    {"bom-ref": "b", "name": "b", "version": "2"}
                ]
            }"#,
        );
        assert!(graph.components["a"].depends_on.contains(&BomRef::from("b")));
        assert_eq!(graph.components["a"].direct_vulnerabilities.len(), 1);
        assert_eq!(graph.components["a"].max_direct_severity, Severity::High);
    }

    #[test]
    fn test_global_vulnerabilities_attach_to_affects_targets() {
        let graph = build_from(
            r#"{
                "components": [{"bom-ref": "a", "name": "a", "version": "1"}],
                "vulnerabilities": [{
                    "id": "CVE-2",
                    "ratings": [{"method": "CVSSv31", "score": 9.8}],
                    "affects": [{"ref": "a"}, {"ref": "ghost"}]
                }]
            }"#,
        );
        assert_eq!(graph.components["a"].max_direct_severity, Severity::Critical);
        // Unknown target gets a placeholder carrying the vulnerability
        assert_eq!(graph.components["ghost"].direct_vulnerabilities.len(), 1);
    }

    #[test]
    fn test_duplicate_direct_vulnerability_suppressed() {
        let graph = build_from(
            r#"{
                "components": [{"bom-ref": "a", "name": "a", "version": "1"}],
                "vulnerabilities": [
                    {"id": "CVE-3", "ratings": [{"method": "CVSSv31", "score": 5.0}],
                     "affects": [{"ref": "a"}, {"ref": "a"}]}
                ]
            }"#,
        );
        assert_eq!(graph.components["a"].direct_vulnerabilities.len(), 1);
    }

    #[test]
    fn test_metadata_component_declared_when_referenced() {
        let graph = build_from(
            r#"{
                "metadata": {"component": {"bom-ref": "root", "name": "app", "version": "1"}},
                "components": [{"bom-ref": "lib", "name": "lib", "version": "2"}],
                "dependencies": [{"ref": "root", "dependsOn": ["lib"]}]
            }"#,
        );
        assert_eq!(graph.components["root"].name, "app");
        assert!(graph.components["root"].depends_on.contains(&BomRef::from("lib")));
    }

    #[test]
    fn test_nameless_declaration_named_after_identifier() {
        let graph = build_from(
            r#"{
                "components": [
                    {"bom-ref": "pkg:npm/anon@1.0", "version": "1.0"},
                    {"version": "2.0", "type": "library"}
                ]
            }"#,
        );
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.components["pkg:npm/anon@1.0"].name, "pkg:npm/anon@1.0");

        // No name and no identifier: the synthesized hash id doubles as the
        // display name
        let (id, record) = graph
            .components
            .iter()
            .find(|(id, _)| id.as_str() != "pkg:npm/anon@1.0")
            .unwrap();
        assert_eq!(record.name, id.as_str());
        assert_eq!(id.as_str().len(), 16);
    }

    #[test]
    fn test_first_declaration_wins_over_redeclaration() {
        let graph = build_from(
            r#"{
                "components": [
                    {"bom-ref": "a", "name": "first", "version": "1"},
                    {"bom-ref": "a", "name": "second", "version": "9"}
                ]
            }"#,
        );
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.components["a"].name, "first");
    }
}
