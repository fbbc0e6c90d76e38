//! End-to-end transform tests over realistic CycloneDX documents.

use sbom_graph::{transform_str, BomRef, Severity};

/// A document shaped like real SCA tool output: purl-style identifiers,
/// nested services, embedded and global dependency declarations, and
/// vulnerabilities with conflicting ratings.
const REALISTIC_DOC: &str = r#"{
    "specVersion": "1.5",
    "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
    "version": 3,
    "metadata": {
        "component": {
            "bom-ref": "pkg:generic/acme-portal@4.1.0",
            "type": "application",
            "name": "acme-portal",
            "version": "4.1.0",
            "purl": "pkg:generic/acme-portal@4.1.0"
        },
        "tools": [{"vendor": "acme", "name": "bomgen", "version": "2.1"}]
    },
    "components": [
        {"bom-ref": "pkg:npm/express@4.17.1", "type": "library",
         "name": "express", "version": "4.17.1",
         "licenses": [{"license": {"id": "MIT"}}]},
        {"bom-ref": "pkg:npm/lodash@4.17.20", "type": "library",
         "name": "lodash", "version": "4.17.20",
         "licenses": [{"license": {"id": "MIT"}}]},
        {"bom-ref": "pkg:npm/qs@6.7.0", "type": "library",
         "name": "qs", "version": "6.7.0"}
    ],
    "services": [
        {"bom-ref": "svc:auth", "name": "auth-service", "version": "1.2.0",
         "components": [
            {"bom-ref": "pkg:npm/jsonwebtoken@8.5.1", "type": "library",
             "name": "jsonwebtoken", "version": "8.5.1"}
         ]}
    ],
    "dependencies": [
        {"ref": "pkg:generic/acme-portal@4.1.0",
         "dependsOn": ["pkg:npm/express@4.17.1", "svc:auth"]},
        {"ref": "pkg:npm/express@4.17.1",
         "dependsOn": ["pkg:npm/qs@6.7.0", "pkg:npm/lodash@4.17.20"]},
        {"ref": "svc:auth", "dependsOn": ["pkg:npm/jsonwebtoken@8.5.1"]}
    ],
    "vulnerabilities": [
        {"id": "CVE-2021-23337",
         "ratings": [
            {"method": "CVSSv2", "severity": "medium", "score": 6.5,
             "source": {"name": "NVD"}},
            {"method": "CVSSv31", "severity": "high", "score": 7.2,
             "vector": "CVSS:3.1/AV:N", "source": {"name": "GHSA"}}
         ],
         "affects": [{"ref": "pkg:npm/lodash@4.17.20"}]},
        {"id": "CVE-2022-23529",
         "ratings": [{"method": "CVSSv31", "score": 9.8}],
         "affects": [{"ref": "pkg:npm/jsonwebtoken@8.5.1"}]}
    ]
}"#;

#[test]
fn test_full_document_transform() {
    let result = transform_str(REALISTIC_DOC).unwrap();
    let components = &result.components.components;

    // main component + 3 libraries + service + nested library
    assert_eq!(components.len(), 6);

    // CVSSv31 outranks CVSSv2 regardless of NVD being the v2 source
    let lodash = &components["pkg:npm/lodash@4.17.20"];
    assert_eq!(lodash.max_direct_severity, Severity::High);
    assert_eq!(lodash.direct_vulnerabilities[0].score, 7.2);
    assert_eq!(lodash.direct_vulnerabilities[0].vector, "CVSS:3.1/AV:N");

    // Vulnerabilities climb the whole ancestry
    let portal = &components["pkg:generic/acme-portal@4.1.0"];
    assert!(portal.has_transitive_vulnerabilities);
    let portal_ids: Vec<&str> = portal
        .transitive_vulnerabilities
        .iter()
        .map(|v| v.id.as_str())
        .collect();
    assert!(portal_ids.contains(&"CVE-2021-23337"));
    assert!(portal_ids.contains(&"CVE-2022-23529"));
    assert_eq!(portal.max_direct_severity, Severity::Clean);

    // The nested service library resolves and carries its own finding
    let jwt = &components["pkg:npm/jsonwebtoken@8.5.1"];
    assert_eq!(jwt.max_direct_severity, Severity::Critical);

    assert_eq!(result.severity_counts.critical, 1);
    assert_eq!(result.severity_counts.high, 1);
    assert_eq!(result.severity_counts.total(), 2);

    // Metadata passes through verbatim
    assert_eq!(result.metadata.spec_version.as_deref(), Some("1.5"));
    assert_eq!(result.metadata.version.as_deref(), Some("3"));
    assert_eq!(result.metadata.tools.len(), 1);
    let main = result.metadata.main_component.as_ref().unwrap();
    assert_eq!(main.name.as_deref(), Some("acme-portal"));
}

#[test]
fn test_component_without_identifier_resolves_by_suffix() {
    // left-pad is declared without a bom-ref; the only plausible catalog
    // identifier is the purl used in the dependency section
    let result = transform_str(
        r#"{
            "components": [
                {"bom-ref": "app", "name": "app", "version": "1.0"},
                {"name": "left-pad", "version": "1.3.0"}
            ],
            "dependencies": [
                {"ref": "app", "dependsOn": ["pkg:npm/left-pad@1.3.0"]}
            ]
        }"#,
    )
    .unwrap();

    let components = &result.components.components;
    assert_eq!(components.len(), 2);
    let left_pad = &components["pkg:npm/left-pad@1.3.0"];
    assert_eq!(left_pad.name, "left-pad");
    assert!(left_pad.dependency_of.contains(&BomRef::from("app")));
}

#[test]
fn test_metadata_component_referenced_from_nested_dependency() {
    // The main component's only mention is an embedded dependency two
    // levels down; it must still become a full declared record, not a
    // raw-literal placeholder
    let result = transform_str(
        r#"{
            "metadata": {"component": {"bom-ref": "root-ref", "name": "real-app", "version": "3.0"}},
            "components": [
                {"bom-ref": "outer", "name": "outer", "version": "1", "components": [
                    {"bom-ref": "inner", "name": "inner", "version": "1",
                     "dependencies": [{"ref": "root-ref"}]}
                ]}
            ]
        }"#,
    )
    .unwrap();

    let root = &result.components.components["root-ref"];
    assert_eq!(root.name, "real-app");
    assert_eq!(root.version, "3.0");
    assert!(root.dependency_of.contains(&BomRef::from("inner")));
}

#[test]
fn test_dangling_reference_becomes_placeholder() {
    let result = transform_str(
        r#"{
            "components": [{"bom-ref": "app", "name": "app", "version": "1.0"}],
            "dependencies": [{"ref": "app", "dependsOn": ["pkg:generic/missing@0.0"]}]
        }"#,
    )
    .unwrap();

    let ghost = &result.components.components["pkg:generic/missing@0.0"];
    assert_eq!(ghost.name, "pkg:generic/missing@0.0");
    assert_eq!(ghost.version, "-");
    assert!(ghost.licenses.is_empty());
    assert!(ghost.direct_vulnerabilities.is_empty());
    assert_eq!(ghost.max_direct_severity, Severity::Clean);
}

#[test]
fn test_tools_object_form_accepted() {
    let result = transform_str(
        r#"{
            "metadata": {"tools": {"components": [{"name": "trivy", "version": "0.48"}]}},
            "components": [{"bom-ref": "a", "name": "a", "version": "1"}]
        }"#,
    )
    .unwrap();
    assert_eq!(result.metadata.tools.len(), 1);
    assert_eq!(result.metadata.tools[0].name.as_deref(), Some("trivy"));
}

#[test]
fn test_duplicate_declarations_collapse() {
    let result = transform_str(
        r#"{
            "components": [
                {"bom-ref": "app", "name": "app", "version": "1"},
                {"bom-ref": "maven:org.acme:util:2.0", "name": "util", "version": "2.0",
                 "group": "org.acme"},
                {"bom-ref": "pkg:maven/org.acme/util@2.0", "name": "util", "version": "2.0",
                 "group": "org.acme"}
            ],
            "dependencies": [
                {"ref": "app", "dependsOn": ["pkg:maven/org.acme/util@2.0"]}
            ]
        }"#,
    )
    .unwrap();

    let components = &result.components.components;
    assert_eq!(components.len(), 2);
    // First-encountered identifier survives and inherits the edge
    let survivor = &components["maven:org.acme:util:2.0"];
    assert!(survivor.dependency_of.contains(&BomRef::from("app")));
    assert!(components["app"]
        .depends_on
        .contains(&BomRef::from("maven:org.acme:util:2.0")));
}

#[test]
fn test_vulnerability_without_ratings_defaults_to_information() {
    let result = transform_str(
        r#"{
            "components": [{"bom-ref": "a", "name": "a", "version": "1"}],
            "vulnerabilities": [{"id": "GHSA-xxxx", "affects": [{"ref": "a"}]}]
        }"#,
    )
    .unwrap();

    let a = &result.components.components["a"];
    assert_eq!(a.max_direct_severity, Severity::Information);
    assert_eq!(a.direct_vulnerabilities[0].score, 0.0);
    assert_eq!(a.direct_vulnerabilities[0].vector, "-");
    assert_eq!(result.severity_counts.information, 1);
}

#[test]
fn test_empty_document_transforms_cleanly() {
    let result = transform_str("{}").unwrap();
    assert!(result.components.is_empty());
    assert!(result.vulnerabilities.is_empty());
    assert_eq!(result.severity_counts.total(), 0);
    assert!(result.metadata.main_component.is_none());
}

#[test]
fn test_max_direct_severity_matches_direct_list() {
    let result = transform_str(
        r#"{
            "components": [{"bom-ref": "a", "name": "a", "version": "1"}],
            "vulnerabilities": [
                {"id": "V1", "ratings": [{"method": "CVSSv31", "score": 3.0}],
                 "affects": [{"ref": "a"}]},
                {"id": "V2", "ratings": [{"method": "CVSSv31", "score": 9.9}],
                 "affects": [{"ref": "a"}]},
                {"id": "V3", "ratings": [{"method": "CVSSv31", "score": 5.5}],
                 "affects": [{"ref": "a"}]}
            ]
        }"#,
    )
    .unwrap();

    let a = &result.components.components["a"];
    let max = a
        .direct_vulnerabilities
        .iter()
        .map(|v| v.severity)
        .max()
        .unwrap();
    assert_eq!(a.max_direct_severity, max);
    assert_eq!(a.max_direct_severity, Severity::Critical);
}

#[test]
fn test_aggregation_map_shape() {
    let result = transform_str(REALISTIC_DOC).unwrap();

    let entry = &result.vulnerabilities["CVE-2022-23529-critical-9.8"];
    assert!(entry
        .directly_affected
        .contains(&BomRef::from("pkg:npm/jsonwebtoken@8.5.1")));
    assert!(entry.transitively_affected.contains(&BomRef::from("svc:auth")));
    assert!(entry
        .transitively_affected
        .contains(&BomRef::from("pkg:generic/acme-portal@4.1.0")));
    assert!(!entry.directly_affected.contains(&BomRef::from("svc:auth")));
}

#[test]
fn test_transform_file_round_trip() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(REALISTIC_DOC.as_bytes()).unwrap();
    let result = sbom_graph::transform_file(file.path()).unwrap();
    assert_eq!(result.components.len(), 6);
}

#[test]
fn test_edge_inverse_invariant_end_to_end() {
    let result = transform_str(REALISTIC_DOC).unwrap();
    let components = &result.components.components;
    for (id, component) in components {
        for dep in &component.depends_on {
            assert!(
                components[dep.as_str()].dependency_of.contains(id),
                "{id} -> {dep} has no inverse"
            );
        }
        for parent in &component.dependency_of {
            assert!(
                components[parent.as_str()].depends_on.contains(id),
                "{parent} -> {id} has no forward edge"
            );
        }
    }
}
