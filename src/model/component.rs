//! Component records and the normalized dependency graph.

use super::{BomRef, Severity, Vulnerability};
use crate::parsers::RawComponent;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// A normalized component or service record.
///
/// Edges are stored bidirectionally: for any two components A and B,
/// `B ∈ A.depends_on` holds exactly when `A ∈ B.dependency_of`. The graph
/// builder and the duplicate collapsor are the only writers of these sets.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    /// Display name; placeholders use the raw reference literal
    pub name: String,
    /// Version string, "-" when undeclared
    pub version: String,
    /// Declared component/service type, "-" when undeclared
    pub component_type: String,
    /// Group/namespace (e.g. Maven groupId), participates in duplicate detection
    pub group: Option<String>,
    /// Deduplicated license identifiers/names
    pub licenses: BTreeSet<String>,
    /// Identifiers of components this one depends on
    pub depends_on: BTreeSet<BomRef>,
    /// Identifiers of components depending on this one
    pub dependency_of: BTreeSet<BomRef>,
    /// Vulnerabilities reported against this component itself
    pub direct_vulnerabilities: Vec<Vulnerability>,
    /// Vulnerabilities inherited from the dependency subtree (filled by propagation)
    pub transitive_vulnerabilities: Vec<Vulnerability>,
    /// Highest-ranked severity among direct vulnerabilities, `Clean` when none
    pub max_direct_severity: Severity,
    /// Whether any dependency subtree reported vulnerabilities
    pub has_transitive_vulnerabilities: bool,
    /// Whether the propagation pass reached this node
    pub visited: bool,
}

impl Component {
    /// Build a record from a declared component/service.
    ///
    /// A declaration without a name falls back to its resolved identifier
    /// as the display name, so the record stays traceable downstream
    /// instead of rendering as an anonymous dash.
    pub fn from_declaration(raw: &RawComponent, id: &BomRef) -> Self {
        Self {
            name: raw.name.clone().unwrap_or_else(|| id.to_string()),
            version: raw.version.clone().unwrap_or_else(|| "-".to_string()),
            component_type: raw.component_type.clone().unwrap_or_else(|| "-".to_string()),
            group: raw.group.clone(),
            licenses: raw.license_names(),
            depends_on: BTreeSet::new(),
            dependency_of: BTreeSet::new(),
            direct_vulnerabilities: Vec::new(),
            transitive_vulnerabilities: Vec::new(),
            max_direct_severity: Severity::Clean,
            has_transitive_vulnerabilities: false,
            visited: false,
        }
    }

    /// Synthesize a stand-in for a referenced but undeclared component.
    ///
    /// The raw reference literal doubles as the display name so the dangling
    /// reference stays visible downstream.
    pub fn placeholder(raw_ref: &str) -> Self {
        Self {
            name: raw_ref.to_string(),
            version: "-".to_string(),
            component_type: "-".to_string(),
            group: None,
            licenses: BTreeSet::new(),
            depends_on: BTreeSet::new(),
            dependency_of: BTreeSet::new(),
            direct_vulnerabilities: Vec::new(),
            transitive_vulnerabilities: Vec::new(),
            max_direct_severity: Severity::Clean,
            has_transitive_vulnerabilities: false,
            visited: false,
        }
    }

    /// Append a direct vulnerability unless an identical record is present,
    /// raising `max_direct_severity` when the new record outranks it.
    pub fn push_direct(&mut self, vuln: Vulnerability) {
        if vuln.severity.outranks(&self.max_direct_severity) {
            self.max_direct_severity = vuln.severity;
        }
        if !self.direct_vulnerabilities.contains(&vuln) {
            self.direct_vulnerabilities.push(vuln);
        }
    }

    /// Append transitive vulnerabilities, skipping records already present
    pub fn extend_transitive(&mut self, vulns: &[Vulnerability]) {
        for vuln in vulns {
            if !self.transitive_vulnerabilities.contains(vuln) {
                self.transitive_vulnerabilities.push(vuln.clone());
            }
        }
    }

    /// True when the component carries vulnerabilities directly or transitively
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !self.direct_vulnerabilities.is_empty() || !self.transitive_vulnerabilities.is_empty()
    }

    /// Key used for duplicate detection
    #[must_use]
    pub fn identity_key(&self) -> (String, String, String) {
        (
            self.name.clone(),
            self.version.clone(),
            self.group.clone().unwrap_or_else(|| "-".to_string()),
        )
    }
}

/// The normalized dependency graph: identifier → component record.
///
/// Insertion order is preserved; duplicate collapsing relies on it to pick
/// the first-encountered record as survivor, and propagation relies on it
/// for deterministic root ordering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    pub components: IndexMap<BomRef, Component>,
}

impl DependencyGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a full declaration unless the identifier is already taken.
    ///
    /// First declaration wins: later declarations of the same identifier are
    /// treated as bare references and never overwrite attributes.
    pub fn declare(&mut self, id: BomRef, component: Component) {
        self.components.entry(id).or_insert(component);
    }

    /// Record a dependency edge bidirectionally.
    ///
    /// Both endpoints must already exist; callers create placeholders first.
    pub fn add_edge(&mut self, dependent: &BomRef, dependency: &BomRef) {
        if let Some(comp) = self.components.get_mut(dependent) {
            comp.depends_on.insert(dependency.clone());
        }
        if let Some(comp) = self.components.get_mut(dependency) {
            comp.dependency_of.insert(dependent.clone());
        }
    }

    /// Whether an identifier names a known component
    #[must_use]
    pub fn contains(&self, id: &BomRef) -> bool {
        self.components.contains_key(id)
    }

    /// Whether a raw reference string names a known component
    #[must_use]
    pub fn contains_str(&self, raw_ref: &str) -> bool {
        self.components.contains_key(raw_ref)
    }

    /// Identifiers of root components (not a dependency of anything)
    #[must_use]
    pub fn roots(&self) -> Vec<BomRef> {
        self.components
            .iter()
            .filter(|(_, comp)| comp.dependency_of.is_empty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Total component count
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when no components are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
