//! Identifier catalog: the universe of identifiers used for disambiguation.

use crate::model::BomRef;
use crate::parsers::{RawBom, RawComponent};
use indexmap::IndexMap;

/// Name/version attached to a cataloged identifier, "-" when unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub version: String,
}

impl CatalogEntry {
    fn bare() -> Self {
        Self {
            name: "-".to_string(),
            version: "-".to_string(),
        }
    }

    /// True when both name and version are known
    pub fn is_qualified(&self) -> bool {
        self.name != "-" && self.version != "-"
    }
}

/// Every identifier appearing anywhere in the document, explicit or implied.
///
/// The catalog is additive only: a known name/version is never overwritten by
/// a later bare reference to the same identifier, but a bare entry is filled
/// in when a full declaration shows up afterwards.
#[derive(Debug, Clone, Default)]
pub struct RefCatalog {
    entries: IndexMap<BomRef, CatalogEntry>,
}

impl RefCatalog {
    /// Scan a parsed document for every identifier occurrence.
    ///
    /// Returns the catalog and whether the metadata main component ties into
    /// the dependency graph (its identifier matches something the graph
    /// already uses), in which case the builder declares it as a component.
    pub fn collect(bom: &RawBom) -> (Self, bool) {
        let mut catalog = Self::default();

        for list in bom.declaration_lists() {
            for component in list {
                catalog.record_declaration_tree(component);
            }
        }

        // Dependency declarations embedded inside components, at any depth
        for list in bom.declaration_lists() {
            for component in list {
                catalog.record_embedded_reference_tree(component);
            }
        }

        // Global dependency edge endpoints
        for dependency in bom.dependencies.as_deref().unwrap_or_default() {
            if let Some(dependent) = &dependency.ref_field {
                catalog.record_reference(dependent);
            }
            for target in dependency.depends_on.as_deref().unwrap_or_default() {
                catalog.record_reference(target);
            }
        }

        let mut metadata_tied_in = false;
        if let Some(main) = bom.metadata.as_ref().and_then(|m| m.component.as_ref()) {
            if let Some(raw_ref) = &main.bom_ref {
                if catalog.plausibly_refers_to_component(raw_ref) {
                    metadata_tied_in = true;
                    catalog.record_component(main);
                }
            }
        }

        (catalog, metadata_tied_in)
    }

    fn record_declaration_tree(&mut self, component: &RawComponent) {
        if component.bom_ref.is_some() {
            self.record_component(component);
        }
        for list in component.nested_lists() {
            for nested in list {
                self.record_declaration_tree(nested);
            }
        }
    }

    /// Record embedded dependency targets throughout a component tree
    fn record_embedded_reference_tree(&mut self, component: &RawComponent) {
        for dependency in component.dependencies.as_deref().unwrap_or_default() {
            if let Some(target) = &dependency.ref_field {
                self.record_reference(target);
            }
        }
        for list in component.nested_lists() {
            for nested in list {
                self.record_embedded_reference_tree(nested);
            }
        }
    }

    /// Record a full declaration, filling in "-" fields of an earlier bare entry
    fn record_component(&mut self, component: &RawComponent) {
        let Some(raw_ref) = &component.bom_ref else {
            return;
        };
        let entry = self
            .entries
            .entry(BomRef::from(raw_ref.as_str()))
            .or_insert_with(CatalogEntry::bare);
        if entry.name == "-" {
            if let Some(name) = &component.name {
                entry.name = name.clone();
            }
        }
        if entry.version == "-" {
            if let Some(version) = &component.version {
                entry.version = version.clone();
            }
        }
    }

    /// Record a bare reference, never overwriting known attributes
    fn record_reference(&mut self, raw_ref: &str) {
        self.entries
            .entry(BomRef::from(raw_ref))
            .or_insert_with(CatalogEntry::bare);
    }

    /// Whether a reference matches any cataloged identifier, exactly or via
    /// the textual heuristics. Used to decide metadata-component tie-in.
    fn plausibly_refers_to_component(&self, raw_ref: &str) -> bool {
        if self.entries.contains_key(raw_ref) {
            return true;
        }
        super::resolver::heuristic_match(self, raw_ref).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BomRef, &CatalogEntry)> {
        self.entries.iter()
    }

    /// Cataloged identifiers, in first-occurrence order
    pub fn identifiers(&self) -> impl Iterator<Item = &BomRef> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
