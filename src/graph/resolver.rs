//! Identifier resolution heuristics.
//!
//! SBOM generators routinely omit `bom-ref` on components or emit dependency
//! references that never match a declaration verbatim. The resolver recovers
//! the intended identifier from the catalog using textual heuristics over
//! the fixed separators real-world identifiers use (`@`, `::`, `:`), and
//! falls back to a deterministic synthetic identifier when nothing matches.
//! Ambiguity is never guessed: anything but exactly one candidate falls
//! through to the next strategy.

use super::catalog::RefCatalog;
use crate::model::BomRef;
use crate::parsers::RawComponent;
use std::collections::HashMap;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

/// Candidate spellings of a name/version pair inside a hierarchical identifier
fn guessed_tokens(name: &str, version: &str) -> [String; 3] {
    [
        format!("{name}@{version}"),
        format!("{name}::{version}"),
        format!("{name}:{version}"),
    ]
}

/// Suffix-anchored test: does `identifier` end in a path/scope segment that
/// spells out this name/version pair?
fn suffix_matches(identifier: &str, name: &str, version: &str) -> bool {
    for token in guessed_tokens(name, version) {
        if identifier.ends_with(&format!("/{token}"))
            || identifier.ends_with(&format!("/{token}:"))
            || identifier.ends_with(&format!(":{token}"))
            || identifier.ends_with(&format!(":{token}:"))
        {
            return true;
        }
    }
    false
}

/// Interior test: does the pair occur as a delimited inner segment?
fn interior_matches(identifier: &str, name: &str, version: &str) -> bool {
    guessed_tokens(name, version)
        .iter()
        .any(|token| identifier.contains(&format!("/{token}:")) || identifier.contains(&format!(":{token}:")))
}

/// Name-only test: does the name occur delimited, in any version position?
fn name_only_matches(identifier: &str, name: &str) -> bool {
    identifier.contains(&format!("/{name}@"))
        || identifier.contains(&format!("/{name}:"))
        || identifier.contains(&format!(":{name}:"))
        || identifier.contains(&format!(":{name}@"))
}

/// Match a bare reference string against the catalog's known name/version
/// pairs: suffix-anchored first, then interior, then name-only, each pass
/// accepted only on exactly one hit.
pub(super) fn heuristic_match(catalog: &RefCatalog, raw_ref: &str) -> Option<BomRef> {
    let unique_hit = |test: &dyn Fn(&super::catalog::CatalogEntry) -> bool| {
        let mut hits = catalog.iter().filter(|(_, entry)| test(entry));
        match (hits.next(), hits.next()) {
            (Some((id, _)), None) => Some(id.clone()),
            _ => None,
        }
    };

    if let Some(id) = unique_hit(&|entry| suffix_matches(raw_ref, &entry.name, &entry.version)) {
        return Some(id);
    }
    if let Some(id) = unique_hit(&|entry| interior_matches(raw_ref, &entry.name, &entry.version)) {
        return Some(id);
    }
    unique_hit(&|entry| name_only_matches(raw_ref, &entry.name))
}

/// Per-run identifier resolver.
///
/// Both caches are scoped to a single document run; processing several
/// documents concurrently means one `Resolver` each, with no shared state.
#[derive(Debug, Default)]
pub struct Resolver {
    /// (name, version) → recovered/synthesized identifier for components
    /// declared without one
    component_cache: HashMap<(String, String), BomRef>,
    /// raw reference → resolution outcome, including negative results
    reference_cache: HashMap<String, Option<BomRef>>,
}

impl Resolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Best identifier for a declared component.
    ///
    /// An explicit `bom-ref` is returned verbatim. Otherwise the catalog is
    /// searched for exactly one identifier that plausibly encodes the
    /// component's name and version; failing that, a deterministic synthetic
    /// identifier is derived from the declaration's content. Never fails.
    pub fn resolve(&mut self, component: &RawComponent, catalog: &RefCatalog) -> BomRef {
        if let Some(raw_ref) = &component.bom_ref {
            return BomRef::from(raw_ref.as_str());
        }

        let name = component.name.as_deref().unwrap_or("-");
        let version = component.version.as_deref().unwrap_or("-");
        let cache_key = (name.to_string(), version.to_string());
        if let Some(cached) = self.component_cache.get(&cache_key) {
            return cached.clone();
        }

        warn!(name, version, "component has no identifier, searching for a match");

        let mut suffix_hits = catalog
            .identifiers()
            .filter(|id| suffix_matches(id.as_str(), name, version));
        if let (Some(id), None) = (suffix_hits.next(), suffix_hits.next()) {
            debug!(identifier = %id, "match found");
            let id = id.clone();
            self.component_cache.insert(cache_key, id.clone());
            return id;
        }

        let mut interior_hits = catalog
            .identifiers()
            .filter(|id| interior_matches(id.as_str(), name, version));
        if let (Some(id), None) = (interior_hits.next(), interior_hits.next()) {
            debug!(identifier = %id, "match found on interior token");
            let id = id.clone();
            self.component_cache.insert(cache_key, id.clone());
            return id;
        }

        let id = synthesize_identifier(component);
        warn!(identifier = %id, "no match found, synthesized an identifier");
        self.component_cache.insert(cache_key, id.clone());
        id
    }

    /// Resolve a bare reference string against the catalog.
    ///
    /// Unlike [`resolve`](Self::resolve) this never synthesizes: `None` means
    /// the reference is dangling and the caller fabricates a placeholder.
    /// Negative results are cached so repeated dangling references are O(1).
    pub fn normalize_reference(&mut self, raw_ref: &str, catalog: &RefCatalog) -> Option<BomRef> {
        if let Some(cached) = self.reference_cache.get(raw_ref) {
            return cached.clone();
        }

        let resolved = if catalog
            .get(raw_ref)
            .is_some_and(super::catalog::CatalogEntry::is_qualified)
        {
            Some(BomRef::from(raw_ref))
        } else {
            heuristic_match(catalog, raw_ref)
        };

        match &resolved {
            Some(id) => debug!(raw_ref, identifier = %id, "reference resolved"),
            None => debug!(raw_ref, "reference did not resolve"),
        }
        self.reference_cache
            .insert(raw_ref.to_string(), resolved.clone());
        resolved
    }
}

/// Deterministic synthetic identifier from a declaration's stable content.
///
/// Hashing the identity-bearing fields keeps the identifier stable across
/// runs over the same document, unlike an allocation counter would be.
fn synthesize_identifier(component: &RawComponent) -> BomRef {
    let mut content = String::new();
    for field in [
        component.name.as_deref(),
        component.version.as_deref(),
        component.group.as_deref(),
        component.component_type.as_deref(),
        component.purl.as_deref(),
        component.description.as_deref(),
    ] {
        content.push_str(field.unwrap_or("-"));
        content.push('\u{1f}');
    }
    for license in component.license_names() {
        content.push_str(&license);
        content.push('\u{1f}');
    }
    BomRef::new(format!("{:016x}", xxh3_64(content.as_bytes())))
}
