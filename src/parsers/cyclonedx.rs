//! Typed deserialization boundary for CycloneDX-style JSON documents.
//!
//! Every optional field in the input is an `Option` here, so the graph
//! stages never repeat presence checks against loosely typed JSON. Only the
//! fields the transform consumes are modeled; unknown fields are ignored,
//! and the source document is never mutated.

use crate::error::{ParseErrorKind, Result, SbomGraphError};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Parse a document from a string slice.
///
/// This is the only fatal failure point of the transform: invalid JSON or a
/// non-object document root aborts the run.
pub fn parse_str(content: &str) -> Result<RawBom> {
    if !content.trim_start().starts_with('{') {
        return Err(SbomGraphError::parse(
            "at document root",
            ParseErrorKind::MissingStructure,
        ));
    }
    Ok(serde_json::from_str(content)?)
}

/// Parse a document from raw bytes.
pub fn parse_slice(content: &[u8]) -> Result<RawBom> {
    let text = std::str::from_utf8(content).map_err(|e| {
        SbomGraphError::parse(
            "document bytes",
            ParseErrorKind::InvalidEncoding(e.to_string()),
        )
    })?;
    parse_str(text)
}

/// Top-level document structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBom {
    pub spec_version: Option<String>,
    pub serial_number: Option<String>,
    pub version: Option<u64>,
    pub metadata: Option<RawMetadata>,
    pub components: Option<Vec<RawComponent>>,
    pub services: Option<Vec<RawComponent>>,
    pub dependencies: Option<Vec<RawDependency>>,
    pub vulnerabilities: Option<Vec<RawVulnerability>>,
}

impl RawBom {
    /// Root component/service declaration lists, in document order.
    ///
    /// Services share the component shape for everything the graph needs.
    pub fn declaration_lists(&self) -> impl Iterator<Item = &[RawComponent]> {
        self.components
            .as_deref()
            .into_iter()
            .chain(self.services.as_deref())
    }
}

/// Document metadata block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub component: Option<RawComponent>,
    /// Array form (CycloneDX 1.4/1.5) or object form (1.6); both accepted
    #[serde(default, deserialize_with = "deserialize_tools")]
    pub tools: Option<Vec<RawTool>>,
}

/// One producing tool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTool {
    pub vendor: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

/// CycloneDX 1.6 tools object format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToolsObject {
    components: Option<Vec<RawTool>>,
    services: Option<Vec<RawTool>>,
}

/// Accept both the 1.4/1.5 array and the 1.6 object form of `metadata.tools`.
fn deserialize_tools<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<RawTool>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Option<Vec<RawTool>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<RawTool>()? {
                tools.push(tool);
            }
            Ok(Some(tools))
        }

        fn visit_map<M>(self, map: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let obj: RawToolsObject =
                serde::Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
            let mut tools = obj.components.unwrap_or_default();
            tools.extend(obj.services.unwrap_or_default());
            Ok(if tools.is_empty() { None } else { Some(tools) })
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

/// A declared component or service, possibly nested
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponent {
    #[serde(alias = "bom-ref")]
    pub bom_ref: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub group: Option<String>,
    #[serde(rename = "type")]
    pub component_type: Option<String>,
    pub purl: Option<String>,
    pub description: Option<String>,
    pub licenses: Option<Vec<RawLicenseChoice>>,
    pub properties: Option<Vec<RawProperty>>,
    /// Nested component declarations
    pub components: Option<Vec<RawComponent>>,
    /// Nested service declarations
    pub services: Option<Vec<RawComponent>>,
    /// Dependency edges declared inside the component
    pub dependencies: Option<Vec<RawDependency>>,
    /// Vulnerabilities declared inside the component
    pub vulnerabilities: Option<Vec<RawVulnerability>>,
}

impl RawComponent {
    /// Nested declaration lists (components then services), in document order
    pub fn nested_lists(&self) -> impl Iterator<Item = &[RawComponent]> {
        self.components
            .as_deref()
            .into_iter()
            .chain(self.services.as_deref())
    }

    /// Deduplicated license identifiers/names
    pub fn license_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for choice in self.licenses.as_deref().unwrap_or_default() {
            if let Some(license) = &choice.license {
                if let Some(id) = &license.id {
                    names.insert(id.clone());
                } else if let Some(name) = &license.name {
                    names.insert(name.clone());
                }
            }
        }
        names
    }
}

/// License choice wrapper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLicenseChoice {
    pub license: Option<RawLicense>,
    pub expression: Option<String>,
}

/// A single license entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLicense {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Free-form name/value property
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    pub name: String,
    pub value: String,
}

/// One dependency declaration: a dependent and what it depends on
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    #[serde(rename = "ref")]
    pub ref_field: Option<String>,
    pub depends_on: Option<Vec<String>>,
}

/// A reported vulnerability
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVulnerability {
    pub id: String,
    pub ratings: Option<Vec<RawRating>>,
    pub affects: Option<Vec<RawAffects>>,
}

/// One severity rating from one source/methodology
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRating {
    pub method: Option<String>,
    pub severity: Option<String>,
    pub score: Option<f64>,
    pub vector: Option<String>,
    pub source: Option<RawRatingSource>,
}

/// Source of a rating
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRatingSource {
    pub name: Option<String>,
}

/// Target of a vulnerability's `affects` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAffects {
    #[serde(rename = "ref")]
    pub ref_field: String,
}
