//! Document metadata summary, passed through to the presentation layer.

use crate::parsers::{RawBom, RawTool};
use serde::Serialize;

/// Verbatim summary of document-level metadata.
///
/// Nothing here feeds the graph algorithms; the presentation layer renders
/// it as-is next to the component and vulnerability maps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetadataSummary {
    /// Identity of the component the document describes
    pub main_component: Option<MainComponentSummary>,
    /// CycloneDX spec version of the document
    pub spec_version: Option<String>,
    /// Document serial number
    pub serial_number: Option<String>,
    /// Document version counter
    pub version: Option<String>,
    /// Tools that produced the document
    pub tools: Vec<ToolSummary>,
}

/// Identity of the main (described) component
#[derive(Debug, Clone, Default, Serialize)]
pub struct MainComponentSummary {
    pub component_type: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub purl: Option<String>,
    /// Free-form name/value properties, order preserved
    pub properties: Vec<(String, String)>,
}

/// One producing tool
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolSummary {
    pub vendor: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

impl From<&RawTool> for ToolSummary {
    fn from(tool: &RawTool) -> Self {
        Self {
            vendor: tool.vendor.clone(),
            name: tool.name.clone(),
            version: tool.version.clone(),
        }
    }
}

impl MetadataSummary {
    /// Extract the metadata summary from a parsed document.
    pub fn from_document(bom: &RawBom) -> Self {
        let main_component = bom
            .metadata
            .as_ref()
            .and_then(|meta| meta.component.as_ref())
            .map(|comp| MainComponentSummary {
                component_type: comp.component_type.clone(),
                group: comp.group.clone(),
                name: comp.name.clone(),
                version: comp.version.clone(),
                description: comp.description.clone(),
                purl: comp.purl.clone(),
                properties: comp
                    .properties
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(|prop| (prop.name.clone(), prop.value.clone()))
                    .collect(),
            });

        let tools = bom
            .metadata
            .as_ref()
            .and_then(|meta| meta.tools.as_deref())
            .unwrap_or_default()
            .iter()
            .map(ToolSummary::from)
            .collect();

        Self {
            main_component,
            spec_version: bom.spec_version.clone(),
            serial_number: bom.serial_number.clone(),
            version: bom.version.as_ref().map(ToString::to_string),
            tools,
        }
    }
}
