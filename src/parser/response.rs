//! Decoding of the OCR provider's JSON response envelope.
//!
//! The provider reports blocks with PascalCase fields and nests geometry
//! under `Geometry.BoundingBox`. Every field is optional on the wire so a
//! partial response decodes into defaults instead of failing.

use serde::Deserialize;

use crate::error::Result;
use crate::model::{
    Block, BlockType, BoundingBox, Relationship, RelationshipKind, SelectionStatus,
};

/// A decoded provider response for one page.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    /// Blocks in provider order
    pub blocks: Vec<Block>,

    /// Page count reported by the provider
    pub pages: u32,
}

/// Decode a provider response from JSON text.
pub fn parse_response(json: &str) -> Result<ProviderResponse> {
    let raw: RawResponse = serde_json::from_str(json)?;
    Ok(raw.into())
}

/// Decode a provider response from an already parsed JSON value.
pub fn parse_response_value(value: serde_json::Value) -> Result<ProviderResponse> {
    let raw: RawResponse = serde_json::from_value(value)?;
    Ok(raw.into())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawResponse {
    blocks: Vec<RawBlock>,
    document_metadata: RawMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawMetadata {
    pages: u32,
}

impl Default for RawMetadata {
    fn default() -> Self {
        Self { pages: 1 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawBlock {
    id: String,
    block_type: Option<String>,
    text: Option<String>,
    relationships: Vec<RawRelationship>,
    geometry: RawGeometry,
    confidence: f64,
    row_index: Option<u32>,
    column_index: Option<u32>,
    row_span: Option<u32>,
    column_span: Option<u32>,
    entity_types: Vec<String>,
    selection_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawRelationship {
    #[serde(rename = "Type")]
    kind: String,
    ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawGeometry {
    bounding_box: RawBoundingBox,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawBoundingBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl From<RawResponse> for ProviderResponse {
    fn from(raw: RawResponse) -> Self {
        Self {
            blocks: raw.blocks.into_iter().map(Block::from).collect(),
            pages: raw.document_metadata.pages,
        }
    }
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let bbox = raw.geometry.bounding_box;
        Block {
            id: raw.id,
            block_type: raw
                .block_type
                .map(BlockType::from)
                .unwrap_or_else(|| BlockType::Other(String::new())),
            text: raw.text,
            relationships: raw
                .relationships
                .into_iter()
                .map(|r| Relationship {
                    kind: RelationshipKind::from(r.kind),
                    ids: r.ids,
                })
                .collect(),
            bounding_box: BoundingBox::new(bbox.left, bbox.top, bbox.width, bbox.height),
            confidence: raw.confidence,
            row_index: raw.row_index,
            column_index: raw.column_index,
            row_span: raw.row_span,
            column_span: raw.column_span,
            entity_types: raw.entity_types,
            selection_status: raw.selection_status.map(|status| match status.as_str() {
                "SELECTED" => SelectionStatus::Selected,
                _ => SelectionStatus::NotSelected,
            }),
        }
    }
}
