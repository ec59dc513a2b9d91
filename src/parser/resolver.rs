//! Block graph resolution.
//!
//! Turns the flat block collection of one page into typed entities. The
//! resolver never fails: dangling references resolve to empty text and
//! missing geometry or table indices fall back to defaults.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{
    Block, BlockType, Cell, CheckboxEntity, FormField, ParsedPage, PositionedText,
    RelationshipKind, SelectionStatus, TableEntity,
};

/// Resolves one page's detection graph into a [`ParsedPage`].
pub struct BlockGraphResolver<'a> {
    blocks: &'a [Block],
    index: HashMap<&'a str, &'a Block>,
}

impl<'a> BlockGraphResolver<'a> {
    /// Build the id lookup for a page's blocks.
    pub fn new(blocks: &'a [Block]) -> Self {
        let index = blocks.iter().map(|b| (b.id.as_str(), b)).collect();
        Self { blocks, index }
    }

    /// Resolve every entity kind on the page.
    pub fn resolve(&self) -> ParsedPage {
        let page = ParsedPage {
            tables: self.tables(),
            forms: self.forms(),
            checkboxes: self.checkboxes(),
            lines: self.positional_index(),
            full_text: self.full_text(),
        };

        log::debug!(
            "Resolved {} blocks: {} tables, {} form fields, {} checkboxes, {} positional entries",
            self.blocks.len(),
            page.tables.len(),
            page.forms.len(),
            page.checkboxes.len(),
            page.lines.len()
        );

        page
    }

    /// Look up a block by id.
    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.index.get(id).copied()
    }

    /// Text of a block: its literal text, or the space-joined words reached
    /// through CHILD references.
    pub fn text_of(&self, id: &str) -> String {
        let mut visited = HashSet::new();
        self.collect_text(id, &mut visited)
    }

    fn collect_text(&self, id: &str, visited: &mut HashSet<&'a str>) -> String {
        let Some(block) = self.get(id) else {
            log::debug!("Dangling block reference: {}", id);
            return String::new();
        };

        if let Some(text) = &block.text {
            return text.clone();
        }

        // Cyclic graphs are malformed; stop at the first revisit.
        if !visited.insert(block.id.as_str()) {
            return String::new();
        }

        block
            .related_ids(RelationshipKind::Child)
            .map(|child| self.collect_text(child, visited))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn blocks_of(&self, block_type: BlockType) -> impl Iterator<Item = &'a Block> {
        self.blocks.iter().filter(move |b| b.block_type == block_type)
    }

    fn tables(&self) -> Vec<TableEntity> {
        self.blocks_of(BlockType::Table)
            .map(|block| self.table(block))
            .collect()
    }

    fn table(&self, block: &Block) -> TableEntity {
        let mut grid: BTreeMap<u32, BTreeMap<u32, Cell>> = BTreeMap::new();

        let cell_blocks: Vec<&Block> = block
            .related_ids(RelationshipKind::Child)
            .filter_map(|id| self.get(id))
            .filter(|b| b.block_type == BlockType::Cell)
            .collect();

        let last_row = cell_blocks.iter().filter_map(|b| b.row_index).max().unwrap_or(1);
        let last_column = cell_blocks.iter().filter_map(|b| b.column_index).max().unwrap_or(1);

        for cell_block in cell_blocks {
            let row = cell_block.row_index.unwrap_or(1);
            let column = cell_block.column_index.unwrap_or(1);

            let cell = Cell {
                text: self.text_of(&cell_block.id),
                row_span: clamp_span(cell_block.row_span, row, last_row),
                col_span: clamp_span(cell_block.column_span, column, last_column),
                confidence: cell_block.confidence,
            };
            grid.entry(row).or_default().insert(column, cell);
        }

        TableEntity {
            id: block.id.clone(),
            rows: grid
                .into_values()
                .map(|columns| columns.into_values().collect())
                .collect(),
            confidence: block.confidence,
            bounding_box: block.bounding_box,
        }
    }

    fn forms(&self) -> Vec<FormField> {
        self.blocks_of(BlockType::KeyValueSet)
            .filter(|b| b.has_entity_type("KEY"))
            .map(|key_block| {
                // One VALUE pairing is expected; the last one wins otherwise.
                let value = key_block
                    .related_ids(RelationshipKind::Value)
                    .last()
                    .map(|id| self.text_of(id))
                    .unwrap_or_default();

                FormField {
                    key: self.text_of(&key_block.id),
                    value,
                    confidence: key_block.confidence,
                    bounding_box: key_block.bounding_box,
                }
            })
            .collect()
    }

    fn checkboxes(&self) -> Vec<CheckboxEntity> {
        self.blocks_of(BlockType::SelectionElement)
            .map(|block| CheckboxEntity {
                id: block.id.clone(),
                selected: block.selection_status == Some(SelectionStatus::Selected),
                confidence: block.confidence,
                bounding_box: block.bounding_box,
            })
            .collect()
    }

    fn positional_index(&self) -> Vec<PositionedText> {
        self.blocks
            .iter()
            .filter(|b| b.block_type.is_positional())
            .map(|b| PositionedText {
                id: b.id.clone(),
                block_type: b.block_type.clone(),
                text: self.text_of(&b.id),
                confidence: b.confidence,
                bounding_box: b.bounding_box,
            })
            .collect()
    }

    fn full_text(&self) -> String {
        self.blocks_of(BlockType::Line)
            .map(|b| self.text_of(&b.id))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A span may not reach past the last index present in the table.
fn clamp_span(span: Option<u32>, index: u32, last: u32) -> u32 {
    let room = last.saturating_sub(index).saturating_add(1);
    span.unwrap_or(1).clamp(1, room.max(1))
}

/// Resolve a page's blocks into typed entities.
pub fn resolve(blocks: &[Block]) -> ParsedPage {
    BlockGraphResolver::new(blocks).resolve()
}
