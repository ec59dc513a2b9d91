//! Integration tests for block resolution and markdown synthesis.

use lanidrac::render::{self, LayoutAnalyzer, LayoutElement, RenderOptions};
use lanidrac::{resolve_blocks, Block, BoundingBox, Lanidrac};

const INVOICE: &str = r#"{
    "DocumentMetadata": {"Pages": 1},
    "Blocks": [
        {"Id": "page", "BlockType": "PAGE",
         "Relationships": [{"Type": "CHILD", "Ids": ["l1", "t1"]}]},
        {"Id": "l1", "BlockType": "LINE", "Text": "Invoice",
         "Geometry": {"BoundingBox": {"Left": 0.1, "Top": 0.05, "Width": 0.2, "Height": 0.02}}},
        {"Id": "t1", "BlockType": "TABLE",
         "Geometry": {"BoundingBox": {"Left": 0.1, "Top": 0.5, "Width": 0.8, "Height": 0.2}},
         "Relationships": [{"Type": "CHILD", "Ids": ["c1", "c2", "c3", "c4"]}]},
        {"Id": "c1", "BlockType": "CELL", "RowIndex": 1, "ColumnIndex": 1,
         "Relationships": [{"Type": "CHILD", "Ids": ["w1"]}]},
        {"Id": "c2", "BlockType": "CELL", "RowIndex": 1, "ColumnIndex": 2,
         "Relationships": [{"Type": "CHILD", "Ids": ["w2"]}]},
        {"Id": "c3", "BlockType": "CELL", "RowIndex": 2, "ColumnIndex": 1,
         "Relationships": [{"Type": "CHILD", "Ids": ["w3"]}]},
        {"Id": "c4", "BlockType": "CELL", "RowIndex": 2, "ColumnIndex": 2,
         "Relationships": [{"Type": "CHILD", "Ids": ["w4"]}]},
        {"Id": "w1", "BlockType": "WORD", "Text": "Item"},
        {"Id": "w2", "BlockType": "WORD", "Text": "Qty"},
        {"Id": "w3", "BlockType": "WORD", "Text": "Pen"},
        {"Id": "w4", "BlockType": "WORD", "Text": "2"},
        {"Id": "k1", "BlockType": "KEY_VALUE_SET", "EntityTypes": ["KEY"],
         "Geometry": {"BoundingBox": {"Left": 0.1, "Top": 0.3, "Width": 0.2, "Height": 0.02}},
         "Relationships": [{"Type": "VALUE", "Ids": ["v1"]}, {"Type": "CHILD", "Ids": ["w5"]}]},
        {"Id": "v1", "BlockType": "KEY_VALUE_SET", "EntityTypes": ["VALUE"],
         "Relationships": [{"Type": "CHILD", "Ids": ["w6"]}]},
        {"Id": "w5", "BlockType": "WORD", "Text": "Customer"},
        {"Id": "w6", "BlockType": "WORD", "Text": "Ana"}
    ]
}"#;

#[test]
fn test_provider_response_to_markdown() {
    let markdown = lanidrac::to_markdown(INVOICE).unwrap();

    assert_eq!(
        markdown,
        "# Invoice\n\n**Customer:** Ana\n\n| Item | Qty |\n| ---- | --- |\n| Pen  | 2   |"
    );
}

#[test]
fn test_colspan_repeats_cell_text() {
    let blocks = vec![
        Block::new("t", "TABLE").with_children(["a", "b1", "b2", "b3"]),
        Block::cell("a", 1, 1).with_text("Total").with_span(1, 3),
        Block::cell("b1", 2, 1).with_text("a"),
        Block::cell("b2", 2, 2).with_text("b"),
        Block::cell("b3", 2, 3).with_text("c"),
    ];

    let page = resolve_blocks(&blocks);
    let markdown = render::synthesize(&page);

    assert_eq!(
        markdown,
        "| Total | Total | Total |\n| ----- | ----- | ----- |\n| a     | b     | c     |"
    );
}

#[test]
fn test_equal_positions_keep_discovery_order() {
    let blocks = vec![
        Block::key("k")
            .with_text("Name")
            .with_value("v")
            .with_bbox(BoundingBox::at(0.0, 0.4)),
        Block::value("v").with_text("Ana"),
        Block::new("t", "TABLE")
            .with_children(["c"])
            .with_bbox(BoundingBox::at(0.0, 0.4)),
        Block::cell("c", 1, 1).with_text("Cell"),
    ];

    let page = resolve_blocks(&blocks);
    let elements = LayoutAnalyzer::analyze(&page);
    assert!(matches!(elements[0], LayoutElement::Table { .. }));
    assert!(matches!(elements[1], LayoutElement::FormGroup { .. }));

    let markdown = render::synthesize(&page);
    let table_at = markdown.find("| Cell |").unwrap();
    let form_at = markdown.find("**Name:** Ana").unwrap();
    assert!(table_at < form_at);
}

#[test]
fn test_checkbox_label_beside() {
    let blocks = vec![
        Block::checkbox("cb", true, 0.1, 0.5),
        Block::line("l", "Paid", 0.15, 0.51),
    ];

    let markdown = render::synthesize(&resolve_blocks(&blocks));
    assert_eq!(markdown, "Paid\n\n- [x] Paid");
}

#[test]
fn test_checkbox_label_above() {
    let blocks = vec![
        Block::checkbox("cb", false, 0.1, 0.5),
        Block::line("l", "Agree", 0.1, 0.47),
    ];

    let markdown = render::synthesize(&resolve_blocks(&blocks));
    assert!(markdown.ends_with("- [ ] Agree"));
}

#[test]
fn test_checkbox_without_label() {
    let blocks = vec![Block::checkbox("cb", false, 0.5, 0.5)];

    let markdown = render::synthesize(&resolve_blocks(&blocks));
    assert_eq!(markdown, "- [ ] Checkbox");
}

#[test]
fn test_form_repeated_in_text_is_suppressed() {
    let blocks = vec![
        Block::key("k").with_text("Total").with_value("v"),
        Block::value("v").with_text("42"),
        Block::line("l", "Total 42", 0.1, 0.6),
    ];

    let page = resolve_blocks(&blocks);
    assert_eq!(page.forms.len(), 1);

    let result = render::to_markdown_with_stats(&page, &RenderOptions::default());
    assert_eq!(result.content, "Total 42");
    assert_eq!(result.stats.suppressed_form_count, 1);
}

#[test]
fn test_dangling_references_degrade() {
    let blocks = vec![
        Block::key("k").with_children(["missing"]).with_value("gone"),
        Block::new("l", "LINE").with_children(["nowhere"]),
    ];

    let page = resolve_blocks(&blocks);
    assert_eq!(page.forms[0].key, "");
    assert_eq!(page.forms[0].value, "");
    assert_eq!(render::synthesize(&page), "");
}

#[test]
fn test_multi_page_headers() {
    let result = Lanidrac::new()
        .with_page_headers()
        .parse_pages([INVOICE, INVOICE])
        .unwrap();

    let markdown = result.to_markdown();
    assert!(markdown.starts_with("---\nPage: 1\nPages: 2\n---\n\n# Invoice"));
    assert!(markdown.contains("---\nPage: 2\nPages: 2\n---\n\n# Invoice"));
    assert_eq!(result.summary().total_tables, 2);
}

#[test]
fn test_document_stats() {
    let result = Lanidrac::new()
        .sequential()
        .parse_pages([INVOICE, INVOICE])
        .unwrap()
        .to_markdown_with_stats();

    assert_eq!(result.stats.page_count, 2);
    assert_eq!(result.stats.table_count, 2);
    assert_eq!(result.stats.heading_count, 2);
    assert_eq!(result.stats.form_field_count, 2);
}

#[test]
fn test_line_without_literal_text() {
    let blocks = vec![
        Block::new("l1", "LINE")
            .with_children(["w1", "w2"])
            .with_bbox(BoundingBox::new(0.1, 0.5, 0.3, 0.02)),
        Block::word("w1", "Hello"),
        Block::word("w2", "world"),
        Block::checkbox("cb", true, 0.05, 0.5),
    ];

    let markdown = render::synthesize(&resolve_blocks(&blocks));
    assert_eq!(markdown, "Hello world\n\n- [x] Hello world");
}

#[test]
fn test_oversized_column_span_renders() {
    let blocks = vec![
        Block::new("t", "TABLE").with_children(["a", "b1", "b2"]),
        Block::cell("a", 1, 1).with_text("Total").with_span(1, u32::MAX),
        Block::cell("b1", 2, 1).with_text("a"),
        Block::cell("b2", 2, 2).with_text("b"),
    ];

    let markdown = render::synthesize(&resolve_blocks(&blocks));
    assert_eq!(
        markdown,
        "| Total | Total |\n| ----- | ----- |\n| a     | b     |"
    );
}
