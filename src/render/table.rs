//! Table rendering as GFM pipe tables.

use crate::model::{Cell, TableEntity};

/// Render a table, or `None` when it has no rows.
///
/// Cells are duplicated across every column they span. Row spans are not
/// expanded: a cell spanning several rows only appears in its first row.
pub fn render_table(table: &TableEntity) -> Option<String> {
    if table.is_empty() {
        return None;
    }

    let mut rows: Vec<Vec<String>> = table.rows.iter().map(|row| expand_row(row)).collect();
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if column_count == 0 {
        return None;
    }

    for row in &mut rows {
        row.resize(column_count, String::new());
    }

    let has_header = detect_header(&rows);

    let mut widths = vec![0usize; column_count];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad_right(cell, width))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));

        if i == 0 && has_header {
            // GFM needs at least three dashes per separator cell.
            let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w.max(3))).collect();
            lines.push(format!("| {} |", separator.join(" | ")));
        }
    }

    Some(lines.join("\n"))
}

/// Expand a row horizontally by column span, trimming cell text.
pub fn expand_row(row: &[Cell]) -> Vec<String> {
    row.iter()
        .flat_map(|cell| std::iter::repeat(cell.text.trim().to_string()).take(cell.width()))
        .collect()
}

/// A header exists when the first row has any non-empty cell.
fn detect_header(rows: &[Vec<String>]) -> bool {
    rows.first()
        .map(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .unwrap_or(false)
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = String::with_capacity(text.len() + width.saturating_sub(len));
    padded.push_str(text);
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    padded
}
