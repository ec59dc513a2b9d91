//! Checkbox rendering with spatial label lookup.

use super::LayoutThresholds;
use crate::model::{CheckboxEntity, PositionedText};

/// Label used when no nearby line qualifies.
pub const DEFAULT_CHECKBOX_LABEL: &str = "Checkbox";

/// Find the label for a checkbox among LINE entries.
///
/// A line on the same horizontal band to the right of the box wins over a
/// line directly above it; within each group the nearest line wins.
pub fn find_label<'a>(
    checkbox: &CheckboxEntity,
    lines: impl IntoIterator<Item = &'a PositionedText>,
    thresholds: &LayoutThresholds,
) -> String {
    let left = checkbox.bounding_box.left;
    let top = checkbox.bounding_box.top;

    let mut beside: Option<(f64, &str)> = None;
    let mut above: Option<(f64, &str)> = None;

    for line in lines.into_iter().filter(|l| l.is_line()) {
        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }
        let line_left = line.bounding_box.left;
        let line_top = line.bounding_box.top;

        if (line_top - top).abs() < thresholds.checkbox_same_band
            && line_left > left
            && line_left - left < thresholds.checkbox_right_window
        {
            keep_nearest(&mut beside, line_left - left, text);
        }

        if line_top < top
            && top - line_top < thresholds.checkbox_above_window
            && (line_left - left).abs() < thresholds.checkbox_left_alignment
        {
            keep_nearest(&mut above, top - line_top, text);
        }
    }

    beside
        .or(above)
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| DEFAULT_CHECKBOX_LABEL.to_string())
}

fn keep_nearest<'a>(best: &mut Option<(f64, &'a str)>, distance: f64, text: &'a str) {
    match best {
        Some((d, _)) if *d <= distance => {}
        _ => *best = Some((distance, text)),
    }
}

/// Render checkboxes as a GFM task list.
pub fn render_checkboxes(
    checkboxes: &[CheckboxEntity],
    lines: &[PositionedText],
    thresholds: &LayoutThresholds,
) -> Option<String> {
    if checkboxes.is_empty() {
        return None;
    }

    let items: Vec<String> = checkboxes
        .iter()
        .map(|checkbox| {
            let marker = if checkbox.selected { "[x]" } else { "[ ]" };
            format!("- {} {}", marker, find_label(checkbox, lines, thresholds))
        })
        .collect();

    Some(items.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;

    fn thresholds() -> LayoutThresholds {
        LayoutThresholds::default()
    }

    #[test]
    fn test_label_to_the_right() {
        let checkbox = CheckboxEntity::new(true, 0.10, 0.50);
        let lines = vec![PositionedText::line("I agree", 0.15, 0.51)];

        assert_eq!(find_label(&checkbox, &lines, &thresholds()), "I agree");
    }

    #[test]
    fn test_nearest_right_label_wins() {
        let checkbox = CheckboxEntity::new(false, 0.10, 0.50);
        let lines = vec![
            PositionedText::line("Far", 0.18, 0.50),
            PositionedText::line("Near", 0.12, 0.50),
        ];

        assert_eq!(find_label(&checkbox, &lines, &thresholds()), "Near");
    }

    #[test]
    fn test_right_beats_above() {
        let checkbox = CheckboxEntity::new(false, 0.10, 0.50);
        let lines = vec![
            PositionedText::line("Heading above", 0.10, 0.48),
            PositionedText::line("Beside", 0.16, 0.505),
        ];

        assert_eq!(find_label(&checkbox, &lines, &thresholds()), "Beside");
    }

    #[test]
    fn test_label_above() {
        let checkbox = CheckboxEntity::new(false, 0.10, 0.50);
        let lines = vec![
            PositionedText::line("Too high", 0.10, 0.40),
            PositionedText::line("Options", 0.11, 0.47),
        ];

        assert_eq!(find_label(&checkbox, &lines, &thresholds()), "Options");
    }

    #[test]
    fn test_default_label() {
        let checkbox = CheckboxEntity::new(false, 0.10, 0.50);
        let lines = vec![
            PositionedText::line("Left of box", 0.02, 0.50),
            PositionedText::line("   ", 0.12, 0.50),
            PositionedText {
                block_type: BlockType::Word,
                ..PositionedText::line("word", 0.12, 0.50)
            },
        ];

        assert_eq!(find_label(&checkbox, &lines, &thresholds()), "Checkbox");
    }

    #[test]
    fn test_render_task_list() {
        let checkboxes = vec![
            CheckboxEntity::new(true, 0.1, 0.2),
            CheckboxEntity::new(false, 0.1, 0.6),
        ];
        let lines = vec![PositionedText::line("Paid", 0.13, 0.2)];

        assert_eq!(
            render_checkboxes(&checkboxes, &lines, &thresholds()).unwrap(),
            "- [x] Paid\n- [ ] Checkbox"
        );
    }
}
