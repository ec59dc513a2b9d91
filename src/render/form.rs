//! Form field rendering.

use crate::model::FormField;

/// Check whether enough fields already appear in the page's free text.
///
/// A field counts as covered when its key, or its value, is a
/// case-insensitive substring of `full_text`. Fields without a key never
/// count. Returns `true` when `covered / total >= ratio`.
pub fn forms_covered_by_text(fields: &[FormField], full_text: &str, ratio: f64) -> bool {
    if fields.is_empty() || full_text.is_empty() {
        return false;
    }

    let text = full_text.to_lowercase();
    let covered = fields
        .iter()
        .filter(|field| {
            let key = field.key.trim().to_lowercase();
            let value = field.value.trim().to_lowercase();
            !key.is_empty() && (text.contains(&key) || (!value.is_empty() && text.contains(&value)))
        })
        .count();

    covered as f64 / fields.len() as f64 >= ratio
}

/// Render fields as `**key:** value` lines, or `None` when no field has a key.
pub fn render_forms(fields: &[FormField]) -> Option<String> {
    let lines: Vec<String> = fields
        .iter()
        .filter_map(|field| {
            let key = field.key.trim();
            if key.is_empty() {
                return None;
            }
            let value = field.value.trim();
            Some(if value.is_empty() {
                format!("**{}:** _[empty]_", key)
            } else {
                format!("**{}:** {}", key, value)
            })
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_in_text_is_covered() {
        let fields = vec![FormField::new("Total", "42")];
        assert!(forms_covered_by_text(&fields, "Invoice\nTotal 42", 0.6));
    }

    #[test]
    fn test_value_match_counts() {
        let fields = vec![
            FormField::new("Customer No", "A-1001"),
            FormField::new("Region", "North"),
        ];
        // one of two matched: 0.5 < 0.6
        assert!(!forms_covered_by_text(&fields, "ref a-1001", 0.6));
        assert!(forms_covered_by_text(&fields, "ref a-1001", 0.5));
    }

    #[test]
    fn test_empty_text_never_covers() {
        let fields = vec![FormField::new("Total", "42")];
        assert!(!forms_covered_by_text(&fields, "", 0.6));
        assert!(!forms_covered_by_text(&[], "Total", 0.6));
    }

    #[test]
    fn test_render_forms() {
        let fields = vec![
            FormField::new(" Name ", "Ana "),
            FormField::new("Signature", "  "),
            FormField::new("", "orphan"),
        ];
        assert_eq!(
            render_forms(&fields).unwrap(),
            "**Name:** Ana\n**Signature:** _[empty]_"
        );
    }

    #[test]
    fn test_render_forms_without_keys() {
        assert!(render_forms(&[FormField::new("", "x")]).is_none());
    }
}
