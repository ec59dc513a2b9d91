//! Prompts sent to the vision model.

use crate::schema::CanonicalSchema;

/// Build the extraction prompt with the schema embedded as JSON.
pub fn extraction_prompt(schema: &CanonicalSchema) -> String {
    let schema_json = serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string());

    format!(
        "You are a document data extraction assistant. Extract information from the PROVIDED IMAGE \
by carefully reading the document and filling the JSON schema.

IMPORTANT INSTRUCTIONS:
1. Look at the IMAGE carefully - read all text, tables, checkboxes, and form fields
2. Return ONLY valid JSON that matches the schema structure exactly
3. Extract data by reading the visual document - preserve accuracy
4. Use null for missing values, never make up or hallucinate data
5. For arrays, extract all matching items found in the document image
6. For dates, use format YYYY-MM-DD
7. For numbers, extract numeric values only (no currency symbols)
8. For checkboxes: use true if checked, false if unchecked, null if not found
9. Do not include any explanation or markdown formatting in your response

JSON SCHEMA TO FILL:
{}

Look at the document image and extract the data. Return ONLY the JSON object matching the schema:",
        schema_json
    )
}

/// Instructions for correcting OCR markdown against its page image.
pub const REFINEMENT_INSTRUCTIONS: &str = "You are an expert OCR refinement assistant. \
Your task is to review and improve the provided Markdown output from an OCR engine.

INSTRUCTIONS:
1. Compare the current Markdown with the original image
2. Fix OCR errors (typos, misread characters, incorrect spacing)
3. Verify that tables, forms, and checkboxes are correctly structured
4. Preserve ALL information from the original document
5. Maintain the existing Markdown structure (tables, headings, lists)
6. Do NOT add information that isn't in the image
7. Do NOT remove information that is present
8. Do NOT hallucinate or invent content

OUTPUT FORMAT:
- Return ONLY the refined Markdown
- Do NOT include explanations, comments, or meta-text
- Do NOT wrap the output in code blocks
- Just return the pure Markdown content

If the current Markdown is already accurate, return it unchanged.";

/// Build the refinement prompt around existing markdown.
pub fn refinement_prompt(markdown: &str) -> String {
    format!(
        "{}\n\nCurrent Markdown:\n```markdown\n{}\n```",
        REFINEMENT_INSTRUCTIONS, markdown
    )
}
