//! Rendering options and layout heuristics configuration.

/// Geometry thresholds used by the layout heuristics.
///
/// All distances are in normalized page units. The defaults encode
/// assumptions about typical scanned business documents and may need
/// tuning per document class.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutThresholds {
    /// Share of form fields already present in free text that suppresses the form block
    pub form_overlap_ratio: f64,

    /// Vertical gap between lines that starts a new paragraph
    pub paragraph_gap: f64,

    /// Line height assumed when a line reports none
    pub default_line_height: f64,

    /// Left offset beyond the paragraph margin that renders a line as a nested bullet
    pub indent_threshold: f64,

    /// Maximum vertical offset for a label on the same band as its checkbox
    pub checkbox_same_band: f64,

    /// Maximum horizontal distance for a label to the right of its checkbox
    pub checkbox_right_window: f64,

    /// Maximum vertical distance for a label above its checkbox
    pub checkbox_above_window: f64,

    /// Maximum left misalignment for a label above its checkbox
    pub checkbox_left_alignment: f64,

    /// Lines starting above this offset may become level-1 headings
    pub heading_top_band: f64,

    /// Headings (levels 1 and 2) must be shorter than this many characters
    pub heading_max_len: usize,

    /// Level-3 headings must be shorter than this many characters
    pub subheading_max_len: usize,

    /// Uppercase headings must be longer than this many characters
    pub uppercase_min_len: usize,
}

impl Default for LayoutThresholds {
    fn default() -> Self {
        Self {
            form_overlap_ratio: 0.6,
            paragraph_gap: 0.03,
            default_line_height: 0.02,
            indent_threshold: 0.02,
            checkbox_same_band: 0.02,
            checkbox_right_window: 0.1,
            checkbox_above_window: 0.05,
            checkbox_left_alignment: 0.1,
            heading_top_band: 0.15,
            heading_max_len: 50,
            subheading_max_len: 30,
            uppercase_min_len: 3,
        }
    }
}

impl LayoutThresholds {
    /// Set the form overlap ratio.
    pub fn with_form_overlap_ratio(mut self, ratio: f64) -> Self {
        self.form_overlap_ratio = ratio;
        self
    }

    /// Set the paragraph gap.
    pub fn with_paragraph_gap(mut self, gap: f64) -> Self {
        self.paragraph_gap = gap;
        self
    }

    /// Set the indentation threshold.
    pub fn with_indent_threshold(mut self, threshold: f64) -> Self {
        self.indent_threshold = threshold;
        self
    }

    /// Set the checkbox label search windows (same band, right, above).
    pub fn with_checkbox_windows(mut self, same_band: f64, right: f64, above: f64) -> Self {
        self.checkbox_same_band = same_band;
        self.checkbox_right_window = right;
        self.checkbox_above_window = above;
        self
    }
}

/// Options for rendering parsed pages.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Layout heuristics
    pub thresholds: LayoutThresholds,

    /// Prefix each page of a document with a metadata header
    pub page_headers: bool,

    /// Text inserted between rendered pages of a document
    pub page_separator: String,

    /// Render document pages in parallel
    pub parallel: bool,

    /// Collect rendering statistics
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout thresholds.
    pub fn with_thresholds(mut self, thresholds: LayoutThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Enable or disable page headers.
    pub fn with_page_headers(mut self, include: bool) -> Self {
        self.page_headers = include;
        self
    }

    /// Set the page separator.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Enable or disable parallel page rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page rendering.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            thresholds: LayoutThresholds::default(),
            page_headers: false,
            page_separator: "\n\n".to_string(),
            parallel: true,
            collect_stats: false,
        }
    }
}
