/// Default bound on DOM depth; deeper input is rejected before traversal
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options controlling a single extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Reject input nested deeper than this (root at depth 0)
    pub max_depth: Option<usize>,

    /// Reject input with more elements than this
    pub max_elements: Option<usize>,

    /// Collapse whitespace runs in text-derived fact values and descriptions
    pub normalize_whitespace: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_elements: None,
            normalize_whitespace: true,
        }
    }
}

impl ExtractOptions {
    /// Create new extraction options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set maximum depth (`None` disables the check)
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder method: set maximum element count (`None` disables the check)
    pub fn max_elements(mut self, max_elements: Option<usize>) -> Self {
        self.max_elements = max_elements;
        self
    }

    /// Builder method: set whitespace normalization
    pub fn normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }
}
