use serde::{Deserialize, Serialize};

use crate::dom::element::ElementNode;

/// Non-owning locator of an element in the input DOM.
///
/// Semantic nodes and facts keep one of these instead of a borrow so the
/// semantic tree can outlive (and be shipped away from) the DOM it came from.
/// [`DomTree::resolve`](crate::dom::DomTree::resolve) turns it back into the
/// element while the DOM is still around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourceRef {
    /// CSS path from the document root (e.g. `body > div:nth-child(2)`)
    pub css_path: String,

    /// Child indices from the document root; empty for the root itself
    pub path: Vec<usize>,

    /// Element's tag name
    pub tag_name: String,

    /// Element's ID attribute (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
}

impl SourceRef {
    /// Locator for the document root element
    pub fn root(element: &ElementNode) -> Self {
        Self::new(element.tag_name.clone(), Vec::new(), element.tag_name.clone())
            .with_element_id(element.id())
    }

    /// Create a new SourceRef
    pub fn new(css_path: impl Into<String>, path: Vec<usize>, tag_name: impl Into<String>) -> Self {
        Self {
            css_path: css_path.into(),
            path,
            tag_name: tag_name.into(),
            element_id: None,
        }
    }

    /// Builder method: set element ID
    pub fn with_element_id(mut self, id: Option<&str>) -> Self {
        self.element_id = id.map(str::to_string);
        self
    }

    /// Locator for the `position`-th child (zero based) of this element
    pub fn child(&self, position: usize, child: &ElementNode) -> Self {
        let mut path = self.path.clone();
        path.push(position);
        let css_path = format!("{} > {}:nth-child({})", self.css_path, child.tag_name, position + 1);
        Self::new(css_path, path, child.tag_name.clone()).with_element_id(child.id())
    }

    /// Depth below the document root
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Get the best selector to use (ID preferred)
    pub fn best_selector(&self) -> String {
        match &self.element_id {
            Some(id) => format!("#{}", id),
            None => self.css_path.clone(),
        }
    }
}
