use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix shared by every attribute of the annotation vocabulary
pub const AID_PREFIX: &str = "aid-";

/// Represents one element of the input DOM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "p", "img")
    pub tag_name: String,

    /// Element attributes in document order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Text content of the element, descendants included (DOM `textContent`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: add a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: append a child
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get a non-blank attribute value by key
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.get_attribute(key).filter(|v| !v.trim().is_empty())
    }

    /// Get element ID
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Check whether any attribute of the annotation vocabulary is present
    pub fn has_aid_attributes(&self) -> bool {
        self.attributes.keys().any(|k| k.starts_with(AID_PREFIX))
    }

    /// Iterate over the annotation attributes in document order
    pub fn aid_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|(k, _)| k.starts_with(AID_PREFIX))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Text content with surrounding whitespace removed
    pub fn trimmed_text(&self) -> &str {
        self.text_content.as_deref().map(str::trim).unwrap_or("")
    }

    /// Convert to a simplified string representation, keeping only the id and
    /// annotation attributes
    pub fn to_simple_string(&self) -> String {
        let mut parts = vec![format!("<{}", self.tag_name)];

        if let Some(id) = self.id() {
            parts.push(format!(" id=\"{}\"", id));
        }

        for (key, value) in self.aid_attributes() {
            parts.push(format!(" {}=\"{}\"", key, value));
        }

        parts.push(">".to_string());

        let text = self.trimmed_text();
        if !text.is_empty() {
            parts.push(text.to_string());
        }

        parts.join("")
    }
}
