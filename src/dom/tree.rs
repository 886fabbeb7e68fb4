use serde::Deserialize;

use crate::dom::element::ElementNode;
use crate::dom::source_ref::SourceRef;
use crate::error::{ExtractError, Result};
use crate::extract::ExtractOptions;

/// Represents the input DOM tree handed over by an external HTML parser
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    /// Root element of the DOM tree
    pub root: ElementNode,
}

impl DomTree {
    /// Create a new DomTree
    pub fn new(root: ElementNode) -> Self {
        Self { root }
    }

    /// Build a DOM tree from its JSON representation, with the default
    /// depth bound.
    ///
    /// A `null` document, or a document whose shape does not match
    /// [`ElementNode`] (e.g. non-string attribute values), is rejected with
    /// [`ExtractError::InvalidInput`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, &ExtractOptions::default())
    }

    /// Build a DOM tree from JSON, rejecting documents nested deeper than
    /// `options.max_depth` before they are deserialized. With no depth bound
    /// the nesting is not limited at all.
    pub fn from_json_with(json: &str, options: &ExtractOptions) -> Result<Self> {
        if let Some(max_depth) = options.max_depth {
            // Each element level is an object plus its `children` array
            if json_nesting(json) > 2 * max_depth + 2 {
                return Err(ExtractError::InvalidInput(format!(
                    "DOM JSON nests deeper than the depth limit of {}",
                    max_depth
                )));
            }
        }

        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();

        let root = Option::<ElementNode>::deserialize(&mut deserializer)
            .and_then(|root| deserializer.end().map(|_| root))
            .map_err(|e| {
                if e.is_data() {
                    ExtractError::InvalidInput(format!("Malformed DOM element: {}", e))
                } else {
                    ExtractError::InvalidInput(format!("Failed to parse DOM JSON: {}", e))
                }
            })?;

        match root {
            Some(root) => Ok(Self::new(root)),
            None => Err(ExtractError::InvalidInput("document root is null".to_string())),
        }
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| ExtractError::SerializationFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Check the input contract before any semantic tree is built: non-empty
    /// tag names, well-formed attribute names, and the configured size bounds.
    pub fn check_well_formed(&self, options: &ExtractOptions) -> Result<()> {
        let mut stack = vec![(&self.root, SourceRef::root(&self.root))];
        let mut count = 0usize;

        while let Some((node, source)) = stack.pop() {
            count += 1;

            if node.tag_name.trim().is_empty() {
                return Err(ExtractError::InvalidInput(format!(
                    "element at {} has an empty tag name",
                    source.css_path
                )));
            }

            if let Some(name) = node.attributes.keys().find(|k| !is_valid_attribute_name(k)) {
                return Err(ExtractError::InvalidInput(format!(
                    "malformed attribute name {:?} on {}",
                    name, source.css_path
                )));
            }

            if let Some(max_depth) = options.max_depth {
                if source.depth() > max_depth {
                    return Err(ExtractError::InvalidInput(format!(
                        "DOM depth exceeds the limit of {} at {}",
                        max_depth, source.css_path
                    )));
                }
            }

            if let Some(max_elements) = options.max_elements {
                if count > max_elements {
                    return Err(ExtractError::InvalidInput(format!(
                        "DOM has more than {} elements",
                        max_elements
                    )));
                }
            }

            for (i, child) in node.children.iter().enumerate().rev() {
                stack.push((child, source.child(i, child)));
            }
        }

        Ok(())
    }

    /// Find the element a [`SourceRef`] points at
    pub fn resolve(&self, source: &SourceRef) -> Option<&ElementNode> {
        source
            .path
            .iter()
            .try_fold(&self.root, |node, &i| node.children.get(i))
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Length of the longest root-to-leaf path, the root counting as depth 0
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }
}

/// Attribute names must be non-empty and free of whitespace, quotes, `>`, `/`
/// and `=` (HTML attribute-name production)
fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
}

/// Deepest bracket nesting of a JSON text, ignoring brackets inside strings
fn json_nesting(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for b in json.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}
