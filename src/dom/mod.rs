//! Input DOM model
//!
//! This module holds the element tree the engine reads from. It includes:
//! - ElementNode: Representation of DOM elements
//! - DomTree: The document root plus loading and well-formedness checks
//! - SourceRef: Non-owning locators pointing back into the DOM
//!
//! With the `html` feature, [`DomTree::from_html`] builds the tree from markup.

pub mod element;
#[cfg(feature = "html")]
pub mod html;
pub mod source_ref;
pub mod tree;

pub use element::{AID_PREFIX, ElementNode};
pub use source_ref::SourceRef;
pub use tree::DomTree;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag_name, "div");
    }

    #[test]
    fn test_source_ref_export() {
        let source = SourceRef::root(&ElementNode::new("body"));
        assert_eq!(source.css_path, "body");
    }

    #[test]
    fn test_dom_tree_export() {
        let root = ElementNode::new("body");
        let tree = DomTree::new(root);
        assert_eq!(tree.root.tag_name, "body");
    }
}
