//! Conversion from an html5ever parse (via `scraper`) into the input model.
//!
//! The engine itself never reads markup; this adapter plays the part of the
//! external HTML parser for callers that start from a string.

use scraper::{ElementRef, Html};

use crate::dom::element::ElementNode;
use crate::dom::tree::DomTree;
use crate::error::{ExtractError, Result};
use crate::extract::ExtractOptions;
use crate::schema::ATTR_CONTENT_KIND;

impl DomTree {
    /// Parse a full HTML document with the default depth bound. The root is
    /// the `<html>` element, with the `<head>`/`<body>` wrappers html5ever
    /// inserts for fragments.
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with(html, &ExtractOptions::default())
    }

    /// Parse a full HTML document, rejecting elements nested deeper than
    /// `options.max_depth` with [`ExtractError::InvalidInput`]
    pub fn from_html_with(html: &str, options: &ExtractOptions) -> Result<Self> {
        let document = Html::parse_document(html);
        Ok(Self::new(convert_document(document.root_element(), options.max_depth)?))
    }
}

/// Walks the parse with an explicit stack into a flat list of
/// `(parent index, element)` in pre-order, then assembles the owned tree
/// bottom-up. Every child sits after its parent in the list, so popping from
/// the back always moves finished subtrees.
fn convert_document(root: ElementRef, max_depth: Option<usize>) -> Result<ElementNode> {
    let mut flat: Vec<(Option<usize>, ElementNode)> = Vec::new();
    let mut stack = vec![(root, None, 0usize)];

    while let Some((element, parent, depth)) = stack.pop() {
        if let Some(max_depth) = max_depth {
            if depth > max_depth {
                return Err(ExtractError::InvalidInput(format!(
                    "HTML nesting exceeds the depth limit of {} at <{}>",
                    max_depth,
                    element.value().name()
                )));
            }
        }

        let index = flat.len();
        flat.push((parent, convert_element(element)));

        let children: Vec<ElementRef> = element.children().filter_map(ElementRef::wrap).collect();
        stack.extend(children.into_iter().rev().map(|child| (child, Some(index), depth + 1)));
    }

    while let Some((parent, mut node)) = flat.pop() {
        // Children were pushed last-first
        node.children.reverse();
        match parent {
            Some(parent) => flat[parent].1.children.push(node),
            None => return Ok(node),
        }
    }

    Err(ExtractError::InvalidInput("HTML document has no root element".to_string()))
}

/// Tag and attributes of one element. Text is only kept where a fact can
/// read it, so ancestors do not each hold a copy of their subtree's text.
fn convert_element(element: ElementRef) -> ElementNode {
    let mut node = ElementNode::new(element.value().name());

    for (name, value) in element.value().attrs() {
        node.add_attribute(name, value);
    }

    if node.get_attribute(ATTR_CONTENT_KIND).is_some() {
        let text = element.text().collect::<String>();
        if !text.is_empty() {
            node.text_content = Some(text);
        }
    }

    node
}
