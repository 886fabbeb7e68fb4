use indexmap::IndexMap;
use serde::Serialize;

use crate::dom::SourceRef;
use crate::error::{ExtractError, Result};
use crate::semantic::node::{Fact, NodeId, SemanticNode};

/// The materialized semantic tree.
///
/// Nodes live in an arena indexed by [`NodeId`]; children are owned by their
/// parent through the id lists, parent links are plain back-references. Ids
/// follow document order and node 0 is the synthetic root. The tree is only
/// ever mutated by the Tree Builder; afterwards it is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticTree {
    nodes: Vec<SemanticNode>,

    /// Element path in the DOM -> node built from that element
    by_path: IndexMap<Vec<usize>, NodeId>,
}

impl Default for SemanticTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticTree {
    /// A tree holding only the synthetic root
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![SemanticNode::synthetic_root()],
            by_path: IndexMap::new(),
        }
    }

    /// Append `node` as the last child of `parent`, returning its id
    pub(crate) fn attach(&mut self, parent: NodeId, mut node: SemanticNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.id = id;
        node.parent = Some(parent);
        node.children.clear();

        if let Some(source) = &node.source {
            self.by_path.insert(source.path.clone(), id);
        }

        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SemanticNode {
        &mut self.nodes[id.0]
    }

    /// The synthetic document root
    pub fn root(&self) -> &SemanticNode {
        &self.nodes[0]
    }

    /// Get a node by id
    pub fn get(&self, id: NodeId) -> Option<&SemanticNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, the synthetic root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the synthetic root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// All nodes in document order, root first
    pub fn iter(&self) -> impl Iterator<Item = &SemanticNode> {
        self.nodes.iter()
    }

    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &SemanticNode> {
        self.get(id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .map(|child| &self.nodes[child.0])
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&SemanticNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// Strict ancestors, nearest first, ending with the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &SemanticNode> {
        std::iter::successors(self.parent_of(id), |node| self.parent_of(node.id))
    }

    /// Nearest strict ancestor with a content type
    pub fn nearest_content_block(&self, id: NodeId) -> Option<&SemanticNode> {
        self.ancestors(id).find(|node| node.is_content_block())
    }

    /// Nodes of the subtree under `id` (excluding `id`), in document order
    pub fn descendants(&self, id: NodeId) -> Vec<&SemanticNode> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(id) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            let node = &self.nodes[next.0];
            out.push(node);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// The node built from the element at `path` in the DOM, if any
    pub fn node_for_path(&self, path: &[usize]) -> Option<&SemanticNode> {
        self.by_path.get(path).and_then(|id| self.get(*id))
    }

    pub fn node_for_source(&self, source: &SourceRef) -> Option<&SemanticNode> {
        self.node_for_path(&source.path)
    }

    /// Facts that found no owning content block, in document order
    pub fn orphaned_facts(&self) -> &[Fact] {
        &self.root().facts
    }

    /// Total number of facts, orphans included
    pub fn count_facts(&self) -> usize {
        self.nodes.iter().map(|n| n.facts.len()).sum()
    }

    /// Tree-shaped view for serialization
    pub fn view(&self) -> NodeView<'_> {
        self.view_of(NodeId::ROOT)
    }

    fn view_of(&self, id: NodeId) -> NodeView<'_> {
        let node = &self.nodes[id.0];
        NodeView {
            node,
            children: node.children.iter().map(|c| self.view_of(*c)).collect(),
        }
    }

    /// Convert the semantic tree to nested JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.view())
            .map_err(|e| ExtractError::SerializationFailed(format!("Failed to serialize semantic tree: {}", e)))
    }
}

/// A node with its children nested, for tree-shaped output
#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    #[serde(flatten)]
    pub node: &'a SemanticNode,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentType, StructuralType};

    fn node(path: Vec<usize>, tag: &str) -> SemanticNode {
        let mut node = SemanticNode::synthetic_root();
        node.source = Some(SourceRef::new(tag, path, tag));
        node
    }

    fn create_test_tree() -> SemanticTree {
        let mut tree = SemanticTree::new();

        let mut content = node(vec![0], "main");
        content.structural_type = Some(StructuralType::Content);
        let content = tree.attach(NodeId::ROOT, content);

        let mut product = node(vec![0, 0], "div");
        product.content_type = Some(ContentType::Product);
        let product = tree.attach(content, product);

        tree.attach(product, node(vec![0, 0, 1], "button"));
        tree.attach(NodeId::ROOT, node(vec![1], "footer"));
        tree
    }

    #[test]
    fn test_attach_assigns_document_order_ids() {
        let tree = create_test_tree();
        let ids: Vec<_> = tree.iter().map(|n| n.id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(tree.len(), 5);
        assert!(!tree.is_empty());
        assert!(SemanticTree::new().is_empty());
    }

    #[test]
    fn test_parent_and_children() {
        let tree = create_test_tree();

        let root_children: Vec<_> = tree.children_of(NodeId::ROOT).map(|n| n.id).collect();
        assert_eq!(root_children, vec![NodeId(1), NodeId(4)]);
        assert_eq!(tree.parent_of(NodeId(3)).unwrap().id, NodeId(2));
        assert!(tree.parent_of(NodeId::ROOT).is_none());

        let ancestors: Vec<_> = tree.ancestors(NodeId(3)).map(|n| n.id).collect();
        assert_eq!(ancestors, vec![NodeId(2), NodeId(1), NodeId::ROOT]);
    }

    #[test]
    fn test_nearest_content_block() {
        let tree = create_test_tree();
        assert_eq!(tree.nearest_content_block(NodeId(3)).unwrap().id, NodeId(2));
        assert!(tree.nearest_content_block(NodeId(2)).is_none());
    }

    #[test]
    fn test_descendants() {
        let tree = create_test_tree();
        let ids: Vec<_> = tree.descendants(NodeId(1)).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(2), NodeId(3)]);
        assert_eq!(tree.descendants(NodeId::ROOT).len(), 4);
    }

    #[test]
    fn test_node_for_path() {
        let tree = create_test_tree();
        assert_eq!(tree.node_for_path(&[0, 0]).unwrap().id, NodeId(2));
        assert!(tree.node_for_path(&[0, 0, 0]).is_none());
    }

    #[test]
    fn test_to_json_is_nested() {
        let tree = create_test_tree();
        let json: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();

        assert_eq!(json["id"], 0);
        assert_eq!(json["children"][0]["structural_type"], "content");
        assert_eq!(json["children"][0]["children"][0]["content_type"], "product");
        assert_eq!(json["children"][1]["source"]["tag_name"], "footer");
    }
}
