use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::schema::{ContentType, ElementState, FactKind, StructuralType};
use crate::semantic::{
    Diagnostic, Fact, FactValue, NodeId, NodeView, SemanticIndex, SemanticNode, SemanticTree, Severity,
};

/// Result of a [`find_by_content_id`](Extraction::find_by_content_id) lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentIdMatch<'a> {
    /// First node in document order carrying the id
    pub node: &'a SemanticNode,

    /// How many nodes carry the id
    pub count: usize,
}

impl ContentIdMatch<'_> {
    /// Whether other nodes share the id
    pub fn duplicated(&self) -> bool {
        self.count > 1
    }
}

/// The outcome of one extraction: an immutable semantic tree, the diagnostics
/// the Validator produced, and the query index.
///
/// Check [`diagnostics`](Extraction::diagnostics) before trusting
/// identity-based lookups; duplicate ids do not prevent extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    tree: SemanticTree,
    diagnostics: Vec<Diagnostic>,
    index: SemanticIndex,
}

#[derive(Serialize)]
struct ExtractionView<'a> {
    tree: NodeView<'a>,
    diagnostics: &'a [Diagnostic],
}

impl Extraction {
    pub(crate) fn new(tree: SemanticTree, diagnostics: Vec<Diagnostic>) -> Self {
        let index = SemanticIndex::build(&tree);
        Self {
            tree,
            diagnostics,
            index,
        }
    }

    pub fn tree(&self) -> &SemanticTree {
        &self.tree
    }

    pub fn root(&self) -> &SemanticNode {
        self.tree.root()
    }

    pub fn node(&self, id: NodeId) -> Option<&SemanticNode> {
        self.tree.get(id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn index(&self) -> &SemanticIndex {
        &self.index
    }

    /// Diagnostics of one severity, in report order
    pub fn diagnostics_with(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics_with(Severity::Warning).next().is_some()
    }

    /// Nodes with structural type `t`, in document order
    pub fn find_by_structural_type(&self, t: &StructuralType) -> Vec<&SemanticNode> {
        self.resolve(self.index.structural_type(t))
    }

    /// Nodes in state `s`, in document order
    pub fn find_by_state(&self, s: &ElementState) -> Vec<&SemanticNode> {
        self.resolve(self.index.state(s))
    }

    /// Content blocks of type `t`, in document order
    pub fn find_by_content_type(&self, t: &ContentType) -> Vec<&SemanticNode> {
        self.resolve(self.index.content_type(t))
    }

    /// First node carrying content id `id`, and whether it is shared
    pub fn find_by_content_id(&self, id: &str) -> Option<ContentIdMatch<'_>> {
        let ids = self.index.content_id(id);
        let node = self.tree.get(*ids.first()?)?;
        Some(ContentIdMatch { node, count: ids.len() })
    }

    /// Nodes owning at least one fact of `kind`, in document order
    pub fn find_by_fact_kind(&self, kind: &FactKind) -> Vec<&SemanticNode> {
        self.resolve(self.index.fact_kind(kind))
    }

    /// Values of `node`'s facts of `kind`, in document order
    pub fn facts_of(&self, node: NodeId, kind: &FactKind) -> Vec<&FactValue> {
        match self.tree.get(node) {
            Some(node) => node.facts_of(kind).collect(),
            None => Vec::new(),
        }
    }

    /// Facts that found no owning content block
    pub fn orphaned_facts(&self) -> &[Fact] {
        self.tree.orphaned_facts()
    }

    /// Tree-shaped JSON of the semantic tree plus diagnostics
    pub fn to_json(&self) -> Result<String> {
        let view = ExtractionView {
            tree: self.tree.view(),
            diagnostics: &self.diagnostics,
        };
        serde_json::to_string_pretty(&view)
            .map_err(|e| ExtractError::SerializationFailed(format!("Failed to serialize extraction: {}", e)))
    }

    /// Split into the tree and the diagnostics
    pub fn into_parts(self) -> (SemanticTree, Vec<Diagnostic>) {
        (self.tree, self.diagnostics)
    }

    fn resolve(&self, ids: &[NodeId]) -> Vec<&SemanticNode> {
        ids.iter().filter_map(|id| self.tree.get(*id)).collect()
    }
}
