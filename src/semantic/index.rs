use indexmap::IndexMap;
use std::hash::Hash;

use crate::schema::{ContentType, ElementState, FactKind, StructuralType};
use crate::semantic::node::NodeId;
use crate::semantic::tree::SemanticTree;

/// Lookup tables over a finished [`SemanticTree`], built in one pass.
///
/// Every list is in document order. The synthetic root is never indexed, so
/// orphaned facts do not show up under [`SemanticIndex::fact_kind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticIndex {
    by_structural_type: IndexMap<StructuralType, Vec<NodeId>>,
    by_state: IndexMap<ElementState, Vec<NodeId>>,
    by_content_type: IndexMap<ContentType, Vec<NodeId>>,
    by_content_id: IndexMap<String, Vec<NodeId>>,
    by_fact_kind: IndexMap<FactKind, Vec<NodeId>>,
}

impl SemanticIndex {
    /// Index every node of `tree`
    pub fn build(tree: &SemanticTree) -> Self {
        let mut index = Self::default();

        for node in tree.iter().filter(|n| !n.is_root()) {
            if let Some(t) = &node.structural_type {
                push(&mut index.by_structural_type, t, node.id);
            }
            push(&mut index.by_state, &node.state, node.id);
            if let Some(t) = &node.content_type {
                push(&mut index.by_content_type, t, node.id);
            }
            if let Some(id) = &node.content_id {
                push(&mut index.by_content_id, id, node.id);
            }

            let mut seen: Vec<&FactKind> = Vec::new();
            for fact in &node.facts {
                if !seen.contains(&&fact.kind) {
                    seen.push(&fact.kind);
                    push(&mut index.by_fact_kind, &fact.kind, node.id);
                }
            }
        }

        index
    }

    pub fn structural_type(&self, t: &StructuralType) -> &[NodeId] {
        lookup(&self.by_structural_type, t)
    }

    pub fn state(&self, s: &ElementState) -> &[NodeId] {
        lookup(&self.by_state, s)
    }

    pub fn content_type(&self, t: &ContentType) -> &[NodeId] {
        lookup(&self.by_content_type, t)
    }

    pub fn content_id(&self, id: &str) -> &[NodeId] {
        self.by_content_id.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes owning at least one fact of `kind`
    pub fn fact_kind(&self, kind: &FactKind) -> &[NodeId] {
        lookup(&self.by_fact_kind, kind)
    }

    /// Content ids used by more than one node, with those nodes
    pub fn duplicated_content_ids(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.by_content_id
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(id, ids)| (id.as_str(), ids.as_slice()))
    }

    /// Every structural type present, in first-seen order
    pub fn structural_types(&self) -> impl Iterator<Item = &StructuralType> {
        self.by_structural_type.keys()
    }

    /// Every content id present, in first-seen order
    pub fn content_ids(&self) -> impl Iterator<Item = &str> {
        self.by_content_id.keys().map(String::as_str)
    }
}

fn push<K: Hash + Eq + Clone>(map: &mut IndexMap<K, Vec<NodeId>>, key: &K, id: NodeId) {
    match map.get_mut(key) {
        Some(ids) => ids.push(id),
        None => {
            map.insert(key.clone(), vec![id]);
        }
    }
}

fn lookup<'a, K: Hash + Eq>(map: &'a IndexMap<K, Vec<NodeId>>, key: &K) -> &'a [NodeId] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}
