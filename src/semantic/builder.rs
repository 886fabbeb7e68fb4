//! Tree Builder: one depth-first, pre-order walk of the DOM producing the
//! parallel semantic tree.
//!
//! Two stacks carry the traversal context. The parent stack decides where new
//! nodes hang; the content stack decides which block a fact belongs to.
//! Unannotated elements touch neither stack, so they are transparent.

use log::{debug, trace};

use crate::dom::{DomTree, ElementNode, SourceRef};
use crate::schema::SchemaRegistry;
use crate::semantic::classifier::{Classification, InputAnomaly, NodeClassifier, NodeFacets, PendingFact};
use crate::semantic::node::{Fact, NodeId, SemanticNode};
use crate::semantic::tree::SemanticTree;

/// An anomaly on the raw attributes of one element, kept for the Validator
#[derive(Debug, Clone, PartialEq)]
pub struct RawFinding {
    pub source: SourceRef,
    /// Node built from the element, if it produced one
    pub node: Option<NodeId>,
    pub anomaly: InputAnomaly,
}

/// Result of a build: the finished tree plus raw-input findings
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput {
    pub tree: SemanticTree,
    pub findings: Vec<RawFinding>,
}

#[derive(Default)]
struct BuildState {
    tree: SemanticTree,
    parents: Vec<NodeId>,
    contents: Vec<NodeId>,
    findings: Vec<RawFinding>,
}

/// Builds a [`SemanticTree`] from a [`DomTree`]
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'r> {
    classifier: NodeClassifier<'r>,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_classifier(NodeClassifier::new(registry))
    }

    pub fn with_classifier(classifier: NodeClassifier<'r>) -> Self {
        Self { classifier }
    }

    /// Walk the DOM once and build the tree. Never fails: data-quality
    /// problems are left for the Validator.
    pub fn build(&self, dom: &DomTree) -> BuildOutput {
        let mut state = BuildState {
            parents: vec![NodeId::ROOT],
            ..Default::default()
        };

        self.visit(&dom.root, SourceRef::root(&dom.root), &mut state);

        BuildOutput {
            tree: state.tree,
            findings: state.findings,
        }
    }

    fn visit(&self, element: &ElementNode, source: SourceRef, state: &mut BuildState) {
        let classified = self.classifier.classify(element);
        let anomalies = classified.anomalies;

        match classified.classification {
            Classification::Unannotated => {
                trace!("transparent element {}", source.css_path);
                record_findings(state, &source, None, anomalies);
                self.visit_children(element, &source, state);
            }
            Classification::ContentFactLeaf { facts } => {
                record_findings(state, &source, None, anomalies);
                attach_facts(state, facts, &source);
                self.visit_children(element, &source, state);
            }
            Classification::StructuralNode { facets, facts }
            | Classification::ContentBlockNode { facets, facts } => {
                // Facts on a node-producing element belong to a strict ancestor block,
                // so they are resolved before the element itself is pushed
                attach_facts(state, facts, &source);

                let is_block = facets.content_type.is_some();
                let parent = state.parents.last().copied().unwrap_or(NodeId::ROOT);
                let id = state.tree.attach(parent, new_node(facets, source.clone()));
                debug!(
                    "semantic node {} [{}] from {}",
                    id,
                    state.tree.get(id).map(SemanticNode::label).unwrap_or_default(),
                    element.to_simple_string()
                );
                record_findings(state, &source, Some(id), anomalies);

                state.parents.push(id);
                if is_block {
                    state.contents.push(id);
                }

                self.visit_children(element, &source, state);

                if is_block {
                    state.contents.pop();
                }
                state.parents.pop();
            }
        }
    }

    fn visit_children(&self, element: &ElementNode, source: &SourceRef, state: &mut BuildState) {
        for (i, child) in element.children.iter().enumerate() {
            self.visit(child, source.child(i, child), state);
        }
    }
}

fn new_node(facets: NodeFacets, source: SourceRef) -> SemanticNode {
    let mut node = SemanticNode::synthetic_root();
    node.source = Some(source);
    node.structural_type = facets.structural_type;
    node.description = facets.description;
    node.state = facets.state;
    node.content_type = facets.content_type;
    node.content_id = facets.content_id;
    node
}

/// Append facts to the innermost open content block, or to the root as orphans
fn attach_facts(state: &mut BuildState, facts: Vec<PendingFact>, source: &SourceRef) {
    for pending in facts {
        let owner = state.contents.last().copied();
        let fact = Fact {
            kind: pending.kind,
            value: pending.value,
            source: source.clone(),
            orphaned: owner.is_none(),
        };

        match owner {
            Some(owner) => {
                debug!("fact {}={:?} attached to {}", fact.kind, fact.value.as_str(), owner);
                state.tree.node_mut(owner).facts.push(fact);
            }
            None => {
                debug!("orphaned fact {} at {}", fact.kind, source.css_path);
                state.tree.node_mut(NodeId::ROOT).facts.push(fact);
            }
        }
    }
}

fn record_findings(state: &mut BuildState, source: &SourceRef, node: Option<NodeId>, anomalies: Vec<InputAnomaly>) {
    state.findings.extend(anomalies.into_iter().map(|anomaly| RawFinding {
        source: source.clone(),
        node,
        anomaly,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentType, FactKind, StructuralType};
    use crate::semantic::node::FactValue;

    fn build(root: ElementNode) -> BuildOutput {
        let registry = SchemaRegistry::new();
        TreeBuilder::new(&registry).build(&DomTree::new(root))
    }

    fn fact(kind: &str, text: &str) -> ElementNode {
        ElementNode::new("p").with_attribute("aid-cnt-kind", kind).with_text(text)
    }

    #[test]
    fn test_end_to_end_shape() {
        let dom = ElementNode::new("div").with_attribute("aid-type", "content").with_child(
            ElementNode::new("div")
                .with_attribute("aid-cnt-type", "product")
                .with_attribute("aid-cnt-id", "P1")
                .with_child(fact("price", "$10")),
        );

        let output = build(dom);
        let tree = &output.tree;
        assert!(output.findings.is_empty());
        assert_eq!(tree.len(), 3);

        let content = tree.children_of(NodeId::ROOT).next().unwrap();
        assert_eq!(content.structural_type, Some(StructuralType::Content));
        assert_eq!(content.children.len(), 1);

        let product = tree.children_of(content.id).next().unwrap();
        assert_eq!(product.content_type, Some(ContentType::Product));
        assert_eq!(product.content_id.as_deref(), Some("P1"));
        assert_eq!(product.facts.len(), 1);
        assert_eq!(product.facts[0].kind, FactKind::Price);
        assert_eq!(product.facts[0].value, FactValue::text("$10"));
        assert!(!product.facts[0].orphaned);
    }

    #[test]
    fn test_unannotated_elements_are_transparent() {
        let dom = ElementNode::new("body").with_child(
            ElementNode::new("div").with_child(
                ElementNode::new("section")
                    .with_attribute("aid-type", "section")
                    .with_child(ElementNode::new("span").with_child(
                        ElementNode::new("div").with_attribute("aid-type", "interactive"),
                    )),
            ),
        );

        let tree = build(dom).tree;
        assert_eq!(tree.len(), 3);

        let section = tree.children_of(NodeId::ROOT).next().unwrap();
        assert_eq!(section.source.as_ref().unwrap().path, vec![0, 0]);
        let interactive = tree.children_of(section.id).next().unwrap();
        assert_eq!(interactive.structural_type, Some(StructuralType::Interactive));
        assert_eq!(interactive.source.as_ref().unwrap().path, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_fact_attaches_to_nearest_block() {
        let inner = ElementNode::new("div")
            .with_attribute("aid-cnt-type", "service")
            .with_attribute("aid-cnt-id", "S1")
            .with_child(fact("terms", "30 days"));
        let outer = ElementNode::new("div")
            .with_attribute("aid-cnt-type", "product")
            .with_attribute("aid-cnt-id", "P1")
            .with_child(fact("price", "$5"))
            .with_child(ElementNode::new("div").with_child(inner))
            .with_child(fact("rating", "4/5"));

        let tree = build(ElementNode::new("body").with_child(outer)).tree;

        let product = tree.iter().find(|n| n.content_id.as_deref() == Some("P1")).unwrap();
        let service = tree.iter().find(|n| n.content_id.as_deref() == Some("S1")).unwrap();

        let product_kinds: Vec<_> = product.facts.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(product_kinds, vec![FactKind::Price, FactKind::Rating]);
        assert_eq!(service.facts.len(), 1);
        assert_eq!(service.facts[0].kind, FactKind::Terms);
    }

    #[test]
    fn test_facts_keep_document_order() {
        let product = ElementNode::new("div")
            .with_attribute("aid-cnt-type", "product")
            .with_child(fact("desc", "first"))
            .with_child(ElementNode::new("div").with_child(fact("char", "second")))
            .with_child(fact("desc", "third"));

        let tree = build(product).tree;
        let values: Vec<_> = tree.iter().nth(1).unwrap().facts.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_orphaned_fact_goes_to_root() {
        let dom = ElementNode::new("body")
            .with_child(ElementNode::new("div").with_attribute("aid-type", "sidebar").with_child(fact("price", "$3")));

        let tree = build(dom).tree;
        let orphans = tree.orphaned_facts();
        assert_eq!(orphans.len(), 1);
        assert!(orphans[0].orphaned);
        assert_eq!(orphans[0].kind, FactKind::Price);
        assert_eq!(orphans[0].source.path, vec![0, 0]);
    }

    #[test]
    fn test_node_fact_without_enclosing_block_is_orphaned() {
        let dom = ElementNode::new("body").with_child(
            ElementNode::new("div")
                .with_attribute("aid-type", "section")
                .with_attribute("aid-cnt-kind", "price")
                .with_text("$5"),
        );

        let tree = build(dom).tree;
        assert_eq!(tree.len(), 2);
        let section = tree.get(NodeId(1)).unwrap();
        assert_eq!(section.structural_type, Some(StructuralType::Section));
        assert!(section.facts.is_empty());

        let orphans = tree.orphaned_facts();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].kind, FactKind::Price);
        assert_eq!(orphans[0].value, FactValue::text("$5"));
        assert_eq!(orphans[0].source.path, vec![0]);
    }

    #[test]
    fn test_block_fact_kind_goes_to_enclosing_block() {
        let variant = ElementNode::new("div")
            .with_attribute("aid-cnt-type", "product")
            .with_attribute("aid-cnt-kind", "opt")
            .with_attribute("aid-cnt-id", "P1-red")
            .with_text("Red")
            .with_child(fact("price", "$11"));
        let dom = ElementNode::new("div")
            .with_attribute("aid-cnt-type", "product")
            .with_attribute("aid-cnt-id", "P1")
            .with_child(variant);

        let tree = build(dom).tree;
        let parent = tree.iter().find(|n| n.content_id.as_deref() == Some("P1")).unwrap();
        let child = tree.iter().find(|n| n.content_id.as_deref() == Some("P1-red")).unwrap();

        assert_eq!(child.parent, Some(parent.id));
        assert_eq!(parent.facts.len(), 1);
        assert_eq!(parent.facts[0].kind, FactKind::Opt);
        assert_eq!(child.facts[0].kind, FactKind::Price);
    }

    #[test]
    fn test_leaf_children_are_visited() {
        let dom = ElementNode::new("div").with_attribute("aid-cnt-type", "product").with_child(
            ElementNode::new("figure")
                .with_attribute("aid-cnt-kind", "opt")
                .with_text("Blue")
                .with_child(ElementNode::new("img").with_attribute("aid-cnt-kind", "pic").with_attribute("src", "/b.png")),
        );

        let tree = build(dom).tree;
        let product = tree.iter().nth(1).unwrap();
        assert_eq!(product.facts.len(), 2);
        assert_eq!(product.facts[1].value, FactValue::reference("src", "/b.png"));
    }

    #[test]
    fn test_findings_are_recorded() {
        let dom = ElementNode::new("body")
            .with_child(ElementNode::new("div").with_attribute("aid-type", ""))
            .with_child(ElementNode::new("div").with_attribute("aid-state", "wait done"));

        let output = build(dom);
        assert_eq!(output.findings.len(), 2);
        assert_eq!(output.findings[0].node, None);
        assert_eq!(output.findings[0].source.path, vec![0]);
        assert_eq!(output.findings[1].node, Some(NodeId(1)));
    }

    #[test]
    fn test_root_element_can_be_a_node() {
        let tree = build(ElementNode::new("main").with_attribute("aid-type", "content")).tree;
        let node = tree.children_of(NodeId::ROOT).next().unwrap();
        assert!(node.source.as_ref().unwrap().path.is_empty());
        assert_eq!(tree.node_for_path(&[]).unwrap().id, node.id);
    }
}
