//! Node Classifier: decides what a single element contributes to the
//! semantic tree.

use crate::dom::ElementNode;
use crate::schema::{
    ATTR_CONTENT_ID, ATTR_CONTENT_KIND, ATTR_CONTENT_TYPE, ATTR_DESC, ATTR_STATE, ATTR_TYPE, ATTRIBUTES,
    ContentType, ElementState, FactKind, SchemaRegistry, StructuralType,
};
use crate::semantic::node::FactValue;

/// Tags whose fact value is a link target
const LINK_TAGS: [&str; 3] = ["a", "link", "area"];
/// Tags whose fact value is a media source
const MEDIA_TAGS: [&str; 7] = ["img", "audio", "video", "source", "track", "embed", "iframe"];
/// Tags whose fact value is their `value` attribute
const VALUE_TAGS: [&str; 5] = ["data", "meter", "input", "output", "option"];

/// The node-level facets of an annotated element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFacets {
    pub structural_type: Option<StructuralType>,
    pub description: Option<String>,
    pub state: ElementState,
    pub content_type: Option<ContentType>,
    pub content_id: Option<String>,
}

impl NodeFacets {
    fn is_structural(&self) -> bool {
        self.structural_type.is_some() || self.description.is_some() || !self.state.is_none()
    }
}

/// A fact read off an element, before it is attached to an owner
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFact {
    pub kind: FactKind,
    pub value: FactValue,
}

/// Outcome of classifying one element.
///
/// Node variants may still carry facts: an element that becomes a node while
/// also carrying `aid-cnt-kind` contributes that fact to its nearest strict
/// ancestor content block.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No recognized attribute; the element is transparent
    Unannotated,
    /// Structural role, state or description, without a content type
    StructuralNode { facets: NodeFacets, facts: Vec<PendingFact> },
    /// Carries a content type, possibly merged with structural facets
    ContentBlockNode { facets: NodeFacets, facts: Vec<PendingFact> },
    /// Only fact attributes; attaches to the owning content block
    ContentFactLeaf { facts: Vec<PendingFact> },
}

/// Irregularities found on the raw attributes of an element
#[derive(Debug, Clone, PartialEq)]
pub enum InputAnomaly {
    /// A recognized attribute whose value is blank; treated as absent
    EmptyAttribute { attribute: String },
    /// `aid-state` holding several whitespace-separated tokens
    ConflictingState { tokens: Vec<String> },
}

/// Classification plus the anomalies noticed on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub classification: Classification,
    pub anomalies: Vec<InputAnomaly>,
}

/// Classifies single elements against a [`SchemaRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct NodeClassifier<'r> {
    registry: &'r SchemaRegistry,
    normalize_whitespace: bool,
}

impl<'r> NodeClassifier<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            normalize_whitespace: true,
        }
    }

    /// Builder method: collapse whitespace runs in text-derived values
    pub fn normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    pub fn classify(&self, element: &ElementNode) -> Classified {
        let mut anomalies = Vec::new();

        for attribute in ATTRIBUTES {
            if matches!(element.get_attribute(attribute), Some(v) if v.trim().is_empty()) {
                anomalies.push(InputAnomaly::EmptyAttribute {
                    attribute: attribute.to_string(),
                });
            }
        }

        let state = match element.non_empty_attribute(ATTR_STATE) {
            Some(raw) => {
                let tokens: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
                if tokens.len() > 1 {
                    anomalies.push(InputAnomaly::ConflictingState { tokens });
                }
                self.registry.classify_state(raw)
            }
            None => ElementState::None,
        };

        let content_type = element
            .non_empty_attribute(ATTR_CONTENT_TYPE)
            .map(|raw| self.registry.classify_content_type(raw));
        let raw_content_id = element.non_empty_attribute(ATTR_CONTENT_ID).map(|v| v.trim().to_string());

        let mut facets = NodeFacets {
            structural_type: element
                .non_empty_attribute(ATTR_TYPE)
                .map(|raw| self.registry.classify_structural_type(raw)),
            description: element
                .non_empty_attribute(ATTR_DESC)
                .map(|raw| self.normalize(raw)),
            state,
            content_type,
            content_id: None,
        };

        let mut facts = Vec::new();
        if let Some(raw) = element.non_empty_attribute(ATTR_CONTENT_KIND) {
            facts.push(PendingFact {
                kind: self.registry.classify_fact_kind(raw),
                value: self.fact_value(element),
            });
        }

        let classification = if facets.content_type.is_some() {
            facets.content_id = raw_content_id;
            Classification::ContentBlockNode { facets, facts }
        } else {
            // Outside a content block an id is a fact about the owning block
            if let Some(id) = raw_content_id {
                facts.push(PendingFact {
                    kind: FactKind::ContentId,
                    value: FactValue::attribute(ATTR_CONTENT_ID, id),
                });
            }

            if facets.is_structural() {
                Classification::StructuralNode { facets, facts }
            } else if !facts.is_empty() {
                Classification::ContentFactLeaf { facts }
            } else {
                Classification::Unannotated
            }
        };

        Classified {
            classification,
            anomalies,
        }
    }

    /// Value of a fact-bearing element: the most specific value source its
    /// tag offers, falling back to its text content
    pub fn fact_value(&self, element: &ElementNode) -> FactValue {
        let tag = element.tag_name.to_ascii_lowercase();
        let tag = tag.as_str();

        let from_attributes = if tag == "meta" {
            attribute_value(element, "content")
        } else if tag == "time" {
            attribute_value(element, "datetime")
        } else if VALUE_TAGS.contains(&tag) {
            attribute_value(element, "value")
        } else if LINK_TAGS.contains(&tag) {
            reference(element, "href")
        } else if tag == "object" {
            reference(element, "data")
        } else if MEDIA_TAGS.contains(&tag) {
            reference(element, "src").or_else(|| nested_source(element))
        } else {
            None
        };

        from_attributes.unwrap_or_else(|| FactValue::text(self.normalize(element.trimmed_text())))
    }

    fn normalize(&self, text: &str) -> String {
        if self.normalize_whitespace {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            text.trim().to_string()
        }
    }
}

fn attribute_value(element: &ElementNode, name: &str) -> Option<FactValue> {
    element
        .non_empty_attribute(name)
        .map(|v| FactValue::attribute(name, v.trim()))
}

fn reference(element: &ElementNode, attribute: &str) -> Option<FactValue> {
    element
        .non_empty_attribute(attribute)
        .map(|v| FactValue::reference(attribute, v.trim()))
}

/// `<video><source src=..></video>`: first descendant source with a `src`
fn nested_source(element: &ElementNode) -> Option<FactValue> {
    let mut stack: Vec<&ElementNode> = element.children.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.is_tag("source") {
            if let Some(found) = reference(node, "src") {
                return Some(found);
            }
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(element: &ElementNode) -> Classified {
        let registry = SchemaRegistry::new();
        NodeClassifier::new(&registry).classify(element)
    }

    #[test]
    fn test_unannotated() {
        let element = ElementNode::new("div").with_attribute("class", "wrapper");
        let classified = classify(&element);
        assert_eq!(classified.classification, Classification::Unannotated);
        assert!(classified.anomalies.is_empty());
    }

    #[test]
    fn test_structural_node() {
        let element = ElementNode::new("nav")
            .with_attribute("aid-type", "nav")
            .with_attribute("aid-desc", "  Main   menu ")
            .with_attribute("aid-state", "idle");

        match classify(&element).classification {
            Classification::StructuralNode { facets, facts } => {
                assert_eq!(facets.structural_type, Some(StructuralType::Nav));
                assert_eq!(facets.description.as_deref(), Some("Main menu"));
                assert_eq!(facets.state, ElementState::Idle);
                assert!(facts.is_empty());
            }
            other => panic!("Expected structural node, got {:?}", other),
        }
    }

    #[test]
    fn test_state_alone_makes_structural_node() {
        let element = ElementNode::new("div").with_attribute("aid-state", "loading");
        assert!(matches!(
            classify(&element).classification,
            Classification::StructuralNode { .. }
        ));
    }

    #[test]
    fn test_merged_structural_and_content_block() {
        let element = ElementNode::new("div")
            .with_attribute("aid-type", "content")
            .with_attribute("aid-cnt-type", "product")
            .with_attribute("aid-cnt-id", "PRD001");

        match classify(&element).classification {
            Classification::ContentBlockNode { facets, .. } => {
                assert_eq!(facets.structural_type, Some(StructuralType::Content));
                assert_eq!(facets.content_type, Some(ContentType::Product));
                assert_eq!(facets.content_id.as_deref(), Some("PRD001"));
            }
            other => panic!("Expected content block, got {:?}", other),
        }
    }

    #[test]
    fn test_fact_leaf() {
        let element = ElementNode::new("p")
            .with_attribute("aid-cnt-kind", "price")
            .with_text(" $10 ");

        match classify(&element).classification {
            Classification::ContentFactLeaf { facts } => {
                assert_eq!(facts.len(), 1);
                assert_eq!(facts[0].kind, FactKind::Price);
                assert_eq!(facts[0].value, FactValue::text("$10"));
            }
            other => panic!("Expected fact leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_content_type_wins_over_fact_kind() {
        let element = ElementNode::new("div")
            .with_attribute("aid-cnt-kind", "opt")
            .with_attribute("aid-cnt-type", "product")
            .with_text("Variant");

        match classify(&element).classification {
            Classification::ContentBlockNode { facets, facts } => {
                assert_eq!(facets.content_type, Some(ContentType::Product));
                assert_eq!(facts[0].kind, FactKind::Opt);
            }
            other => panic!("Expected content block, got {:?}", other),
        }
    }

    #[test]
    fn test_content_id_outside_block_is_fact() {
        let element = ElementNode::new("span").with_attribute("aid-cnt-id", "SKU-9");

        match classify(&element).classification {
            Classification::ContentFactLeaf { facts } => {
                assert_eq!(facts[0].kind, FactKind::ContentId);
                assert_eq!(facts[0].value, FactValue::attribute("aid-cnt-id", "SKU-9"));
            }
            other => panic!("Expected fact leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_values() {
        let element = ElementNode::new("div").with_attribute("aid-type", "carousel");
        match classify(&element).classification {
            Classification::StructuralNode { facets, .. } => {
                assert_eq!(facets.structural_type, Some(StructuralType::Custom("carousel".to_string())));
            }
            other => panic!("Expected structural node, got {:?}", other),
        }

        let element = ElementNode::new("p").with_attribute("aid-cnt-kind", "warranty");
        match classify(&element).classification {
            Classification::ContentFactLeaf { facts } => {
                assert_eq!(facts[0].kind, FactKind::Custom("warranty".to_string()));
            }
            other => panic!("Expected fact leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_anomalies() {
        let element = ElementNode::new("div")
            .with_attribute("aid-type", "")
            .with_attribute("aid-state", "loading done");

        let classified = classify(&element);
        assert_eq!(
            classified.anomalies,
            vec![
                InputAnomaly::EmptyAttribute { attribute: "aid-type".to_string() },
                InputAnomaly::ConflictingState {
                    tokens: vec!["loading".to_string(), "done".to_string()]
                },
            ]
        );
        match classified.classification {
            Classification::StructuralNode { facets, .. } => {
                assert_eq!(facets.structural_type, None);
                assert_eq!(facets.state, ElementState::Custom("loading done".to_string()));
            }
            other => panic!("Expected structural node, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_attributes_only_is_unannotated() {
        let element = ElementNode::new("div").with_attribute("aid-cnt-type", " ");
        let classified = classify(&element);
        assert_eq!(classified.classification, Classification::Unannotated);
        assert_eq!(classified.anomalies.len(), 1);
    }

    #[test]
    fn test_fact_value_sources() {
        let registry = SchemaRegistry::new();
        let classifier = NodeClassifier::new(&registry);

        let img = ElementNode::new("img").with_attribute("src", "/p1.png");
        assert_eq!(classifier.fact_value(&img), FactValue::reference("src", "/p1.png"));

        let link = ElementNode::new("a").with_attribute("href", "/terms").with_text("Terms");
        assert_eq!(classifier.fact_value(&link), FactValue::reference("href", "/terms"));

        let meta = ElementNode::new("meta").with_attribute("content", "4.5");
        assert_eq!(classifier.fact_value(&meta), FactValue::attribute("content", "4.5"));

        let time = ElementNode::new("time").with_attribute("datetime", "2024-01-01").with_text("Jan 1");
        assert_eq!(classifier.fact_value(&time), FactValue::attribute("datetime", "2024-01-01"));

        let data = ElementNode::new("data").with_attribute("value", "42").with_text("forty-two");
        assert_eq!(classifier.fact_value(&data), FactValue::attribute("value", "42"));

        let video = ElementNode::new("video")
            .with_child(ElementNode::new("source").with_attribute("src", "/clip.mp4"));
        assert_eq!(classifier.fact_value(&video), FactValue::reference("src", "/clip.mp4"));

        let bare_link = ElementNode::new("a").with_text("  No   target ");
        assert_eq!(classifier.fact_value(&bare_link), FactValue::text("No target"));
    }

    #[test]
    fn test_whitespace_normalization_toggle() {
        let registry = SchemaRegistry::new();
        let element = ElementNode::new("p").with_text(" Red \n  shirt ");

        let normalized = NodeClassifier::new(&registry);
        assert_eq!(normalized.fact_value(&element), FactValue::text("Red shirt"));

        let raw = NodeClassifier::new(&registry).normalize_whitespace(false);
        assert_eq!(raw.fact_value(&element), FactValue::text("Red \n  shirt"));
    }
}
