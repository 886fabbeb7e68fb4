use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dom::SourceRef;
use crate::schema::{ContentType, ElementState, FactKind, StructuralType};

/// Position of a node inside its [`SemanticTree`](crate::semantic::SemanticTree).
///
/// Ids are assigned in document (pre-)order, so comparing two ids compares
/// document positions. The synthetic root is always [`NodeId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a fact's value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FactValue {
    /// Text content of the fact element
    Text { text: String },

    /// A value-carrying attribute (`content`, `value`, `datetime`, ...)
    Attribute { name: String, value: String },

    /// Link or media target (`href`, `src`, `data`), left unresolved
    Reference { attribute: String, target: String },
}

impl FactValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn reference(attribute: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Reference {
            attribute: attribute.into(),
            target: target.into(),
        }
    }

    /// The raw value regardless of its source
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Attribute { value, .. } => value,
            Self::Reference { target, .. } => target,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content fact attached to a content block (or, when orphaned, to the root)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub kind: FactKind,

    pub value: FactValue,

    /// The element the fact was read from
    pub source: SourceRef,

    /// Set when no ancestor content block was found
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub orphaned: bool,
}

/// A materialized unit of meaning derived from one annotated element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticNode {
    pub id: NodeId,

    /// Originating element; `None` only for the synthetic root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_type: Option<StructuralType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "ElementState::is_none")]
    pub state: ElementState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,

    /// Facts in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,

    /// Children in document order
    #[serde(skip)]
    pub children: Vec<NodeId>,

    /// Back-reference for lookups; `None` for the root
    #[serde(skip)]
    pub parent: Option<NodeId>,
}

impl SemanticNode {
    pub(crate) fn synthetic_root() -> Self {
        Self {
            id: NodeId::ROOT,
            source: None,
            structural_type: None,
            description: None,
            state: ElementState::None,
            content_type: None,
            content_id: None,
            facts: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.source.is_none()
    }

    /// A node with a content classification
    pub fn is_content_block(&self) -> bool {
        self.content_type.is_some()
    }

    /// Values of this node's facts of one kind, in document order
    pub fn facts_of<'a, 'k>(&'a self, kind: &'k FactKind) -> impl Iterator<Item = &'a FactValue> {
        self.facts.iter().filter(move |f| &f.kind == kind).map(|f| &f.value)
    }

    pub fn has_fact(&self, kind: &FactKind) -> bool {
        self.facts.iter().any(|f| &f.kind == kind)
    }

    /// One-line description used in logs and outlines
    pub fn label(&self) -> String {
        if self.is_root() {
            return "(root)".to_string();
        }

        let mut parts = Vec::new();
        if let Some(t) = &self.structural_type {
            parts.push(format!("type={}", t));
        }
        if let Some(t) = &self.content_type {
            parts.push(format!("cnt-type={}", t));
        }
        if let Some(id) = &self.content_id {
            parts.push(format!("cnt-id={}", id));
        }
        if !self.state.is_none() {
            parts.push(format!("state={}", self.state));
        }
        if let Some(desc) = &self.description {
            parts.push(format!("desc={:?}", desc));
        }
        parts.join(" ")
    }
}
