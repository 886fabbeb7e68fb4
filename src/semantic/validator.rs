//! Validator: a pure post-pass over a finished tree producing diagnostics.
//!
//! Checks never remove nodes or facts and never fail; each finding becomes a
//! [`Diagnostic`]. Which checks run is decided by the registry's [`Rule`] set.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::dom::SourceRef;
use crate::schema::{
    ATTR_CONTENT_KIND, ATTR_STATE, ATTR_TYPE, ATTR_CONTENT_TYPE, ContentType, FactKind, Rule, SchemaRegistry,
    StructuralType,
};
use crate::semantic::builder::RawFinding;
use crate::semantic::classifier::InputAnomaly;
use crate::semantic::node::NodeId;
use crate::semantic::tree::SemanticTree;

/// How much a diagnostic should worry the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth knowing, nothing is wrong (e.g. extension values)
    Info,
    /// Identity-based lookups or fact ownership may be unreliable
    Warning,
}

/// Machine-readable finding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Several blocks of one content type share an id within one scope
    DuplicateContentId {
        content_type: ContentType,
        content_id: String,
        /// Nearest `content` node enclosing the blocks (the root if none)
        scope: NodeId,
        nodes: Vec<NodeId>,
    },
    /// A fact with no ancestor content block, recorded on the root
    OrphanedFact {
        kind: FactKind,
        /// Index into the root's facts
        fact_index: usize,
        source: SourceRef,
    },
    /// A value outside the registered vocabulary
    UnknownValue {
        attribute: String,
        value: String,
        node: NodeId,
    },
    /// A content block with identity facts but no content id
    MissingContentId { node: NodeId, kinds: Vec<FactKind> },
    /// A fact with neither text nor a value attribute
    EmptyFactValue {
        kind: FactKind,
        owner: NodeId,
        source: SourceRef,
    },
    /// A recognized attribute with a blank value, treated as absent
    EmptyAttribute {
        attribute: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<NodeId>,
        source: SourceRef,
    },
    /// `aid-state` carrying several tokens
    ConflictingState {
        tokens: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<NodeId>,
        source: SourceRef,
    },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateContentId { .. } | Self::OrphanedFact { .. } | Self::ConflictingState { .. } => {
                Severity::Warning
            }
            Self::UnknownValue { .. }
            | Self::MissingContentId { .. }
            | Self::EmptyFactValue { .. }
            | Self::EmptyAttribute { .. } => Severity::Info,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateContentId { .. } => "duplicate_content_id",
            Self::OrphanedFact { .. } => "orphaned_fact",
            Self::UnknownValue { .. } => "unknown_value",
            Self::MissingContentId { .. } => "missing_content_id",
            Self::EmptyFactValue { .. } => "empty_fact_value",
            Self::EmptyAttribute { .. } => "empty_attribute",
            Self::ConflictingState { .. } => "conflicting_state",
        }
    }

    /// Nodes the finding concerns, in document order
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Self::DuplicateContentId { nodes, .. } => nodes.clone(),
            Self::OrphanedFact { .. } => vec![NodeId::ROOT],
            Self::UnknownValue { node, .. } | Self::MissingContentId { node, .. } => vec![*node],
            Self::EmptyFactValue { owner, .. } => vec![*owner],
            Self::EmptyAttribute { node, .. } | Self::ConflictingState { node, .. } => {
                node.iter().copied().collect()
            }
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateContentId {
                content_type,
                content_id,
                nodes,
                ..
            } => {
                let ids: Vec<String> = nodes.iter().map(NodeId::to_string).collect();
                write!(
                    f,
                    "content id {:?} is used by {} {} blocks: {}",
                    content_id,
                    nodes.len(),
                    content_type,
                    ids.join(", ")
                )
            }
            Self::OrphanedFact { kind, source, .. } => {
                write!(f, "{} fact at {} has no enclosing content block", kind, source.css_path)
            }
            Self::UnknownValue { attribute, value, node } => {
                write!(f, "{}={:?} on node {} is not in the vocabulary", attribute, value, node)
            }
            Self::MissingContentId { node, kinds } => {
                let kinds: Vec<&str> = kinds.iter().map(FactKind::as_str).collect();
                write!(f, "content block {} has {} facts but no content id", node, kinds.join("/"))
            }
            Self::EmptyFactValue { kind, source, .. } => {
                write!(f, "{} fact at {} has an empty value", kind, source.css_path)
            }
            Self::EmptyAttribute { attribute, source, .. } => {
                write!(f, "{} at {} is empty and was ignored", attribute, source.css_path)
            }
            Self::ConflictingState { tokens, source, .. } => {
                write!(f, "{} at {} has conflicting values: {}", ATTR_STATE, source.css_path, tokens.join(" "))
            }
        }
    }
}

/// A non-fatal finding attached to an extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,

    #[serde(flatten)]
    pub kind: DiagnosticKind,

    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            severity: kind.severity(),
            message: kind.to_string(),
            kind,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "{}[{}]: {}", level, self.code(), self.message)
    }
}

/// Runs the registry's rules over a built tree
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validate `tree`. `findings` are the raw-input anomalies the Tree
    /// Builder collected while walking the DOM.
    pub fn validate(&self, tree: &SemanticTree, findings: &[RawFinding]) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        if self.registry.has_rule(Rule::ReportInputAnomalies) {
            check_input_anomalies(findings, &mut out);
        }
        if self.registry.has_rule(Rule::FactRequiresContentBlock) {
            check_orphans(tree, &mut out);
        }
        if self.registry.has_rule(Rule::UniqueContentIdInScope) {
            check_duplicate_ids(tree, &mut out);
        }
        if self.registry.has_rule(Rule::ReportUnknownValues) {
            self.check_unknown_values(tree, &mut out);
        }
        if self.registry.has_rule(Rule::IdentityFactRequiresId) {
            self.check_missing_ids(tree, &mut out);
        }
        if self.registry.has_rule(Rule::ReportInputAnomalies) {
            check_empty_facts(tree, &mut out);
        }

        out.into_iter().map(Diagnostic::new).collect()
    }

    fn check_unknown_values(&self, tree: &SemanticTree, out: &mut Vec<DiagnosticKind>) {
        let registry = self.registry;

        for node in tree.iter() {
            let mut unknown = |attribute: &str, value: &str| {
                out.push(DiagnosticKind::UnknownValue {
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                    node: node.id,
                });
            };

            if let Some(t) = node.structural_type.as_ref().filter(|t| !registry.is_known_structural_type(t)) {
                unknown(ATTR_TYPE, t.as_str());
            }
            if !registry.is_known_state(&node.state) {
                unknown(ATTR_STATE, node.state.as_str());
            }
            if let Some(t) = node.content_type.as_ref().filter(|t| !registry.is_known_content_type(t)) {
                unknown(ATTR_CONTENT_TYPE, t.as_str());
            }
            for fact in node.facts.iter().filter(|f| !registry.is_known_fact_kind(&f.kind)) {
                unknown(ATTR_CONTENT_KIND, fact.kind.as_str());
            }
        }
    }

    fn check_missing_ids(&self, tree: &SemanticTree, out: &mut Vec<DiagnosticKind>) {
        for node in tree.iter().filter(|n| n.is_content_block() && n.content_id.is_none()) {
            if node.has_fact(&FactKind::ContentId) {
                continue;
            }

            let mut kinds: Vec<FactKind> = Vec::new();
            for fact in &node.facts {
                if self.registry.requires_identity(&fact.kind) && !kinds.contains(&fact.kind) {
                    kinds.push(fact.kind.clone());
                }
            }

            if !kinds.is_empty() {
                out.push(DiagnosticKind::MissingContentId { node: node.id, kinds });
            }
        }
    }
}

fn check_input_anomalies(findings: &[RawFinding], out: &mut Vec<DiagnosticKind>) {
    for finding in findings {
        out.push(match &finding.anomaly {
            InputAnomaly::EmptyAttribute { attribute } => DiagnosticKind::EmptyAttribute {
                attribute: attribute.clone(),
                node: finding.node,
                source: finding.source.clone(),
            },
            InputAnomaly::ConflictingState { tokens } => DiagnosticKind::ConflictingState {
                tokens: tokens.clone(),
                node: finding.node,
                source: finding.source.clone(),
            },
        });
    }
}

fn check_orphans(tree: &SemanticTree, out: &mut Vec<DiagnosticKind>) {
    for (fact_index, fact) in tree.orphaned_facts().iter().enumerate() {
        out.push(DiagnosticKind::OrphanedFact {
            kind: fact.kind.clone(),
            fact_index,
            source: fact.source.clone(),
        });
    }
}

/// One diagnostic per group of blocks sharing (scope, content type, id).
///
/// A block that is itself the `content` region of its group joins the group,
/// so a region and a nested block repeating its type and id are flagged.
fn check_duplicate_ids(tree: &SemanticTree, out: &mut Vec<DiagnosticKind>) {
    let mut groups: IndexMap<(NodeId, &ContentType, &str), Vec<NodeId>> = IndexMap::new();

    for node in tree.iter() {
        let (Some(content_type), Some(content_id)) = (&node.content_type, &node.content_id) else {
            continue;
        };

        let scope = tree
            .ancestors(node.id)
            .find(|a| a.structural_type == Some(StructuralType::Content))
            .map(|a| a.id)
            .unwrap_or(NodeId::ROOT);

        groups
            .entry((scope, content_type, content_id.as_str()))
            .or_default()
            .push(node.id);
    }

    for ((scope, content_type, content_id), mut nodes) in groups {
        let region_repeats = tree.get(scope).is_some_and(|region| {
            region.content_type.as_ref() == Some(content_type) && region.content_id.as_deref() == Some(content_id)
        });
        if region_repeats {
            nodes.insert(0, scope);
        }

        if nodes.len() > 1 {
            out.push(DiagnosticKind::DuplicateContentId {
                content_type: content_type.clone(),
                content_id: content_id.to_string(),
                scope,
                nodes,
            });
        }
    }
}

fn check_empty_facts(tree: &SemanticTree, out: &mut Vec<DiagnosticKind>) {
    for node in tree.iter() {
        for fact in node.facts.iter().filter(|f| f.value.is_empty()) {
            out.push(DiagnosticKind::EmptyFactValue {
                kind: fact.kind.clone(),
                owner: node.id,
                source: fact.source.clone(),
            });
        }
    }
}
