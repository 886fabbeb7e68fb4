use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::schema::vocab::{ContentType, ElementState, FactKind, StructuralType};

/// Structural rules the Validator enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// A content fact needs an ancestor content block
    FactRequiresContentBlock,
    /// `aid-cnt-id` is unique per content type within a `content` subtree
    UniqueContentIdInScope,
    /// A content block holding identity facts (e.g. `price`) carries an id
    IdentityFactRequiresId,
    /// Report values outside the registered vocabulary
    ReportUnknownValues,
    /// Report empty annotation attributes and multi-token states
    ReportInputAnomalies,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::FactRequiresContentBlock,
        Rule::UniqueContentIdInScope,
        Rule::IdentityFactRequiresId,
        Rule::ReportUnknownValues,
        Rule::ReportInputAnomalies,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Rule::FactRequiresContentBlock => "a content fact requires an ancestor content block",
            Rule::UniqueContentIdInScope => {
                "content ids are unique per content type within the nearest content subtree"
            }
            Rule::IdentityFactRequiresId => "a content block with identity facts should carry a content id",
            Rule::ReportUnknownValues => "values outside the registered vocabulary are reported",
            Rule::ReportInputAnomalies => "empty annotation attributes and conflicting states are reported",
        }
    }
}

/// Serializable description of a vocabulary, loaded from JSON so new canonical
/// values can be added without recompiling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Extra canonical `aid-type` values
    pub structural_types: Vec<String>,

    /// Extra canonical `aid-state` values
    pub states: Vec<String>,

    /// Extra canonical `aid-cnt-type` values
    pub content_types: Vec<String>,

    /// Extra canonical `aid-cnt-kind` values
    pub fact_kinds: Vec<String>,

    /// Fact kinds that only make sense on an identified block; `price` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_fact_kinds: Option<Vec<String>>,

    /// Enabled rules; all of them when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
}

/// Read-only vocabulary and rule set shared by every extraction.
///
/// Classification never fails: a value the registry does not know becomes the
/// `Custom` variant of its enumeration. Registering a literal only makes the
/// Validator treat it as known.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    structural_types: IndexSet<String>,
    states: IndexSet<String>,
    content_types: IndexSet<String>,
    fact_kinds: IndexSet<String>,
    identity_kinds: IndexSet<FactKind>,
    rules: IndexSet<Rule>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            structural_types: IndexSet::new(),
            states: IndexSet::new(),
            content_types: IndexSet::new(),
            fact_kinds: IndexSet::new(),
            identity_kinds: IndexSet::from([FactKind::Price]),
            rules: Rule::ALL.into_iter().collect(),
        }
    }
}

impl SchemaRegistry {
    /// Built-in vocabulary with every rule enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a [`SchemaConfig`]
    pub fn from_config(config: &SchemaConfig) -> Result<Self> {
        let mut registry = Self::default();

        for literal in &config.structural_types {
            registry.register_structural_type(literal)?;
        }
        for literal in &config.states {
            registry.register_state(literal)?;
        }
        for literal in &config.content_types {
            registry.register_content_type(literal)?;
        }
        for literal in &config.fact_kinds {
            registry.register_fact_kind(literal)?;
        }

        if let Some(kinds) = &config.identity_fact_kinds {
            registry.identity_kinds.clear();
            for kind in kinds {
                let kind = canonical(kind, "identity fact kind")?;
                registry.identity_kinds.insert(FactKind::from_literal(&kind));
            }
        }

        if let Some(rules) = &config.rules {
            registry.rules = rules.iter().copied().collect();
        }

        Ok(registry)
    }

    /// Build a registry from the JSON form of a [`SchemaConfig`]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SchemaConfig = serde_json::from_str(json)
            .map_err(|e| ExtractError::InvalidSchema(format!("Failed to parse schema JSON: {}", e)))?;
        Self::from_config(&config)
    }

    /// Classify an `aid-type` value
    pub fn classify_structural_type(&self, raw: &str) -> StructuralType {
        StructuralType::from_literal(raw.trim())
    }

    /// Classify an `aid-state` value
    pub fn classify_state(&self, raw: &str) -> ElementState {
        ElementState::from_literal(raw.trim())
    }

    /// Classify an `aid-cnt-type` value
    pub fn classify_content_type(&self, raw: &str) -> ContentType {
        ContentType::from_literal(raw.trim())
    }

    /// Classify an `aid-cnt-kind` value
    pub fn classify_fact_kind(&self, raw: &str) -> FactKind {
        FactKind::from_literal(raw.trim())
    }

    pub fn register_structural_type(&mut self, literal: &str) -> Result<()> {
        self.structural_types.insert(canonical(literal, "structural type")?);
        Ok(())
    }

    pub fn register_state(&mut self, literal: &str) -> Result<()> {
        self.states.insert(canonical(literal, "state")?);
        Ok(())
    }

    pub fn register_content_type(&mut self, literal: &str) -> Result<()> {
        self.content_types.insert(canonical(literal, "content type")?);
        Ok(())
    }

    pub fn register_fact_kind(&mut self, literal: &str) -> Result<()> {
        self.fact_kinds.insert(canonical(literal, "fact kind")?);
        Ok(())
    }

    pub fn is_known_structural_type(&self, value: &StructuralType) -> bool {
        !value.is_custom() || self.structural_types.contains(value.as_str())
    }

    pub fn is_known_state(&self, value: &ElementState) -> bool {
        !value.is_custom() || self.states.contains(value.as_str())
    }

    pub fn is_known_content_type(&self, value: &ContentType) -> bool {
        !value.is_custom() || self.content_types.contains(value.as_str())
    }

    pub fn is_known_fact_kind(&self, value: &FactKind) -> bool {
        !value.is_custom() || self.fact_kinds.contains(value.as_str())
    }

    /// Whether a fact of this kind only makes sense on an identified block
    pub fn requires_identity(&self, kind: &FactKind) -> bool {
        self.identity_kinds.contains(kind)
    }

    /// Enabled rules, in registration order
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn has_rule(&self, rule: Rule) -> bool {
        self.rules.contains(&rule)
    }

    /// Builder method: enable a rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule);
        self
    }

    /// Builder method: disable a rule
    pub fn without_rule(mut self, rule: Rule) -> Self {
        self.rules.shift_remove(&rule);
        self
    }

    /// Export the registry as a config that rebuilds it
    pub fn to_config(&self) -> SchemaConfig {
        SchemaConfig {
            structural_types: self.structural_types.iter().cloned().collect(),
            states: self.states.iter().cloned().collect(),
            content_types: self.content_types.iter().cloned().collect(),
            fact_kinds: self.fact_kinds.iter().cloned().collect(),
            identity_fact_kinds: Some(self.identity_kinds.iter().map(|k| k.to_string()).collect()),
            rules: Some(self.rules.iter().copied().collect()),
        }
    }
}

fn canonical(literal: &str, what: &str) -> Result<String> {
    let trimmed = literal.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::InvalidSchema(format!("empty {} literal", what)));
    }
    Ok(trimmed.to_string())
}
