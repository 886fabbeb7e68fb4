//! Extraction entry point
//!
//! [`Extractor`] runs the whole pipeline for one DOM: input checks, Tree
//! Builder, Validator, indexing. It holds no state between calls, so one
//! extractor (or one registry shared by many) can serve parallel extractions.

pub mod config;
pub mod extraction;

pub use config::{DEFAULT_MAX_DEPTH, ExtractOptions};
pub use extraction::{ContentIdMatch, Extraction};

use log::info;

use crate::dom::DomTree;
use crate::error::Result;
use crate::schema::SchemaRegistry;
use crate::semantic::{NodeClassifier, TreeBuilder, Validator};

/// Runs extractions against one [`SchemaRegistry`]
#[derive(Debug, Clone)]
pub struct Extractor<'r> {
    registry: &'r SchemaRegistry,
    options: ExtractOptions,
}

impl<'r> Extractor<'r> {
    /// Create an extractor with default options
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            options: ExtractOptions::default(),
        }
    }

    /// Builder method: set options
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.registry
    }

    /// Extract the semantic tree from `dom`.
    ///
    /// Fails only with [`ExtractError::InvalidInput`](crate::ExtractError::InvalidInput)
    /// when the input breaks the DOM contract; data-quality problems are
    /// reported through the returned diagnostics.
    pub fn extract(&self, dom: &DomTree) -> Result<Extraction> {
        dom.check_well_formed(&self.options)?;

        let classifier = NodeClassifier::new(self.registry).normalize_whitespace(self.options.normalize_whitespace);
        let output = TreeBuilder::with_classifier(classifier).build(dom);
        let diagnostics = Validator::new(self.registry).validate(&output.tree, &output.findings);

        info!(
            "extracted {} semantic nodes, {} facts ({} orphaned), {} diagnostics",
            output.tree.len() - 1,
            output.tree.count_facts(),
            output.tree.orphaned_facts().len(),
            diagnostics.len()
        );

        Ok(Extraction::new(output.tree, diagnostics))
    }

    /// Extract from the JSON form of a DOM (see [`DomTree::from_json_with`])
    pub fn extract_json(&self, json: &str) -> Result<Extraction> {
        self.extract(&DomTree::from_json_with(json, &self.options)?)
    }

    /// Parse `html` and extract from it
    #[cfg(feature = "html")]
    pub fn extract_html(&self, html: &str) -> Result<Extraction> {
        self.extract(&DomTree::from_html_with(html, &self.options)?)
    }
}

/// Extract with default options
pub fn extract(dom: &DomTree, registry: &SchemaRegistry) -> Result<Extraction> {
    Extractor::new(registry).extract(dom)
}
