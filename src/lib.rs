//! # aid-semantics
//!
//! A Rust library that turns HTML annotated with the `aid-*` attribute vocabulary into a
//! validated, queryable semantic tree, designed for AI agents, indexers and test harnesses.
//!
//! ## Features
//!
//! - **Schema Registry**: Open enumerations for every attribute, extensible without recompiling
//! - **Tree Builder**: One DOM traversal, content facts attached to their nearest content block
//! - **Validator**: Duplicate ids, orphaned facts and unknown values reported as diagnostics
//! - **Query API**: Indexed lookups by structural type, state, content type and content id
//!
//! ## Library Usage
//!
//! ### Extracting from HTML
//!
//! ```rust
//! use aid_semantics::{Extractor, FactKind, SchemaRegistry};
//!
//! # fn main() -> aid_semantics::Result<()> {
//! let registry = SchemaRegistry::default();
//! let extraction = Extractor::new(&registry).extract_html(
//!     r#"<div aid-type="content">
//!          <div aid-cnt-type="product" aid-cnt-id="P1"><p aid-cnt-kind="price">$10</p></div>
//!        </div>"#,
//! )?;
//!
//! let product = extraction.find_by_content_id("P1").expect("product P1");
//! let prices = extraction.facts_of(product.node.id, &FactKind::Price);
//! assert_eq!(prices[0].as_str(), "$10");
//! assert!(extraction.diagnostics().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ### Working from a DOM built elsewhere
//!
//! The engine never needs markup: any parser can hand over an [`ElementNode`] tree.
//!
//! ```rust
//! use aid_semantics::{DomTree, ElementNode, SchemaRegistry, StructuralType};
//!
//! # fn main() -> aid_semantics::Result<()> {
//! let root = ElementNode::new("body")
//!     .with_child(ElementNode::new("div").with_attribute("aid-type", "carousel"));
//!
//! let registry = SchemaRegistry::default();
//! let extraction = aid_semantics::extract(&DomTree::new(root), &registry)?;
//!
//! // Unknown values become custom variants plus an informational diagnostic
//! let custom = StructuralType::Custom("carousel".to_string());
//! assert_eq!(extraction.find_by_structural_type(&custom).len(), 1);
//! assert_eq!(extraction.diagnostics().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Input element tree, JSON loading and the optional HTML adapter
//! - [`schema`]: Attribute vocabulary and the Schema Registry
//! - [`semantic`]: Node Classifier, Tree Builder, semantic tree, Validator, index
//! - [`extract`]: The [`Extractor`] entry point and the [`Extraction`] query API
//! - [`error`]: Error types and result aliases

pub mod dom;
pub mod error;
pub mod extract;
pub mod schema;
pub mod semantic;

pub use dom::{DomTree, ElementNode, SourceRef};
pub use error::{ExtractError, Result};
pub use extract::{ContentIdMatch, ExtractOptions, Extraction, Extractor, extract};
pub use schema::{ContentType, ElementState, FactKind, Rule, SchemaConfig, SchemaRegistry, StructuralType};
pub use semantic::{
    Diagnostic, DiagnosticKind, Fact, FactValue, NodeId, SemanticIndex, SemanticNode, SemanticTree, Severity,
};
