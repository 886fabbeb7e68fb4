//! Semantic tree construction and validation
//!
//! - classifier: Node Classifier, one element at a time
//! - builder: Tree Builder, a single DOM traversal producing the tree
//! - tree / node: the immutable semantic tree and its nodes and facts
//! - validator: diagnostics over a finished tree
//! - index: lookup tables backing the query API

pub mod builder;
pub mod classifier;
pub mod index;
pub mod node;
pub mod tree;
pub mod validator;

pub use builder::{BuildOutput, RawFinding, TreeBuilder};
pub use classifier::{Classification, Classified, InputAnomaly, NodeClassifier, NodeFacets, PendingFact};
pub use index::SemanticIndex;
pub use node::{Fact, FactValue, NodeId, SemanticNode};
pub use tree::{NodeView, SemanticTree};
pub use validator::{Diagnostic, DiagnosticKind, Severity, Validator};
