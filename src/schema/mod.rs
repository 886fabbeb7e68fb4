//! Schema Registry
//!
//! The annotation vocabulary (attribute names and their open value
//! enumerations) and the rule set consumed by the Validator.

pub mod registry;
pub mod vocab;

pub use registry::{Rule, SchemaConfig, SchemaRegistry};
pub use vocab::{
    ATTR_CONTENT_ID, ATTR_CONTENT_KIND, ATTR_CONTENT_TYPE, ATTR_DESC, ATTR_STATE, ATTR_TYPE, ATTRIBUTES,
    ContentType, ElementState, FactKind, StructuralType,
};
