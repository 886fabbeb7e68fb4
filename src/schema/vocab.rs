//! Attribute vocabulary: wire-level attribute names and the open value
//! enumerations they select from.
//!
//! Every enumeration has a `Custom(raw)` arm so values the vocabulary does
//! not know yet still round-trip instead of being dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role of an element
pub const ATTR_TYPE: &str = "aid-type";
/// Brief human-readable description
pub const ATTR_DESC: &str = "aid-desc";
/// Element state
pub const ATTR_STATE: &str = "aid-state";
/// Content classification of a content block
pub const ATTR_CONTENT_TYPE: &str = "aid-cnt-type";
/// Identifier of a content block
pub const ATTR_CONTENT_ID: &str = "aid-cnt-id";
/// Kind of content fact carried by an element
pub const ATTR_CONTENT_KIND: &str = "aid-cnt-kind";

/// All recognised attribute names
pub const ATTRIBUTES: [&str; 6] = [
    ATTR_TYPE,
    ATTR_DESC,
    ATTR_STATE,
    ATTR_CONTENT_TYPE,
    ATTR_CONTENT_ID,
    ATTR_CONTENT_KIND,
];

/// Structural role of a semantic node (`aid-type`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StructuralType {
    Header,
    Footer,
    Sidebar,
    Content,
    Section,
    Nav,
    Form,
    Modal,
    Tooltip,
    Interactive,
    Custom(String),
}

impl StructuralType {
    /// Built-in literals, in vocabulary order
    pub const BUILTIN: [&'static str; 10] = [
        "header",
        "footer",
        "sidebar",
        "content",
        "section",
        "nav",
        "form",
        "modal",
        "tooltip",
        "interactive",
    ];

    /// Map a literal onto its variant; anything else becomes `Custom`
    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "header" => Self::Header,
            "footer" => Self::Footer,
            "sidebar" => Self::Sidebar,
            "content" => Self::Content,
            "section" => Self::Section,
            "nav" => Self::Nav,
            "form" => Self::Form,
            "modal" => Self::Modal,
            "tooltip" => Self::Tooltip,
            "interactive" => Self::Interactive,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Sidebar => "sidebar",
            Self::Content => "content",
            Self::Section => "section",
            Self::Nav => "nav",
            Self::Form => "form",
            Self::Modal => "modal",
            Self::Tooltip => "tooltip",
            Self::Interactive => "interactive",
            Self::Custom(raw) => raw,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// State of a semantic node (`aid-state`); `None` when the attribute is absent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ElementState {
    #[default]
    None,
    Idle,
    Loading,
    Processing,
    Wait,
    Done,
    Custom(String),
}

impl ElementState {
    pub const BUILTIN: [&'static str; 5] = ["idle", "loading", "processing", "wait", "done"];

    /// Map a literal onto its variant; `"none"` maps back onto `None` so the
    /// serialized form round-trips
    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "none" => Self::None,
            "idle" => Self::Idle,
            "loading" => Self::Loading,
            "processing" => Self::Processing,
            "wait" => Self::Wait,
            "done" => Self::Done,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Processing => "processing",
            Self::Wait => "wait",
            Self::Done => "done",
            Self::Custom(raw) => raw,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// Content classification of a content block (`aid-cnt-type`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Product,
    Service,
    Info,
    Custom(String),
}

impl ContentType {
    pub const BUILTIN: [&'static str; 3] = ["product", "service", "info"];

    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "product" => Self::Product,
            "service" => Self::Service,
            "info" => Self::Info,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Product => "product",
            Self::Service => "service",
            Self::Info => "info",
            Self::Custom(raw) => raw,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// Kind of a content fact (`aid-cnt-kind`, or `aid-cnt-id` outside a block)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FactKind {
    Price,
    Char,
    Terms,
    Desc,
    Opt,
    Pic,
    Vid,
    Sound,
    Rating,
    Comment,
    Statistic,
    Sim,
    /// An `aid-cnt-id` carried by an element that is not itself a content block
    ContentId,
    Custom(String),
}

impl FactKind {
    pub const BUILTIN: [&'static str; 13] = [
        "price",
        "char",
        "terms",
        "desc",
        "opt",
        "pic",
        "vid",
        "sound",
        "rating",
        "comment",
        "statistic",
        "sim",
        ATTR_CONTENT_ID,
    ];

    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "price" => Self::Price,
            "char" => Self::Char,
            "terms" => Self::Terms,
            "desc" => Self::Desc,
            "opt" => Self::Opt,
            "pic" => Self::Pic,
            "vid" => Self::Vid,
            "sound" => Self::Sound,
            "rating" => Self::Rating,
            "comment" => Self::Comment,
            "statistic" => Self::Statistic,
            "sim" => Self::Sim,
            ATTR_CONTENT_ID => Self::ContentId,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Price => "price",
            Self::Char => "char",
            Self::Terms => "terms",
            Self::Desc => "desc",
            Self::Opt => "opt",
            Self::Pic => "pic",
            Self::Vid => "vid",
            Self::Sound => "sound",
            Self::Rating => "rating",
            Self::Comment => "comment",
            Self::Statistic => "statistic",
            Self::Sim => "sim",
            Self::ContentId => ATTR_CONTENT_ID,
            Self::Custom(raw) => raw,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

macro_rules! impl_string_conversions {
    ($($ty:ident),*) => {
        $(
            impl From<String> for $ty {
                fn from(raw: String) -> Self {
                    Self::from_literal(&raw)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_string_conversions!(StructuralType, ElementState, ContentType, FactKind);
