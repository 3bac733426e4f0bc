use crate::{Attribute, CardSetId, EntityKinds};
use filter_syntax::ParseError;
use thiserror::Error;

/// Failures between filter text and a match set. All are deterministic;
/// callers report them and never retry.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unknown filter type `{0}`")]
    UnknownFilterType(String),
    #[error("no such {filter_type}: {value}")]
    Unresolved { filter_type: String, value: String },
    #[error("no value bound for {filter_type} = {variable}")]
    UnboundVariable {
        filter_type: String,
        variable: String,
    },
    #[error("cannot combine a {left} filter with a {right} filter")]
    InvalidComposition {
        left: EntityKinds,
        right: EntityKinds,
    },
    #[error("filter applies to no kind of entity")]
    NoApplicableKind,
    #[error("a {kinds} filter cannot be evaluated over {universe}s")]
    UnsupportedUniverse {
        kinds: EntityKinds,
        universe: EntityKinds,
    },
    #[error("{0} is not in the catalog")]
    UnknownCardSet(CardSetId),
    #[error("malformed filter tree: unexpected {0}")]
    MalformedTree(String),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl FilterError {
    /// Whether lenient building may skip this error and keep going.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, FilterError::Unresolved { .. })
    }
}

/// Catalog document rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("card `{0}` is defined more than once")]
    DuplicateCard(String),
    #[error("physical card refers to unknown card `{0}`")]
    UnknownCard(String),
    #[error("card set `{0}` is defined more than once")]
    DuplicateCardSet(String),
    #[error("card set `{set}` has unknown parent `{parent}`")]
    UnknownParent { set: String, parent: String },
    #[error("card set `{0}` is its own ancestor")]
    ParentCycle(String),
    #[error("card set `{set}` holds physical card {index}, which does not exist")]
    PhysicalCardOutOfRange { set: String, index: usize },
    #[error("{attribute} name `{name}` refers to more than one entry")]
    AmbiguousName { attribute: Attribute, name: String },
}
