//! Predicate library and query executor for card filters.
//!
//! Filter text is parsed by `filter-syntax`; this crate turns the tree into a
//! [`Predicate`] (resolving values through a [`LookupCache`]) and evaluates it
//! against a [`Catalog`].
mod attribute;
mod build;
mod catalog;
mod engine;
mod error;
mod executor;
mod kinds;
mod lookup;
mod pattern;
mod predicate;
mod registry;

pub use attribute::*;
pub use build::*;
pub use catalog::*;
pub use engine::*;
pub use error::*;
pub use executor::*;
pub use kinds::*;
pub use lookup::*;
pub use pattern::*;
pub use predicate::*;
pub use registry::*;
