//! Graph construction and analysis stages.
//!
//! The stages run in a fixed order over one document: catalog collection,
//! graph building (which drives the resolver and the rating normalizer),
//! duplicate collapsing, transitive propagation, and finally aggregation.
//! [`crate::pipeline`] wires them together.

mod aggregate;
mod builder;
mod catalog;
mod collapse;
mod normalizer;
mod propagate;
mod resolver;

pub use aggregate::aggregate;
pub use builder::build;
pub use catalog::{CatalogEntry, RefCatalog};
pub use collapse::collapse_duplicates;
pub use normalizer::normalize;
pub use propagate::{propagate, PropagationStats};
pub use resolver::Resolver;
