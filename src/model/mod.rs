//! Normalized data model for SBOM dependency graphs.
//!
//! The input document is parsed into `parsers::Raw*` structures at the
//! boundary; everything in this module is the normalized, query-ready form:
//! identifier-keyed component records with bidirectional edges and fully
//! populated vulnerability data.

mod component;
mod identifiers;
mod metadata;
mod severity;
mod vulnerability;

pub use component::*;
pub use identifiers::*;
pub use metadata::*;
pub use severity::*;
pub use vulnerability::*;
