//! Input format parsing.

mod cyclonedx;

pub use cyclonedx::*;
