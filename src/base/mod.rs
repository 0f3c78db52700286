//! Foundation types for the code graph.
//!
//! This module provides the addressing scheme used throughout the crate:
//! - [`Identifier`] - Canonical hierarchical address
//! - [`Segment`] - One `(qualifier, fragment)` step
//! - [`IdentifierBuilder`] - Incremental construction and scope unwinding
//! - [`qualifier`] - Qualifier names of the Java model
//!
//! This module has NO dependencies on other jgraph modules.

mod identifier;
pub mod qualifier;

pub use identifier::{
    Identifier, IdentifierBuilder, IdentifierError, Segment, PATH_SEPARATOR, PREFIX_SEPARATOR,
    QUALIFIER_SEPARATOR,
};
