//! The fact graph: store contract, vocabulary and an in-memory store.
//!
//! - [`GraphStore`] - Trait every backend implements
//! - [`TriplePattern`] - Wildcard / exact / prefix search patterns
//! - [`MemoryGraph`] - Deterministic in-memory backend
//! - [`vocab`] - Predicate names and [`EntityKind`] markers

mod memory;
mod store;
pub mod vocab;

pub use memory::MemoryGraph;
pub use store::{
    GraphError, GraphStore, Matches, Node, ObjectPattern, Pattern, Triple, TriplePattern,
};
pub use vocab::EntityKind;
