//! # jgraph-base
//!
//! Core library for indexing the structure of Java-like code (packages,
//! types, members, signatures) into a subject/predicate/object fact graph.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → Query facade (typed, read-only views)
//!   ↓
//! hir      → Code handler, scope stacks, name resolution, listeners
//!   ↓
//! project  → Pre-scan of source and class trees
//!   ↓
//! graph    → Store contract, vocabulary, in-memory store
//!   ↓
//! base     → Identifier addressing scheme
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use jgraph::{CodeHandler, CodeModel, IndexerConfig, MemoryGraph, Visibility};
//!
//! let config = IndexerConfig::default();
//! let mut graph = MemoryGraph::new();
//! let mut handler = CodeHandler::new(&mut graph, config.clone())?;
//! handler.start_parsing("demo", "/src/demo")?;
//! handler.start_package("p")?;
//! handler.start_class(&[], Visibility::Public, "p.C", None, &[])?;
//! handler.end_class()?;
//! handler.end_package()?;
//! let report = handler.end_parsing()?;
//!
//! let model = CodeModel::with_config(&graph, &config)?;
//! assert_eq!(model.packages()?.len(), 1);
//! ```

/// Identifier addressing scheme
pub mod base;

/// Indexer settings
pub mod config;

/// Graph store contract and the in-memory store
pub mod graph;

/// Ingestion state machine and name resolution
pub mod hir;

/// Query facade
pub mod ide;

/// Corpus pre-scan
pub mod project;

pub use base::{Identifier, IdentifierBuilder, IdentifierError, Segment};
pub use config::IndexerConfig;
pub use graph::{EntityKind, GraphError, GraphStore, MemoryGraph, Node, Triple, TriplePattern};
pub use hir::{
    CodeHandler, ContainerKind, DiagnosticCollector, Import, IndexListener, IngestError,
    IngestReport, JavaType, Modifier, Primitive, Visibility,
};
pub use ide::{CodeModel, QueryError};
pub use project::{prescan_paths, PrescanIndex};
