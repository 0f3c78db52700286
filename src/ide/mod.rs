//! Query facade over an indexed graph.
//!
//! ## Design Principles
//!
//! 1. **Read-only**: Queries never write to the store
//! 2. **Typed views**: Results are plain structs, not raw triples
//! 3. **Pattern-based**: Every query is a store search keyed by identifier and kind
//!
//! ## Usage
//!
//! ```ignore
//! use jgraph::ide::CodeModel;
//!
//! let model = CodeModel::with_config(&graph, &config)?;
//! for package in model.packages()? {
//!     println!("{}", package.name);
//! }
//! ```

mod model;
mod query;

pub use model::{
    java_path, AttributeView, InvocableView, LibraryView, PackageView, ParameterView, TypeRef,
    TypeView, UnqualifiedReference,
};
pub use query::{CodeModel, QueryError, QueryResult};
