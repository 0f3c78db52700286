//! Ingestion and name resolution.
//!
//! - [`CodeHandler`] - The ingestion state machine front-ends drive
//! - [`PackageSymbolIndex`] / [`ObjectsTable`] - Qualification and deferred resolution
//! - [`IndexListener`] - Observer protocol for recoverable problems
//! - [`JavaType`], [`Modifier`], [`Visibility`] - Declaration input

mod diagnostics;
mod error;
mod handler;
mod ids;
mod input;
mod paths;
mod resolve;
mod scope;
mod types;

pub use diagnostics::{
    codes, Diagnostic, DiagnosticCollector, IndexListener, ListenerId, Listeners,
    PackageDiscrepancy, ParseError, Severity, UnresolvedSource,
};
pub use error::IngestError;
pub use handler::{CodeHandler, EntityCounts, IngestReport};
pub use ids::{is_placeholder, PlaceholderMint};
pub use input::{partition_imports, Import};
pub use paths::{package_id, primitive_id, type_id, unqualified_id};
pub use resolve::{
    backpatch, ImportContext, Lookup, ObjectsTable, PackageSymbolIndex, Resolution,
    ResolutionReport, ResolvedVia, UnresolvedEntry,
};
pub use scope::{OpenContainer, OpenPackage, Scope};
pub use types::{ContainerKind, JavaType, Modifier, Primitive, Visibility};
