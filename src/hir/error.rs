//! Protocol and usage errors raised by the code handler.
//!
//! These stop the offending call only. Edges written by earlier calls stay
//! in the graph; recoverable content problems go through listeners instead.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::IdentifierError;
use crate::graph::{EntityKind, GraphError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("parsing has not been started")]
    NotParsing,

    #[error("library '{name}' is already being parsed")]
    AlreadyParsing { name: SmolStr },

    #[error("library '{name}' already exists in the graph")]
    LibraryExists { name: SmolStr },

    #[error("unbalanced scopes at end of parsing: {open} is still open")]
    Unbalanced { open: String },

    #[error("compilation unit '{path}' is already open")]
    UnitAlreadyOpen { path: SmolStr },

    #[error("no compilation unit is open")]
    NoOpenUnit,

    #[error("cannot open package '{package}' inside {container}")]
    PackageInsideContainer { package: SmolStr, container: SmolStr },

    #[error("cannot close package while {container} is open")]
    ContainerStillOpen { container: SmolStr },

    #[error("no package is open")]
    NoOpenPackage,

    #[error("{operation} requires an open class, interface or enumeration")]
    NoOpenContainer { operation: &'static str },

    #[error("cannot end {expected}: innermost open container is {found} '{path}'")]
    MismatchedEnd {
        expected: EntityKind,
        found: EntityKind,
        path: SmolStr,
    },

    #[error("enumeration '{path}' declares no elements")]
    EmptyEnumeration { path: SmolStr },

    #[error("{names} parameter names but {types} parameter types")]
    ParameterMismatch { names: usize, types: usize },

    #[error("invalid declaration path '{path}'")]
    InvalidPath { path: SmolStr },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
