//! Qualifiers used by the Java structure model.
//!
//! Every container kind (class, interface, enumeration) shares the [`TYPE`]
//! qualifier; the kind itself is recorded as a separate graph fact. That way
//! a reference can be turned into an address before its kind is known.

pub const LIBRARY: &str = "library";
pub const PACKAGE: &str = "package";
pub const TYPE: &str = "type";
pub const ATTRIBUTE: &str = "attribute";
pub const CONSTRUCTOR: &str = "constructor";
pub const METHOD: &str = "method";
pub const SIGNATURE: &str = "signature";
pub const PARAMETER: &str = "parameter";
pub const ELEMENT: &str = "element";
pub const PRIMITIVE: &str = "primitive";

/// Reserved for placeholder identifiers minted during ingestion.
pub const UNRESOLVED: &str = "unresolved";

/// Marks a reference that stayed unresolved after the resolution pass.
pub const UNQUALIFIED: &str = "unqualified";
