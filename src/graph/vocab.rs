//! Predicates and kind markers written by the code handler.

use std::fmt;

use super::store::Node;

pub const KIND: &str = "kind";
pub const CONTAINS: &str = "contains";
pub const CONTAINS_ELEMENT: &str = "contains_element";
pub const MODIFIER: &str = "modifier";
pub const VISIBILITY: &str = "visibility";
pub const EXTENDS: &str = "extends";
pub const IMPLEMENTS: &str = "implements";
pub const TYPE: &str = "type";
pub const DEFAULT_VALUE: &str = "default_value";
pub const SIGNATURE: &str = "signature";
pub const PARAMETER: &str = "parameter";
pub const POSITION: &str = "position";
pub const RETURNS: &str = "returns";
pub const THROWS: &str = "throws";
pub const LIBRARY_NAME: &str = "library_name";
pub const LIBRARY_LOCATION: &str = "library_location";
pub const COMPLETED_AT: &str = "completed_at";

/// Array dimensions of a type slot: `type_dimensions`, `returns_dimensions`.
pub fn dimensions_of(predicate: &str) -> String {
    format!("{predicate}_dimensions")
}

/// The value of a [`KIND`] edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Library,
    Package,
    Class,
    Interface,
    Enumeration,
    EnumElement,
    Attribute,
    Constructor,
    Method,
    Signature,
    Parameter,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Library => "library",
            EntityKind::Package => "package",
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::Enumeration => "enum",
            EntityKind::EnumElement => "enum_element",
            EntityKind::Attribute => "attribute",
            EntityKind::Constructor => "constructor",
            EntityKind::Method => "method",
            EntityKind::Signature => "signature",
            EntityKind::Parameter => "parameter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "library" => EntityKind::Library,
            "package" => EntityKind::Package,
            "class" => EntityKind::Class,
            "interface" => EntityKind::Interface,
            "enum" => EntityKind::Enumeration,
            "enum_element" => EntityKind::EnumElement,
            "attribute" => EntityKind::Attribute,
            "constructor" => EntityKind::Constructor,
            "method" => EntityKind::Method,
            "signature" => EntityKind::Signature,
            "parameter" => EntityKind::Parameter,
            _ => return None,
        })
    }

    /// Class, interface or enumeration.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            EntityKind::Class | EntityKind::Interface | EntityKind::Enumeration
        )
    }

    /// The literal object of this kind's marker edge.
    pub fn marker(&self) -> Node {
        Node::literal(self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            EntityKind::Library,
            EntityKind::Package,
            EntityKind::Class,
            EntityKind::Interface,
            EntityKind::Enumeration,
            EntityKind::EnumElement,
            EntityKind::Attribute,
            EntityKind::Constructor,
            EntityKind::Method,
            EntityKind::Signature,
            EntityKind::Parameter,
        ] {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("struct"), None);
    }

    #[test]
    fn test_is_container() {
        assert!(EntityKind::Class.is_container());
        assert!(EntityKind::Enumeration.is_container());
        assert!(!EntityKind::Package.is_container());
        assert!(!EntityKind::Method.is_container());
    }
}
