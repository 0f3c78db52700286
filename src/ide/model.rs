//! Read-only views returned by [`CodeModel`](super::CodeModel) queries.

use smol_str::SmolStr;

use crate::base::{qualifier, Identifier};
use crate::graph::EntityKind;
use crate::hir::{is_placeholder, Modifier, Visibility};

/// Target of a type edge (`type`, `extends`, `returns`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub target: Identifier,
    /// Array dimensions recorded on the slot; 0 for non-array types.
    pub dimensions: u8,
}

impl TypeRef {
    /// Java spelling of the target, e.g. `java.util.List`, `int` or the raw
    /// name of an unqualified reference.
    pub fn java_name(&self) -> String {
        match self.target.strongest_qualifier() {
            Some(qualifier::PRIMITIVE | qualifier::UNQUALIFIED | qualifier::UNRESOLVED) => self
                .target
                .tail()
                .map(|s| s.fragment().to_string())
                .unwrap_or_default(),
            _ => java_path(&self.target),
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.target.strongest_qualifier() == Some(qualifier::PRIMITIVE)
    }

    /// True if no lookup could qualify the reference.
    pub fn is_unqualified(&self) -> bool {
        self.target.strongest_qualifier() == Some(qualifier::UNQUALIFIED)
    }

    pub fn is_placeholder(&self) -> bool {
        is_placeholder(&self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageView {
    pub id: Identifier,
    /// Dotted package name.
    pub name: String,
}

/// A class, interface or enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeView {
    pub id: Identifier,
    pub kind: EntityKind,
    /// Fully qualified Java name, e.g. `p.Outer.Inner`.
    pub path: String,
    pub package: String,
    pub visibility: Option<Visibility>,
    pub modifiers: Vec<Modifier>,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    /// Enumeration constants; empty for classes and interfaces.
    pub elements: Vec<SmolStr>,
}

impl TypeView {
    pub fn name(&self) -> &str {
        self.id.tail().map(|s| s.fragment()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeView {
    pub id: Identifier,
    pub name: SmolStr,
    pub visibility: Option<Visibility>,
    pub modifiers: Vec<Modifier>,
    pub ty: Option<TypeRef>,
    pub default_value: Option<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterView {
    pub id: Identifier,
    pub name: SmolStr,
    pub position: usize,
    pub ty: Option<TypeRef>,
}

/// A method or constructor overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocableView {
    pub id: Identifier,
    pub kind: EntityKind,
    /// Method name, or the class name for constructors.
    pub name: SmolStr,
    pub overload: Option<u32>,
    pub visibility: Option<Visibility>,
    pub modifiers: Vec<Modifier>,
    /// Ordered by position.
    pub parameters: Vec<ParameterView>,
    /// Always `None` for constructors.
    pub returns: Option<TypeRef>,
    pub throws: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryView {
    pub id: Identifier,
    pub name: SmolStr,
    pub location: Option<SmolStr>,
    /// RFC 3339 completion time.
    pub completed_at: Option<SmolStr>,
}

/// An edge whose type could not be qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnqualifiedReference {
    pub slot: Identifier,
    pub predicate: SmolStr,
    /// The name as written.
    pub name: SmolStr,
}

/// `p.Outer.Inner` for `root.package:p.type:Outer.Inner`.
pub fn java_path(id: &Identifier) -> String {
    id.dotted_path_of(|s| matches!(s.qualifier(), qualifier::PACKAGE | qualifier::TYPE))
}

/// Split an invocable fragment such as `m(2)` into name and overload index.
pub(crate) fn split_overload(fragment: &str) -> (SmolStr, Option<u32>) {
    match fragment.strip_suffix(')').and_then(|rest| rest.rsplit_once('(')) {
        Some((name, overload)) => (SmolStr::new(name), overload.parse().ok()),
        None => (SmolStr::new(fragment), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_path() {
        let id = Identifier::parse("ns#package:a.b.type:Outer.Inner").unwrap();
        assert_eq!(java_path(&id), "a.b.Outer.Inner");
        let member = Identifier::parse("ns#package:a.type:C.attribute:f").unwrap();
        assert_eq!(java_path(&member), "a.C");
    }

    #[test]
    fn test_split_overload() {
        assert_eq!(split_overload("run(3)"), ("run".into(), Some(3)));
        assert_eq!(split_overload("plain"), ("plain".into(), None));
    }

    #[test]
    fn test_type_ref_names() {
        let primitive = TypeRef {
            target: Identifier::parse("ns#primitive:int").unwrap(),
            dimensions: 1,
        };
        assert!(primitive.is_primitive());
        assert_eq!(primitive.java_name(), "int");

        let unqualified = TypeRef {
            target: Identifier::parse("ns#unqualified:Foo").unwrap(),
            dimensions: 0,
        };
        assert!(unqualified.is_unqualified());
        assert_eq!(unqualified.java_name(), "Foo");
    }
}
