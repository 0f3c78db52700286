//! Addresses of Java entities.
//!
//! A package `a.b` lives at `root.package:a.b`; a type `C.D` of that package
//! at `root.package:a.b.type:C.D`.

use smol_str::SmolStr;

use super::error::IngestError;
use super::types::Primitive;
use crate::base::{
    qualifier, Identifier, IdentifierBuilder, IdentifierError, Segment, PATH_SEPARATOR,
    PREFIX_SEPARATOR, QUALIFIER_SEPARATOR,
};

/// Split a dotted declaration path, rejecting empty elements.
pub fn split_dotted(path: &str) -> Result<Vec<&str>, IngestError> {
    let parts: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if parts.iter().any(|p| p.trim().is_empty()) {
        return Err(IngestError::InvalidPath {
            path: SmolStr::new(path),
        });
    }
    Ok(parts)
}

/// Last element of a dotted path.
pub fn simple_name(path: &str) -> Result<&str, IngestError> {
    let parts = split_dotted(path)?;
    parts.last().copied().ok_or_else(|| IngestError::InvalidPath {
        path: SmolStr::new(path),
    })
}

/// Everything before the last element; empty for a simple name.
pub fn enclosing_path(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// `root.package:a.b` for `a.b`; the root itself for the default package.
pub fn package_id(root: &Identifier, package: &str) -> Result<Identifier, IdentifierError> {
    let mut builder = IdentifierBuilder::from(root);
    if !package.is_empty() {
        builder.push_path(qualifier::PACKAGE, package)?;
    }
    Ok(builder.build())
}

/// Address of the type `relative` (possibly nested, `Outer.Inner`) declared
/// in `package`.
pub fn type_id(
    root: &Identifier,
    package: &str,
    relative: &str,
) -> Result<Identifier, IdentifierError> {
    let mut builder = IdentifierBuilder::from(&package_id(root, package)?);
    builder.push_path(qualifier::TYPE, relative)?;
    Ok(builder.build())
}

pub fn primitive_id(
    root: &Identifier,
    primitive: Primitive,
) -> Result<Identifier, IdentifierError> {
    root.child(qualifier::PRIMITIVE, primitive.as_str())
}

/// The terminal marker for a name no lookup could qualify.
pub fn unqualified_id(root: &Identifier, raw: &str) -> Result<Identifier, IdentifierError> {
    root.child(qualifier::UNQUALIFIED, raw)
}

/// Reject a raw type name that no lookup outcome could address. Every
/// dotted element must be a valid fragment, which covers both the qualified
/// `type:` path and the `unqualified:` marker.
pub fn check_type_name(raw: &str) -> Result<(), IdentifierError> {
    for element in raw.split(PATH_SEPARATOR) {
        Segment::new(qualifier::TYPE, element)?;
    }
    Ok(())
}

/// `root.library:<name>`, with separators and `%` percent-escaped so that
/// names like `rt.jar` or `commons-lang-3.2` stay a single fragment.
pub fn library_id(root: &Identifier, name: &str) -> Result<Identifier, IdentifierError> {
    let mut fragment = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => fragment.push_str("%25"),
            PATH_SEPARATOR => fragment.push_str("%2E"),
            QUALIFIER_SEPARATOR => fragment.push_str("%3A"),
            PREFIX_SEPARATOR => fragment.push_str("%23"),
            c => fragment.push(c),
        }
    }
    root.child(qualifier::LIBRARY, &fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Identifier {
        Identifier::root(Some("ns")).unwrap()
    }

    #[test]
    fn test_package_and_type_ids() {
        assert_eq!(package_id(&root(), "a.b").unwrap().to_string(), "ns#package:a.b");
        assert_eq!(package_id(&root(), "").unwrap(), root());
        assert_eq!(
            type_id(&root(), "a.b", "Outer.Inner").unwrap().to_string(),
            "ns#package:a.b.type:Outer.Inner"
        );
        assert_eq!(type_id(&root(), "", "Top").unwrap().to_string(), "ns#type:Top");
    }

    #[test]
    fn test_markers() {
        assert_eq!(primitive_id(&root(), Primitive::Int).unwrap().to_string(), "ns#primitive:int");
        assert_eq!(unqualified_id(&root(), "Foo").unwrap().to_string(), "ns#unqualified:Foo");
    }

    #[test]
    fn test_check_type_name() {
        assert!(check_type_name("Foo").is_ok());
        assert!(check_type_name("java.util.Map.Entry").is_ok());
        assert!(check_type_name("Foo:Bar").is_err());
        assert!(check_type_name("a.b#C").is_err());
    }

    #[test]
    fn test_library_names_are_escaped() {
        assert_eq!(library_id(&root(), "rt.jar").unwrap().to_string(), "ns#library:rt%2Ejar");
        assert_eq!(library_id(&root(), "a:b#c").unwrap().to_string(), "ns#library:a%3Ab%23c");
        assert_ne!(
            library_id(&root(), "x%2Ey").unwrap(),
            library_id(&root(), "x.y").unwrap()
        );
    }

    #[test]
    fn test_split_rejects_empty_elements() {
        assert!(split_dotted("a..b").is_err());
        assert!(split_dotted("").is_err());
        assert_eq!(split_dotted("a.b").unwrap(), ["a", "b"]);
        assert_eq!(simple_name("p.C.f").unwrap(), "f");
        assert_eq!(enclosing_path("p.C.f"), "p.C");
        assert_eq!(enclosing_path("f"), "");
    }
}
