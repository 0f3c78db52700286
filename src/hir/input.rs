//! Compilation-unit input handed over by front-ends.

use smol_str::SmolStr;

/// One import declaration of a compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Import {
    /// `import a.b.C;`, one fully qualified type name.
    Single(SmolStr),
    /// `import a.b.*;`, every type of package `a.b`.
    Wildcard(SmolStr),
}

impl Import {
    /// Parse an import as written, with or without the trailing `.*`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim().trim_end_matches(';').trim_end();
        match text.strip_suffix(".*") {
            Some(package) => Import::Wildcard(SmolStr::new(package)),
            None => Import::Single(SmolStr::new(text)),
        }
    }

    /// The imported type or package name.
    pub fn target(&self) -> &str {
        match self {
            Import::Single(name) | Import::Wildcard(name) => name,
        }
    }
}

/// Split an import list into explicit names and wildcard packages, keeping
/// declaration order within each group.
pub fn partition_imports(imports: &[Import]) -> (Vec<SmolStr>, Vec<SmolStr>) {
    let mut singles = Vec::new();
    let mut wildcards = Vec::new();
    for import in imports {
        match import {
            Import::Single(name) => singles.push(name.clone()),
            Import::Wildcard(package) => wildcards.push(package.clone()),
        }
    }
    (singles, wildcards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import() {
        assert_eq!(Import::parse("java.util.List"), Import::Single("java.util.List".into()));
        assert_eq!(Import::parse("java.util.*;"), Import::Wildcard("java.util".into()));
        assert_eq!(Import::parse(" a.b.* "), Import::Wildcard("a.b".into()));
    }

    #[test]
    fn test_partition_keeps_order() {
        let imports = [
            Import::parse("a.*"),
            Import::parse("x.Y"),
            Import::parse("b.*"),
            Import::parse("z.W"),
        ];
        let (singles, wildcards) = partition_imports(&imports);
        assert_eq!(singles, ["x.Y", "z.W"]);
        assert_eq!(wildcards, ["a", "b"]);
    }
}
