//! Pre-scan of source and class trees.
//!
//! Before ingestion starts, a quick scan can tell the resolver which simple
//! type names exist in which packages. Forward references across the corpus
//! then qualify through the package symbol index just like types the front-end
//! has already declared.
//!
//! - `.java` files contribute their `package` line and the file stem.
//! - `.class` files contribute their path relative to the scanned root.
//!   Nested and anonymous classes (`Outer$Inner`) are skipped.
//! - `.jar` and `.zip` archives (feature `archives`) contribute the path of
//!   every `.class` entry, with the same skipping rules. `META-INF/` is
//!   ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum PrescanError {
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[cfg(feature = "archives")]
    #[error("cannot read archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

// ============================================================================
// Prescan Index
// ============================================================================

/// Simple type names found per package, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrescanIndex {
    packages: IndexMap<SmolStr, IndexSet<SmolStr, FxBuildHasher>, FxBuildHasher>,
}

impl PrescanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_package(&mut self, package: &str) {
        if !self.packages.contains_key(package) {
            self.packages.insert(SmolStr::new(package), IndexSet::default());
        }
    }

    /// Record `name` in `package`. Returns false for names that are not
    /// valid Java identifiers.
    pub fn insert(&mut self, package: &str, name: &str) -> bool {
        if !is_java_identifier(name) || !is_package_name(package) {
            return false;
        }
        self.declare_package(package);
        match self.packages.get_mut(package) {
            Some(names) => names.insert(SmolStr::new(name)),
            None => false,
        }
    }

    pub fn contains(&self, package: &str, name: &str) -> bool {
        self.packages
            .get(package)
            .is_some_and(|names| names.contains(name))
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(|p| p.as_str())
    }

    /// Every `(package, simple name)` pair.
    pub fn types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages
            .iter()
            .flat_map(|(package, names)| {
                names
                    .iter()
                    .map(move |name| (package.as_str(), name.as_str()))
            })
    }

    pub fn len(&self) -> usize {
        self.packages.values().map(|names| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn merge(&mut self, other: PrescanIndex) {
        for (package, names) in other.packages {
            self.declare_package(&package);
            if let Some(existing) = self.packages.get_mut(&package) {
                existing.extend(names);
            }
        }
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// A file found under one of the scanned roots.
#[derive(Clone, Debug)]
struct Candidate {
    root: PathBuf,
    path: PathBuf,
}

/// Scan directories (recursively) and single files for declared types.
pub fn prescan_paths<P: AsRef<Path>>(roots: &[P]) -> Result<PrescanIndex, PrescanError> {
    let mut candidates = Vec::new();
    for root in roots {
        let root = root.as_ref();
        if !root.exists() {
            return Err(PrescanError::NotFound {
                path: root.to_path_buf(),
            });
        }
        if root.is_file() {
            let parent = root.parent().map(Path::to_path_buf).unwrap_or_default();
            candidates.push(Candidate {
                root: parent,
                path: root.to_path_buf(),
            });
            continue;
        }
        candidates.extend(collect_candidates(root)?);
    }

    let found: Vec<Result<Vec<(String, String)>, PrescanError>> =
        candidates.par_iter().map(scan_candidate).collect();

    let mut index = PrescanIndex::new();
    for result in found {
        for (package, name) in result? {
            index.insert(&package, &name);
        }
    }
    debug!(
        files = candidates.len(),
        types = index.len(),
        "prescan finished"
    );
    Ok(index)
}

fn collect_candidates(root: &Path) -> Result<Vec<Candidate>, PrescanError> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || source_kind(entry.path()).is_none() {
            continue;
        }
        candidates.push(Candidate {
            root: root.to_path_buf(),
            path: entry.into_path(),
        });
    }
    Ok(candidates)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceKind {
    Java,
    Class,
    #[cfg(feature = "archives")]
    Archive,
}

fn source_kind(path: &Path) -> Option<SourceKind> {
    let extension = path.extension()?.to_str()?;
    match extension {
        "java" => Some(SourceKind::Java),
        "class" => Some(SourceKind::Class),
        #[cfg(feature = "archives")]
        _ if extension.eq_ignore_ascii_case("jar") || extension.eq_ignore_ascii_case("zip") => {
            Some(SourceKind::Archive)
        }
        _ => None,
    }
}

fn scan_candidate(candidate: &Candidate) -> Result<Vec<(String, String)>, PrescanError> {
    match source_kind(&candidate.path) {
        Some(SourceKind::Java) => {
            let Some(stem) = type_stem(&candidate.path) else {
                return Ok(Vec::new());
            };
            let text = fs::read_to_string(&candidate.path).map_err(|source| PrescanError::Io {
                path: candidate.path.clone(),
                source,
            })?;
            let package = package_declaration(&text).unwrap_or_default();
            Ok(vec![(package.to_string(), stem.to_string())])
        }
        Some(SourceKind::Class) => {
            let Ok(relative) = candidate.path.strip_prefix(&candidate.root) else {
                return Ok(Vec::new());
            };
            let elements: Vec<&str> = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect();
            Ok(class_entry(&elements).into_iter().collect())
        }
        #[cfg(feature = "archives")]
        Some(SourceKind::Archive) => scan_archive(&candidate.path),
        None => Ok(Vec::new()),
    }
}

/// File stem of a top-level type, `None` for nested classes and names that
/// are not Java identifiers (`package-info`, `module-info`).
fn type_stem(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    (!stem.contains('$') && is_java_identifier(stem)).then_some(stem)
}

/// `(package, name)` for a class file given as path elements relative to its
/// classpath root, e.g. `["a", "b", "C.class"]`.
fn class_entry(elements: &[&str]) -> Option<(String, String)> {
    let (file, dirs) = elements.split_last()?;
    let stem = type_stem(Path::new(file))?;
    Some((dirs.join("."), stem.to_string()))
}

#[cfg(feature = "archives")]
fn scan_archive(path: &Path) -> Result<Vec<(String, String)>, PrescanError> {
    use std::io::BufReader;

    let file = fs::File::open(path).map_err(|source| PrescanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let archive_error = |source| PrescanError::Archive {
        path: path.to_path_buf(),
        source,
    };
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(archive_error)?;

    let mut found = Vec::new();
    for idx in 0..archive.len() {
        let entry = archive.by_index(idx).map_err(archive_error)?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name();
        if name.starts_with("META-INF/") || !name.ends_with(".class") {
            continue;
        }
        let elements: Vec<&str> = name.split('/').collect();
        found.extend(class_entry(&elements));
    }
    debug!(archive = %path.display(), types = found.len(), "archive scanned");
    Ok(found)
}

/// The package named by the first `package` declaration, if any.
pub fn package_declaration(source: &str) -> Option<&str> {
    let mut in_comment = false;
    for line in source.lines() {
        let mut line = line.trim();
        if in_comment {
            match line.find("*/") {
                Some(end) => {
                    in_comment = false;
                    line = line[end + 2..].trim();
                }
                None => continue,
            }
        }
        if line.starts_with("/*") {
            match line.find("*/") {
                Some(end) => line = line[end + 2..].trim(),
                None => {
                    in_comment = true;
                    continue;
                }
            }
        }
        if line.is_empty() || line.starts_with("//") || line.starts_with('@') {
            continue;
        }
        let rest = line.strip_prefix("package")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let name = rest.split(';').next()?.trim();
        return is_package_name(name).then_some(name);
    }
    None
}

fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if unicode_ident::is_xid_start(first) || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$')
}

/// Empty (default package) or dotted Java identifiers.
fn is_package_name(package: &str) -> bool {
    package.is_empty() || package.split('.').all(is_java_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("package a.b;\nclass C {}", Some("a.b"))]
    #[case("// header\n\npackage  x ;\n", Some("x"))]
    #[case("/* licence\n * text\n */\npackage p.q;", Some("p.q"))]
    #[case("@Generated\npackage p;", Some("p"))]
    #[case("import java.util.List;\nclass C {}", None)]
    #[case("class C {}", None)]
    #[case("packages.are.not;", None)]
    fn test_package_declaration(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(package_declaration(source), expected);
    }

    #[rstest]
    #[case("Foo", true)]
    #[case("_bar", true)]
    #[case("Größe", true)]
    #[case("package-info", false)]
    #[case("1abc", false)]
    #[case("", false)]
    fn test_java_identifier(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_java_identifier(name), valid);
    }

    #[rstest]
    #[case(&["a", "b", "C.class"], Some(("a.b", "C")))]
    #[case(&["Top.class"], Some(("", "Top")))]
    #[case(&["a", "Outer$Inner.class"], None)]
    #[case(&["module-info.class"], None)]
    fn test_class_entry(#[case] elements: &[&str], #[case] expected: Option<(&str, &str)>) {
        let found = class_entry(elements);
        assert_eq!(
            found.as_ref().map(|(p, n)| (p.as_str(), n.as_str())),
            expected
        );
    }

    #[test]
    fn test_index_insert_and_merge() {
        let mut index = PrescanIndex::new();
        assert!(index.insert("a", "A"));
        assert!(!index.insert("a", "A"));
        assert!(!index.insert("a", "not-valid"));

        let mut other = PrescanIndex::new();
        other.insert("b", "B");
        other.insert("a", "A2");
        index.merge(other);

        assert_eq!(index.len(), 3);
        assert!(index.contains("a", "A2"));
        assert_eq!(
            index.types().collect::<Vec<_>>(),
            [("a", "A"), ("a", "A2"), ("b", "B")]
        );
    }
}
