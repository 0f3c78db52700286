//! Pre-scan of source and class trees on disk.

use std::fs;
use std::path::Path;

use jgraph::project::{prescan_paths, PrescanError};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_java_sources_use_package_line() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/com/acme/Widget.java",
        "package com.acme;\n\npublic class Widget {}\n",
    );
    write(
        dir.path(),
        "src/misplaced/Gadget.java",
        "// moved\npackage com.acme.tools;\nclass Gadget {}\n",
    );
    write(dir.path(), "src/Main.java", "public class Main {}\n");
    write(dir.path(), "src/com/acme/package-info.java", "package com.acme;\n");
    write(dir.path(), "src/README.md", "not java");

    let index = prescan_paths(&[dir.path()]).unwrap();

    assert_eq!(index.len(), 3);
    assert!(index.contains("com.acme", "Widget"));
    assert!(index.contains("com.acme.tools", "Gadget"));
    assert!(index.contains("", "Main"));
}

#[test]
fn test_class_files_use_relative_path() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "java/util/List.class", "\u{00ca}\u{00fe}");
    write(dir.path(), "java/util/Map.class", "");
    write(dir.path(), "java/util/Map$Entry.class", "");
    write(dir.path(), "java/util/HashMap$1.class", "");

    let index = prescan_paths(&[dir.path()]).unwrap();

    assert_eq!(index.len(), 2);
    assert!(index.contains("java.util", "List"));
    assert!(index.contains("java.util", "Map"));
    assert_eq!(index.packages().collect::<Vec<_>>(), ["java.util"]);
}

#[test]
fn test_multiple_roots_and_single_files() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(first.path(), "a/A.class", "");
    write(second.path(), "B.java", "package b;\nclass B {}\n");

    let single = second.path().join("B.java");
    let index = prescan_paths(&[first.path(), single.as_path()]).unwrap();

    assert!(index.contains("a", "A"));
    assert!(index.contains("b", "B"));
}

#[test]
fn test_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = prescan_paths(&[missing]).unwrap_err();
    assert!(matches!(err, PrescanError::NotFound { .. }));
}

#[cfg(feature = "archives")]
#[test]
fn test_jar_entries_become_types() {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib/rt.jar");
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut jar = zip::ZipWriter::new(fs::File::create(&path).unwrap());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for name in [
        "META-INF/MANIFEST.MF",
        "META-INF/versions/9/a/b/Shadow.class",
        "a/b/C.class",
        "a/b/C$Inner.class",
        "a/D.class",
        "module-info.class",
        "a/b/notes.txt",
    ] {
        jar.start_file(name, options).unwrap();
        jar.write_all(b"\xca\xfe\xba\xbe").unwrap();
    }
    jar.finish().unwrap();

    let index = prescan_paths(&[dir.path()]).unwrap();

    assert_eq!(index.len(), 2);
    assert!(index.contains("a.b", "C"));
    assert!(index.contains("a", "D"));
    assert!(!index.contains("a.b", "Shadow"));
}

#[cfg(feature = "archives")]
#[test]
fn test_corrupt_archive_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.jar", "not a zip file");

    let err = prescan_paths(&[dir.path()]).unwrap_err();
    assert!(matches!(err, PrescanError::Archive { .. }));
}
