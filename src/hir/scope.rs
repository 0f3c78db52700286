//! Scope stacks of an ingestion session.

use smol_str::SmolStr;

use crate::base::Identifier;
use crate::graph::EntityKind;

/// A package opened by `start_package`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenPackage {
    pub id: Identifier,
    /// Dotted package name, e.g. `java.util`.
    pub path: SmolStr,
}

/// A class, interface or enumeration opened by `start_*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenContainer {
    pub id: Identifier,
    pub kind: EntityKind,
    /// Path as declared by the front-end, e.g. `p.Outer.Inner`.
    pub path: SmolStr,
    /// Package the container was registered in.
    pub package: SmolStr,
    /// Name relative to that package, e.g. `Outer.Inner`.
    pub relative: SmolStr,
}

/// The two independent stacks that decide where new declarations attach.
///
/// The current address is the innermost open container, else the innermost
/// open package, else the root.
#[derive(Clone, Debug)]
pub struct Scope {
    root: Identifier,
    packages: Vec<OpenPackage>,
    containers: Vec<OpenContainer>,
}

impl Scope {
    /// Empty stacks over `root`.
    pub fn new(root: Identifier) -> Self {
        Self {
            root,
            packages: Vec::new(),
            containers: Vec::new(),
        }
    }

    pub fn root(&self) -> &Identifier {
        &self.root
    }

    /// Address new declarations attach under.
    pub fn current(&self) -> &Identifier {
        if let Some(container) = self.containers.last() {
            return &container.id;
        }
        if let Some(package) = self.packages.last() {
            return &package.id;
        }
        &self.root
    }

    /// Dotted path of the current address; empty at the root.
    pub fn current_path(&self) -> &str {
        if let Some(container) = self.containers.last() {
            return &container.path;
        }
        self.current_package()
    }

    /// Package that encloses the current address; empty for the default
    /// package.
    pub fn current_package(&self) -> &str {
        if let Some(container) = self.containers.last() {
            return &container.package;
        }
        self.packages.last().map(|p| p.path.as_str()).unwrap_or("")
    }

    pub fn push_package(&mut self, package: OpenPackage) {
        self.packages.push(package);
    }

    pub fn pop_package(&mut self) -> Option<OpenPackage> {
        self.packages.pop()
    }

    pub fn push_container(&mut self, container: OpenContainer) {
        self.containers.push(container);
    }

    pub fn pop_container(&mut self) -> Option<OpenContainer> {
        self.containers.pop()
    }

    pub fn innermost_container(&self) -> Option<&OpenContainer> {
        self.containers.last()
    }

    /// True when both stacks are empty.
    pub fn is_balanced(&self) -> bool {
        self.packages.is_empty() && self.containers.is_empty()
    }

    /// Describe the innermost still-open entity, if any.
    pub fn describe_open(&self) -> Option<String> {
        if let Some(container) = self.containers.last() {
            return Some(format!("{} '{}'", container.kind, container.path));
        }
        self.packages
            .last()
            .map(|package| format!("package '{}'", package.path))
    }

    /// Drop every open entry.
    pub fn clear(&mut self) {
        self.packages.clear();
        self.containers.clear();
    }
}
