//! Name resolution for type references.
//!
//! A type name written at a declaration site is qualified against the
//! compilation unit's import context and the package symbol index. What can
//! be qualified on the spot is written directly; everything else gets a
//! placeholder and waits for the resolution pass at the end of the run.
//!
//! ## Lookup order
//!
//! 1. A dotted name is fully qualified and accepted as is
//! 2. An explicit import whose last element equals the name (first match wins)
//! 3. A type declared directly in the unit's own package
//! 4. Wildcard-imported packages in declaration order (first match wins)
//! 5. Otherwise the name stays unqualified
//!
//! Steps 1-3 may run while ingestion is still in progress. Step 4 only runs
//! in the final pass, so a type declared later in the unit's own package
//! still takes priority over a wildcard import.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::error::IngestError;
use super::ids::PlaceholderMint;
use super::paths;
use crate::base::{Identifier, IdentifierError, PATH_SEPARATOR};
use crate::graph::{GraphError, GraphStore, Node, Triple, TriplePattern};

// ============================================================================
// PACKAGE SYMBOL INDEX
// ============================================================================

type Names = IndexMap<SmolStr, Identifier, FxBuildHasher>;

/// Types declared directly in each package, keyed by their name relative to
/// the package (`Outer` and `Outer.Inner` for a nested type).
#[derive(Clone, Debug)]
pub struct PackageSymbolIndex {
    root: Identifier,
    packages: IndexMap<SmolStr, Names, FxBuildHasher>,
}

impl PackageSymbolIndex {
    pub fn new(root: Identifier) -> Self {
        Self {
            root,
            packages: IndexMap::default(),
        }
    }

    pub fn root(&self) -> &Identifier {
        &self.root
    }

    /// Record that `package` exists, even if no type is known in it yet.
    pub fn declare_package(&mut self, package: &str) {
        if !self.packages.contains_key(package) {
            self.packages.insert(SmolStr::new(package), Names::default());
        }
    }

    /// Register the type `relative` of `package` and return its address.
    pub fn declare(
        &mut self,
        package: &str,
        relative: &str,
    ) -> Result<Identifier, IdentifierError> {
        if let Some(existing) = self.lookup(package, relative) {
            return Ok(existing.clone());
        }
        let id = paths::type_id(&self.root, package, relative)?;
        self.declare_package(package);
        if let Some(names) = self.packages.get_mut(package) {
            names.insert(SmolStr::new(relative), id.clone());
        }
        Ok(id)
    }

    /// Address of `name` if it is declared directly in `package`.
    pub fn lookup(&self, package: &str, name: &str) -> Option<&Identifier> {
        self.packages.get(package)?.get(name)
    }

    pub fn contains(&self, package: &str, name: &str) -> bool {
        self.lookup(package, name).is_some()
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    /// Known package names in registration order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(|k| k.as_str())
    }

    /// Number of registered types across all packages.
    pub fn len(&self) -> usize {
        self.packages.values().map(|names| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.packages.clear();
    }

    /// Split a fully qualified type name into package and relative name.
    ///
    /// A registered type wins, then the longest registered package. For
    /// names the index knows nothing about, the first capitalized element
    /// starts the type path; without one, the last element is the type.
    pub fn split_qualified<'a>(&self, qualified: &'a str) -> (&'a str, &'a str) {
        let cuts: Vec<usize> = qualified
            .match_indices(PATH_SEPARATOR)
            .map(|(idx, _)| idx)
            .collect();

        for &cut in cuts.iter().rev() {
            let (package, relative) = (&qualified[..cut], &qualified[cut + 1..]);
            if self.contains(package, relative) {
                return (package, relative);
            }
        }
        for &cut in cuts.iter().rev() {
            if self.has_package(&qualified[..cut]) {
                return (&qualified[..cut], &qualified[cut + 1..]);
            }
        }

        let mut start = 0;
        for element in qualified.split(PATH_SEPARATOR) {
            if element.chars().next().is_some_and(char::is_uppercase) {
                return match start {
                    0 => ("", qualified),
                    _ => (&qualified[..start - 1], &qualified[start..]),
                };
            }
            start += element.len() + 1;
        }
        match cuts.last() {
            Some(&cut) => (&qualified[..cut], &qualified[cut + 1..]),
            None => ("", qualified),
        }
    }

    /// Address for a fully qualified name. Unregistered names are only
    /// accepted by a complete lookup, since the split may change once more
    /// packages are known.
    fn qualified_id(
        &self,
        qualified: &str,
        lookup: Lookup,
    ) -> Result<Option<Identifier>, IdentifierError> {
        let (package, relative) = self.split_qualified(qualified);
        match (self.lookup(package, relative), lookup) {
            (Some(id), _) => Ok(Some(id.clone())),
            (None, Lookup::Complete) => paths::type_id(&self.root, package, relative).map(Some),
            (None, Lookup::Immediate) => Ok(None),
        }
    }

    /// Qualify `raw` in `context`.
    ///
    /// With [`Lookup::Immediate`] the wildcard step is skipped, and qualified
    /// names must already be registered. Anything else comes back
    /// [`Resolution::Unqualified`] and should be deferred.
    pub fn qualify(
        &self,
        raw: &str,
        context: &ImportContext,
        lookup: Lookup,
    ) -> Result<Resolution, IdentifierError> {
        if raw.contains(PATH_SEPARATOR) {
            return Ok(match self.qualified_id(raw, lookup)? {
                Some(id) => Resolution::Resolved {
                    id,
                    via: ResolvedVia::FullyQualified,
                },
                None => Resolution::Unqualified,
            });
        }

        let explicit = context.imports.iter().find(|import| {
            import.rsplit(PATH_SEPARATOR).next() == Some(raw)
        });
        if let Some(import) = explicit {
            return Ok(match self.qualified_id(import, lookup)? {
                Some(id) => Resolution::Resolved {
                    id,
                    via: ResolvedVia::ExplicitImport,
                },
                None => Resolution::Unqualified,
            });
        }

        if let Some(id) = self.lookup(&context.package, raw) {
            return Ok(Resolution::Resolved {
                id: id.clone(),
                via: ResolvedVia::OwnPackage,
            });
        }

        if lookup == Lookup::Complete {
            for package in context.wildcards.iter() {
                if let Some(id) = self.lookup(package, raw) {
                    return Ok(Resolution::Resolved {
                        id: id.clone(),
                        via: ResolvedVia::WildcardImport,
                    });
                }
            }
        }

        Ok(Resolution::Unqualified)
    }
}

// ============================================================================
// IMPORT CONTEXT & OUTCOMES
// ============================================================================

/// Name-resolution context of one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportContext {
    /// Package the unit declares; empty for the default package.
    pub package: SmolStr,
    /// Explicitly imported type names, fully qualified.
    pub imports: Arc<[SmolStr]>,
    /// Wildcard-imported packages, implicit ones last.
    pub wildcards: Arc<[SmolStr]>,
}

impl ImportContext {
    pub fn new(
        package: impl Into<SmolStr>,
        imports: Vec<SmolStr>,
        wildcards: Vec<SmolStr>,
    ) -> Self {
        Self {
            package: package.into(),
            imports: imports.into(),
            wildcards: wildcards.into(),
        }
    }

    /// Same imports, different package.
    pub fn in_package(&self, package: &str) -> Self {
        Self {
            package: SmolStr::new(package),
            imports: Arc::clone(&self.imports),
            wildcards: Arc::clone(&self.wildcards),
        }
    }
}

/// Which lookup steps [`PackageSymbolIndex::qualify`] may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Steps that cannot be overturned by declarations seen later.
    Immediate,
    /// Every step, wildcards included.
    Complete,
}

/// The lookup step that produced a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedVia {
    FullyQualified,
    ExplicitImport,
    OwnPackage,
    WildcardImport,
}

/// Outcome of qualifying one raw name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved { id: Identifier, via: ResolvedVia },
    Unqualified,
}

impl Resolution {
    pub fn id(&self) -> Option<&Identifier> {
        match self {
            Resolution::Resolved { id, .. } => Some(id),
            Resolution::Unqualified => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// A placeholder waiting for the resolution pass.
#[derive(Clone, Debug)]
pub struct UnresolvedEntry {
    /// Type name as written.
    pub raw: SmolStr,
    pub placeholder: Identifier,
    /// Declaration whose edge holds the placeholder.
    pub slot: Identifier,
    pub context: ImportContext,
}

/// Summary of one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Entries resolved to a declared or fully qualified type.
    pub resolved: usize,
    /// Entries that ended on an `unqualified:` marker.
    pub unqualified: usize,
    /// Edges rewritten by backpatching.
    pub rewritten_edges: usize,
    /// Distinct raw names that stayed unresolved, in first-seen order.
    pub unresolved_names: Vec<SmolStr>,
}

// ============================================================================
// OBJECTS TABLE
// ============================================================================

/// Session-owned placeholder bookkeeping: the mint and the pending entries.
#[derive(Clone, Debug)]
pub struct ObjectsTable {
    mint: PlaceholderMint,
    pending: VecDeque<UnresolvedEntry>,
}

impl ObjectsTable {
    pub fn new(root: Identifier) -> Self {
        Self {
            mint: PlaceholderMint::new(root),
            pending: VecDeque::new(),
        }
    }

    /// Mint a placeholder for `raw` at `slot` and queue it for resolution.
    pub fn defer(
        &mut self,
        raw: &str,
        slot: &Identifier,
        context: &ImportContext,
    ) -> Result<Identifier, IdentifierError> {
        let placeholder = self.mint.mint()?;
        trace!(raw, %placeholder, %slot, "deferring type reference");
        self.pending.push_back(UnresolvedEntry {
            raw: SmolStr::new(raw),
            placeholder: placeholder.clone(),
            slot: slot.clone(),
            context: context.clone(),
        });
        Ok(placeholder)
    }

    /// Number of entries still waiting.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn minted(&self) -> u64 {
        self.mint.minted()
    }

    /// Drop pending entries and start a fresh mint session.
    pub fn reset(&mut self, root: Identifier) {
        self.mint = PlaceholderMint::new(root);
        self.pending.clear();
    }

    /// Resolve and backpatch every pending entry, in the order they were
    /// queued. Each entry is consumed; a second call finds nothing to do.
    ///
    /// If the store fails, the failing entry is put back and the error is
    /// returned; entries already processed stay resolved.
    pub fn resolve_all<G>(
        &mut self,
        graph: &mut G,
        index: &PackageSymbolIndex,
    ) -> Result<ResolutionReport, IngestError>
    where
        G: GraphStore + ?Sized,
    {
        let mut report = ResolutionReport::default();
        let mut unresolved: IndexSet<SmolStr, FxBuildHasher> = IndexSet::default();

        while let Some(entry) = self.pending.pop_front() {
            let outcome = match index.qualify(&entry.raw, &entry.context, Lookup::Complete) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.pending.push_front(entry);
                    return Err(err.into());
                }
            };
            let target = match &outcome {
                Resolution::Resolved { id, via } => {
                    trace!(raw = %entry.raw, %id, ?via, "resolved");
                    id.clone()
                }
                Resolution::Unqualified => {
                    trace!(raw = %entry.raw, slot = %entry.slot, "no declaration found");
                    match paths::unqualified_id(index.root(), &entry.raw) {
                        Ok(id) => id,
                        Err(err) => {
                            self.pending.push_front(entry);
                            return Err(err.into());
                        }
                    }
                }
            };

            let rewritten = match backpatch(graph, &entry.placeholder, &target) {
                Ok(rewritten) => rewritten,
                Err(err) => {
                    self.pending.push_front(entry);
                    return Err(err.into());
                }
            };
            report.rewritten_edges += rewritten;
            if outcome.is_resolved() {
                report.resolved += 1;
            } else {
                report.unqualified += 1;
                unresolved.insert(entry.raw);
            }
        }

        report.unresolved_names = unresolved.into_iter().collect();
        debug!(
            resolved = report.resolved,
            unqualified = report.unqualified,
            edges = report.rewritten_edges,
            "resolution pass finished"
        );
        Ok(report)
    }
}

// ============================================================================
// BACKPATCH
// ============================================================================

/// Replace `from` with `to` in every edge that mentions it, as subject or as
/// object. Predicates and the other endpoint are kept. Returns the number of
/// edges rewritten.
pub fn backpatch<G>(graph: &mut G, from: &Identifier, to: &Identifier) -> Result<usize, GraphError>
where
    G: GraphStore + ?Sized,
{
    let mut rewritten = 0;

    // Self-loops are rewritten here, so the object pass no longer sees them.
    let outgoing = graph.collect(&TriplePattern::new().subject(from.clone()))?;
    for triple in outgoing {
        graph.remove(&triple)?;
        let object = match triple.object {
            Node::Resource(ref object) if object == from => Node::Resource(to.clone()),
            object => object,
        };
        graph.insert(&Triple::new(to.clone(), triple.predicate, object))?;
        rewritten += 1;
    }

    let incoming = graph.collect(&TriplePattern::new().object(from))?;
    for triple in incoming {
        graph.remove(&triple)?;
        graph.add_edge(&triple.subject, &triple.predicate, to)?;
        rewritten += 1;
    }

    Ok(rewritten)
}
