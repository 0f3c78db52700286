//! Typed navigation over an indexed graph.
//!
//! Every query is a pattern search keyed by identifier and kind edges. The
//! facade never writes.

use smol_str::SmolStr;
use thiserror::Error;

use super::model::{
    java_path, split_overload, AttributeView, InvocableView, LibraryView, PackageView,
    ParameterView, TypeRef, TypeView, UnqualifiedReference,
};
use crate::base::{qualifier, Identifier, IdentifierError, PATH_SEPARATOR};
use crate::config::IndexerConfig;
use crate::graph::{vocab, EntityKind, GraphError, GraphStore, Node, Triple, TriplePattern};
use crate::hir::{is_placeholder, package_id, type_id, Modifier, Visibility};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Read-only query facade over a graph store.
pub struct CodeModel<'g, G: GraphStore + ?Sized> {
    graph: &'g G,
    root: Identifier,
}

impl<'g, G: GraphStore + ?Sized> CodeModel<'g, G> {
    pub fn new(graph: &'g G, root: Identifier) -> Self {
        Self { graph, root }
    }

    /// Facade over the namespace `config` writes into.
    pub fn with_config(graph: &'g G, config: &IndexerConfig) -> QueryResult<Self> {
        Ok(Self::new(graph, Identifier::root(config.namespace.as_deref())?))
    }

    pub fn root(&self) -> &Identifier {
        &self.root
    }

    // ========================================================================
    // EXISTENCE
    // ========================================================================

    pub fn kind_of(&self, id: &Identifier) -> QueryResult<Option<EntityKind>> {
        Ok(self
            .literals(id, vocab::KIND)?
            .iter()
            .find_map(|value| EntityKind::parse(value)))
    }

    pub fn package_exists(&self, path: &str) -> QueryResult<bool> {
        let id = package_id(&self.root, path)?;
        self.has_kind(&id, EntityKind::Package)
    }

    pub fn class_exists(&self, id: &Identifier) -> QueryResult<bool> {
        self.has_kind(id, EntityKind::Class)
    }

    pub fn interface_exists(&self, id: &Identifier) -> QueryResult<bool> {
        self.has_kind(id, EntityKind::Interface)
    }

    pub fn enumeration_exists(&self, id: &Identifier) -> QueryResult<bool> {
        self.has_kind(id, EntityKind::Enumeration)
    }

    fn has_kind(&self, id: &Identifier, kind: EntityKind) -> QueryResult<bool> {
        Ok(self.graph.contains(
            &TriplePattern::new()
                .subject(id.clone())
                .predicate(vocab::KIND)
                .object(kind.marker()),
        )?)
    }

    // ========================================================================
    // PACKAGES & TYPES
    // ========================================================================

    /// Every package in the graph, in insertion order.
    pub fn packages(&self) -> QueryResult<Vec<PackageView>> {
        Ok(self
            .subjects_of_kind(EntityKind::Package)?
            .into_iter()
            .map(|id| PackageView {
                name: id.dotted_path_of(|s| s.qualifier() == qualifier::PACKAGE),
                id,
            })
            .collect())
    }

    /// Every class, interface and enumeration.
    pub fn types(&self) -> QueryResult<Vec<TypeView>> {
        let mut views = Vec::new();
        for kind in [EntityKind::Class, EntityKind::Interface, EntityKind::Enumeration] {
            for id in self.subjects_of_kind(kind)? {
                views.push(self.build_type(id, kind)?);
            }
        }
        Ok(views)
    }

    /// Top-level types of the package `path`.
    pub fn types_in_package(&self, path: &str) -> QueryResult<Vec<TypeView>> {
        let package = package_id(&self.root, path)?;
        self.contained_types(&package)
    }

    /// Look a type up by its Java name, e.g. `java.util.Map.Entry`.
    pub fn find_type(&self, path: &str) -> QueryResult<Option<TypeView>> {
        let mut cuts: Vec<usize> = path.match_indices(PATH_SEPARATOR).map(|(idx, _)| idx).collect();
        cuts.reverse();
        let splits = cuts
            .into_iter()
            .map(|cut| (&path[..cut], &path[cut + 1..]))
            .chain(std::iter::once(("", path)));
        for (package, relative) in splits {
            let Ok(id) = type_id(&self.root, package, relative) else {
                continue;
            };
            if let Some(view) = self.type_view(&id)? {
                return Ok(Some(view));
            }
        }
        Ok(None)
    }

    /// View of the type at `id`, if `id` is a class, interface or enumeration.
    pub fn type_view(&self, id: &Identifier) -> QueryResult<Option<TypeView>> {
        match self.kind_of(id)? {
            Some(kind) if kind.is_container() => Ok(Some(self.build_type(id.clone(), kind)?)),
            _ => Ok(None),
        }
    }

    /// Types declared inside another type.
    pub fn inner_types_of(&self, container: &Identifier) -> QueryResult<Vec<TypeView>> {
        self.contained_types(container)
    }

    /// Types whose `extends` edge points at `id`.
    pub fn subtypes_of(&self, id: &Identifier) -> QueryResult<Vec<TypeView>> {
        self.types_pointing_at(id, vocab::EXTENDS)
    }

    /// Types whose `implements` edge points at `id`.
    pub fn implementors_of(&self, id: &Identifier) -> QueryResult<Vec<TypeView>> {
        self.types_pointing_at(id, vocab::IMPLEMENTS)
    }

    pub fn elements_of(&self, enumeration: &Identifier) -> QueryResult<Vec<SmolStr>> {
        Ok(self
            .objects(enumeration, vocab::CONTAINS_ELEMENT)?
            .iter()
            .filter_map(|element| element.tail().map(|s| SmolStr::new(s.fragment())))
            .collect())
    }

    // ========================================================================
    // MEMBERS
    // ========================================================================

    pub fn attributes_of(&self, container: &Identifier) -> QueryResult<Vec<AttributeView>> {
        let mut views = Vec::new();
        for id in self.children(container, EntityKind::Attribute)? {
            views.push(AttributeView {
                name: fragment(&id),
                visibility: self.visibility(&id)?,
                modifiers: self.modifiers(&id)?,
                ty: self.type_ref(&id, vocab::TYPE)?,
                default_value: self.literal(&id, vocab::DEFAULT_VALUE)?,
                id,
            });
        }
        Ok(views)
    }

    pub fn methods_of(&self, container: &Identifier) -> QueryResult<Vec<InvocableView>> {
        self.invocables(container, EntityKind::Method)
    }

    pub fn constructors_of(&self, container: &Identifier) -> QueryResult<Vec<InvocableView>> {
        self.invocables(container, EntityKind::Constructor)
    }

    /// Parameters of a method or constructor, ordered by position.
    pub fn parameters_of(&self, invocable: &Identifier) -> QueryResult<Vec<ParameterView>> {
        let mut views = Vec::new();
        for signature in self.objects(invocable, vocab::SIGNATURE)? {
            for id in self.objects(&signature, vocab::PARAMETER)? {
                let position = self
                    .literal(&id, vocab::POSITION)?
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(usize::MAX);
                views.push(ParameterView {
                    name: fragment(&id),
                    position,
                    ty: self.type_ref(&id, vocab::TYPE)?,
                    id,
                });
            }
        }
        views.sort_by_key(|p| p.position);
        Ok(views)
    }

    fn invocables(
        &self,
        container: &Identifier,
        kind: EntityKind,
    ) -> QueryResult<Vec<InvocableView>> {
        let mut views = Vec::new();
        for id in self.children(container, kind)? {
            let (name, overload) = split_overload(&fragment(&id));
            let returns = match self.objects(&id, vocab::SIGNATURE)?.first() {
                Some(signature) if kind == EntityKind::Method => {
                    self.type_ref(signature, vocab::RETURNS)?
                }
                _ => None,
            };
            views.push(InvocableView {
                kind,
                name,
                overload,
                visibility: self.visibility(&id)?,
                modifiers: self.modifiers(&id)?,
                parameters: self.parameters_of(&id)?,
                returns,
                throws: self
                    .objects(&id, vocab::THROWS)?
                    .into_iter()
                    .map(|target| TypeRef { target, dimensions: 0 })
                    .collect(),
                id,
            });
        }
        Ok(views)
    }

    // ========================================================================
    // RESOLUTION STATE & LIBRARIES
    // ========================================================================

    /// Edges whose object is an `unqualified:` marker.
    pub fn unqualified_references(&self) -> QueryResult<Vec<UnqualifiedReference>> {
        self.references_where(|target| target.strongest_qualifier() == Some(qualifier::UNQUALIFIED))
    }

    /// Edges still pointing at a placeholder. Empty after a completed run.
    pub fn placeholder_references(&self) -> QueryResult<Vec<UnqualifiedReference>> {
        self.references_where(is_placeholder)
    }

    pub fn libraries(&self) -> QueryResult<Vec<LibraryView>> {
        let mut views = Vec::new();
        for id in self.subjects_of_kind(EntityKind::Library)? {
            views.push(LibraryView {
                name: self.literal(&id, vocab::LIBRARY_NAME)?.unwrap_or_else(|| fragment(&id)),
                location: self.literal(&id, vocab::LIBRARY_LOCATION)?,
                completed_at: self.literal(&id, vocab::COMPLETED_AT)?,
                id,
            });
        }
        Ok(views)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn build_type(&self, id: Identifier, kind: EntityKind) -> QueryResult<TypeView> {
        let elements = match kind {
            EntityKind::Enumeration => self.elements_of(&id)?,
            _ => Vec::new(),
        };
        Ok(TypeView {
            kind,
            path: java_path(&id),
            package: id.dotted_path_of(|s| s.qualifier() == qualifier::PACKAGE),
            visibility: self.visibility(&id)?,
            modifiers: self.modifiers(&id)?,
            extends: self.type_refs(&id, vocab::EXTENDS)?,
            implements: self.type_refs(&id, vocab::IMPLEMENTS)?,
            elements,
            id,
        })
    }

    fn contained_types(&self, parent: &Identifier) -> QueryResult<Vec<TypeView>> {
        let mut views = Vec::new();
        for id in self.objects(parent, vocab::CONTAINS)? {
            if let Some(view) = self.type_view(&id)? {
                views.push(view);
            }
        }
        Ok(views)
    }

    fn types_pointing_at(
        &self,
        target: &Identifier,
        predicate: &str,
    ) -> QueryResult<Vec<TypeView>> {
        let matches = self
            .graph
            .collect(&TriplePattern::new().predicate(predicate).object(target))?;
        let mut views = Vec::new();
        for triple in matches {
            if let Some(view) = self.type_view(&triple.subject)? {
                views.push(view);
            }
        }
        Ok(views)
    }

    fn references_where(
        &self,
        keep: impl Fn(&Identifier) -> bool,
    ) -> QueryResult<Vec<UnqualifiedReference>> {
        Ok(self
            .graph
            .search(&TriplePattern::new())?
            .filter_map(|triple: Triple| {
                let target = triple.object.as_resource()?;
                if !keep(target) {
                    return None;
                }
                let name = SmolStr::new(target.tail()?.fragment());
                Some(UnqualifiedReference {
                    slot: triple.subject,
                    predicate: triple.predicate,
                    name,
                })
            })
            .collect())
    }

    fn subjects_of_kind(&self, kind: EntityKind) -> QueryResult<Vec<Identifier>> {
        Ok(self
            .graph
            .search(&TriplePattern::new().predicate(vocab::KIND).object(kind.marker()))?
            .map(|triple| triple.subject)
            .collect())
    }

    /// Objects of `parent --contains-->` edges that have `kind`.
    fn children(&self, parent: &Identifier, kind: EntityKind) -> QueryResult<Vec<Identifier>> {
        let mut children = Vec::new();
        for id in self.objects(parent, vocab::CONTAINS)? {
            if self.has_kind(&id, kind)? {
                children.push(id);
            }
        }
        Ok(children)
    }

    fn objects(&self, subject: &Identifier, predicate: &str) -> QueryResult<Vec<Identifier>> {
        Ok(self
            .graph
            .search(&TriplePattern::new().subject(subject.clone()).predicate(predicate))?
            .filter_map(|triple| match triple.object {
                Node::Resource(id) => Some(id),
                Node::Literal(_) => None,
            })
            .collect())
    }

    fn literals(&self, subject: &Identifier, predicate: &str) -> QueryResult<Vec<SmolStr>> {
        Ok(self
            .graph
            .search(&TriplePattern::new().subject(subject.clone()).predicate(predicate))?
            .filter_map(|triple| match triple.object {
                Node::Literal(value) => Some(value),
                Node::Resource(_) => None,
            })
            .collect())
    }

    fn literal(&self, subject: &Identifier, predicate: &str) -> QueryResult<Option<SmolStr>> {
        Ok(self.literals(subject, predicate)?.into_iter().next())
    }

    fn visibility(&self, id: &Identifier) -> QueryResult<Option<Visibility>> {
        Ok(self
            .literals(id, vocab::VISIBILITY)?
            .iter()
            .find_map(|value| Visibility::parse(value)))
    }

    fn modifiers(&self, id: &Identifier) -> QueryResult<Vec<Modifier>> {
        Ok(self
            .literals(id, vocab::MODIFIER)?
            .iter()
            .filter_map(|value| Modifier::parse(value))
            .collect())
    }

    fn type_ref(&self, slot: &Identifier, predicate: &str) -> QueryResult<Option<TypeRef>> {
        let Some(target) = self.objects(slot, predicate)?.into_iter().next() else {
            return Ok(None);
        };
        let dimensions = self
            .literal(slot, &vocab::dimensions_of(predicate))?
            .and_then(|d| d.parse().ok())
            .unwrap_or(0);
        Ok(Some(TypeRef { target, dimensions }))
    }

    fn type_refs(&self, slot: &Identifier, predicate: &str) -> QueryResult<Vec<TypeRef>> {
        Ok(self
            .objects(slot, predicate)?
            .into_iter()
            .map(|target| TypeRef { target, dimensions: 0 })
            .collect())
    }
}

fn fragment(id: &Identifier) -> SmolStr {
    id.tail().map(|s| SmolStr::new(s.fragment())).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use crate::hir::{CodeHandler, JavaType, Primitive};

    fn config() -> IndexerConfig {
        IndexerConfig::new().with_namespace("ns")
    }

    fn id(text: &str) -> Identifier {
        Identifier::parse(text).unwrap()
    }

    fn sample_graph() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        let mut handler = CodeHandler::new(&mut graph, config()).unwrap();
        handler.start_parsing("lib", "/tmp/lib").unwrap();
        handler.start_package("p").unwrap();
        handler
            .start_interface(&[], Visibility::Public, "p.Shape", &[])
            .unwrap();
        handler.end_interface().unwrap();
        handler
            .start_class(&[Modifier::Abstract], Visibility::Public, "p.Base", None, &[])
            .unwrap();
        handler
            .constructor(&[], Visibility::Protected, 0, &[], &[], &[])
            .unwrap();
        handler.end_class().unwrap();
        handler
            .start_class(
                &[],
                Visibility::Public,
                "p.Circle",
                Some(JavaType::named("Base")),
                &[JavaType::named("Shape")],
            )
            .unwrap();
        handler
            .method(
                &[],
                Visibility::Public,
                "p.Circle.scale",
                0,
                &["by", "times"],
                &[Primitive::Double.into(), JavaType::named("int[]")],
                &JavaType::named("Circle"),
                &[JavaType::named("Missing")],
            )
            .unwrap();
        handler
            .start_enumeration(&[], Visibility::Public, "p.Circle.Mode", &[], &["FILL", "STROKE"])
            .unwrap();
        handler.end_enumeration().unwrap();
        handler.end_class().unwrap();
        handler.end_package().unwrap();
        handler.end_parsing().unwrap();
        graph
    }

    #[test]
    fn test_existence_checks() {
        let graph = sample_graph();
        let model = CodeModel::with_config(&graph, &config()).unwrap();

        assert!(model.package_exists("p").unwrap());
        assert!(!model.package_exists("q").unwrap());
        assert!(model.interface_exists(&id("ns#package:p.type:Shape")).unwrap());
        assert!(!model.class_exists(&id("ns#package:p.type:Shape")).unwrap());
        assert!(model.enumeration_exists(&id("ns#package:p.type:Circle.Mode")).unwrap());
    }

    #[test]
    fn test_hierarchy_queries() {
        let graph = sample_graph();
        let model = CodeModel::with_config(&graph, &config()).unwrap();

        let subtypes = model.subtypes_of(&id("ns#package:p.type:Base")).unwrap();
        assert_eq!(subtypes.len(), 1);
        assert_eq!(subtypes[0].path, "p.Circle");

        let implementors = model.implementors_of(&id("ns#package:p.type:Shape")).unwrap();
        assert_eq!(implementors.len(), 1);
        assert_eq!(implementors[0].name(), "Circle");
    }

    #[test]
    fn test_member_queries() {
        let graph = sample_graph();
        let model = CodeModel::with_config(&graph, &config()).unwrap();
        let circle = model.find_type("p.Circle").unwrap().unwrap();

        let methods = model.methods_of(&circle.id).unwrap();
        assert_eq!(methods.len(), 1);
        let scale = &methods[0];
        assert_eq!(scale.name, "scale");
        assert_eq!(scale.overload, Some(0));
        assert_eq!(scale.parameters.len(), 2);
        assert_eq!(scale.parameters[0].name, "by");
        let times = scale.parameters[1].ty.as_ref().unwrap();
        assert_eq!(times.java_name(), "int");
        assert_eq!(times.dimensions, 1);
        assert_eq!(scale.returns.as_ref().unwrap().target, circle.id);
        assert!(scale.throws[0].is_unqualified());

        let constructors = model.constructors_of(&id("ns#package:p.type:Base")).unwrap();
        assert_eq!(constructors.len(), 1);
        assert_eq!(constructors[0].name, "Base");
        assert_eq!(constructors[0].returns, None);

        let inner = model.inner_types_of(&circle.id).unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].elements, ["FILL", "STROKE"]);
    }

    #[test]
    fn test_find_type_nested_and_missing() {
        let graph = sample_graph();
        let model = CodeModel::with_config(&graph, &config()).unwrap();

        let mode = model.find_type("p.Circle.Mode").unwrap().unwrap();
        assert_eq!(mode.kind, EntityKind::Enumeration);
        assert_eq!(mode.package, "p");
        assert!(model.find_type("p.Square").unwrap().is_none());
    }

    #[test]
    fn test_unqualified_and_libraries() {
        let graph = sample_graph();
        let model = CodeModel::with_config(&graph, &config()).unwrap();

        let unqualified = model.unqualified_references().unwrap();
        assert_eq!(unqualified.len(), 1);
        assert_eq!(unqualified[0].name, "Missing");
        assert_eq!(unqualified[0].predicate, vocab::THROWS);
        assert!(model.placeholder_references().unwrap().is_empty());

        let libraries = model.libraries().unwrap();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].name, "lib");
        assert_eq!(libraries[0].location.as_deref(), Some("/tmp/lib"));
        assert!(libraries[0].completed_at.is_some());
    }
}
