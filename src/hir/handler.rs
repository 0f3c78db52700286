//! The ingestion state machine.
//!
//! A [`CodeHandler`] receives structural events from a front-end (packages,
//! types, members) and turns them into graph edges. One handler owns one
//! session: its scope stacks, its package symbol index and its pending
//! placeholders.
//!
//! ```text
//! NotStarted --start_parsing--> Parsing --end_parsing--> Ended
//!                                  |  ^
//!               start_compilation_unit | end_compilation_unit
//! ```

use std::sync::Arc;

use chrono::Utc;
use smol_str::SmolStr;
use tracing::{debug, info, trace, warn};

use super::diagnostics::{
    IndexListener, ListenerId, Listeners, PackageDiscrepancy, ParseError, UnresolvedSource,
};
use super::error::IngestError;
use super::input::{partition_imports, Import};
use super::paths;
use super::resolve::{
    ImportContext, Lookup, ObjectsTable, PackageSymbolIndex, Resolution, ResolutionReport,
};
use super::scope::{OpenContainer, OpenPackage, Scope};
use super::types::{ContainerKind, JavaType, Modifier, Visibility};
use crate::base::{qualifier, Identifier};
use crate::config::IndexerConfig;
use crate::graph::{vocab, EntityKind, GraphStore, TriplePattern};
use crate::project::PrescanIndex;

// ============================================================================
// SESSION STATE
// ============================================================================

#[derive(Clone, Debug)]
struct Library {
    name: SmolStr,
    location: SmolStr,
}

#[derive(Clone, Debug, Default)]
enum SessionState {
    #[default]
    NotStarted,
    Parsing(Library),
    Ended,
}

#[derive(Clone, Debug)]
struct OpenUnit {
    path: SmolStr,
    context: ImportContext,
}

/// Entities written during one session, by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub packages: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub enumerations: usize,
    pub elements: usize,
    pub attributes: usize,
    pub constructors: usize,
    pub methods: usize,
    pub parameters: usize,
}

impl EntityCounts {
    pub fn total(&self) -> usize {
        self.packages
            + self.classes
            + self.interfaces
            + self.enumerations
            + self.elements
            + self.attributes
            + self.constructors
            + self.methods
            + self.parameters
    }

    fn record(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Package => self.packages += 1,
            EntityKind::Class => self.classes += 1,
            EntityKind::Interface => self.interfaces += 1,
            EntityKind::Enumeration => self.enumerations += 1,
            EntityKind::EnumElement => self.elements += 1,
            EntityKind::Attribute => self.attributes += 1,
            EntityKind::Constructor => self.constructors += 1,
            EntityKind::Method => self.methods += 1,
            EntityKind::Parameter => self.parameters += 1,
            EntityKind::Library | EntityKind::Signature => {}
        }
    }
}

#[derive(Clone, Debug, Default)]
struct SessionStats {
    counts: EntityCounts,
    units: usize,
    parse_errors: usize,
    package_discrepancies: usize,
    frontend_unresolved: usize,
    immediate: usize,
}

/// Summary returned by [`CodeHandler::end_parsing`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub library: Identifier,
    pub counts: EntityCounts,
    pub compilation_units: usize,
    pub parse_errors: usize,
    pub package_discrepancies: usize,
    /// Names front-ends reported as unresolved.
    pub frontend_unresolved: usize,
    /// Type references qualified while ingesting.
    pub immediate_references: usize,
    /// Placeholders minted for deferred references.
    pub placeholders: u64,
    pub resolution: ResolutionReport,
    pub completed_at: String,
}

impl IngestReport {
    /// Names that ended on an `unqualified:` marker.
    pub fn unresolved_names(&self) -> &[SmolStr] {
        &self.resolution.unresolved_names
    }

    pub fn error_count(&self) -> usize {
        self.parse_errors
    }
}

// ============================================================================
// CODE HANDLER
// ============================================================================

/// Ingestion session over a graph store.
pub struct CodeHandler<'g, G: GraphStore + ?Sized> {
    graph: &'g mut G,
    config: IndexerConfig,
    root: Identifier,
    state: SessionState,
    scope: Scope,
    unit: Option<OpenUnit>,
    index: PackageSymbolIndex,
    objects: ObjectsTable,
    listeners: Listeners,
    stats: SessionStats,
}

impl<'g, G: GraphStore + ?Sized> CodeHandler<'g, G> {
    /// Create a handler. Fails if the configured namespace is not a valid
    /// identifier prefix.
    pub fn new(graph: &'g mut G, config: IndexerConfig) -> Result<Self, IngestError> {
        let root = Identifier::root(config.namespace.as_deref())?;
        Ok(Self {
            graph,
            config,
            scope: Scope::new(root.clone()),
            unit: None,
            index: PackageSymbolIndex::new(root.clone()),
            objects: ObjectsTable::new(root.clone()),
            listeners: Listeners::new(),
            stats: SessionStats::default(),
            state: SessionState::NotStarted,
            root,
        })
    }

    pub fn root(&self) -> &Identifier {
        &self.root
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn graph(&self) -> &G {
        &*self.graph
    }

    pub fn is_parsing(&self) -> bool {
        matches!(self.state, SessionState::Parsing(_))
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, SessionState::Ended)
    }

    /// The package symbol index of the running session.
    pub fn symbols(&self) -> &PackageSymbolIndex {
        &self.index
    }

    /// Deferred references waiting for `end_parsing`.
    pub fn pending_references(&self) -> usize {
        self.objects.pending()
    }

    /// Address new declarations currently attach under.
    pub fn current(&self) -> &Identifier {
        self.scope.current()
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    pub fn add_listener(&mut self, listener: Arc<dyn IndexListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Begin indexing the library `name`. Resets every piece of session state.
    ///
    /// The name may contain separators (`rt.jar`); they are escaped in the
    /// library's address and kept verbatim in its name fact.
    pub fn start_parsing(&mut self, name: &str, location: &str) -> Result<(), IngestError> {
        if let SessionState::Parsing(library) = &self.state {
            return Err(IngestError::AlreadyParsing {
                name: library.name.clone(),
            });
        }
        let library = paths::library_id(&self.root, name)?;
        let exists = self.graph.contains(
            &TriplePattern::new()
                .subject(library)
                .predicate(vocab::KIND)
                .object(EntityKind::Library.marker()),
        )?;
        if exists {
            return Err(IngestError::LibraryExists {
                name: SmolStr::new(name),
            });
        }

        self.scope.clear();
        self.unit = None;
        self.index.clear();
        self.objects.reset(self.root.clone());
        self.stats = SessionStats::default();
        self.state = SessionState::Parsing(Library {
            name: SmolStr::new(name),
            location: SmolStr::new(location),
        });
        debug!(library = name, location, "parsing started");
        Ok(())
    }

    /// Finish the session: check balance, run the resolution pass and record
    /// the library.
    pub fn end_parsing(&mut self) -> Result<IngestReport, IngestError> {
        let library = self.library()?.clone();
        if let Some(unit) = &self.unit {
            return Err(IngestError::Unbalanced {
                open: format!("compilation unit '{}'", unit.path),
            });
        }
        if let Some(open) = self.scope.describe_open() {
            return Err(IngestError::Unbalanced { open });
        }

        let resolution = self.objects.resolve_all(&mut *self.graph, &self.index)?;
        if !resolution.unresolved_names.is_empty() {
            self.listeners
                .unresolved_types(UnresolvedSource::Resolution, &resolution.unresolved_names);
        }

        let id = paths::library_id(&self.root, &library.name)?;
        let completed_at = Utc::now().to_rfc3339();
        self.write_kind(&id, EntityKind::Library)?;
        self.graph.add_literal(&id, vocab::LIBRARY_NAME, &library.name)?;
        self.graph.add_literal(&id, vocab::LIBRARY_LOCATION, &library.location)?;
        self.graph.add_literal(&id, vocab::COMPLETED_AT, &completed_at)?;
        self.state = SessionState::Ended;

        let stats = std::mem::take(&mut self.stats);
        let report = IngestReport {
            library: id,
            counts: stats.counts,
            compilation_units: stats.units,
            parse_errors: stats.parse_errors,
            package_discrepancies: stats.package_discrepancies,
            frontend_unresolved: stats.frontend_unresolved,
            immediate_references: stats.immediate,
            placeholders: self.objects.minted(),
            resolution,
            completed_at,
        };
        info!(
            library = %library.name,
            entities = report.counts.total(),
            unresolved = report.unresolved_names().len(),
            "parsing finished"
        );
        Ok(report)
    }

    /// Register the types found by a pre-scan with the running session.
    pub fn prime_symbols(&mut self, prescan: &PrescanIndex) -> Result<(), IngestError> {
        self.library()?;
        for package in prescan.packages() {
            self.index.declare_package(package);
        }
        for (package, name) in prescan.types() {
            self.index.declare(package, name)?;
        }
        debug!(types = prescan.len(), "symbol index primed");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Compilation units
    // ------------------------------------------------------------------------

    /// Open a compilation unit; its imports apply to every reference until
    /// [`end_compilation_unit`](Self::end_compilation_unit).
    pub fn start_compilation_unit(
        &mut self,
        path: &str,
        imports: &[Import],
    ) -> Result<(), IngestError> {
        self.library()?;
        if let Some(unit) = &self.unit {
            return Err(IngestError::UnitAlreadyOpen {
                path: unit.path.clone(),
            });
        }
        for import in imports {
            paths::check_type_name(import.target())?;
        }
        let (singles, mut wildcards) = partition_imports(imports);
        for implicit in &self.config.implicit_wildcards {
            if !wildcards.iter().any(|w| w == implicit) {
                wildcards.push(SmolStr::new(implicit));
            }
        }
        trace!(
            path,
            imports = singles.len(),
            wildcards = wildcards.len(),
            "compilation unit opened"
        );
        self.unit = Some(OpenUnit {
            path: SmolStr::new(path),
            context: ImportContext::new("", singles, wildcards),
        });
        self.stats.units += 1;
        Ok(())
    }

    pub fn end_compilation_unit(&mut self) -> Result<(), IngestError> {
        self.library()?;
        match self.unit.take() {
            Some(_) => Ok(()),
            None => Err(IngestError::NoOpenUnit),
        }
    }

    // ------------------------------------------------------------------------
    // Packages
    // ------------------------------------------------------------------------

    pub fn start_package(&mut self, path: &str) -> Result<Identifier, IngestError> {
        self.library()?;
        if let Some(container) = self.scope.innermost_container() {
            return Err(IngestError::PackageInsideContainer {
                package: SmolStr::new(path),
                container: container.path.clone(),
            });
        }
        paths::split_dotted(path)?;

        let id = paths::package_id(&self.root, path)?;
        let parent = self.scope.current().clone();
        self.write_kind(&id, EntityKind::Package)?;
        self.graph.add_edge(&parent, vocab::CONTAINS, &id)?;
        self.index.declare_package(path);
        self.scope.push_package(OpenPackage {
            id: id.clone(),
            path: SmolStr::new(path),
        });
        self.stats.counts.record(EntityKind::Package);
        trace!(%id, "package opened");
        Ok(id)
    }

    pub fn end_package(&mut self) -> Result<(), IngestError> {
        self.library()?;
        if let Some(container) = self.scope.innermost_container() {
            return Err(IngestError::ContainerStillOpen {
                container: container.path.clone(),
            });
        }
        self.scope.pop_package().map(|_| ()).ok_or(IngestError::NoOpenPackage)
    }

    // ------------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------------

    pub fn start_class(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        path: &str,
        extends: Option<JavaType>,
        implements: &[JavaType],
    ) -> Result<Identifier, IngestError> {
        let kind = ContainerKind::Class {
            extends,
            implements: implements.to_vec(),
        };
        self.start_container(modifiers, visibility, path, kind)
    }

    pub fn start_interface(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        path: &str,
        extends: &[JavaType],
    ) -> Result<Identifier, IngestError> {
        let kind = ContainerKind::Interface {
            extends: extends.to_vec(),
        };
        self.start_container(modifiers, visibility, path, kind)
    }

    pub fn start_enumeration(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        path: &str,
        implements: &[JavaType],
        elements: &[&str],
    ) -> Result<Identifier, IngestError> {
        let kind = ContainerKind::Enumeration {
            implements: implements.to_vec(),
            elements: elements.iter().map(SmolStr::new).collect(),
        };
        self.start_container(modifiers, visibility, path, kind)
    }

    /// Open a class, interface or enumeration declared at the fully
    /// qualified `path`. A path outside the open package is reported to
    /// listeners and the type is still written under its declared package.
    pub fn start_container(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        path: &str,
        kind: ContainerKind,
    ) -> Result<Identifier, IngestError> {
        self.library()?;
        let simple = paths::simple_name(path)?;
        let declared_prefix = paths::enclosing_path(path);
        if let ContainerKind::Enumeration { elements, .. } = &kind {
            if elements.is_empty() {
                return Err(IngestError::EmptyEnumeration {
                    path: SmolStr::new(path),
                });
            }
        }

        let (package, relative, expected_prefix) = match self.scope.innermost_container() {
            Some(outer) => (
                outer.package.clone(),
                SmolStr::new(format!("{}.{}", outer.relative, simple)),
                outer.path.clone(),
            ),
            None => (
                SmolStr::new(declared_prefix),
                SmolStr::new(simple),
                SmolStr::new(self.scope.current_package()),
            ),
        };
        let entity = kind.entity_kind();
        let id = paths::type_id(&self.root, &package, &relative)?;
        let elements = match &kind {
            ContainerKind::Enumeration { elements, .. } => elements
                .iter()
                .map(|element| id.child(qualifier::ELEMENT, element))
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };
        for ty in kind.supertypes() {
            check_type(ty)?;
        }

        self.index.declare(&package, &relative)?;
        let parent = self.scope.current().clone();
        self.write_declaration(&id, entity, modifiers, visibility)?;
        self.graph.add_edge(&parent, vocab::CONTAINS, &id)?;
        match &kind {
            ContainerKind::Class { extends, implements } => {
                if let Some(superclass) = extends {
                    self.write_type_ref(&id, vocab::EXTENDS, superclass, &package)?;
                }
                for interface in implements {
                    self.write_type_ref(&id, vocab::IMPLEMENTS, interface, &package)?;
                }
            }
            ContainerKind::Interface { extends } => {
                for interface in extends {
                    self.write_type_ref(&id, vocab::EXTENDS, interface, &package)?;
                }
            }
            ContainerKind::Enumeration { implements, .. } => {
                for interface in implements {
                    self.write_type_ref(&id, vocab::IMPLEMENTS, interface, &package)?;
                }
                for element_id in &elements {
                    self.write_kind(element_id, EntityKind::EnumElement)?;
                    self.graph.add_edge(&id, vocab::CONTAINS_ELEMENT, element_id)?;
                    self.stats.counts.record(EntityKind::EnumElement);
                }
            }
        }

        if self.config.check_package_discrepancy && expected_prefix.as_str() != declared_prefix {
            let event = PackageDiscrepancy {
                scope_package: SmolStr::new(self.scope.current_package()),
                declared_path: SmolStr::new(path),
                type_id: id.clone(),
            };
            warn!(declared = path, scope = %event.scope_package, "package discrepancy");
            self.stats.package_discrepancies += 1;
            self.listeners.package_discrepancy(&event);
        }

        self.scope.push_container(OpenContainer {
            id: id.clone(),
            kind: entity,
            path: SmolStr::new(path),
            package,
            relative,
        });
        self.stats.counts.record(entity);
        trace!(%id, kind = %entity, "container opened");
        Ok(id)
    }

    pub fn end_class(&mut self) -> Result<(), IngestError> {
        self.end_container(EntityKind::Class)
    }

    pub fn end_interface(&mut self) -> Result<(), IngestError> {
        self.end_container(EntityKind::Interface)
    }

    pub fn end_enumeration(&mut self) -> Result<(), IngestError> {
        self.end_container(EntityKind::Enumeration)
    }

    fn end_container(&mut self, expected: EntityKind) -> Result<(), IngestError> {
        self.library()?;
        let open = self.scope.innermost_container().ok_or(IngestError::NoOpenContainer {
            operation: end_operation(expected),
        })?;
        if open.kind != expected {
            return Err(IngestError::MismatchedEnd {
                expected,
                found: open.kind,
                path: open.path.clone(),
            });
        }
        self.scope.pop_container();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    /// Declare a field of the innermost open container.
    pub fn attribute(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        path: &str,
        ty: &JavaType,
        value: Option<&str>,
    ) -> Result<Identifier, IngestError> {
        let container = self.open_container("attribute")?;
        let id = container.child(qualifier::ATTRIBUTE, paths::simple_name(path)?)?;
        let package = SmolStr::new(self.scope.current_package());
        check_type(ty)?;

        self.write_declaration(&id, EntityKind::Attribute, modifiers, visibility)?;
        self.graph.add_edge(&container, vocab::CONTAINS, &id)?;
        self.write_type_ref(&id, vocab::TYPE, ty, &package)?;
        if let Some(value) = value {
            self.graph.add_literal(&id, vocab::DEFAULT_VALUE, value)?;
        }
        self.stats.counts.record(EntityKind::Attribute);
        Ok(id)
    }

    /// Declare overload `overload` of the innermost container's constructor.
    pub fn constructor(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        overload: u32,
        names: &[&str],
        types: &[JavaType],
        throws: &[JavaType],
    ) -> Result<Identifier, IngestError> {
        let container = self.open_container("constructor")?;
        check_parameters(names, types)?;
        let class_name = container.tail().map(|s| s.fragment()).unwrap_or_default();
        let fragment = format!("{class_name}({overload})");
        let id = container.child(qualifier::CONSTRUCTOR, &fragment)?;

        self.write_invocable(
            &container,
            &id,
            EntityKind::Constructor,
            modifiers,
            visibility,
            names,
            types,
            None,
            throws,
        )?;
        Ok(id)
    }

    /// Declare overload `overload` of method `path` in the innermost
    /// container.
    #[allow(clippy::too_many_arguments)]
    pub fn method(
        &mut self,
        modifiers: &[Modifier],
        visibility: Visibility,
        path: &str,
        overload: u32,
        names: &[&str],
        types: &[JavaType],
        returns: &JavaType,
        throws: &[JavaType],
    ) -> Result<Identifier, IngestError> {
        let container = self.open_container("method")?;
        check_parameters(names, types)?;
        let fragment = format!("{}({overload})", paths::simple_name(path)?);
        let id = container.child(qualifier::METHOD, &fragment)?;

        self.write_invocable(
            &container,
            &id,
            EntityKind::Method,
            modifiers,
            visibility,
            names,
            types,
            Some(returns),
            throws,
        )?;
        Ok(id)
    }

    // ------------------------------------------------------------------------
    // Front-end relays
    // ------------------------------------------------------------------------

    /// Relay a front-end parse error to listeners.
    pub fn parse_error(&mut self, location: &str, message: &str) {
        self.stats.parse_errors += 1;
        debug!(location, message, "parse error reported");
        self.listeners.parse_error(&ParseError {
            location: SmolStr::new(location),
            message: SmolStr::new(message),
        });
    }

    /// Relay names a front-end could not resolve on its own.
    pub fn unresolved_types(&mut self, names: &[&str]) {
        if names.is_empty() {
            return;
        }
        let names: Vec<SmolStr> = names.iter().map(SmolStr::new).collect();
        self.stats.frontend_unresolved += names.len();
        self.listeners.unresolved_types(UnresolvedSource::FrontEnd, &names);
    }

    // ------------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------------

    fn library(&self) -> Result<&Library, IngestError> {
        match &self.state {
            SessionState::Parsing(library) => Ok(library),
            _ => Err(IngestError::NotParsing),
        }
    }

    fn open_container(&self, operation: &'static str) -> Result<Identifier, IngestError> {
        self.library()?;
        self.scope
            .innermost_container()
            .map(|c| c.id.clone())
            .ok_or(IngestError::NoOpenContainer { operation })
    }

    fn write_kind(&mut self, id: &Identifier, kind: EntityKind) -> Result<(), IngestError> {
        self.graph.add_literal(id, vocab::KIND, kind.as_str())?;
        Ok(())
    }

    fn write_declaration(
        &mut self,
        id: &Identifier,
        kind: EntityKind,
        modifiers: &[Modifier],
        visibility: Visibility,
    ) -> Result<(), IngestError> {
        self.write_kind(id, kind)?;
        for modifier in modifiers {
            self.graph.add_literal(id, vocab::MODIFIER, modifier.as_str())?;
        }
        self.graph.add_literal(id, vocab::VISIBILITY, visibility.as_str())?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn write_invocable(
        &mut self,
        container: &Identifier,
        id: &Identifier,
        kind: EntityKind,
        modifiers: &[Modifier],
        visibility: Visibility,
        names: &[&str],
        types: &[JavaType],
        returns: Option<&JavaType>,
        throws: &[JavaType],
    ) -> Result<(), IngestError> {
        let package = SmolStr::new(self.scope.current_package());
        let signature = id.child(qualifier::SIGNATURE, "")?;
        let parameters = names
            .iter()
            .map(|name| signature.child(qualifier::PARAMETER, name))
            .collect::<Result<Vec<_>, _>>()?;
        for ty in types.iter().chain(returns).chain(throws) {
            check_type(ty)?;
        }

        self.write_declaration(id, kind, modifiers, visibility)?;
        self.graph.add_edge(container, vocab::CONTAINS, id)?;
        self.write_kind(&signature, EntityKind::Signature)?;
        self.graph.add_edge(id, vocab::SIGNATURE, &signature)?;

        for (position, (parameter, ty)) in parameters.iter().zip(types).enumerate() {
            self.write_kind(parameter, EntityKind::Parameter)?;
            self.graph.add_literal(parameter, vocab::POSITION, &position.to_string())?;
            self.graph.add_edge(&signature, vocab::PARAMETER, parameter)?;
            self.write_type_ref(parameter, vocab::TYPE, ty, &package)?;
            self.stats.counts.record(EntityKind::Parameter);
        }
        if let Some(returns) = returns {
            self.write_type_ref(&signature, vocab::RETURNS, returns, &package)?;
        }
        for exception in throws {
            self.write_type_ref(id, vocab::THROWS, exception, &package)?;
        }
        self.stats.counts.record(kind);
        Ok(())
    }

    /// Write `subject --predicate--> type`, qualifying the type now if
    /// possible and deferring it to the resolution pass otherwise.
    fn write_type_ref(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        ty: &JavaType,
        package: &str,
    ) -> Result<(), IngestError> {
        match ty {
            JavaType::Primitive(primitive) => {
                let target = paths::primitive_id(&self.root, *primitive)?;
                self.graph.add_edge(subject, predicate, &target)?;
            }
            JavaType::Reference(raw) => {
                let target = self.qualify_reference(subject, raw, package)?;
                self.graph.add_edge(subject, predicate, &target)?;
            }
            JavaType::Array { component, dimensions } => {
                self.write_type_ref(subject, predicate, component, package)?;
                let predicate = vocab::dimensions_of(predicate);
                self.graph
                    .add_literal(subject, &predicate, &dimensions.to_string())?;
            }
        }
        Ok(())
    }

    fn qualify_reference(
        &mut self,
        slot: &Identifier,
        raw: &str,
        package: &str,
    ) -> Result<Identifier, IngestError> {
        let context = self.import_context(package);
        match self.index.qualify(raw, &context, Lookup::Immediate)? {
            Resolution::Resolved { id, via } => {
                trace!(raw, %id, ?via, "qualified immediately");
                self.stats.immediate += 1;
                Ok(id)
            }
            Resolution::Unqualified => Ok(self.objects.defer(raw, slot, &context)?),
        }
    }

    /// Import context of the open unit, or just the implicit wildcards
    /// outside of one.
    fn import_context(&self, package: &str) -> ImportContext {
        match &self.unit {
            Some(unit) => unit.context.in_package(package),
            None => ImportContext::new(
                package,
                Vec::new(),
                self.config.implicit_wildcards.iter().map(SmolStr::new).collect(),
            ),
        }
    }
}

/// Fail on reference names that could never be addressed, before anything
/// of the declaration is written.
fn check_type(ty: &JavaType) -> Result<(), IngestError> {
    match ty {
        JavaType::Primitive(_) => Ok(()),
        JavaType::Reference(raw) => Ok(paths::check_type_name(raw)?),
        JavaType::Array { component, .. } => check_type(component),
    }
}

fn check_parameters(names: &[&str], types: &[JavaType]) -> Result<(), IngestError> {
    if names.len() != types.len() {
        return Err(IngestError::ParameterMismatch {
            names: names.len(),
            types: types.len(),
        });
    }
    Ok(())
}

fn end_operation(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Interface => "end_interface",
        EntityKind::Enumeration => "end_enumeration",
        _ => "end_class",
    }
}
