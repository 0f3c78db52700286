//! Diagnostics and the listener protocol.
//!
//! Content problems found during ingestion never fail a call. They are
//! delivered to registered [`IndexListener`]s, in registration order.
//! [`DiagnosticCollector`] is a ready-made listener that turns the events
//! into [`Diagnostic`]s.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use smol_str::SmolStr;

use crate::base::Identifier;

// ============================================================================
// LISTENER EVENTS
// ============================================================================

/// A type whose declared path disagrees with the package that is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDiscrepancy {
    /// Package implied by the open package stack.
    pub scope_package: SmolStr,
    /// Path the front-end declared for the type.
    pub declared_path: SmolStr,
    /// Address the type was written under.
    pub type_id: Identifier,
}

/// A syntax or semantic error reported by a front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Free-form location, usually `file:line`.
    pub location: SmolStr,
    pub message: SmolStr,
}

/// Where a list of unresolved names comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnresolvedSource {
    /// Relayed from a front-end.
    FrontEnd,
    /// Left over by the resolution pass.
    Resolution,
}

/// Observer of ingestion events. Every method defaults to doing nothing.
pub trait IndexListener: Send + Sync {
    fn package_discrepancy(&self, _event: &PackageDiscrepancy) {}

    fn parse_error(&self, _event: &ParseError) {}

    fn unresolved_types(&self, _source: UnresolvedSource, _names: &[SmolStr]) {}
}

/// Handle returned by [`Listeners::add`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners in registration order.
#[derive(Clone, Default)]
pub struct Listeners {
    next: u64,
    entries: Vec<(ListenerId, Arc<dyn IndexListener>)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Arc<dyn IndexListener>) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, listener));
        id
    }

    /// Unregister; false if `id` is not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn package_discrepancy(&self, event: &PackageDiscrepancy) {
        for (_, listener) in &self.entries {
            listener.package_discrepancy(event);
        }
    }

    pub fn parse_error(&self, event: &ParseError) {
        for (_, listener) in &self.entries {
            listener.parse_error(event);
        }
    }

    pub fn unresolved_types(&self, source: UnresolvedSource, names: &[SmolStr]) {
        for (_, listener) in &self.entries {
            listener.unresolved_types(source, names);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("registered", &self.entries.len())
            .finish()
    }
}

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A diagnostic message with an optional location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Diagnostic code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub location: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity,
            code: None,
            location: None,
            message: message.into(),
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<Arc<str>>) -> Self {
        self.location = Some(location.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
pub mod codes {
    /// Front-end parse error.
    pub const PARSE_ERROR: &str = "E0001";

    /// Type name no lookup could qualify.
    pub const UNRESOLVED_TYPE: &str = "W0001";
    /// Declared type path disagrees with the open package.
    pub const PACKAGE_DISCREPANCY: &str = "W0002";
    /// Unresolved name reported by a front-end.
    pub const FRONTEND_UNRESOLVED: &str = "W0003";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Listener that records every event as a [`Diagnostic`].
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    /// Snapshot of everything collected so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl IndexListener for DiagnosticCollector {
    fn package_discrepancy(&self, event: &PackageDiscrepancy) {
        let scope = match event.scope_package.as_str() {
            "" => "the default package",
            package => package,
        };
        self.add(
            Diagnostic::warning(format!(
                "type '{}' is declared while {} is open",
                event.declared_path, scope
            ))
            .with_code(codes::PACKAGE_DISCREPANCY)
            .with_location(event.type_id.to_string()),
        );
    }

    fn parse_error(&self, event: &ParseError) {
        self.add(
            Diagnostic::error(event.message.as_str())
                .with_code(codes::PARSE_ERROR)
                .with_location(event.location.as_str()),
        );
    }

    fn unresolved_types(&self, source: UnresolvedSource, names: &[SmolStr]) {
        let code = match source {
            UnresolvedSource::FrontEnd => codes::FRONTEND_UNRESOLVED,
            UnresolvedSource::Resolution => codes::UNRESOLVED_TYPE,
        };
        let mut diagnostics = self.diagnostics.lock();
        for name in names {
            let diagnostic = Diagnostic::warning(format!("unresolved type: '{name}'"));
            diagnostics.push(diagnostic.with_code(code));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
        tag: &'static str,
    }

    impl IndexListener for Recorder {
        fn parse_error(&self, _event: &ParseError) {
            self.seen.lock().push(self.tag);
        }
    }

    struct SharedLog {
        log: Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    }

    impl IndexListener for SharedLog {
        fn parse_error(&self, _event: &ParseError) {
            self.log.lock().push(self.tag);
        }
    }

    fn parse_error() -> ParseError {
        ParseError {
            location: "A.java:3".into(),
            message: "unexpected token".into(),
        }
    }

    #[test]
    fn test_notification_order_is_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::new();
        for tag in ["first", "second", "third"] {
            listeners.add(Arc::new(SharedLog {
                log: Arc::clone(&log),
                tag,
            }));
        }

        listeners.parse_error(&parse_error());
        assert_eq!(*log.lock(), ["first", "second", "third"]);
    }

    #[test]
    fn test_remove_listener() {
        let recorder = Arc::new(Recorder {
            tag: "r",
            ..Default::default()
        });
        let mut listeners = Listeners::new();
        let id = listeners.add(recorder.clone());

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.parse_error(&parse_error());
        assert!(recorder.seen.lock().is_empty());
    }

    #[test]
    fn test_default_methods_are_no_ops() {
        struct Counting(AtomicUsize);
        impl IndexListener for Counting {
            fn unresolved_types(&self, _source: UnresolvedSource, names: &[SmolStr]) {
                self.0.fetch_add(names.len(), Ordering::SeqCst);
            }
        }

        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let mut listeners = Listeners::new();
        listeners.add(counting.clone());
        listeners.parse_error(&parse_error());
        listeners.unresolved_types(UnresolvedSource::Resolution, &["A".into(), "B".into()]);

        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_collector_turns_events_into_diagnostics() {
        let collector = DiagnosticCollector::new();
        collector.parse_error(&parse_error());
        collector.package_discrepancy(&PackageDiscrepancy {
            scope_package: "a".into(),
            declared_path: "b.C".into(),
            type_id: Identifier::parse("ns#package:b.type:C").unwrap(),
        });
        collector.unresolved_types(UnresolvedSource::Resolution, &["Foo".into()]);

        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 2);
        assert!(collector.has_errors());

        let diagnostics = collector.take();
        assert_eq!(diagnostics[0].code.as_deref(), Some(codes::PARSE_ERROR));
        assert_eq!(diagnostics[0].location.as_deref(), Some("A.java:3"));
        assert_eq!(diagnostics[1].code.as_deref(), Some(codes::PACKAGE_DISCREPANCY));
        assert!(diagnostics[2].message.contains("Foo"));
        assert!(collector.diagnostics().is_empty());
    }
}
