//! The graph store contract.
//!
//! The physical store is an external collaborator. The crate only needs
//! edge insertion and removal plus a wildcard pattern search, captured by
//! the [`GraphStore`] trait.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::Identifier;

/// Failure reported by a store backend.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph store backend failure: {0}")]
    Backend(String),
}

// ============================================================================
// NODES & TRIPLES
// ============================================================================

/// The object position of an edge.
///
/// Literals are opaque values: they have no outgoing edges and can never
/// appear as subjects, which the [`Triple`] layout enforces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Resource(Identifier),
    Literal(SmolStr),
}

impl Node {
    /// Shorthand for a literal node.
    pub fn literal(value: impl Into<SmolStr>) -> Self {
        Node::Literal(value.into())
    }

    pub fn as_resource(&self) -> Option<&Identifier> {
        match self {
            Node::Resource(id) => Some(id),
            Node::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Node::Literal(value) => Some(value),
            Node::Resource(_) => None,
        }
    }
}

impl From<Identifier> for Node {
    fn from(id: Identifier) -> Self {
        Node::Resource(id)
    }
}

impl From<&Identifier> for Node {
    fn from(id: &Identifier) -> Self {
        Node::Resource(id.clone())
    }
}

/// A single fact: `(subject, predicate, object)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Identifier,
    pub predicate: SmolStr,
    pub object: Node,
}

impl Triple {
    pub fn new(
        subject: Identifier,
        predicate: impl Into<SmolStr>,
        object: impl Into<Node>,
    ) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

/// Match condition for a resource position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Pattern {
    /// Wildcard.
    #[default]
    Any,
    /// Exactly this identifier.
    Exact(Identifier),
    /// This identifier or anything addressed underneath it.
    Within(Identifier),
}

impl Pattern {
    pub fn matches(&self, id: &Identifier) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Exact(expected) => id == expected,
            Pattern::Within(ancestor) => id.is_within(ancestor),
        }
    }
}

/// Match condition for the object position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ObjectPattern {
    #[default]
    Any,
    Exact(Node),
    /// A resource object at or under this identifier. Never matches literals.
    Within(Identifier),
}

impl ObjectPattern {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            ObjectPattern::Any => true,
            ObjectPattern::Exact(expected) => node == expected,
            ObjectPattern::Within(ancestor) => {
                node.as_resource().is_some_and(|id| id.is_within(ancestor))
            }
        }
    }
}

/// A search pattern over all three positions. Unset positions are wildcards.
///
/// ```ignore
/// let kinds = TriplePattern::new()
///     .subject_within(class_id)
///     .predicate(vocab::KIND)
///     .object(Node::literal("attribute"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Pattern,
    pub predicate: Option<SmolStr>,
    pub object: ObjectPattern,
}

impl TriplePattern {
    /// The all-wildcard pattern.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, id: Identifier) -> Self {
        self.subject = Pattern::Exact(id);
        self
    }

    pub fn subject_within(mut self, ancestor: Identifier) -> Self {
        self.subject = Pattern::Within(ancestor);
        self
    }

    pub fn predicate(mut self, predicate: &str) -> Self {
        self.predicate = Some(SmolStr::new(predicate));
        self
    }

    pub fn object(mut self, node: impl Into<Node>) -> Self {
        self.object = ObjectPattern::Exact(node.into());
        self
    }

    pub fn object_within(mut self, ancestor: Identifier) -> Self {
        self.object = ObjectPattern::Within(ancestor);
        self
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.matches(&triple.subject)
            && self.predicate.as_ref().is_none_or(|p| *p == triple.predicate)
            && self.object.matches(&triple.object)
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Lazy sequence of search results.
///
/// Dropping the sequence (or calling [`close`](Self::close)) releases
/// whatever the backend holds for it.
pub struct Matches<'a> {
    inner: Box<dyn Iterator<Item = Triple> + 'a>,
}

impl<'a> Matches<'a> {
    pub fn new(iter: impl Iterator<Item = Triple> + 'a) -> Self {
        Self { inner: Box::new(iter) }
    }

    /// Stop iterating and release the underlying cursor.
    pub fn close(self) {}
}

impl Iterator for Matches<'_> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        self.inner.next()
    }
}

/// A subject/predicate/object fact store with pattern search.
///
/// Adding an edge that already exists and removing one that does not are
/// both allowed; the returned flag tells whether the store changed.
pub trait GraphStore {
    fn add_edge(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        object: &Identifier,
    ) -> Result<bool, GraphError>;

    fn add_literal(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        value: &str,
    ) -> Result<bool, GraphError>;

    fn remove_edge(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        object: &Identifier,
    ) -> Result<bool, GraphError>;

    fn remove_literal(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        value: &str,
    ) -> Result<bool, GraphError>;

    fn search(&self, pattern: &TriplePattern) -> Result<Matches<'_>, GraphError>;

    /// Insert a triple, dispatching on its object kind.
    fn insert(&mut self, triple: &Triple) -> Result<bool, GraphError> {
        match &triple.object {
            Node::Resource(object) => self.add_edge(&triple.subject, &triple.predicate, object),
            Node::Literal(value) => self.add_literal(&triple.subject, &triple.predicate, value),
        }
    }

    /// Remove a triple, dispatching on its object kind.
    fn remove(&mut self, triple: &Triple) -> Result<bool, GraphError> {
        match &triple.object {
            Node::Resource(object) => self.remove_edge(&triple.subject, &triple.predicate, object),
            Node::Literal(value) => self.remove_literal(&triple.subject, &triple.predicate, value),
        }
    }

    /// True if at least one triple matches.
    fn contains(&self, pattern: &TriplePattern) -> Result<bool, GraphError> {
        Ok(self.search(pattern)?.next().is_some())
    }

    /// Materialize every match. Needed before mutating the matched edges.
    fn collect(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, GraphError> {
        Ok(self.search(pattern)?.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> Identifier {
        Identifier::parse(text).unwrap()
    }

    #[test]
    fn test_pattern_within() {
        let class = id("ns#package:p.type:C");
        let pattern = Pattern::Within(class.clone());
        assert!(pattern.matches(&class));
        assert!(pattern.matches(&id("ns#package:p.type:C.attribute:f")));
        assert!(!pattern.matches(&id("ns#package:p.type:D")));
    }

    #[test]
    fn test_object_within_skips_literals() {
        let pattern = ObjectPattern::Within(id("ns#package:p"));
        assert!(!pattern.matches(&Node::literal("package:p")));
        assert!(pattern.matches(&Node::Resource(id("ns#package:p.type:C"))));
    }

    #[test]
    fn test_triple_pattern_matches() {
        let triple = Triple::new(id("ns#type:C"), "kind", Node::literal("class"));

        assert!(TriplePattern::new().matches(&triple));
        assert!(TriplePattern::new().predicate("kind").matches(&triple));
        assert!(!TriplePattern::new().predicate("contains").matches(&triple));
        assert!(TriplePattern::new()
            .subject(id("ns#type:C"))
            .object(Node::literal("class"))
            .matches(&triple));
        assert!(!TriplePattern::new().object(Node::literal("enum")).matches(&triple));
    }
}
