//! In-memory graph store.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;

use super::store::{
    GraphError, GraphStore, Matches, Node, ObjectPattern, Pattern, Triple, TriplePattern,
};
use crate::base::Identifier;

/// Insertion sequence number of a stored triple.
type Seq = u64;

/// A [`GraphStore`] kept entirely in memory.
///
/// Every triple gets a sequence number when inserted. Iteration and search
/// follow that number, so results are deterministic, and removal never
/// shifts the remaining triples. Two secondary indexes (by subject, by
/// resource object) narrow exact-match searches; everything else scans.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    next_seq: Seq,
    triples: BTreeMap<Seq, Triple>,
    seqs: FxHashMap<Triple, Seq>,
    by_subject: FxHashMap<Identifier, BTreeSet<Seq>>,
    by_object: FxHashMap<Identifier, BTreeSet<Seq>>,
}

impl MemoryGraph {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.values()
    }

    fn insert_triple(&mut self, triple: Triple) -> bool {
        if self.seqs.contains_key(&triple) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;

        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(seq);
        if let Node::Resource(object) = &triple.object {
            self.by_object.entry(object.clone()).or_default().insert(seq);
        }
        self.seqs.insert(triple.clone(), seq);
        self.triples.insert(seq, triple);
        true
    }

    fn remove_triple(&mut self, triple: &Triple) -> bool {
        let Some(seq) = self.seqs.remove(triple) else {
            return false;
        };
        self.triples.remove(&seq);
        remove_indexed(&mut self.by_subject, &triple.subject, seq);
        if let Node::Resource(object) = &triple.object {
            remove_indexed(&mut self.by_object, object, seq);
        }
        true
    }

    fn indexed<'a>(
        &'a self,
        seqs: Option<&'a BTreeSet<Seq>>,
    ) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
        match seqs {
            Some(seqs) => Box::new(seqs.iter().filter_map(|seq| self.triples.get(seq))),
            None => Box::new(std::iter::empty()),
        }
    }
}

fn remove_indexed(index: &mut FxHashMap<Identifier, BTreeSet<Seq>>, key: &Identifier, seq: Seq) {
    if let Some(set) = index.get_mut(key) {
        set.remove(&seq);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

impl GraphStore for MemoryGraph {
    fn add_edge(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        object: &Identifier,
    ) -> Result<bool, GraphError> {
        Ok(self.insert_triple(Triple::new(subject.clone(), predicate, object)))
    }

    fn add_literal(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        value: &str,
    ) -> Result<bool, GraphError> {
        Ok(self.insert_triple(Triple::new(subject.clone(), predicate, Node::literal(value))))
    }

    fn remove_edge(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        object: &Identifier,
    ) -> Result<bool, GraphError> {
        Ok(self.remove_triple(&Triple::new(subject.clone(), predicate, object)))
    }

    fn remove_literal(
        &mut self,
        subject: &Identifier,
        predicate: &str,
        value: &str,
    ) -> Result<bool, GraphError> {
        Ok(self.remove_triple(&Triple::new(subject.clone(), predicate, Node::literal(value))))
    }

    fn search(&self, pattern: &TriplePattern) -> Result<Matches<'_>, GraphError> {
        let candidates: Box<dyn Iterator<Item = &Triple> + '_> =
            match (&pattern.subject, &pattern.object) {
                (Pattern::Exact(subject), _) => self.indexed(self.by_subject.get(subject)),
                (_, ObjectPattern::Exact(Node::Resource(object))) => {
                    self.indexed(self.by_object.get(object))
                }
                _ => Box::new(self.triples.values()),
            };

        let pattern = pattern.clone();
        Ok(Matches::new(
            candidates.filter(move |t| pattern.matches(t)).cloned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> Identifier {
        Identifier::parse(text).unwrap()
    }

    fn sample() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        let p = id("ns#package:p");
        let c = id("ns#package:p.type:C");
        let f = id("ns#package:p.type:C.attribute:f");
        graph.add_edge(&p, "contains", &c).unwrap();
        graph.add_literal(&c, "kind", "class").unwrap();
        graph.add_edge(&c, "contains", &f).unwrap();
        graph.add_literal(&f, "kind", "attribute").unwrap();
        graph
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut graph = sample();
        let before = graph.len();
        let added = graph
            .add_literal(&id("ns#package:p.type:C"), "kind", "class")
            .unwrap();
        assert!(!added);
        assert_eq!(graph.len(), before);
    }

    #[test]
    fn test_remove() {
        let mut graph = sample();
        let c = id("ns#package:p.type:C");
        assert!(graph.remove_literal(&c, "kind", "class").unwrap());
        assert!(!graph.remove_literal(&c, "kind", "class").unwrap());
        assert_eq!(graph.len(), 3);

        let kinds = graph
            .collect(&TriplePattern::new().subject(c).predicate("kind"))
            .unwrap();
        assert!(kinds.is_empty());
    }

    #[test]
    fn test_search_by_subject_and_object() {
        let graph = sample();
        let c = id("ns#package:p.type:C");

        let outgoing = graph.collect(&TriplePattern::new().subject(c.clone())).unwrap();
        assert_eq!(outgoing.len(), 2);

        let incoming = graph.collect(&TriplePattern::new().object(c)).unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].subject, id("ns#package:p"));
    }

    #[test]
    fn test_search_literal_object() {
        let graph = sample();
        let classes = graph
            .collect(&TriplePattern::new().predicate("kind").object(Node::literal("class")))
            .unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].subject, id("ns#package:p.type:C"));
    }

    #[test]
    fn test_search_within() {
        let graph = sample();
        let under_class = graph
            .collect(
                &TriplePattern::new()
                    .subject_within(id("ns#package:p.type:C"))
                    .predicate("kind"),
            )
            .unwrap();
        assert_eq!(under_class.len(), 2);
    }

    #[test]
    fn test_insertion_order_after_removal() {
        let mut graph = MemoryGraph::new();
        let s = id("ns#type:S");
        for value in ["a", "b", "c"] {
            graph.add_literal(&s, "modifier", value).unwrap();
        }
        graph.remove_literal(&s, "modifier", "b").unwrap();

        let values: Vec<_> = graph
            .search(&TriplePattern::new().subject(s))
            .unwrap()
            .map(|t| t.object.as_literal().unwrap().to_string())
            .collect();
        assert_eq!(values, ["a", "c"]);
    }

    #[test]
    fn test_bulk_removal_keeps_order_and_indexes() {
        let mut graph = MemoryGraph::new();
        let s = id("ns#type:S");
        let target = id("ns#type:T");
        for i in 0..20_000 {
            graph.add_literal(&s, "position", &i.to_string()).unwrap();
            graph.add_edge(&id(&format!("ns#type:U{i}")), "extends", &target).unwrap();
        }
        for i in (0..20_000).filter(|i| i % 2 == 1) {
            assert!(graph.remove_literal(&s, "position", &i.to_string()).unwrap());
            let user = id(&format!("ns#type:U{i}"));
            assert!(graph.remove_edge(&user, "extends", &target).unwrap());
        }

        assert_eq!(graph.len(), 20_000);
        let positions: Vec<String> = graph
            .search(&TriplePattern::new().subject(s))
            .unwrap()
            .map(|t| t.object.as_literal().unwrap().to_string())
            .collect();
        assert_eq!(positions.len(), 10_000);
        assert_eq!(positions[..3], ["0", "2", "4"]);
        let incoming = graph.collect(&TriplePattern::new().object(&target)).unwrap();
        assert_eq!(incoming.len(), 10_000);
        assert_eq!(incoming[1].subject, id("ns#type:U2"));
    }

    #[test]
    fn test_reinsert_moves_to_end() {
        let mut graph = MemoryGraph::new();
        let s = id("ns#type:S");
        for value in ["a", "b"] {
            graph.add_literal(&s, "modifier", value).unwrap();
        }
        graph.remove_literal(&s, "modifier", "a").unwrap();
        graph.add_literal(&s, "modifier", "a").unwrap();

        let values: Vec<_> = graph
            .iter()
            .map(|t| t.object.as_literal().unwrap().to_string())
            .collect();
        assert_eq!(values, ["b", "a"]);
    }

    #[test]
    fn test_contains() {
        let graph = sample();
        assert!(graph.contains(&TriplePattern::new().predicate("contains")).unwrap());
        assert!(!graph.contains(&TriplePattern::new().predicate("extends")).unwrap());
    }
}
