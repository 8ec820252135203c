//! In-memory RDF statement store
//!
//! Reference [`Repository`] implementation used for tests, examples and
//! embedded use.

use super::repository::{Repository, RepositoryResult};
use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use crate::sparql::{QueryOptions, SparqlEngine, SparqlResults};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

/// Strict insert/remove failures; the [`Repository`] methods never raise these
#[derive(Error, Debug)]
pub enum RdfStoreError {
    #[error("Statement not found: {0}")]
    NotFound(Triple),

    #[error("Statement already stored: {0}")]
    AlreadyStored(Triple),
}

pub type RdfStoreResult<T> = Result<T, RdfStoreError>;

/// Statement set with one index per position
///
/// Each index maps a term to the statements holding it in that position, so
/// a pattern with any bound position only scans the smallest bucket. Empty
/// buckets are dropped, so the index keys are exactly the terms in use.
#[derive(Clone, Default)]
pub struct RdfStore {
    triples: FxHashSet<Triple>,
    by_subject: FxHashMap<RdfSubject, FxHashSet<Triple>>,
    by_predicate: FxHashMap<RdfPredicate, FxHashSet<Triple>>,
    by_object: FxHashMap<RdfObject, FxHashSet<Triple>>,
}

impl RdfStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement that must not already be stored
    pub fn insert(&mut self, triple: Triple) -> RdfStoreResult<()> {
        if self.triples.contains(&triple) {
            return Err(RdfStoreError::AlreadyStored(triple));
        }
        self.index(&triple);
        self.triples.insert(triple);
        Ok(())
    }

    /// Remove a statement that must be stored
    pub fn remove(&mut self, triple: &Triple) -> RdfStoreResult<()> {
        if !self.triples.remove(triple) {
            return Err(RdfStoreError::NotFound(triple.clone()));
        }
        self.unindex(triple);
        Ok(())
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.by_subject.clear();
        self.by_predicate.clear();
        self.by_object.clear();
    }

    /// Statements matching `pattern`, in no particular order
    pub fn matching(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.candidates(pattern)
            .filter(|triple| pattern.matches(triple))
            .cloned()
            .collect()
    }

    /// Distinct subjects with at least one statement
    pub fn subjects(&self) -> Vec<RdfSubject> {
        self.by_subject.keys().cloned().collect()
    }

    /// Smallest set of statements that can contain every match of `pattern`
    fn candidates<'a>(&'a self, pattern: &TriplePattern) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
        let mut best: Option<&'a FxHashSet<Triple>> = None;
        let buckets = [
            pattern.subject.as_ref().map(|s| self.by_subject.get(s)),
            pattern.predicate.as_ref().map(|p| self.by_predicate.get(p)),
            pattern.object.as_ref().map(|o| self.by_object.get(o)),
        ];

        for bucket in buckets.into_iter().flatten() {
            match bucket {
                // A bound term that is not indexed cannot match anything
                None => return Box::new(std::iter::empty()),
                Some(set) if best.map_or(true, |b| set.len() < b.len()) => best = Some(set),
                Some(_) => {}
            }
        }

        match best {
            Some(set) => Box::new(set.iter()),
            None => Box::new(self.triples.iter()),
        }
    }

    fn index(&mut self, triple: &Triple) {
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple.clone());
    }

    fn unindex(&mut self, triple: &Triple) {
        unindex_from(&mut self.by_subject, &triple.subject, triple);
        unindex_from(&mut self.by_predicate, &triple.predicate, triple);
        unindex_from(&mut self.by_object, &triple.object, triple);
    }
}

fn unindex_from<K: Hash + Eq>(index: &mut FxHashMap<K, FxHashSet<Triple>>, key: &K, triple: &Triple) {
    if let Some(bucket) = index.get_mut(key) {
        bucket.remove(triple);
        if bucket.is_empty() {
            index.remove(key);
        }
    }
}

impl Repository for RdfStore {
    fn add(&mut self, statement: Triple) -> RepositoryResult<()> {
        debug!("add {}", statement);
        if !self.contains(&statement) {
            self.index(&statement);
            self.triples.insert(statement);
        }
        Ok(())
    }

    fn delete(&mut self, statement: &Triple) -> RepositoryResult<()> {
        debug!("delete {}", statement);
        // Absent statements are already deleted
        let _ = self.remove(statement);
        Ok(())
    }

    fn delete_all(&mut self, pattern: &TriplePattern) -> RepositoryResult<usize> {
        let matching = self.matching(pattern);
        for triple in &matching {
            self.unindex(triple);
            self.triples.remove(triple);
        }
        debug!("deleted {} statements", matching.len());
        Ok(matching.len())
    }

    fn exists(&self, pattern: &TriplePattern) -> RepositoryResult<bool> {
        Ok(self.candidates(pattern).any(|triple| pattern.matches(triple)))
    }

    fn first(&self, pattern: &TriplePattern) -> RepositoryResult<Option<Triple>> {
        Ok(self
            .candidates(pattern)
            .find(|triple| pattern.matches(triple))
            .cloned())
    }

    fn all(&self, pattern: &TriplePattern) -> RepositoryResult<Vec<Triple>> {
        Ok(self.matching(pattern))
    }

    fn query(&self, query: &str, options: &QueryOptions) -> RepositoryResult<SparqlResults> {
        debug!("query [{:?}] {}", options.language, query);
        Ok(SparqlEngine::new(self).query(query, options)?)
    }
}
