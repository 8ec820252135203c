//! Finder queries over one record type

use super::{PersistenceEngine, PersistenceResult, RecordRef};
use crate::mapping::Value;
use crate::query::{Conditions, QueryCompiler};
use crate::rdf::{NamedNode, Repository};
use crate::schema::RecordType;
use std::sync::Arc;

/// Query builder for records of one type
///
/// Nothing runs until [`iter`](Self::iter), [`each`](Self::each) or one of
/// the other terminal methods is called, and every call runs the query again.
pub struct Finder<'a, R: Repository> {
    engine: &'a PersistenceEngine<R>,
    record_type: Arc<RecordType>,
    conditions: Conditions,
    limit: Option<usize>,
}

impl<'a, R: Repository> Finder<'a, R> {
    pub(crate) fn new(engine: &'a PersistenceEngine<R>, record_type: Arc<RecordType>) -> Self {
        Self {
            engine,
            record_type,
            conditions: Conditions::new(),
            limit: None,
        }
    }

    /// Replace all conditions
    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Add one condition
    pub fn condition(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(attribute, value);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The `SELECT` query this finder runs
    pub fn to_query(&self) -> PersistenceResult<String> {
        Ok(QueryCompiler::new(self.engine.coercion()).compile_find(
            &self.record_type,
            &self.conditions,
            self.limit,
        )?)
    }

    /// Run the query and return a pull-based sequence of loaded records
    pub fn iter(&self) -> PersistenceResult<RecordIter<'a, R>> {
        let subjects = self.engine.select_subjects(&self.to_query()?)?;
        Ok(RecordIter {
            engine: self.engine,
            record_type: Arc::clone(&self.record_type),
            subjects: subjects.into_iter(),
        })
    }

    /// Run the query and hand each loaded record to `callback`
    pub fn each(&self, mut callback: impl FnMut(RecordRef)) -> PersistenceResult<usize> {
        let mut count = 0;
        for record in self.iter()? {
            callback(record?);
            count += 1;
        }
        Ok(count)
    }

    pub fn to_vec(&self) -> PersistenceResult<Vec<RecordRef>> {
        self.iter()?.collect()
    }

    pub fn first(&self) -> PersistenceResult<Option<RecordRef>> {
        let finder = Finder {
            engine: self.engine,
            record_type: Arc::clone(&self.record_type),
            conditions: self.conditions.clone(),
            limit: Some(1),
        };
        finder.iter()?.next().transpose()
    }

    pub fn exists(&self) -> PersistenceResult<bool> {
        self.engine.exists(self.record_type.name(), &self.conditions)
    }

    pub fn count(&self) -> PersistenceResult<u64> {
        self.engine.count(self.record_type.name(), &self.conditions)
    }
}

/// Records produced by a finder, loaded one at a time
pub struct RecordIter<'a, R: Repository> {
    engine: &'a PersistenceEngine<R>,
    record_type: Arc<RecordType>,
    subjects: std::vec::IntoIter<NamedNode>,
}

impl<R: Repository> RecordIter<'_, R> {
    /// Subjects not yet yielded
    pub fn remaining(&self) -> usize {
        self.subjects.len()
    }
}

impl<R: Repository> Iterator for RecordIter<'_, R> {
    type Item = PersistenceResult<RecordRef>;

    fn next(&mut self) -> Option<Self::Item> {
        let subject = self.subjects.next()?;
        let record = RecordRef::for_subject(Arc::clone(&self.record_type), subject);
        Some(self.engine.reload(&record).map(|()| record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.subjects.size_hint()
    }
}
