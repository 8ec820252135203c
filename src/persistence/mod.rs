//! Persistence engine
//!
//! Saves, loads and destroys records as statements in a [`Repository`]:
//! - Attribute writes as delete + insert per predicate
//! - Exact reconciliation of `rdf:type` statements
//! - Cascading saves of related records, skipping records already being saved
//! - Finder, exists, count and bulk delete over a record type
//!
//! Lifecycle refusals (saving or destroying a destroyed record, destroying a
//! new one, values that cannot be represented) come back as `Ok(false)`.
//! Repository failures are returned as errors, with no retry or rollback.

mod context;
mod finder;
mod record;
mod subject;

pub use context::SaveContext;
pub use finder::{Finder, RecordIter};
pub use record::{Record, RecordRef, RecordState};
pub use subject::{SequentialSubjectGenerator, SubjectGenerator, UuidSubjectGenerator};

use crate::config::MapperConfig;
use crate::mapping::{TypeCoercion, Value};
use crate::query::{Conditions, QueryCompiler, QueryError, COUNT_VAR, SUBJECT_VAR};
use crate::rdf::{
    rdf_type, NamedNode, RdfError, RdfObject, RdfPredicate, RdfTerm, Repository,
    RepositoryError, Triple, TriplePattern,
};
use crate::schema::{AttributeDef, RecordType, SchemaError, SchemaRegistry};
use crate::sparql::{QueryOptions, SparqlResults};
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Invalid term: {0}")]
    Rdf(#[from] RdfError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Maps records onto statements in an injected repository
pub struct PersistenceEngine<R: Repository> {
    repository: R,
    schema: SchemaRegistry,
    coercion: TypeCoercion,
    subjects: Box<dyn SubjectGenerator>,
    config: MapperConfig,
}

impl<R: Repository> PersistenceEngine<R> {
    pub fn new(repository: R, schema: SchemaRegistry) -> Self {
        Self::with_config(repository, schema, MapperConfig::default())
    }

    pub fn with_config(repository: R, schema: SchemaRegistry, config: MapperConfig) -> Self {
        Self {
            repository,
            schema,
            coercion: TypeCoercion::new(),
            subjects: Box::new(UuidSubjectGenerator::with_prefix(config.subject_prefix.clone())),
            config,
        }
    }

    pub fn with_subject_generator(mut self, generator: impl SubjectGenerator + 'static) -> Self {
        self.subjects = Box::new(generator);
        self
    }

    pub fn with_coercion(mut self, coercion: TypeCoercion) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn coercion(&self) -> &TypeCoercion {
        &self.coercion
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    fn record_type(&self, name: &str) -> PersistenceResult<Arc<RecordType>> {
        Ok(Arc::clone(self.schema.get(name)?))
    }

    /// A new, unsaved record of the named type
    pub fn new_record(&self, type_name: &str) -> PersistenceResult<RecordRef> {
        Ok(RecordRef::new(self.record_type(type_name)?))
    }

    // ---- state ----

    pub fn state(&self, record: &RecordRef) -> PersistenceResult<RecordState> {
        if record.is_destroyed() {
            Ok(RecordState::Destroyed)
        } else if self.is_persisted(record)? {
            Ok(RecordState::Persisted)
        } else {
            Ok(RecordState::New)
        }
    }

    /// Whether the record has a subject with at least one `rdf:type`
    /// statement in the repository
    pub fn is_persisted(&self, record: &RecordRef) -> PersistenceResult<bool> {
        if record.is_destroyed() {
            return Ok(false);
        }
        match record.subject() {
            Some(subject) => Ok(self.repository.exists(&TriplePattern::subject_predicate(
                subject,
                rdf_type(),
            ))?),
            None => Ok(false),
        }
    }

    pub fn is_new_record(&self, record: &RecordRef) -> PersistenceResult<bool> {
        Ok(self.state(record)? == RecordState::New)
    }

    // ---- writes ----

    /// Create and save a record in one step
    ///
    /// The record is returned whether or not the save succeeded.
    pub fn create<K, V>(
        &mut self,
        type_name: &str,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> PersistenceResult<RecordRef>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let record = self.new_record(type_name)?;
        for (name, value) in attributes {
            record.set(name.as_ref(), value)?;
        }
        self.save(&record)?;
        Ok(record)
    }

    /// Save a record and, first, any new or changed records it refers to
    ///
    /// A new record gets a subject and has every non-blank attribute written;
    /// a persisted one has only its changed attributes rewritten. Returns
    /// `Ok(false)` without advancing the record when it is destroyed or when
    /// any value could not be written.
    pub fn save(&mut self, record: &RecordRef) -> PersistenceResult<bool> {
        self.save_with(record, &SaveContext::new())
    }

    /// [`save`](Self::save) nested under the saves recorded in `context`
    pub fn save_with(
        &mut self,
        record: &RecordRef,
        context: &SaveContext,
    ) -> PersistenceResult<bool> {
        if record.is_destroyed() {
            warn!("refusing to save destroyed record {:?}", record);
            return Ok(false);
        }

        let record_type = record.record_type();
        let new_record = self.is_new_record(record)?;
        let subject = match record.subject() {
            Some(subject) => subject,
            None => {
                let fragment = self.subjects.generate(&record_type);
                let subject = record_type.subject_for(&fragment)?;
                record.borrow_mut().assign_subject(subject.clone());
                subject
            }
        };

        let names: Vec<String> = {
            let current = record.borrow();
            if new_record {
                current
                    .attributes()
                    .iter()
                    .filter(|(_, value)| !value.is_blank())
                    .map(|(name, _)| name.clone())
                    .collect()
            } else {
                current.changed_attributes().map(str::to_string).collect()
            }
        };

        let nested = context.enter(subject.clone());
        let mut stored = true;
        for name in &names {
            let attribute = record_type.attribute(name)?;
            stored &= self.store_attribute(record, &subject, attribute, &nested)?;
        }

        if !stored {
            warn!(subject = subject.as_str(), "save incomplete: some values were not written");
            return Ok(false);
        }

        self.update_types(&subject, &record_type)?;
        record.borrow_mut().clear_changes();
        debug!(
            subject = subject.as_str(),
            attributes = names.len(),
            depth = context.depth(),
            "saved {}",
            record_type
        );
        Ok(true)
    }

    /// Rewrite one attribute: drop every `(subject, predicate, *)` statement,
    /// then add the current value(s)
    fn store_attribute(
        &mut self,
        record: &RecordRef,
        subject: &NamedNode,
        attribute: &AttributeDef,
        context: &SaveContext,
    ) -> PersistenceResult<bool> {
        let predicate = attribute.predicate().clone();
        self.repository.delete_all(&TriplePattern::subject_predicate(
            subject.clone(),
            predicate.clone(),
        ))?;

        let Some(value) = record.get(attribute.name()) else {
            return Ok(true);
        };

        let values = if attribute.is_collection() {
            unique_values(value)
        } else {
            vec![value]
        };

        let mut stored = true;
        for value in &values {
            stored &= self.store_value(subject, &predicate, attribute, value, context)?;
        }
        Ok(stored)
    }

    fn store_value(
        &mut self,
        subject: &NamedNode,
        predicate: &RdfPredicate,
        attribute: &AttributeDef,
        value: &Value,
        context: &SaveContext,
    ) -> PersistenceResult<bool> {
        let mut related_saved = true;
        if let Value::Record(related) = value {
            related_saved = self.save_related(related, context)?;
        }

        match self.coercion.to_rdf(value, attribute) {
            Some(object) => {
                let statement = Triple::new(subject.clone(), predicate.clone(), object);
                debug!("store {}", statement);
                self.repository.add(statement)?;
                Ok(related_saved)
            }
            None => Ok(false),
        }
    }

    /// Save a related record unless it is already being saved further up
    fn save_related(
        &mut self,
        related: &RecordRef,
        context: &SaveContext,
    ) -> PersistenceResult<bool> {
        if let Some(subject) = related.subject() {
            if context.contains(&subject) {
                debug!(
                    subject = subject.as_str(),
                    parent = context.parent_subject().map(NamedNode::as_str),
                    "skipping save of record already being saved"
                );
                return Ok(true);
            }
        }
        if related.is_changed() || self.is_new_record(related)? {
            self.save_with(related, context)
        } else {
            Ok(true)
        }
    }

    /// Make the stored `rdf:type` statements equal the type's ancestor set
    fn update_types(&mut self, subject: &NamedNode, record_type: &RecordType) -> PersistenceResult<()> {
        let declared = record_type.ancestor_types();
        let stored = self
            .repository
            .all(&TriplePattern::subject_predicate(subject.clone(), rdf_type()))?;

        let mut missing: Vec<&NamedNode> = declared.iter().collect();
        let mut stale = Vec::new();
        for statement in stored {
            let kept = match &statement.object {
                RdfObject::NamedNode(t) if declared.contains(t) => Some(t.clone()),
                _ => None,
            };
            match kept {
                Some(t) => missing.retain(|m| **m != t),
                None => stale.push(statement),
            }
        }

        for type_uri in &missing {
            self.repository
                .add(Triple::new(subject.clone(), rdf_type(), (*type_uri).clone()))?;
        }
        for statement in &stale {
            self.repository.delete(statement)?;
        }
        if !missing.is_empty() || !stale.is_empty() {
            debug!(
                subject = subject.as_str(),
                added = missing.len(),
                removed = stale.len(),
                "reconciled types"
            );
        }
        Ok(())
    }

    /// Delete every statement about a persisted record
    ///
    /// Returns `Ok(false)` for new or already destroyed records.
    pub fn destroy(&mut self, record: &RecordRef) -> PersistenceResult<bool> {
        if !self.is_persisted(record)? {
            return Ok(false);
        }
        let Some(subject) = record.subject() else {
            return Ok(false);
        };
        let removed = self.repository.delete_all(&TriplePattern::subject(subject.clone()))?;
        record.borrow_mut().mark_destroyed();
        debug!(subject = subject.as_str(), statements = removed, "destroyed record");
        Ok(true)
    }

    /// Delete every record of the named type, returning how many there were
    ///
    /// Works from the `(?, rdf:type, T)` statements in the repository; no
    /// in-memory record is consulted or updated.
    pub fn destroy_all(&mut self, type_name: &str) -> PersistenceResult<usize> {
        let record_type = self.record_type(type_name)?;
        let pattern = TriplePattern::new(
            None,
            Some(rdf_type()),
            Some(record_type.primary_type().clone().into()),
        );

        let mut subjects = Vec::new();
        self.repository
            .each(&pattern, &mut |statement: &Triple| {
                subjects.push(statement.subject.clone())
            })?;

        let mut removed = 0;
        for subject in &subjects {
            removed += self.repository.delete_all(&TriplePattern::subject(subject.clone()))?;
        }
        info!(
            record_type = record_type.name(),
            records = subjects.len(),
            statements = removed,
            "destroyed all records"
        );
        Ok(subjects.len())
    }

    // ---- reads ----

    /// Replace the record's attributes with what the repository holds
    ///
    /// A record without a subject ends up with no single values and empty
    /// collections. The changed set is cleared either way.
    pub fn reload(&self, record: &RecordRef) -> PersistenceResult<()> {
        let record_type = record.record_type();
        let subject = record.subject();

        let mut loaded = IndexMap::new();
        for (name, attribute) in record_type.attributes() {
            let value = match &subject {
                Some(subject) => self.retrieve_attribute(subject, attribute)?,
                None if attribute.is_collection() => Some(Value::List(Vec::new())),
                None => None,
            };
            if let Some(value) = value {
                loaded.insert(name.clone(), value);
            }
        }

        record.borrow_mut().load(loaded);
        Ok(())
    }

    fn retrieve_attribute(
        &self,
        subject: &NamedNode,
        attribute: &AttributeDef,
    ) -> PersistenceResult<Option<Value>> {
        let pattern = TriplePattern::subject_predicate(subject.clone(), attribute.predicate().clone());
        let value = if attribute.is_collection() {
            let values = self
                .repository
                .all(&pattern)?
                .iter()
                .map(|statement| self.read_object(&statement.object, attribute))
                .collect();
            Some(Value::List(values))
        } else {
            self.repository
                .first(&pattern)?
                .map(|statement| self.read_object(&statement.object, attribute))
        };
        Ok(value)
    }

    fn read_object(&self, object: &RdfObject, attribute: &AttributeDef) -> Value {
        self.coercion
            .from_rdf(object, attribute.datatype(), &self.schema)
    }

    /// Finder over the named record type
    pub fn finder(&self, type_name: &str) -> PersistenceResult<Finder<'_, R>> {
        Ok(Finder::new(self, self.record_type(type_name)?))
    }

    /// Whether any record of the type matches `conditions`
    pub fn exists(&self, type_name: &str, conditions: &Conditions) -> PersistenceResult<bool> {
        let record_type = self.record_type(type_name)?;
        let query = QueryCompiler::new(&self.coercion).compile_exists(&record_type, conditions)?;
        match self.repository.query(&query, &QueryOptions::default())? {
            SparqlResults::Boolean(found) => Ok(found),
            other => Err(unexpected("boolean", &other)),
        }
    }

    /// Number of records of the type matching `conditions`
    pub fn count(&self, type_name: &str, conditions: &Conditions) -> PersistenceResult<u64> {
        let record_type = self.record_type(type_name)?;
        let query = QueryCompiler::new(&self.coercion).compile_count(&record_type, conditions)?;
        let results = self
            .repository
            .query(&query, &QueryOptions::new(self.config.count_language))?;

        let count = results
            .solutions()
            .first()
            .and_then(|solution| solution.get(COUNT_VAR))
            .map(|term| {
                term.value().parse::<u64>().map_err(|_| {
                    RepositoryError::UnexpectedResult(format!("count of {}", term))
                })
            })
            .transpose()?;
        Ok(count.unwrap_or(0))
    }

    /// Subjects bound by a `SELECT ?subject` query, in result order
    pub(crate) fn select_subjects(&self, query: &str) -> PersistenceResult<Vec<NamedNode>> {
        let results = self.repository.query(query, &QueryOptions::default())?;
        if let SparqlResults::Boolean(_) = results {
            return Err(unexpected("bindings", &results));
        }

        let mut subjects = Vec::new();
        for solution in results.solutions() {
            match solution.get(SUBJECT_VAR) {
                Some(RdfTerm::NamedNode(subject)) => subjects.push(subject.clone()),
                Some(other) => warn!("ignoring non-URI subject {}", other),
                None => {}
            }
        }
        Ok(subjects)
    }
}

/// Collection values with duplicates collapsed, first occurrence kept
fn unique_values(value: Value) -> Vec<Value> {
    let items = match value {
        Value::List(items) => items,
        single => vec![single],
    };
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn unexpected(expected: &str, results: &SparqlResults) -> PersistenceError {
    let found = match results {
        SparqlResults::Boolean(_) => "boolean",
        SparqlResults::Bindings { .. } => "bindings",
    };
    RepositoryError::UnexpectedResult(format!("expected {}, got {}", expected, found)).into()
}
