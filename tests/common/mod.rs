//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Once};
use triplemap::rdf::{NamespaceManager, Repository, RepositoryError, RepositoryResult};
use triplemap::sparql::{QueryOptions, SparqlResults};
use triplemap::{
    PersistenceEngine, RdfStore, RecordType, RecordTypeBuilder, SchemaRegistry,
    SequentialSubjectGenerator, Triple, TriplePattern,
};

pub const EX: &str = "http://example.org/";

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn namespaces() -> NamespaceManager {
    NamespaceManager::new().with_prefix("ex", EX)
}

pub fn person_type() -> Arc<RecordType> {
    RecordTypeBuilder::new("Person", "ex:Person", "http://example.org/people")
        .namespaces(namespaces())
        .attribute("name", "ex:name", "xsd:string")
        .collection("tags", "ex:tag", "xsd:string")
        .attribute("age", "ex:age", "xsd:integer")
        .attribute("born", "ex:born", "xsd:date")
        .attribute("score", "ex:score", "xsd:double")
        .attribute("active", "ex:active", "xsd:boolean")
        .attribute("homepage", "ex:homepage", "xsd:anyURI")
        .attribute("friend", "ex:friend", "ex:Person")
        .collection("knows", "ex:knows", "ex:Person")
        .build()
        .unwrap()
}

pub fn schema() -> SchemaRegistry {
    let person = person_type();
    let engineer = RecordTypeBuilder::new("Engineer", "ex:Engineer", "http://example.org/people")
        .namespaces(namespaces())
        .extends(&person)
        .also_type("ex:Worker")
        .attribute("discipline", "ex:discipline", "xsd:string")
        .build()
        .unwrap();
    let book = RecordTypeBuilder::new("Book", "ex:Book", "http://example.org/books")
        .namespaces(namespaces())
        .attribute("title", "ex:title", "xsd:string")
        .attribute("author", "ex:author", "ex:Person")
        .build()
        .unwrap();

    SchemaRegistry::new()
        .with(person)
        .unwrap()
        .with(engineer)
        .unwrap()
        .with(book)
        .unwrap()
}

/// Engine over an empty in-memory store with predictable subjects
pub fn engine() -> PersistenceEngine<CountingRepository<RdfStore>> {
    init_tracing();
    PersistenceEngine::new(CountingRepository::new(RdfStore::new()), schema())
        .with_subject_generator(SequentialSubjectGenerator::new())
}

/// Repository wrapper counting statement writes
pub struct CountingRepository<R> {
    pub inner: R,
    writes: usize,
}

impl<R: Repository> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, writes: 0 }
    }

    /// `add`, `delete` and `delete_all` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn reset(&mut self) {
        self.writes = 0;
    }
}

impl<R: Repository> Repository for CountingRepository<R> {
    fn add(&mut self, statement: Triple) -> RepositoryResult<()> {
        self.writes += 1;
        self.inner.add(statement)
    }

    fn delete(&mut self, statement: &Triple) -> RepositoryResult<()> {
        self.writes += 1;
        self.inner.delete(statement)
    }

    fn delete_all(&mut self, pattern: &TriplePattern) -> RepositoryResult<usize> {
        self.writes += 1;
        self.inner.delete_all(pattern)
    }

    fn exists(&self, pattern: &TriplePattern) -> RepositoryResult<bool> {
        self.inner.exists(pattern)
    }

    fn first(&self, pattern: &TriplePattern) -> RepositoryResult<Option<Triple>> {
        self.inner.first(pattern)
    }

    fn all(&self, pattern: &TriplePattern) -> RepositoryResult<Vec<Triple>> {
        self.inner.all(pattern)
    }

    fn query(&self, query: &str, options: &QueryOptions) -> RepositoryResult<SparqlResults> {
        self.inner.query(query, options)
    }
}

/// Repository whose writes always fail
pub struct ReadOnlyRepository(pub RdfStore);

impl Repository for ReadOnlyRepository {
    fn add(&mut self, _statement: Triple) -> RepositoryResult<()> {
        Err(RepositoryError::Storage("read-only repository".to_string()))
    }

    fn delete(&mut self, _statement: &Triple) -> RepositoryResult<()> {
        Err(RepositoryError::Storage("read-only repository".to_string()))
    }

    fn delete_all(&mut self, _pattern: &TriplePattern) -> RepositoryResult<usize> {
        Err(RepositoryError::Storage("read-only repository".to_string()))
    }

    fn exists(&self, pattern: &TriplePattern) -> RepositoryResult<bool> {
        self.0.exists(pattern)
    }

    fn first(&self, pattern: &TriplePattern) -> RepositoryResult<Option<Triple>> {
        self.0.first(pattern)
    }

    fn all(&self, pattern: &TriplePattern) -> RepositoryResult<Vec<Triple>> {
        self.0.all(pattern)
    }

    fn query(&self, query: &str, options: &QueryOptions) -> RepositoryResult<SparqlResults> {
        self.0.query(query, options)
    }
}
