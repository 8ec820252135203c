//! Statement repository interface
//!
//! The mapper never owns a triple store; it talks to one through this trait.
//! [`RdfStore`](super::RdfStore) is the in-memory implementation.

use super::types::{RdfError, Triple, TriplePattern};
use crate::sparql::{QueryOptions, SparqlError, SparqlResults};
use thiserror::Error;

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Query parsing or evaluation failed
    #[error("Query failed: {0}")]
    Query(#[from] SparqlError),

    /// Invalid term handed to the repository
    #[error("Invalid term: {0}")]
    InvalidTerm(#[from] RdfError),

    /// Backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// The query returned a result shape the caller did not ask for
    #[error("Unexpected query result: {0}")]
    UnexpectedResult(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Subject-predicate-object statement store with graph-pattern queries
pub trait Repository {
    /// Add a statement. Adding a statement that is already stored succeeds.
    fn add(&mut self, statement: Triple) -> RepositoryResult<()>;

    /// Delete a statement. Deleting an absent statement succeeds.
    fn delete(&mut self, statement: &Triple) -> RepositoryResult<()>;

    /// Delete every statement matching `pattern`, returning how many went away
    fn delete_all(&mut self, pattern: &TriplePattern) -> RepositoryResult<usize>;

    /// Whether any statement matches `pattern`
    fn exists(&self, pattern: &TriplePattern) -> RepositoryResult<bool>;

    /// Some statement matching `pattern`
    fn first(&self, pattern: &TriplePattern) -> RepositoryResult<Option<Triple>>;

    /// All statements matching `pattern`
    fn all(&self, pattern: &TriplePattern) -> RepositoryResult<Vec<Triple>>;

    /// Visit every statement matching `pattern`
    fn each(
        &self,
        pattern: &TriplePattern,
        callback: &mut dyn FnMut(&Triple),
    ) -> RepositoryResult<()> {
        for statement in self.all(pattern)? {
            callback(&statement);
        }
        Ok(())
    }

    /// Run a SPARQL query
    fn query(&self, query: &str, options: &QueryOptions) -> RepositoryResult<SparqlResults>;
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn add(&mut self, statement: Triple) -> RepositoryResult<()> {
        (**self).add(statement)
    }

    fn delete(&mut self, statement: &Triple) -> RepositoryResult<()> {
        (**self).delete(statement)
    }

    fn delete_all(&mut self, pattern: &TriplePattern) -> RepositoryResult<usize> {
        (**self).delete_all(pattern)
    }

    fn exists(&self, pattern: &TriplePattern) -> RepositoryResult<bool> {
        (**self).exists(pattern)
    }

    fn first(&self, pattern: &TriplePattern) -> RepositoryResult<Option<Triple>> {
        (**self).first(pattern)
    }

    fn all(&self, pattern: &TriplePattern) -> RepositoryResult<Vec<Triple>> {
        (**self).all(pattern)
    }

    fn query(&self, query: &str, options: &QueryOptions) -> RepositoryResult<SparqlResults> {
        (**self).query(query, options)
    }
}
