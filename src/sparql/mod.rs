//! SPARQL query support
//!
//! Parsing is delegated to spargebra; evaluation covers the conjunctive
//! SELECT / ASK / COUNT queries the mapper compiles.
//!
//! # Example
//!
//! ```rust
//! use triplemap::rdf::RdfStore;
//! use triplemap::sparql::{QueryOptions, SparqlEngine};
//!
//! let store = RdfStore::new();
//! let engine = SparqlEngine::new(&store);
//!
//! let results = engine
//!     .query("SELECT ?s WHERE { ?s ?p ?o }", &QueryOptions::default())
//!     .unwrap();
//! assert!(results.solutions().is_empty());
//! ```

mod executor;
mod parser;
mod results;

pub use executor::{ExecutionError, SparqlExecutor};
pub use parser::{ParseError as SparqlParseError, SparqlParser};
pub use results::{QuerySolution, SparqlResults};

use crate::rdf::RdfStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SPARQL errors
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] SparqlParseError),

    /// Execution error
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// The requested dialect cannot express the query
    #[error("{0:?} does not support {1}")]
    Dialect(QueryLanguage, String),
}

pub type SparqlResult<T> = Result<T, SparqlError>;

/// Query language dialect requested from the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    /// SPARQL 1.0: no aggregates
    #[default]
    Sparql10,
    /// SPARQL 1.1: needed for `COUNT`
    Sparql11,
}

/// Per-query options passed to [`Repository::query`](crate::rdf::Repository::query)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// Dialect the query text is written in
    pub language: QueryLanguage,
}

impl QueryOptions {
    /// Options for the given dialect
    pub fn new(language: QueryLanguage) -> Self {
        Self { language }
    }
}

/// SPARQL query engine over an in-memory store
pub struct SparqlEngine<'a> {
    executor: SparqlExecutor<'a>,
}

impl<'a> SparqlEngine<'a> {
    /// Create a new SPARQL engine
    pub fn new(store: &'a RdfStore) -> Self {
        Self {
            executor: SparqlExecutor::new(store),
        }
    }

    /// Execute a SPARQL query
    pub fn query(&self, query_str: &str, options: &QueryOptions) -> SparqlResult<SparqlResults> {
        let query = SparqlParser::parse(query_str)?;

        if options.language == QueryLanguage::Sparql10 && SparqlParser::uses_aggregates(&query) {
            return Err(SparqlError::Dialect(options.language, "aggregates".to_string()));
        }

        Ok(self.executor.execute(&query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_empty_store() {
        let store = RdfStore::new();
        let engine = SparqlEngine::new(&store);

        let result = engine.query("SELECT * WHERE { ?s ?p ?o }", &QueryOptions::default());
        assert!(result.unwrap().solutions().is_empty());
    }

    #[test]
    fn test_count_requires_sparql11() {
        let store = RdfStore::new();
        let engine = SparqlEngine::new(&store);
        let query = "SELECT (COUNT(?s) AS ?count) WHERE { ?s ?p ?o }";

        assert!(matches!(
            engine.query(query, &QueryOptions::new(QueryLanguage::Sparql10)),
            Err(SparqlError::Dialect(..))
        ));
        assert!(engine
            .query(query, &QueryOptions::new(QueryLanguage::Sparql11))
            .is_ok());
    }

    #[test]
    fn test_parse_error() {
        let store = RdfStore::new();
        let engine = SparqlEngine::new(&store);
        assert!(matches!(
            engine.query("SELECT WHERE", &QueryOptions::default()),
            Err(SparqlError::Parse(_))
        ));
    }
}
