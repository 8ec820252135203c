//! Triplemap
//!
//! An object-to-triple mapping layer: records with typed attributes are
//! persisted into, and read back from, an RDF statement repository through
//! generated SPARQL graph-pattern queries.
//!
//! # Components
//!
//! - [`schema`]: record types, their RDF classes and attribute → predicate tables
//! - [`query`]: compiles `SELECT` / `ASK` / `COUNT` queries from conditions
//! - [`mapping`]: coercion between native values and XML Schema literals
//! - [`persistence`]: save, reload, destroy and finders over a repository
//!
//! Supporting modules:
//!
//! - [`rdf`]: terms, statements, the [`Repository`] interface and the
//!   in-memory [`RdfStore`]
//! - [`sparql`]: query evaluation for the in-memory store
//! - [`config`]: YAML/JSON configuration and repository bootstrap
//!
//! ## Example Usage
//!
//! ```rust
//! use triplemap::{Conditions, PersistenceEngine, RdfStore, RecordTypeBuilder, SchemaRegistry};
//!
//! let person = RecordTypeBuilder::new("Person", "foaf:Person", "http://example.org/people")
//!     .attribute("name", "foaf:name", "xsd:string")
//!     .collection("interests", "foaf:topic_interest", "xsd:string")
//!     .build()
//!     .unwrap();
//! let schema = SchemaRegistry::new().with(person).unwrap();
//! let mut engine = PersistenceEngine::new(RdfStore::new(), schema);
//!
//! let ada = engine.new_record("Person").unwrap();
//! ada.set("name", "Ada").unwrap();
//! ada.set("interests", vec!["math", "logic"]).unwrap();
//! assert!(engine.save(&ada).unwrap());
//!
//! let by_name = Conditions::new().with("name", "Ada");
//! assert!(engine.exists("Person", &by_name).unwrap());
//! assert_eq!(engine.count("Person", &Conditions::new()).unwrap(), 1);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod mapping;
pub mod persistence;
pub mod query;
pub mod rdf;
pub mod schema;
pub mod sparql;

// Re-export main types for convenience
pub use config::{open_repository, ConfigError, ConfigResult, MapperConfig, RepositoryOptions};

pub use mapping::{TypeCoercion, Value, XsdDatatype};

pub use persistence::{
    Finder, PersistenceEngine, PersistenceError, PersistenceResult, Record, RecordIter,
    RecordRef, RecordState, SaveContext, SequentialSubjectGenerator, SubjectGenerator,
    UuidSubjectGenerator,
};

pub use query::{Conditions, QueryCompiler, QueryError, QueryResult};

pub use rdf::{
    BlankNode, Literal, NamedNode, NamespaceManager, RdfError, RdfObject, RdfPredicate,
    RdfStore, RdfSubject, RdfTerm, Repository, RepositoryError, RepositoryResult, Triple,
    TriplePattern,
};

pub use schema::{
    AttributeDef, Cardinality, RecordType, RecordTypeBuilder, SchemaError, SchemaRegistry,
};

pub use sparql::{QueryLanguage, QueryOptions, SparqlEngine, SparqlError, SparqlResults};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
