//! RDF data model and statement repositories
//!
//! This module provides:
//! - RDF terms and statements (subject-predicate-object)
//! - Triple patterns for statement lookups
//! - The [`Repository`] interface the mapper persists through
//! - An indexed in-memory [`RdfStore`]
//! - Vocabulary constants and compact IRI expansion
//!
//! # Example
//!
//! ```rust
//! use triplemap::rdf::{Literal, NamedNode, RdfPredicate, RdfStore, Repository, Triple, TriplePattern};
//!
//! let mut store = RdfStore::new();
//!
//! let subject = NamedNode::new("http://example.org/alice").unwrap();
//! let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let object = Literal::new_simple_literal("Alice");
//!
//! store.add(Triple::new(subject.clone(), predicate, object)).unwrap();
//!
//! let results = store.all(&TriplePattern::subject(subject)).unwrap();
//! assert_eq!(results.len(), 1);
//! ```

mod namespace;
mod repository;
mod store;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    RdfTerm, Triple, TriplePattern,
};

pub use repository::{Repository, RepositoryError, RepositoryResult};

pub use store::{RdfStore, RdfStoreError, RdfStoreResult};

pub use namespace::{rdf_type, xsd_integer, NamespaceManager, RDFS_NS, RDF_NS, XSD_NS};
