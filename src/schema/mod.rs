//! Schema registry
//!
//! Static per-type tables mapping attribute names to predicates, datatypes
//! and cardinalities. Built once at startup and never mutated afterwards.

mod record_type;

pub use record_type::{AttributeDef, Cardinality, RecordType, RecordTypeBuilder, ID_ATTRIBUTE};

use crate::rdf::{NamedNode, RdfError};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Schema errors
///
/// These signal programming or configuration mistakes (referencing something
/// that was never declared), not conditions a caller is expected to recover
/// from.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{record_type} has no attribute {attribute}")]
    UnknownAttribute {
        record_type: String,
        attribute: String,
    },

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Attribute name {0} is reserved")]
    ReservedAttribute(String),

    #[error("{record_type} declares {attribute} twice")]
    DuplicateAttribute {
        record_type: String,
        attribute: String,
    },

    #[error("Record type {0} is already registered")]
    DuplicateRecordType(String),

    #[error(transparent)]
    InvalidIri(#[from] RdfError),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// All record types known to a mapper, by name and by class URI
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    by_name: IndexMap<String, Arc<RecordType>>,
    by_type_uri: HashMap<NamedNode, Arc<RecordType>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type under its name and its own class URIs
    pub fn register(&mut self, record_type: Arc<RecordType>) -> SchemaResult<()> {
        if self.by_name.contains_key(record_type.name()) {
            return Err(SchemaError::DuplicateRecordType(record_type.name().to_string()));
        }
        for type_uri in record_type.types() {
            self.by_type_uri
                .entry(type_uri.clone())
                .or_insert_with(|| Arc::clone(&record_type));
        }
        self.by_name
            .insert(record_type.name().to_string(), record_type);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, record_type: Arc<RecordType>) -> SchemaResult<Self> {
        self.register(record_type)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> SchemaResult<&Arc<RecordType>> {
        self.by_name
            .get(name)
            .ok_or_else(|| SchemaError::UnknownRecordType(name.to_string()))
    }

    /// The record type whose instances carry `type_uri`
    pub fn by_type_uri(&self, type_uri: &NamedNode) -> Option<&Arc<RecordType>> {
        self.by_type_uri.get(type_uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RecordType>> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
