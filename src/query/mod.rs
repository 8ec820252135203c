//! Query compiler
//!
//! Turns a record type plus a [`Conditions`] set into SPARQL text for the
//! finder operations:
//! - `SELECT ?subject` for enumeration, with optional `LIMIT`
//! - `ASK` for existence checks
//! - `SELECT (COUNT(?subject) AS ?count)` for counting
//!
//! Only conjunctive triple patterns are emitted: no `UNION`, `OPTIONAL` or
//! `FILTER`.

mod compiler;
mod conditions;

pub use compiler::{QueryCompiler, COUNT_VAR, SUBJECT_VAR};
pub use conditions::Conditions;

use crate::rdf::RdfError;
use crate::schema::SchemaError;
use thiserror::Error;

/// Query compilation errors
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A condition refers to a record that has no subject yet
    #[error("Condition on {0} refers to an unsaved record")]
    UnsavedReference(String),

    #[error("Condition on {attribute} cannot be expressed: {value}")]
    Unrepresentable { attribute: String, value: String },

    #[error(transparent)]
    InvalidTerm(#[from] RdfError),
}

pub type QueryResult<T> = Result<T, QueryError>;
