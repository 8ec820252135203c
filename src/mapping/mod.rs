//! Type coercion engine
//!
//! Bidirectional conversion between native attribute [`Value`]s and RDF
//! objects tagged with XML Schema datatypes. Coercion is lossy-safe: a value
//! that cannot be expressed in its declared datatype is dropped, never
//! written in a mangled form.

mod coercion;
mod datatype;
mod value;

pub use coercion::TypeCoercion;
pub use datatype::XsdDatatype;
pub use value::Value;
