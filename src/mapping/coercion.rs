//! Conversion between native values and RDF objects

use super::datatype::XsdDatatype;
use super::value::Value;
use crate::persistence::RecordRef;
use crate::rdf::{Literal, NamedNode, RdfObject};
use crate::schema::{AttributeDef, SchemaRegistry};
use std::collections::HashMap;
use tracing::warn;

/// Type coercion engine
///
/// Holds the datatype IRI → native wrapper table. Every XML Schema datatype
/// in [`XsdDatatype`] is registered by default; further IRIs can be mapped
/// onto an existing wrapper with [`register`](Self::register).
#[derive(Debug, Clone)]
pub struct TypeCoercion {
    wrappers: HashMap<NamedNode, XsdDatatype>,
}

impl TypeCoercion {
    pub fn new() -> Self {
        Self {
            wrappers: XsdDatatype::ALL
                .into_iter()
                .map(|dt| (dt.iri(), dt))
                .collect(),
        }
    }

    /// Read and write literals of `datatype` with the `wrapper` lexical rules
    pub fn register(&mut self, datatype: NamedNode, wrapper: XsdDatatype) {
        self.wrappers.insert(datatype, wrapper);
    }

    pub fn wrapper(&self, datatype: &NamedNode) -> Option<XsdDatatype> {
        self.wrappers.get(datatype).copied()
    }

    /// Literal for `value` typed as `datatype`
    ///
    /// The value's string form is reparsed under `datatype` and written in
    /// canonical form; `None` means the value cannot be represented there.
    /// A value already of that datatype passes through only when no wrapper
    /// is registered for it.
    pub fn to_literal(&self, value: &Value, datatype: &NamedNode) -> Option<Literal> {
        if let Some(natural) = value.natural_literal() {
            if natural.datatype() == *datatype && self.wrapper(datatype).is_none() {
                return Some(natural);
            }
        }
        let lexical = value.lexical_form()?;
        let canonical = self.wrapper(datatype)?.canonicalize(&lexical)?;
        Some(Literal::new_typed_literal(canonical, datatype.clone()))
    }

    /// Object node for one value of `attribute`
    ///
    /// URIs and saved records become resource nodes; everything else is
    /// coerced to a literal of the attribute's datatype. Unrepresentable
    /// values, unsaved records and nested lists yield `None`.
    pub fn to_rdf(&self, value: &Value, attribute: &AttributeDef) -> Option<RdfObject> {
        let object = match value {
            Value::Uri(uri) => Some(RdfObject::NamedNode(uri.clone())),
            Value::Record(record) => record.subject().map(RdfObject::NamedNode),
            Value::List(_) => None,
            other => self
                .to_literal(other, attribute.datatype())
                .map(RdfObject::Literal),
        };
        if object.is_none() {
            warn!(
                attribute = attribute.name(),
                datatype = attribute.datatype().as_str(),
                "cannot represent {} in the declared datatype",
                value
            );
        }
        object
    }

    /// Native value for a stored object read back under `datatype`
    ///
    /// A datatype naming a registered record type yields a related record
    /// bound to the object's subject. A registered XML Schema wrapper yields
    /// the wrapped native value. Anything else comes back raw.
    pub fn from_rdf(
        &self,
        object: &RdfObject,
        datatype: &NamedNode,
        schema: &SchemaRegistry,
    ) -> Value {
        match object {
            RdfObject::NamedNode(node) => match schema.by_type_uri(datatype) {
                Some(record_type) => {
                    Value::Record(RecordRef::for_subject(record_type.clone(), node.clone()))
                }
                None => Value::Uri(node.clone()),
            },
            // Blank nodes have no native form
            RdfObject::BlankNode(blank) => Value::String(blank.to_string()),
            RdfObject::Literal(literal) => self
                .wrapper(datatype)
                .and_then(|wrapper| wrapper.parse(literal.value()))
                .unwrap_or_else(|| Value::Literal(literal.clone())),
        }
    }
}

impl Default for TypeCoercion {
    fn default() -> Self {
        Self::new()
    }
}
