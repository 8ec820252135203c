//! Graph pattern query compiler
//!
//! Every query starts from the record type triple `?subject rdf:type <T>` and
//! adds one triple per condition value, all joined with ` . `. Terms are
//! spliced in N-Triples syntax so the output is also valid SPARQL.

use super::{Conditions, QueryError, QueryResult};
use crate::mapping::{TypeCoercion, Value};
use crate::rdf::{rdf_type, NamedNode, RdfObject};
use crate::schema::{RecordType, ID_ATTRIBUTE};
use tracing::debug;

/// Variable bound to matching subjects
pub const SUBJECT_VAR: &str = "subject";
/// Variable bound to the aggregate in count queries
pub const COUNT_VAR: &str = "count";

/// Builds `SELECT`, `ASK` and `COUNT` queries from a record type and conditions
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler<'a> {
    coercion: &'a TypeCoercion,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(coercion: &'a TypeCoercion) -> Self {
        Self { coercion }
    }

    /// `SELECT ?subject WHERE { ... }` with an optional `LIMIT`
    pub fn compile_find(
        &self,
        record_type: &RecordType,
        conditions: &Conditions,
        limit: Option<usize>,
    ) -> QueryResult<String> {
        let mut query = format!(
            "SELECT ?{} WHERE {{ {} }}",
            SUBJECT_VAR,
            self.graph_pattern(record_type, conditions)?
        );
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        debug!(record_type = record_type.name(), "compiled find: {}", query);
        Ok(query)
    }

    /// `ASK { ... }`
    pub fn compile_exists(
        &self,
        record_type: &RecordType,
        conditions: &Conditions,
    ) -> QueryResult<String> {
        let query = format!("ASK {{ {} }}", self.graph_pattern(record_type, conditions)?);
        debug!(record_type = record_type.name(), "compiled exists: {}", query);
        Ok(query)
    }

    /// `SELECT (COUNT(?subject) AS ?count) WHERE { ... }`
    ///
    /// Aggregates need SPARQL 1.1; the caller must ask the repository for it.
    pub fn compile_count(
        &self,
        record_type: &RecordType,
        conditions: &Conditions,
    ) -> QueryResult<String> {
        let query = format!(
            "SELECT (COUNT(?{}) AS ?{}) WHERE {{ {} }}",
            SUBJECT_VAR,
            COUNT_VAR,
            self.graph_pattern(record_type, conditions)?
        );
        debug!(record_type = record_type.name(), "compiled count: {}", query);
        Ok(query)
    }

    /// The conjunctive pattern shared by all three query forms
    pub fn graph_pattern(
        &self,
        record_type: &RecordType,
        conditions: &Conditions,
    ) -> QueryResult<String> {
        let mut patterns = vec![format!(
            "?{} {} {}",
            SUBJECT_VAR,
            rdf_type(),
            record_type.primary_type()
        )];
        for (attribute, value) in conditions.iter() {
            self.condition_patterns(record_type, attribute, value, &mut patterns)?;
        }
        Ok(patterns.join(" . "))
    }

    fn condition_patterns(
        &self,
        record_type: &RecordType,
        attribute: &str,
        value: &Value,
        patterns: &mut Vec<String>,
    ) -> QueryResult<()> {
        if let Value::List(items) = value {
            for item in items {
                self.condition_patterns(record_type, attribute, item, patterns)?;
            }
            return Ok(());
        }

        if attribute == ID_ATTRIBUTE {
            let subject = self.identity(record_type, value)?;
            patterns.push(format!(
                "{} {} {}",
                subject,
                rdf_type(),
                record_type.primary_type()
            ));
        } else {
            let def = record_type.attribute(attribute)?;
            let object = self.render(attribute, def.datatype(), value)?;
            patterns.push(format!("?{} {} {}", SUBJECT_VAR, def.predicate(), object));
        }
        Ok(())
    }

    /// Subject addressed by an `id` condition
    fn identity(&self, record_type: &RecordType, value: &Value) -> QueryResult<NamedNode> {
        match value {
            Value::Uri(uri) => Ok(uri.clone()),
            Value::Record(record) => record
                .subject()
                .ok_or_else(|| QueryError::UnsavedReference(ID_ATTRIBUTE.to_string())),
            other => {
                let fragment = other.lexical_form().ok_or_else(|| QueryError::Unrepresentable {
                    attribute: ID_ATTRIBUTE.to_string(),
                    value: other.to_string(),
                })?;
                Ok(record_type.subject_for(&fragment)?)
            }
        }
    }

    fn render(&self, attribute: &str, datatype: &NamedNode, value: &Value) -> QueryResult<RdfObject> {
        match value {
            Value::Uri(uri) => Ok(RdfObject::NamedNode(uri.clone())),
            Value::Record(record) => record
                .subject()
                .map(RdfObject::NamedNode)
                .ok_or_else(|| QueryError::UnsavedReference(attribute.to_string())),
            other => self
                .coercion
                .to_literal(other, datatype)
                .or_else(|| other.natural_literal())
                .map(RdfObject::Literal)
                .ok_or_else(|| QueryError::Unrepresentable {
                    attribute: attribute.to_string(),
                    value: other.to_string(),
                }),
        }
    }
}
