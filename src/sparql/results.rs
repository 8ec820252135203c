//! SPARQL query results

use crate::rdf::RdfTerm;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::HashMap;

/// Query solution (variable bindings)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySolution {
    /// Variable name → RDF term bindings
    pub bindings: HashMap<String, RdfTerm>,
}

impl QuerySolution {
    /// Create a new query solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&RdfTerm> {
        self.bindings.get(variable)
    }

    /// Add a binding
    pub fn bind(&mut self, variable: impl Into<String>, term: RdfTerm) {
        self.bindings.insert(variable.into(), term);
    }

    /// Two solutions are compatible when every shared variable has the same value
    pub fn is_compatible(&self, other: &QuerySolution) -> bool {
        self.bindings
            .iter()
            .all(|(var, term)| other.get(var).map_or(true, |t| t == term))
    }

    /// Union of two compatible solutions
    pub fn merge(&self, other: &QuerySolution) -> QuerySolution {
        let mut merged = self.clone();
        for (var, term) in &other.bindings {
            merged.bindings.entry(var.clone()).or_insert_with(|| term.clone());
        }
        merged
    }

    /// Keep only the listed variables
    pub fn project(&self, variables: &[String]) -> QuerySolution {
        QuerySolution {
            bindings: variables
                .iter()
                .filter_map(|v| self.bindings.get(v).map(|t| (v.clone(), t.clone())))
                .collect(),
        }
    }
}

/// SPARQL query results
#[derive(Debug, Clone, PartialEq)]
pub enum SparqlResults {
    /// Bindings from SELECT query
    Bindings {
        /// Variables
        variables: Vec<String>,
        /// Solutions
        solutions: Vec<QuerySolution>,
    },

    /// Boolean result from ASK query
    Boolean(bool),
}

impl SparqlResults {
    /// Create empty bindings result
    pub fn empty() -> Self {
        SparqlResults::Bindings {
            variables: Vec::new(),
            solutions: Vec::new(),
        }
    }

    /// Solutions of a SELECT result; empty for ASK
    pub fn solutions(&self) -> &[QuerySolution] {
        match self {
            SparqlResults::Bindings { solutions, .. } => solutions,
            SparqlResults::Boolean(_) => &[],
        }
    }

    /// Render as SPARQL 1.1 Query Results JSON
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_json())
    }

    fn to_json(&self) -> JsonValue {
        match self {
            SparqlResults::Boolean(b) => json!({ "head": {}, "boolean": b }),
            SparqlResults::Bindings { variables, solutions } => {
                let bindings: Vec<JsonValue> = solutions
                    .iter()
                    .map(|solution| {
                        let mut row = Map::new();
                        for var in variables {
                            if let Some(term) = solution.get(var) {
                                row.insert(var.clone(), term_to_json(term));
                            }
                        }
                        JsonValue::Object(row)
                    })
                    .collect();
                json!({ "head": { "vars": variables }, "results": { "bindings": bindings } })
            }
        }
    }
}

fn term_to_json(term: &RdfTerm) -> JsonValue {
    match term {
        RdfTerm::NamedNode(n) => json!({ "type": "uri", "value": n.as_str() }),
        RdfTerm::BlankNode(b) => json!({ "type": "bnode", "value": b.as_str() }),
        RdfTerm::Literal(l) => {
            let mut obj = Map::new();
            obj.insert("type".into(), json!("literal"));
            obj.insert("value".into(), json!(l.value()));
            if let Some(lang) = l.language() {
                obj.insert("xml:lang".into(), json!(lang));
            } else {
                obj.insert("datatype".into(), json!(l.datatype().as_str()));
            }
            JsonValue::Object(obj)
        }
    }
}
