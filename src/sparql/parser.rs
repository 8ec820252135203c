//! SPARQL parser using spargebra library

use spargebra::algebra::GraphPattern;
use spargebra::Query;
use thiserror::Error;

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Syntax error
    #[error("Syntax error: {0}")]
    Syntax(String),
}

/// SPARQL parser
pub struct SparqlParser;

impl SparqlParser {
    /// Parse a SPARQL query string into its algebra
    pub fn parse(query: &str) -> Result<Query, ParseError> {
        Query::parse(query, None).map_err(|e| ParseError::Syntax(e.to_string()))
    }

    /// Whether the query needs SPARQL 1.1 aggregates
    pub fn uses_aggregates(query: &Query) -> bool {
        match query {
            Query::Select { pattern, .. }
            | Query::Ask { pattern, .. }
            | Query::Construct { pattern, .. }
            | Query::Describe { pattern, .. } => pattern_uses_aggregates(pattern),
        }
    }
}

fn pattern_uses_aggregates(pattern: &GraphPattern) -> bool {
    match pattern {
        GraphPattern::Group { .. } => true,
        GraphPattern::Project { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. }
        | GraphPattern::Extend { inner, .. }
        | GraphPattern::Filter { inner, .. } => pattern_uses_aggregates(inner),
        GraphPattern::Join { left, right } => {
            pattern_uses_aggregates(left) || pattern_uses_aggregates(right)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select() {
        let query = SparqlParser::parse("SELECT ?s WHERE { ?s ?p ?o }").unwrap();
        assert!(matches!(query, Query::Select { .. }));
        assert!(!SparqlParser::uses_aggregates(&query));
    }

    #[test]
    fn test_parse_ask() {
        let query = SparqlParser::parse("ASK { ?s ?p ?o }").unwrap();
        assert!(matches!(query, Query::Ask { .. }));
    }

    #[test]
    fn test_detects_count() {
        let query =
            SparqlParser::parse("SELECT (COUNT(?s) AS ?count) WHERE { ?s ?p ?o }").unwrap();
        assert!(SparqlParser::uses_aggregates(&query));
    }

    #[test]
    fn test_syntax_error() {
        assert!(SparqlParser::parse("SELECT WHERE {").is_err());
    }
}
