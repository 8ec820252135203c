//! Vocabulary constants and compact IRI expansion
//!
//! Schema declarations may name types, predicates and datatypes as
//! `prefix:local`; [`NamespaceManager::resolve`] turns those into full IRIs.

use super::types::{NamedNode, RdfPredicate};
use std::collections::HashMap;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// `rdf:type`, the predicate linking a subject to its record types
pub fn rdf_type() -> RdfPredicate {
    RdfPredicate::from(NamedNode::from(oxrdf::vocab::rdf::TYPE))
}

/// `xsd:integer`
pub fn xsd_integer() -> NamedNode {
    NamedNode::from(oxrdf::vocab::xsd::INTEGER)
}

/// Prefix table, seeded with the common vocabularies
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    prefixes: HashMap<String, String>,
}

impl NamespaceManager {
    pub fn new() -> Self {
        let mut mgr = Self {
            prefixes: HashMap::new(),
        };

        mgr.add_prefix("rdf", RDF_NS);
        mgr.add_prefix("rdfs", RDFS_NS);
        mgr.add_prefix("xsd", XSD_NS);
        mgr.add_prefix("owl", "http://www.w3.org/2002/07/owl#");
        mgr.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        mgr.add_prefix("dc", "http://purl.org/dc/elements/1.1/");
        mgr.add_prefix("dcterms", "http://purl.org/dc/terms/");

        mgr
    }

    /// Register or replace a prefix
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.add_prefix(prefix, iri);
        self
    }

    /// Namespace IRI bound to `prefix`
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expand `iri` when it is a compact IRI with a known prefix, otherwise
    /// return it unchanged.
    ///
    /// `scheme://...` and unknown prefixes (`urn:`, `mailto:`) pass through.
    pub fn resolve(&self, iri: &str) -> String {
        match iri.split_once(':') {
            Some((prefix, local)) if !local.starts_with("//") => match self.namespace(prefix) {
                Some(ns) => format!("{}{}", ns, local),
                None => iri.to_string(),
            },
            _ => iri.to_string(),
        }
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefixes() {
        let mgr = NamespaceManager::new();

        assert_eq!(mgr.namespace("rdf"), Some(RDF_NS));
        assert_eq!(mgr.namespace("xsd"), Some(XSD_NS));
        assert_eq!(mgr.namespace("nope"), None);
    }

    #[test]
    fn test_resolve() {
        let mgr = NamespaceManager::new().with_prefix("ex", "http://example.org/");

        assert_eq!(mgr.resolve("foaf:name"), "http://xmlns.com/foaf/0.1/name");
        assert_eq!(mgr.resolve("ex:alice"), "http://example.org/alice");
        assert_eq!(mgr.resolve("http://example.org/bob"), "http://example.org/bob");
        assert_eq!(mgr.resolve("urn:isbn:123"), "urn:isbn:123");
        assert_eq!(mgr.resolve("Person"), "Person");
    }

    #[test]
    fn test_prefix_override() {
        let mut mgr = NamespaceManager::new();
        mgr.add_prefix("foaf", "http://example.org/foaf#");
        assert_eq!(mgr.resolve("foaf:name"), "http://example.org/foaf#name");
    }

    #[test]
    fn test_vocab() {
        assert_eq!(rdf_type().as_named_node().as_str(), format!("{}type", RDF_NS));
        assert_eq!(xsd_integer().as_str(), format!("{}integer", XSD_NS));
    }
}
