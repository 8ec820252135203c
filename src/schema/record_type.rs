//! Record type declarations
//!
//! A record type names the RDF class(es) its instances belong to, the base
//! URI their subjects live under, and a table of attributes mapped to
//! predicates. Types are built once and shared behind `Arc`.

use super::{SchemaError, SchemaResult};
use crate::rdf::{NamedNode, NamespaceManager, RdfPredicate, RdfResult};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::sync::Arc;

/// Reserved condition/attribute name addressing the subject itself
pub const ID_ATTRIBUTE: &str = "id";

/// Whether an attribute holds one value or an unordered set of values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Collection,
}

/// Attribute → predicate mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    name: String,
    predicate: RdfPredicate,
    datatype: NamedNode,
    cardinality: Cardinality,
}

impl AttributeDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &RdfPredicate {
        &self.predicate
    }

    /// XML Schema datatype for literal attributes, or the related record
    /// type's class URI for reference attributes
    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Collection
    }
}

/// Schema of one kind of record
#[derive(Debug)]
pub struct RecordType {
    name: String,
    types: Vec<NamedNode>,
    ancestor_types: Vec<NamedNode>,
    parent: Option<Arc<RecordType>>,
    attributes: IndexMap<String, AttributeDef>,
    base_uri: String,
}

impl RecordType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class used for finder type patterns and bulk deletes
    pub fn primary_type(&self) -> &NamedNode {
        &self.types[0]
    }

    /// Classes declared by this type itself
    pub fn types(&self) -> &[NamedNode] {
        &self.types
    }

    /// Own classes followed by every inherited one, without duplicates
    pub fn ancestor_types(&self) -> &[NamedNode] {
        &self.ancestor_types
    }

    pub fn parent(&self) -> Option<&Arc<RecordType>> {
        self.parent.as_ref()
    }

    /// Whether `other` is this type or one of its ancestors
    pub fn is_a(&self, other: &RecordType) -> bool {
        self.name == other.name || self.parent.as_ref().is_some_and(|p| p.is_a(other))
    }

    /// Declared attributes in declaration order, inherited ones first
    pub fn attributes(&self) -> &IndexMap<String, AttributeDef> {
        &self.attributes
    }

    /// Look up an attribute; undeclared names are a schema error
    pub fn attribute(&self, name: &str) -> SchemaResult<&AttributeDef> {
        self.attributes
            .get(name)
            .ok_or_else(|| SchemaError::UnknownAttribute {
                record_type: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Subject URI for a fragment: the base URI with its fragment replaced
    pub fn subject_for(&self, fragment: &str) -> RdfResult<NamedNode> {
        let base = self
            .base_uri
            .split_once('#')
            .map_or(self.base_uri.as_str(), |(base, _)| base);
        NamedNode::new(format!("{}#{}", base, fragment))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for [`RecordType`]
///
/// IRIs may be written in compact `prefix:local` form when the prefix is
/// known to the builder's [`NamespaceManager`].
#[derive(Debug, Clone)]
pub struct RecordTypeBuilder {
    name: String,
    types: Vec<String>,
    base_uri: String,
    parent: Option<Arc<RecordType>>,
    attributes: Vec<(String, String, String, Cardinality)>,
    namespaces: NamespaceManager,
}

impl RecordTypeBuilder {
    pub fn new(
        name: impl Into<String>,
        type_uri: impl Into<String>,
        base_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            types: vec![type_uri.into()],
            base_uri: base_uri.into(),
            parent: None,
            attributes: Vec::new(),
            namespaces: NamespaceManager::new(),
        }
    }

    /// Use `namespaces` to expand compact IRIs
    pub fn namespaces(mut self, namespaces: NamespaceManager) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Declare an additional class for instances of this type
    pub fn also_type(mut self, type_uri: impl Into<String>) -> Self {
        self.types.push(type_uri.into());
        self
    }

    /// Inherit attributes and classes from `parent`
    pub fn extends(mut self, parent: &Arc<RecordType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declare a single-valued attribute
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        predicate: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        self.attributes
            .push((name.into(), predicate.into(), datatype.into(), Cardinality::Single));
        self
    }

    /// Declare a collection-valued attribute
    pub fn collection(
        mut self,
        name: impl Into<String>,
        predicate: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        self.attributes
            .push((name.into(), predicate.into(), datatype.into(), Cardinality::Collection));
        self
    }

    pub fn build(self) -> SchemaResult<Arc<RecordType>> {
        let resolve = |iri: &str| NamedNode::new(self.namespaces.resolve(iri));

        let types = self
            .types
            .iter()
            .map(|t| resolve(t))
            .collect::<RdfResult<Vec<_>>>()?;

        let mut ancestors: IndexSet<NamedNode> = types.iter().cloned().collect();
        let mut attributes = IndexMap::new();
        if let Some(parent) = &self.parent {
            ancestors.extend(parent.ancestor_types().iter().cloned());
            attributes.extend(
                parent
                    .attributes()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }

        let mut own = IndexSet::new();
        for (name, predicate, datatype, cardinality) in &self.attributes {
            if name == ID_ATTRIBUTE {
                return Err(SchemaError::ReservedAttribute(name.clone()));
            }
            if !own.insert(name.clone()) {
                return Err(SchemaError::DuplicateAttribute {
                    record_type: self.name.clone(),
                    attribute: name.clone(),
                });
            }
            let def = AttributeDef {
                name: name.clone(),
                predicate: RdfPredicate::from(resolve(predicate)?),
                datatype: resolve(datatype)?,
                cardinality: *cardinality,
            };
            // Redeclaring an inherited attribute overrides it in place
            attributes.insert(name.clone(), def);
        }

        let base_uri = self.namespaces.resolve(&self.base_uri);
        NamedNode::new(base_uri.as_str())?;

        Ok(Arc::new(RecordType {
            name: self.name,
            types,
            ancestor_types: ancestors.into_iter().collect(),
            parent: self.parent,
            attributes,
            base_uri,
        }))
    }
}
