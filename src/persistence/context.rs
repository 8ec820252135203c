//! Save context threaded through cascading saves

use crate::rdf::NamedNode;

/// Subjects whose saves are in progress, outermost first
///
/// A related record whose subject is already on the chain is not saved
/// again, which is what stops reference cycles from recursing forever.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveContext {
    chain: Vec<NamedNode>,
}

impl SaveContext {
    /// Context for a top-level save
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for saves nested under `subject`
    pub fn enter(&self, subject: NamedNode) -> Self {
        let mut chain = self.chain.clone();
        chain.push(subject);
        Self { chain }
    }

    /// Subject of the save that triggered this one
    pub fn parent_subject(&self) -> Option<&NamedNode> {
        self.chain.last()
    }

    pub fn contains(&self, subject: &NamedNode) -> bool {
        self.chain.contains(subject)
    }

    pub fn depth(&self) -> usize {
        self.chain.len()
    }
}
