//! Record instances
//!
//! A [`Record`] is the in-memory state of one instance of a record type.
//! Records are shared through [`RecordRef`] so they can refer to each other,
//! including in cycles.

use crate::mapping::Value;
use crate::rdf::NamedNode;
use crate::schema::{RecordType, SchemaResult};
use indexmap::{IndexMap, IndexSet};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Lifecycle state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// No subject yet, or nothing stored under it
    New,
    /// Typed statements exist for the subject
    Persisted,
    /// Destroyed; terminal
    Destroyed,
}

/// In-memory record state
#[derive(Debug)]
pub struct Record {
    record_type: Arc<RecordType>,
    subject: Option<NamedNode>,
    attributes: IndexMap<String, Value>,
    changed: IndexSet<String>,
    destroyed: bool,
}

impl Record {
    pub fn new(record_type: Arc<RecordType>) -> Self {
        Self {
            record_type,
            subject: None,
            attributes: IndexMap::new(),
            changed: IndexSet::new(),
            destroyed: false,
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn subject(&self) -> Option<&NamedNode> {
        self.subject.as_ref()
    }

    /// Fragment of the subject URI
    pub fn id(&self) -> Option<&str> {
        self.subject.as_ref().and_then(|s| s.fragment())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set a declared attribute, marking it changed when the value differs
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> SchemaResult<()> {
        self.record_type.attribute(name)?;
        let value = value.into();
        if self.attributes.get(name) != Some(&value) {
            self.attributes.insert(name.to_string(), value);
            self.changed.insert(name.to_string());
        }
        Ok(())
    }

    /// Remove an attribute's value; saving then deletes its statements
    pub fn clear(&mut self, name: &str) -> SchemaResult<()> {
        self.record_type.attribute(name)?;
        if self.attributes.shift_remove(name).is_some() {
            self.changed.insert(name.to_string());
        }
        Ok(())
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// Whether any attribute changed since the last load or save
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }

    pub fn is_attribute_changed(&self, name: &str) -> bool {
        self.changed.contains(name)
    }

    pub fn changed_attributes(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn assign_subject(&mut self, subject: NamedNode) {
        self.subject = Some(subject);
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    pub(crate) fn clear_changes(&mut self) {
        self.changed.clear();
    }

    /// Replace every attribute with freshly read values
    pub(crate) fn load(&mut self, attributes: IndexMap<String, Value>) {
        self.attributes = attributes;
        self.changed.clear();
    }
}

/// Shared, mutable handle to a [`Record`]
///
/// Handles compare equal when they point at the same record or at records
/// with the same subject.
///
/// Handles are reference counted. Records that refer to each other through
/// their attributes (a record naming itself as `friend`, two records listing
/// each other) keep one another alive after every outside handle is dropped.
/// Clear the referencing attribute on one of them, or drop its value, to
/// release the pair.
#[derive(Clone)]
pub struct RecordRef(Rc<RefCell<Record>>);

impl RecordRef {
    /// A new, unsaved record
    pub fn new(record_type: Arc<RecordType>) -> Self {
        Self(Rc::new(RefCell::new(Record::new(record_type))))
    }

    /// A record bound to an existing subject, with no attributes loaded
    pub fn for_subject(record_type: Arc<RecordType>, subject: NamedNode) -> Self {
        let mut record = Record::new(record_type);
        record.assign_subject(subject);
        Self(Rc::new(RefCell::new(record)))
    }

    pub fn borrow(&self) -> Ref<'_, Record> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Record> {
        self.0.borrow_mut()
    }

    pub fn subject(&self) -> Option<NamedNode> {
        self.0.borrow().subject().cloned()
    }

    pub fn id(&self) -> Option<String> {
        self.0.borrow().id().map(str::to_string)
    }

    pub fn record_type(&self) -> Arc<RecordType> {
        Arc::clone(self.0.borrow().record_type())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> SchemaResult<()> {
        let value = value.into();
        self.0.borrow_mut().set(name, value)
    }

    pub fn clear(&self, name: &str) -> SchemaResult<()> {
        self.0.borrow_mut().clear(name)
    }

    pub fn is_changed(&self) -> bool {
        self.0.borrow().is_changed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.borrow().is_destroyed()
    }

    pub fn ptr_eq(&self, other: &RecordRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.0.try_borrow(), other.0.try_borrow()) {
            (Ok(a), Ok(b)) => a.subject.is_some() && a.subject == b.subject,
            _ => false,
        }
    }
}

// Related records may point back at this one; print only the identity.
impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(record) => f
                .debug_struct("RecordRef")
                .field("type", &record.record_type.name())
                .field("subject", &record.subject.as_ref().map(NamedNode::as_str))
                .field("changed", &record.changed.len())
                .finish(),
            Err(_) => f.write_str("RecordRef(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RecordTypeBuilder, SchemaError};

    fn person() -> Arc<RecordType> {
        RecordTypeBuilder::new("Person", "http://example.org/Person", "http://example.org/people")
            .attribute("name", "http://example.org/name", "xsd:string")
            .attribute("friend", "http://example.org/friend", "http://example.org/Person")
            .build()
            .unwrap()
    }

    #[test]
    fn test_dirty_tracking() {
        let record = RecordRef::new(person());
        assert!(!record.is_changed());

        record.set("name", "Ada").unwrap();
        assert!(record.is_changed());
        assert!(record.borrow().is_attribute_changed("name"));

        record.borrow_mut().clear_changes();
        record.set("name", "Ada").unwrap();
        assert!(!record.is_changed());

        record.clear("name").unwrap();
        assert!(record.is_changed());
        assert_eq!(record.get("name"), None);
    }

    #[test]
    fn test_undeclared_attribute() {
        let record = RecordRef::new(person());
        assert!(matches!(
            record.set("age", 3i64),
            Err(SchemaError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_self_reference_debug_and_eq() {
        let record = RecordRef::new(person());
        record.set("friend", record.clone()).unwrap();

        assert_eq!(record.get("friend").unwrap().as_record().unwrap(), &record);
        let debug = format!("{:?}", record);
        assert!(debug.contains("Person"));
    }

    #[test]
    fn test_clearing_reference_releases_cycle() {
        let ada = RecordRef::new(person());
        let bob = RecordRef::new(person());
        ada.set("friend", bob.clone()).unwrap();
        bob.set("friend", ada.clone()).unwrap();
        let weak_ada = Rc::downgrade(&ada.0);
        let weak_bob = Rc::downgrade(&bob.0);

        ada.clear("friend").unwrap();
        drop(ada);
        drop(bob);
        assert!(weak_ada.upgrade().is_none());
        assert!(weak_bob.upgrade().is_none());
    }

    #[test]
    fn test_equality_by_subject() {
        let subject = NamedNode::new("http://example.org/people#ada").unwrap();
        let a = RecordRef::for_subject(person(), subject.clone());
        let b = RecordRef::for_subject(person(), subject);
        assert_eq!(a, b);
        assert_eq!(a.id().as_deref(), Some("ada"));

        assert_ne!(RecordRef::new(person()), RecordRef::new(person()));
    }
}
