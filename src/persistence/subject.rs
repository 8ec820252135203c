//! Subject fragment generation for new records

use crate::schema::RecordType;
use uuid::Uuid;

/// Produces the fragment of a new record's subject URI
pub trait SubjectGenerator {
    fn generate(&mut self, record_type: &RecordType) -> String;
}

/// Random UUID v4 fragments, optionally prefixed
#[derive(Debug, Clone, Default)]
pub struct UuidSubjectGenerator {
    prefix: Option<String>,
}

impl UuidSubjectGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: Option<String>) -> Self {
        Self { prefix }
    }
}

impl SubjectGenerator for UuidSubjectGenerator {
    fn generate(&mut self, _record_type: &RecordType) -> String {
        format!(
            "{}{}",
            self.prefix.as_deref().unwrap_or(""),
            Uuid::new_v4()
        )
    }
}

/// `<type-name-lowercase>-<n>` fragments counting up from 1
#[derive(Debug, Clone, Default)]
pub struct SequentialSubjectGenerator {
    next: u64,
}

impl SequentialSubjectGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubjectGenerator for SequentialSubjectGenerator {
    fn generate(&mut self, record_type: &RecordType) -> String {
        self.next += 1;
        format!("{}-{}", record_type.name().to_lowercase(), self.next)
    }
}
