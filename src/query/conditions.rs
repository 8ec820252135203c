//! Finder condition sets

use crate::mapping::Value;
use indexmap::IndexMap;

/// Attribute → value constraints for a finder
///
/// Entries are kept in insertion order so compiled queries are stable. A
/// [`Value::List`] requires the subject to match every listed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    entries: IndexMap<String, Value>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, replacing any earlier one on the same attribute
    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(attribute.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(attribute, value);
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.entries.get(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (k, v) in iter {
            conditions.insert(k, v);
        }
        conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let conditions = Conditions::new()
            .with("name", "Ada")
            .with("age", 36i64)
            .with("city", "London");

        let keys: Vec<&str> = conditions.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "age", "city"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let conditions = Conditions::new()
            .with("name", "Ada")
            .with("age", 36i64)
            .with("name", "Grace");

        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions.get("name"), Some(&Value::from("Grace")));
        assert_eq!(conditions.iter().next().map(|(k, _)| k), Some("name"));
    }

    #[test]
    fn test_from_iterator() {
        let conditions: Conditions = vec![("name", "Ada"), ("city", "London")].into_iter().collect();
        assert_eq!(conditions.len(), 2);
        assert!(!conditions.is_empty());
    }
}
