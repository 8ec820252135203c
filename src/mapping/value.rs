//! Native attribute values
//!
//! Records hold their attributes as [`Value`]s. Literal-like variants carry a
//! natural XML Schema datatype; URIs and related records are stored as
//! resource nodes instead.

use super::datatype::XsdDatatype;
use crate::persistence::RecordRef;
use crate::rdf::{Literal, NamedNode};
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use std::fmt;

/// Attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    /// Canonical decimal lexical form
    Decimal(String),
    Double(f64),
    Boolean(bool),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Uri(NamedNode),
    /// Literal of a datatype with no native wrapper
    Literal(Literal),
    /// Related record
    Record(RecordRef),
    /// Collection attribute contents
    List(Vec<Value>),
}

impl Value {
    /// Empty strings and empty lists are skipped on a record's first save
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&NamedNode> {
        match self {
            Value::Uri(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The XML Schema datatype this value maps to without conversion
    pub fn natural_datatype(&self) -> Option<NamedNode> {
        let xsd = match self {
            Value::String(_) => XsdDatatype::String,
            Value::Integer(_) => XsdDatatype::Integer,
            Value::Decimal(_) => XsdDatatype::Decimal,
            Value::Double(_) => XsdDatatype::Double,
            Value::Boolean(_) => XsdDatatype::Boolean,
            Value::DateTime(_) => XsdDatatype::DateTime,
            Value::Date(_) => XsdDatatype::Date,
            Value::Literal(l) => return Some(l.datatype()),
            Value::Uri(_) | Value::Record(_) | Value::List(_) => return None,
        };
        Some(xsd.iri())
    }

    /// String form used when reparsing against another datatype
    pub fn lexical_form(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Decimal(d) => Some(d.clone()),
            Value::Double(f) => Some(format_double(*f)),
            Value::Boolean(b) => Some(b.to_string()),
            Value::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::Uri(n) => Some(n.as_str().to_string()),
            Value::Literal(l) => Some(l.value().to_string()),
            Value::Record(_) | Value::List(_) => None,
        }
    }

    /// Typed literal in the value's natural datatype
    pub fn natural_literal(&self) -> Option<Literal> {
        if let Value::Literal(l) = self {
            return Some(l.clone());
        }
        Some(Literal::new_typed_literal(
            self.lexical_form()?,
            self.natural_datatype()?,
        ))
    }
}

/// Shortest lexical form that parses back to the same double
pub(crate) fn format_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "INF".to_string()
    } else if f == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{:?}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Uri(n) => write!(f, "{}", n),
            Value::Record(r) => match r.subject() {
                Some(subject) => write!(f, "{}", subject),
                None => write!(f, "<new {}>", r.record_type().name()),
            },
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            other => match other.lexical_form() {
                Some(lexical) => write!(f, "{}", lexical),
                None => Ok(()),
            },
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.into())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NamedNode> for Value {
    fn from(n: NamedNode) -> Self {
        Value::Uri(n)
    }
}

impl From<Literal> for Value {
    fn from(l: Literal) -> Self {
        Value::Literal(l)
    }
}

impl From<RecordRef> for Value {
    fn from(r: RecordRef) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::XSD_NS;

    #[test]
    fn test_blank_values() {
        assert!(Value::from("").is_blank());
        assert!(Value::from("  ").is_blank());
        assert!(Value::List(vec![]).is_blank());
        assert!(!Value::from("Ada").is_blank());
        assert!(!Value::from(0i64).is_blank());
        assert!(!Value::from(vec![""]).is_blank());
    }

    #[test]
    fn test_natural_literal() {
        let lit = Value::from(42i64).natural_literal().unwrap();
        assert_eq!(lit.value(), "42");
        assert_eq!(lit.datatype().as_str(), format!("{}integer", XSD_NS));

        let lit = Value::from("Ada").natural_literal().unwrap();
        assert_eq!(lit, Literal::new_simple_literal("Ada"));

        let uri = NamedNode::new("http://example.org/a").unwrap();
        assert!(Value::from(uri).natural_literal().is_none());
    }

    #[test]
    fn test_lexical_forms() {
        assert_eq!(Value::from(1.5).lexical_form().unwrap(), "1.5");
        assert_eq!(Value::from(2.0).lexical_form().unwrap(), "2.0");
        assert_eq!(Value::from(f64::INFINITY).lexical_form().unwrap(), "INF");
        assert_eq!(Value::from(true).lexical_form().unwrap(), "true");

        let date = NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
        assert_eq!(Value::from(date).lexical_form().unwrap(), "1815-12-10");

        let dt = DateTime::parse_from_rfc3339("2024-01-02T03:04:05+02:00").unwrap();
        assert_eq!(
            Value::from(dt).lexical_form().unwrap(),
            "2024-01-02T03:04:05+02:00"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("Ada").to_string(), "\"Ada\"");
        assert_eq!(Value::from(vec![1i64, 2]).to_string(), "[1, 2]");
    }
}
