//! XML Schema datatypes with native wrappers

use super::value::{format_double, Value};
use crate::rdf::NamedNode;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use oxrdf::vocab::xsd;
use regex::Regex;
use std::sync::OnceLock;

/// XML Schema datatype understood by the coercion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XsdDatatype {
    String,
    Boolean,
    Integer,
    Int,
    Long,
    Decimal,
    Double,
    Float,
    DateTime,
    Date,
    AnyUri,
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?)0*(\d*)(?:\.(\d*?)0*)?$").expect("valid decimal pattern")
    })
}

fn double_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("valid double pattern")
    })
}

impl XsdDatatype {
    pub const ALL: [XsdDatatype; 11] = [
        XsdDatatype::String,
        XsdDatatype::Boolean,
        XsdDatatype::Integer,
        XsdDatatype::Int,
        XsdDatatype::Long,
        XsdDatatype::Decimal,
        XsdDatatype::Double,
        XsdDatatype::Float,
        XsdDatatype::DateTime,
        XsdDatatype::Date,
        XsdDatatype::AnyUri,
    ];

    pub fn iri(self) -> NamedNode {
        NamedNode::from(match self {
            XsdDatatype::String => xsd::STRING,
            XsdDatatype::Boolean => xsd::BOOLEAN,
            XsdDatatype::Integer => xsd::INTEGER,
            XsdDatatype::Int => xsd::INT,
            XsdDatatype::Long => xsd::LONG,
            XsdDatatype::Decimal => xsd::DECIMAL,
            XsdDatatype::Double => xsd::DOUBLE,
            XsdDatatype::Float => xsd::FLOAT,
            XsdDatatype::DateTime => xsd::DATE_TIME,
            XsdDatatype::Date => xsd::DATE,
            XsdDatatype::AnyUri => xsd::ANY_URI,
        })
    }

    pub fn from_iri(iri: &NamedNode) -> Option<Self> {
        Self::ALL.into_iter().find(|dt| dt.iri() == *iri)
    }

    /// Canonical lexical form of `lexical`, or `None` if it is not in the
    /// datatype's lexical space
    ///
    /// `xsd:string` keeps its whitespace; every other datatype is trimmed.
    pub fn canonicalize(self, lexical: &str) -> Option<String> {
        let raw = lexical;
        let lexical = lexical.trim();
        match self {
            XsdDatatype::String => Some(raw.to_string()),
            XsdDatatype::Boolean => match lexical {
                "true" | "1" => Some("true".to_string()),
                "false" | "0" => Some("false".to_string()),
                _ => None,
            },
            XsdDatatype::Integer | XsdDatatype::Long => {
                lexical.parse::<i64>().ok().map(|i| i.to_string())
            }
            XsdDatatype::Int => lexical.parse::<i32>().ok().map(|i| i.to_string()),
            XsdDatatype::Decimal => canonical_decimal(lexical),
            XsdDatatype::Double => parse_double(lexical).map(format_double),
            XsdDatatype::Float => {
                parse_double(lexical).map(|f| format_double(f64::from(f as f32)))
            }
            XsdDatatype::DateTime => {
                parse_date_time(lexical).map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            XsdDatatype::Date => NaiveDate::parse_from_str(lexical, "%Y-%m-%d")
                .ok()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            XsdDatatype::AnyUri => oxiri::Iri::parse(lexical.to_string())
                .ok()
                .map(|iri| iri.into_inner()),
        }
    }

    /// Native value for a lexical form of this datatype
    pub fn parse(self, lexical: &str) -> Option<Value> {
        let canonical = self.canonicalize(lexical)?;
        Some(match self {
            XsdDatatype::String => Value::String(canonical),
            XsdDatatype::Boolean => Value::Boolean(canonical == "true"),
            XsdDatatype::Integer | XsdDatatype::Int | XsdDatatype::Long => {
                Value::Integer(canonical.parse().ok()?)
            }
            XsdDatatype::Decimal => Value::Decimal(canonical),
            XsdDatatype::Double | XsdDatatype::Float => Value::Double(parse_double(&canonical)?),
            XsdDatatype::DateTime => Value::DateTime(parse_date_time(&canonical)?),
            XsdDatatype::Date => {
                Value::Date(NaiveDate::parse_from_str(&canonical, "%Y-%m-%d").ok()?)
            }
            XsdDatatype::AnyUri => Value::Uri(NamedNode::new(canonical).ok()?),
        })
    }
}

fn canonical_decimal(lexical: &str) -> Option<String> {
    let caps = decimal_pattern().captures(lexical)?;
    let int = caps.get(2).map_or("", |m| m.as_str());
    let frac = caps.get(3).map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() && !lexical.trim_start_matches(['+', '-']).starts_with('0')
    {
        return None;
    }
    let int = if int.is_empty() { "0" } else { int };
    let frac = if frac.is_empty() { "0" } else { frac };
    let sign = match caps.get(1).map(|m| m.as_str()) {
        Some("-") if int != "0" || frac != "0" => "-",
        _ => "",
    };
    Some(format!("{}{}.{}", sign, int, frac))
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ if double_pattern().is_match(lexical) => lexical.parse().ok(),
        _ => None,
    }
}

fn parse_date_time(lexical: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(lexical) {
        return Some(dt);
    }
    // No timezone: read as UTC
    NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_lookup() {
        for dt in XsdDatatype::ALL {
            assert_eq!(XsdDatatype::from_iri(&dt.iri()), Some(dt));
        }
        let other = NamedNode::new("http://example.org/custom").unwrap();
        assert_eq!(XsdDatatype::from_iri(&other), None);
    }

    #[test]
    fn test_string_keeps_whitespace() {
        assert_eq!(XsdDatatype::String.canonicalize("  Ada  "), Some("  Ada  ".to_string()));
        assert_eq!(XsdDatatype::String.parse(" \n"), Some(Value::String(" \n".to_string())));
        assert_eq!(XsdDatatype::Integer.canonicalize(" 42 "), Some("42".to_string()));
    }

    #[test]
    fn test_integer_lexical_space() {
        assert_eq!(XsdDatatype::Integer.canonicalize("+042"), Some("42".to_string()));
        assert_eq!(XsdDatatype::Integer.canonicalize("4.2"), None);
        assert_eq!(XsdDatatype::Integer.canonicalize("Ada"), None);
        assert_eq!(XsdDatatype::Int.canonicalize("3000000000"), None);
        assert_eq!(XsdDatatype::Long.canonicalize("3000000000"), Some("3000000000".to_string()));
    }

    #[test]
    fn test_decimal_canonical_form() {
        assert_eq!(XsdDatatype::Decimal.canonicalize("001.500"), Some("1.5".to_string()));
        assert_eq!(XsdDatatype::Decimal.canonicalize("-.5"), Some("-0.5".to_string()));
        assert_eq!(XsdDatatype::Decimal.canonicalize("7"), Some("7.0".to_string()));
        assert_eq!(XsdDatatype::Decimal.canonicalize("-0.0"), Some("0.0".to_string()));
        assert_eq!(XsdDatatype::Decimal.canonicalize("1e3"), None);
        assert_eq!(XsdDatatype::Decimal.canonicalize("."), None);
    }

    #[test]
    fn test_double() {
        assert_eq!(XsdDatatype::Double.parse("1.5e2"), Some(Value::Double(150.0)));
        assert_eq!(XsdDatatype::Double.canonicalize("INF"), Some("INF".to_string()));
        assert_eq!(XsdDatatype::Double.canonicalize("inf"), None);
        assert_eq!(XsdDatatype::Float.canonicalize("0.5"), Some("0.5".to_string()));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(XsdDatatype::Boolean.parse("1"), Some(Value::Boolean(true)));
        assert_eq!(XsdDatatype::Boolean.parse("false"), Some(Value::Boolean(false)));
        assert_eq!(XsdDatatype::Boolean.parse("yes"), None);
    }

    #[test]
    fn test_dates() {
        let value = XsdDatatype::DateTime.parse("2024-01-02T03:04:05Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-01-02T03:04:05+00:00").unwrap();
        assert_eq!(value, Value::DateTime(expected));

        assert_eq!(
            XsdDatatype::DateTime.canonicalize("2024-01-02T03:04:05"),
            Some("2024-01-02T03:04:05Z".to_string())
        );
        assert_eq!(
            XsdDatatype::Date.parse("1815-12-10"),
            Some(Value::Date(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()))
        );
        assert_eq!(XsdDatatype::Date.parse("1815-13-10"), None);
    }

    #[test]
    fn test_any_uri() {
        let value = XsdDatatype::AnyUri.parse("http://example.org/a").unwrap();
        assert_eq!(value, Value::Uri(NamedNode::new("http://example.org/a").unwrap()));
        assert_eq!(XsdDatatype::AnyUri.canonicalize("not a uri"), None);
    }
}
