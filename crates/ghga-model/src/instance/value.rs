//! Typed field values.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::relationship::RelationshipValue;

/// Date-times with an offset that RFC 3339 refuses (`+0200`, no seconds).
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// An ISO-8601 point in time. Values without an offset are taken as UTC;
/// plain dates are taken as midnight UTC.
///
/// Accepted forms are RFC 3339, extended date-times with an offset written
/// with or without a colon and with or without seconds, the same without
/// an offset (`T` or space separated), and calendar dates. Week dates,
/// ordinal dates and the basic format (`20210304T1011`) are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Parse an ISO-8601 date or date-time.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self(dt));
        }

        for format in OFFSET_DATE_TIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(value, format) {
                return Some(Self(dt));
            }
        }

        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Some(Self(naive.and_utc().fixed_offset()));
            }
        }

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc().fixed_offset()))
    }

    /// The underlying date-time.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// An embedded value object.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Value object type name.
    pub object: String,
    /// Validated fields, in schema order.
    pub fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Render the record in wire form.
    pub fn to_raw(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Timestamp(Timestamp),
    /// A member of the field's enumeration.
    Enumeration(String),
    /// A list of scalar values.
    List(Vec<FieldValue>),
    Record(Record),
    Records(Vec<Record>),
    Relationship(RelationshipValue),
    Relationships(Vec<RelationshipValue>),
}

impl FieldValue {
    /// Borrow a string or enumeration value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Enumeration(s) => Some(s),
            _ => None,
        }
    }

    /// Get an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get a timestamp value.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Iterate over the relationship values held by this field, if any.
    pub fn relationships(&self) -> &[RelationshipValue] {
        match self {
            FieldValue::Relationship(value) => std::slice::from_ref(value),
            FieldValue::Relationships(values) => values,
            _ => &[],
        }
    }

    /// Render the value in wire form.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) | FieldValue::Enumeration(s) => Value::String(s.clone()),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Timestamp(ts) => Value::String(ts.to_string()),
            FieldValue::List(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            FieldValue::Record(record) => Value::Object(record.to_raw()),
            FieldValue::Records(records) => Value::Array(
                records
                    .iter()
                    .map(|r| Value::Object(r.to_raw()))
                    .collect(),
            ),
            FieldValue::Relationship(value) => value.to_json(),
            FieldValue::Relationships(values) => {
                Value::Array(values.iter().map(RelationshipValue::to_json).collect())
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let ts = Timestamp::parse("2021-03-04T10:11:12+02:00").unwrap();
        assert_eq!(ts.to_string(), "2021-03-04T10:11:12+02:00");
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = Timestamp::parse("2021-03-04T10:11:12").unwrap();
        assert_eq!(ts.to_string(), "2021-03-04T10:11:12Z");

        let spaced = Timestamp::parse("2021-03-04 10:11:12.5").unwrap();
        assert_eq!(spaced.to_string(), "2021-03-04T10:11:12.500Z");
    }

    #[test]
    fn test_parse_without_seconds_or_offset_colon() {
        let ts = Timestamp::parse("2021-03-04T10:11").unwrap();
        assert_eq!(ts.to_string(), "2021-03-04T10:11:00Z");

        let ts = Timestamp::parse("2021-03-04T10:11:12+0200").unwrap();
        assert_eq!(ts.to_string(), "2021-03-04T10:11:12+02:00");

        let ts = Timestamp::parse("2021-03-04T10:11-0130").unwrap();
        assert_eq!(ts.to_string(), "2021-03-04T10:11:00-01:30");
    }

    #[test]
    fn test_parse_date_only() {
        let ts = Timestamp::parse("2021-03-04").unwrap();
        assert_eq!(ts.to_string(), "2021-03-04T00:00:00Z");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_none());
        assert!(Timestamp::parse("2021-13-01").is_none());
        assert!(Timestamp::parse("").is_none());
    }

    #[test]
    fn test_ordering_across_offsets() {
        let utc = Timestamp::parse("2021-01-01T10:00:00Z").unwrap();
        let plus_two = Timestamp::parse("2021-01-01T11:00:00+02:00").unwrap();
        assert!(plus_two < utc);
    }

    #[test]
    fn test_rendering_is_reparseable() {
        let ts = Timestamp::parse("2020-02-29").unwrap();
        assert_eq!(Timestamp::parse(&ts.to_string()), Some(ts));
    }

    #[test]
    fn test_to_json() {
        let value = FieldValue::List(vec![
            FieldValue::String("a".into()),
            FieldValue::Integer(3),
        ]);
        assert_eq!(value.to_json(), serde_json::json!(["a", 3]));
    }
}
