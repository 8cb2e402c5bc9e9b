//! Parameter values bound out-of-band from filter expressions

use std::fmt;

use async_graphql::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::QueryError;

/// A value bound to a filter parameter (`@0`, `@1`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Convert a request argument value.
    ///
    /// Enum values become strings. Input objects and binary values cannot be
    /// compared against an entity member and are rejected.
    pub fn from_graphql(argument: &str, value: &Value) -> Result<Self, QueryError> {
        match value {
            Value::Null => Ok(QueryValue::Null),
            Value::Boolean(b) => Ok(QueryValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(QueryValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(QueryValue::Float(f))
                } else {
                    Err(unsupported(argument, "number out of range"))
                }
            }
            Value::String(s) => Ok(QueryValue::String(s.clone())),
            Value::Enum(name) => Ok(QueryValue::String(name.to_string())),
            Value::List(items) => items
                .iter()
                .map(|item| Self::from_graphql(argument, item))
                .collect::<Result<Vec<_>, _>>()
                .map(QueryValue::List),
            Value::Object(_) => Err(unsupported(argument, "input objects cannot be compared")),
            Value::Binary(_) => Err(unsupported(argument, "binary values cannot be compared")),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, QueryValue::DateTime(_))
    }

    /// Bind this value to a SQLite query.
    #[cfg(feature = "sqlite")]
    pub fn bind_to_query<'q>(
        &'q self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            QueryValue::Null => query.bind(None::<String>),
            QueryValue::Bool(b) => query.bind(if *b { 1i32 } else { 0i32 }),
            QueryValue::Int(i) => query.bind(*i),
            QueryValue::Float(f) => query.bind(*f),
            QueryValue::String(s) => query.bind(s.as_str()),
            QueryValue::DateTime(dt) => query.bind(dt.format(SQLITE_DATETIME_FORMAT).to_string()),
            // Compared against the minified JSON text sqlite returns for arrays
            QueryValue::List(_) => query.bind(self.to_json().to_string()),
        }
    }

    /// JSON form of this value, as stored in serialized entities.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            QueryValue::Null => serde_json::Value::Null,
            QueryValue::Bool(b) => serde_json::Value::Bool(*b),
            QueryValue::Int(i) => serde_json::Value::from(*i),
            QueryValue::Float(f) => serde_json::Value::from(*f),
            QueryValue::String(s) => serde_json::Value::String(s.clone()),
            QueryValue::DateTime(dt) => serde_json::Value::String(dt.format(ISO_DATETIME_FORMAT).to_string()),
            QueryValue::List(items) => items.iter().map(QueryValue::to_json).collect(),
        }
    }
}

#[cfg(feature = "sqlite")]
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => f.write_str("null"),
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::Int(i) => write!(f, "{i}"),
            QueryValue::Float(v) => write!(f, "{v}"),
            QueryValue::String(s) => write!(f, "{s:?}"),
            QueryValue::DateTime(dt) => write!(f, "{}", dt.format(ISO_DATETIME_FORMAT)),
            QueryValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Parse an ISO date (`2019-02-03`), a naive date-time or an RFC 3339
/// timestamp. Timestamps with an offset are converted to UTC.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
}

fn unsupported(argument: &str, reason: &str) -> QueryError {
    QueryError::UnsupportedValue {
        argument: argument.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_graphql::Name;

    #[test]
    fn test_from_graphql_scalars() {
        assert_eq!(QueryValue::from_graphql("Id", &Value::from(42)).unwrap(), QueryValue::Int(42));
        assert_eq!(
            QueryValue::from_graphql("Name", &Value::from("Suite")).unwrap(),
            QueryValue::String("Suite".into())
        );
        assert_eq!(
            QueryValue::from_graphql("AllowedSmoking", &Value::from(true)).unwrap(),
            QueryValue::Bool(true)
        );
        assert_eq!(
            QueryValue::from_graphql("Status", &Value::Enum(Name::new("Available"))).unwrap(),
            QueryValue::String("Available".into())
        );
    }

    #[test]
    fn test_from_graphql_rejects_objects() {
        let value = Value::from_json(serde_json::json!({ "Id": 1 })).unwrap();
        assert_matches!(
            QueryValue::from_graphql("Guest", &value),
            Err(QueryError::UnsupportedValue { argument, .. }) if argument == "Guest"
        );
    }

    #[test]
    fn test_parse_datetime_formats() {
        let midnight = NaiveDate::from_ymd_opt(2019, 2, 3).unwrap().and_hms_opt(0, 0, 0).unwrap();

        assert_eq!(parse_datetime("2019-02-03"), Some(midnight));
        assert_eq!(parse_datetime("2019-02-03T00:00:00"), Some(midnight));
        assert_eq!(parse_datetime("2019-02-03 00:00:00"), Some(midnight));
        assert_eq!(parse_datetime("2019-02-03T01:00:00+01:00"), Some(midnight));
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[test]
    fn test_display_quotes_strings() {
        let value = QueryValue::List(vec![QueryValue::Int(1), QueryValue::String("a".into())]);
        assert_eq!(value.to_string(), r#"[1, "a"]"#);
    }
}
