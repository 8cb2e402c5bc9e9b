//! Per-request argument values

use std::collections::HashMap;

use async_graphql::Value;
use async_graphql::dynamic::ObjectAccessor;

/// Argument values supplied with one field resolution.
///
/// Keys are stored lower-cased, so lookups ignore the case the client
/// used. Explicit `null` values are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestArguments {
    values: HashMap<String, Value>,
}

impl RequestArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the arguments of a resolver context.
    pub fn from_accessor(args: &ObjectAccessor<'_>) -> Self {
        args.iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_value().clone()))
            .collect()
    }

    /// Insert a value, replacing one already present under any casing of `name`.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(normalize(name.as_ref()), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(lower-cased name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for RequestArguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Self::new();
        for (name, value) in iter {
            arguments.insert(name, value);
        }
        arguments
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let arguments: RequestArguments = [("RoomNumber", Value::from(42))].into_iter().collect();

        assert_eq!(arguments.get("roomnumber"), Some(&Value::from(42)));
        assert_eq!(arguments.get("ROOMNUMBER"), Some(&Value::from(42)));
        assert!(arguments.contains("RoomNumber"));
        assert!(!arguments.contains("Room"));
    }

    #[test]
    fn test_insert_replaces_other_casing() {
        let mut arguments = RequestArguments::new();
        arguments.insert("Page", 1);
        let previous = arguments.insert("PAGE", 2);

        assert_eq!(previous, Some(Value::from(1)));
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments.get("page"), Some(&Value::from(2)));
    }

    #[test]
    fn test_null_values_are_kept() {
        let arguments: RequestArguments = [("OrderBy", Value::Null)].into_iter().collect();
        assert!(arguments.contains("OrderBy"));
        assert_eq!(arguments.get("orderby"), Some(&Value::Null));
    }
}
