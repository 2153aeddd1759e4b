//! Query string parsing.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Maximum number of values kept for one repeated key. Later values are
/// dropped.
pub const ARRAY_LIMIT: usize = 40;

/// A query parameter value: a single string, or every value of a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// The key appeared once.
    One(String),
    /// The key appeared several times, or with `[]` array syntax.
    Many(Vec<String>),
}

impl QueryValue {
    /// Returns the first value.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Returns all values in order of appearance.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::One(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Many(vec![first, value]);
            }
            Self::Many(values) => {
                if values.len() < ARRAY_LIMIT {
                    values.push(value);
                }
            }
        }
    }
}

/// Parsed query parameters keyed by name.
pub type Query = BTreeMap<String, QueryValue>;

/// Returns the raw query string of a URL: the text after the first `?` and
/// before any `#`. Empty query strings are treated as absent.
#[must_use]
pub fn query_string(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once('?')?;
    let search = rest.split_once('#').map_or(rest, |(search, _)| search);
    if search.is_empty() {
        None
    } else {
        Some(search)
    }
}

/// Parses the query string of a URL.
///
/// # Example
///
/// ```
/// use oxide_nav_matcher::{parse_query, QueryValue};
///
/// let query = parse_query("/foo?x=1&x=2&y=3#top");
/// assert_eq!(
///     query.get("x"),
///     Some(&QueryValue::Many(vec!["1".to_string(), "2".to_string()]))
/// );
/// assert_eq!(query.get("y"), Some(&QueryValue::One("3".to_string())));
/// ```
#[must_use]
pub fn parse_query(url: &str) -> Query {
    query_string(url).map(parse_query_str).unwrap_or_default()
}

/// Parses a bare query string (without the leading `?`).
///
/// Repeated keys aggregate into [`QueryValue::Many`], as do keys written with
/// a trailing `[]`. Pairs with an empty key are ignored.
#[must_use]
pub fn parse_query_str(search: &str) -> Query {
    let mut query = Query::new();

    for pair in search.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let mut key = decode(raw_key);
        let is_array = key.ends_with("[]");
        if is_array {
            key.truncate(key.len() - 2);
        }
        if key.is_empty() {
            continue;
        }
        let value = decode(raw_value);

        match query.get_mut(&key) {
            Some(existing) => existing.push(value),
            None if is_array => {
                query.insert(key, QueryValue::Many(vec![value]));
            }
            None => {
                query.insert(key, QueryValue::One(value));
            }
        }
    }

    query
}

/// Form-style decoding: `+` is a space, then percent escapes.
fn decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn many(values: &[&str]) -> QueryValue {
        QueryValue::Many(values.iter().map(|v| (*v).to_string()).collect())
    }

    #[test]
    fn test_query_string_extraction() {
        assert_eq!(query_string("/foo?a=1"), Some("a=1"));
        assert_eq!(query_string("/foo?a=1#frag"), Some("a=1"));
        assert_eq!(query_string("/foo?a=1?b=2"), Some("a=1?b=2"));
        assert_eq!(query_string("/foo"), None);
        assert_eq!(query_string("/foo?"), None);
        assert_eq!(query_string("/foo?#frag"), None);
    }

    #[test]
    fn test_repeated_keys_aggregate() {
        let query = parse_query("/foo?x=1&x=2");
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("x"), Some(&many(&["1", "2"])));
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query("/foo").is_empty());
        assert!(parse_query("/foo?").is_empty());
        assert!(parse_query_str("&&").is_empty());
    }

    #[test]
    fn test_decoding() {
        let query = parse_query_str("name=John+Doe&city=New%20York&sum=1%2B1");
        assert_eq!(query.get("name").and_then(QueryValue::first), Some("John Doe"));
        assert_eq!(query.get("city").and_then(QueryValue::first), Some("New York"));
        assert_eq!(query.get("sum").and_then(QueryValue::first), Some("1+1"));
    }

    #[test]
    fn test_key_without_value() {
        let query = parse_query_str("flag&other=");
        assert_eq!(query.get("flag"), Some(&QueryValue::One(String::new())));
        assert_eq!(query.get("other"), Some(&QueryValue::One(String::new())));
    }

    #[test]
    fn test_bracket_keys_are_arrays() {
        let query = parse_query_str("tag[]=a");
        assert_eq!(query.get("tag"), Some(&many(&["a"])));

        let query = parse_query_str("tag[]=a&tag[]=b&tag=c");
        assert_eq!(query.get("tag"), Some(&many(&["a", "b", "c"])));
    }

    #[test]
    fn test_empty_key_ignored() {
        let query = parse_query_str("=1&a=2");
        assert_eq!(query.len(), 1);
        assert!(query.contains_key("a"));
    }

    #[test]
    fn test_array_limit_drops_extra_values() {
        let search = (0..50)
            .map(|i| format!("n={i}"))
            .collect::<Vec<_>>()
            .join("&");
        let query = parse_query_str(&search);
        let values = query.get("n").unwrap().values();
        assert_eq!(values.len(), ARRAY_LIMIT);
        assert_eq!(values.first(), Some(&"0"));
        assert_eq!(values.last(), Some(&"39"));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let query = parse_query("/foo?x=1&x=2&y=3");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"x": ["1", "2"], "y": "3"}));
        let back: Query = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);
    }
}
