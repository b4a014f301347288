//! Recognized option keys, header input forms and request payloads

use crate::error::{HttpError, HttpResult};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Keys accepted in the bulk options map.
///
/// Each key is applied through the builder setter of the same name by
/// `fetch_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Header,
    Url,
    Method,
    ReturnTransfer,
    Content,
    Data,
}

impl OptionKey {
    pub const ALL: [OptionKey; 6] = [
        Self::Header,
        Self::Url,
        Self::Method,
        Self::ReturnTransfer,
        Self::Content,
        Self::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Url => "url",
            Self::Method => "method",
            Self::ReturnTransfer => "return_transfer",
            Self::Content => "content",
            Self::Data => "data",
        }
    }

    /// Resolve an options-map key. Matching is exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

/// Headers as accepted by `set_header`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderInput {
    /// Name/value entries merged one by one
    Fields(Vec<(String, String)>),
    /// A single `"Name: Value"` line
    Line(String),
}

impl HeaderInput {
    /// Flatten into name/value entries, splitting a header line on its first colon.
    pub fn into_entries(self) -> HttpResult<Vec<(String, String)>> {
        match self {
            HeaderInput::Fields(fields) => Ok(fields),
            HeaderInput::Line(line) => {
                let (name, value) = line
                    .split_once(':')
                    .ok_or_else(|| HttpError::config(format!("header {} is invalid data!", line)))?;
                Ok(vec![(name.trim().to_string(), value.trim().to_string())])
            }
        }
    }

    /// Build from an options-map value: an object or a header line.
    pub fn from_value(value: Value) -> HttpResult<Self> {
        match value {
            Value::Object(map) => Ok(HeaderInput::Fields(
                map.into_iter().map(|(k, v)| (k, header_value(v))).collect(),
            )),
            Value::String(line) => Ok(HeaderInput::Line(line)),
            Value::Null => Ok(HeaderInput::Fields(Vec::new())),
            other => Err(HttpError::config(format!(
                "option header expects an object or a string, got {}",
                other
            ))),
        }
    }
}

/// Render a JSON header value as header text
pub(crate) fn header_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<&str> for HeaderInput {
    fn from(line: &str) -> Self {
        HeaderInput::Line(line.to_string())
    }
}

impl From<String> for HeaderInput {
    fn from(line: String) -> Self {
        HeaderInput::Line(line)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for HeaderInput {
    fn from(fields: Vec<(K, V)>) -> Self {
        HeaderInput::Fields(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for HeaderInput {
    fn from(fields: [(K, V); N]) -> Self {
        HeaderInput::Fields(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for HeaderInput {
    fn from(fields: HashMap<K, V>) -> Self {
        HeaderInput::Fields(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for HeaderInput {
    fn from(fields: BTreeMap<K, V>) -> Self {
        HeaderInput::Fields(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Named fields; encodes as a JSON object
    Fields(Map<String, Value>),
    /// Positional values; encodes as a JSON array, keyed by index in a query
    List(Vec<Value>),
    /// Ordered key/value pairs; encodes as a JSON object, duplicates kept in a query
    Pairs(Vec<(String, Value)>),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Fields(Map::new())
    }
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Fields(map) => map.is_empty(),
            Payload::List(items) => items.is_empty(),
            Payload::Pairs(pairs) => pairs.is_empty(),
        }
    }

    /// Top-level entries with their keys, in insertion order.
    pub fn entries(&self) -> Vec<(Cow<'_, str>, &Value)> {
        match self {
            Payload::Fields(map) => map.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v)).collect(),
            Payload::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (Cow::Owned(i.to_string()), v))
                .collect(),
            Payload::Pairs(pairs) => pairs.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v)).collect(),
        }
    }

    /// JSON form of the payload.
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Fields(map) => Value::Object(map.clone()),
            Payload::List(items) => Value::Array(items.clone()),
            Payload::Pairs(pairs) => Value::Object(pairs.iter().cloned().collect()),
        }
    }
}

impl TryFrom<Value> for Payload {
    type Error = HttpError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Payload::Fields(map)),
            Value::Array(items) => Ok(Payload::List(items)),
            Value::Null => Ok(Payload::default()),
            other => Err(HttpError::config(format!(
                "data must be a map or a list, got {}",
                other
            ))),
        }
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Payload::Fields(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Payload {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Payload::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
