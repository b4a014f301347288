//! Content-type table and payload encodings

use crate::error::{HttpError, HttpResult};
use std::fmt;
use std::str::FromStr;

/// How the payload is attached to the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Serialized as a JSON request body
    Json,
    /// Form-encoded and appended to the URL query string
    Query,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "query" => Ok(Self::Query),
            _ => Err(HttpError::config(format!("type {} not allowed!", s))),
        }
    }
}

/// One row of the content-type table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentType {
    /// Tag accepted by `set_content`
    pub tag: &'static str,
    /// Value sent in the `Content-Type` header
    pub mime: &'static str,
    /// Encoding forced onto the payload, if any
    pub data_type: Option<DataType>,
}

/// Content tags the builder accepts.
pub const CONTENT_TYPES: &[ContentType] = &[ContentType {
    tag: "json",
    mime: "application/json",
    data_type: Some(DataType::Json),
}];

/// Tag used when none is configured.
pub const DEFAULT_CONTENT: &str = "json";

/// Look up a content tag (exact match).
pub fn lookup(tag: &str) -> Option<&'static ContentType> {
    CONTENT_TYPES.iter().find(|c| c.tag == tag)
}

/// Look up a content tag, failing with `InvalidConfig` when absent.
pub fn resolve(tag: &str) -> HttpResult<&'static ContentType> {
    lookup(tag).ok_or_else(|| HttpError::config(format!("content {} not allowed type!", tag)))
}
