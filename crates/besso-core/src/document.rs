//! Document model shared by every store backend.
//!
//! Paths alternate collection and document segments
//! (`CheckInCheckOut/B42/cleaning/outCheckList`), the same layout the
//! remote document database uses.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::BessoError;

/// Named fields of a single document.
pub type Fields = BTreeMap<String, FieldValue>;

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Convert a plain JSON scalar. Arrays and objects are not representable.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(b) => Some(Self::Boolean(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Double),
            },
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

/// Location of a document: an even number of non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// A top-level document `collection/id`.
    pub fn new(collection: &str, id: &str) -> Self {
        Self {
            segments: vec![collection.to_string(), id.to_string()],
        }
    }

    /// A document in a sub-collection of this one.
    pub fn child(&self, collection: &str, id: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(collection.to_string());
        segments.push(id.to_string());
        Self { segments }
    }

    /// Parse a slash-separated path.
    pub fn parse(path: &str) -> Result<Self, BessoError> {
        let segments: Vec<String> = path.trim_matches('/').split('/').map(String::from).collect();
        if segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty()) {
            return Err(BessoError::Store(format!("invalid document path '{path}'")));
        }
        Ok(Self { segments })
    }

    /// The document id (last segment).
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The collection holding this document.
    pub fn collection(&self) -> &str {
        let n = self.segments.len();
        if n < 2 {
            return "";
        }
        &self.segments[n - 2]
    }

    /// Raw segments, collection and document ids alternating.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Whether this document sits directly in a root collection.
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 2
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// A document read back from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub path: DocumentPath,
    pub fields: Fields,
}

impl DocumentSnapshot {
    pub fn id(&self) -> &str {
        self.path.id()
    }
}
