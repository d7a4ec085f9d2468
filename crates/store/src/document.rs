use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::StoreError;

/// Schemaless document: a plain JSON object, passed through unvalidated.
pub type Document = serde_json::Map<String, Value>;

/// Opaque document identifier. Rendered as the hyphenated UUID string, which
/// is also how it appears in the injected `_id` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form; malformed input is a client error,
    /// never a panic.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(raw.to_string()))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Insert acknowledgment, mirroring the shape clients expect from a
/// document-store driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Top-level field equality match; an empty filter matches every document.
pub fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, expected)| doc.get(field) == Some(expected))
}

/// Convenience constructor for single-field equality filters.
pub fn eq_filter(field: &str, value: impl Into<Value>) -> Document {
    let mut filter = Document::new();
    filter.insert(field.to_string(), value.into());
    filter
}
