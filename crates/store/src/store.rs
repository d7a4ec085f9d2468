use async_trait::async_trait;

use crate::document::{DeleteResult, Document, DocumentId, InsertResult, UpdateResult};
use crate::errors::StoreError;

pub const SERVICES: &str = "services";
pub const BOOKINGS: &str = "bookings";

/// Store abstraction handlers depend on, so tests can substitute an
/// in-memory implementation for the file-backed one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents matching a top-level equality filter; empty filter
    /// returns the whole collection.
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert the document verbatim under a freshly generated id. The stored
    /// copy gets an `_id` field so reads round-trip the identifier.
    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
    ) -> Result<InsertResult, StoreError>;

    /// Set the given fields on one document. `modified_count` is zero when
    /// the set is a no-op, so repeating an identical update is idempotent.
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        set: Document,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<DeleteResult, StoreError>;
}

/// Simple in-memory store for tests and doc examples.
pub mod memory {
    use super::*;
    use crate::document::matches_filter;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryDocumentStore {
        collections: Mutex<HashMap<String, HashMap<DocumentId, Document>>>,
    }

    impl MemoryDocumentStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryDocumentStore {
        async fn find(
            &self,
            collection: &str,
            filter: &Document,
        ) -> Result<Vec<Document>, StoreError> {
            let collections = self.collections.lock().unwrap();
            Ok(collections
                .get(collection)
                .map(|docs| {
                    docs.values()
                        .filter(|doc| matches_filter(doc, filter))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn find_one(
            &self,
            collection: &str,
            id: DocumentId,
        ) -> Result<Option<Document>, StoreError> {
            let collections = self.collections.lock().unwrap();
            Ok(collections.get(collection).and_then(|docs| docs.get(&id)).cloned())
        }

        async fn insert_one(
            &self,
            collection: &str,
            mut doc: Document,
        ) -> Result<InsertResult, StoreError> {
            let id = DocumentId::new();
            doc.insert("_id".to_string(), serde_json::Value::String(id.to_string()));
            let mut collections = self.collections.lock().unwrap();
            collections.entry(collection.to_string()).or_default().insert(id, doc);
            Ok(InsertResult { acknowledged: true, inserted_id: id })
        }

        async fn update_one(
            &self,
            collection: &str,
            id: DocumentId,
            set: Document,
        ) -> Result<UpdateResult, StoreError> {
            let mut collections = self.collections.lock().unwrap();
            let doc = collections.get_mut(collection).and_then(|docs| docs.get_mut(&id));
            match doc {
                Some(doc) => {
                    let mut modified = 0;
                    for (field, value) in set {
                        if doc.get(&field) != Some(&value) {
                            doc.insert(field, value);
                            modified = 1;
                        }
                    }
                    Ok(UpdateResult { acknowledged: true, matched_count: 1, modified_count: modified })
                }
                None => Ok(UpdateResult { acknowledged: true, matched_count: 0, modified_count: 0 }),
            }
        }

        async fn delete_one(
            &self,
            collection: &str,
            id: DocumentId,
        ) -> Result<DeleteResult, StoreError> {
            let mut collections = self.collections.lock().unwrap();
            let existed = collections
                .get_mut(collection)
                .map(|docs| docs.remove(&id).is_some())
                .unwrap_or(false);
            Ok(DeleteResult { acknowledged: true, deleted_count: existed as u64 })
        }
    }
}
