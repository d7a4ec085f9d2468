use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::document::{
    matches_filter, DeleteResult, Document, DocumentId, InsertResult, UpdateResult,
};
use crate::errors::StoreError;
use crate::store::DocumentStore;

type Collections = HashMap<String, HashMap<DocumentId, Document>>;

/// JSON file-backed document store.
///
/// Persists every collection to a single JSON file and rewrites it on each
/// mutation. Intended for lightweight deployments where a database server is
/// overkill; the services collection can be pre-seeded by editing the file.
pub struct JsonDocumentStore {
    inner: Arc<RwLock<Collections>>,
    file_path: PathBuf,
}

impl JsonDocumentStore {
    /// Initialize the store from a path. Creates the file with an empty
    /// collection map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let collections: Collections = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty = Collections::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| StoreError::Serde(e.to_string()))?,
                )
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(collections)), file_path }))
    }

    async fn save(&self) -> Result<(), StoreError> {
        let collections = self.inner.read().await;
        let data =
            serde_json::to_vec(&*collections).map_err(|e| StoreError::Serde(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, StoreError> {
        let collections = self.inner.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values().filter(|doc| matches_filter(doc, filter)).cloned().collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.inner.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut doc: Document,
    ) -> Result<InsertResult, StoreError> {
        let id = DocumentId::new();
        doc.insert("_id".to_string(), serde_json::Value::String(id.to_string()));
        let mut collections = self.inner.write().await;
        collections.entry(collection.to_string()).or_default().insert(id, doc);
        drop(collections);
        self.save().await?;
        Ok(InsertResult { acknowledged: true, inserted_id: id })
    }

    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        set: Document,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.inner.write().await;
        let result = match collections.get_mut(collection).and_then(|docs| docs.get_mut(&id)) {
            Some(doc) => {
                let mut modified = 0;
                for (field, value) in set {
                    if doc.get(&field) != Some(&value) {
                        doc.insert(field, value);
                        modified = 1;
                    }
                }
                UpdateResult { acknowledged: true, matched_count: 1, modified_count: modified }
            }
            None => UpdateResult { acknowledged: true, matched_count: 0, modified_count: 0 },
        };
        drop(collections);
        if result.modified_count > 0 {
            self.save().await?;
        }
        Ok(result)
    }

    async fn delete_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<DeleteResult, StoreError> {
        let mut collections = self.inner.write().await;
        let existed = collections
            .get_mut(collection)
            .map(|docs| docs.remove(&id).is_some())
            .unwrap_or(false);
        drop(collections);
        if existed {
            self.save().await?;
        }
        Ok(DeleteResult { acknowledged: true, deleted_count: existed as u64 })
    }
}
