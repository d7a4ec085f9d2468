use std::sync::Arc;

use store::{Document, DocumentId, DocumentStore, SERVICES};

use crate::errors::ServiceError;

/// Fields exposed to the payment-adjacent checkout view. The one deliberate
/// shaping rule in the system: internal service fields never leak there.
pub const CHECKOUT_FIELDS: [&str; 4] = ["title", "price", "service_id", "img"];

/// Read-only access to the services collection; documents are pre-seeded
/// externally.
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_services(&self) -> Result<Vec<Document>, ServiceError> {
        Ok(self.store.find(SERVICES, &Document::new()).await?)
    }

    pub async fn get_service(&self, id: DocumentId) -> Result<Option<Document>, ServiceError> {
        Ok(self.store.find_one(SERVICES, id).await?)
    }

    /// Checkout projection: same lookup as `get_service`, restricted to
    /// `CHECKOUT_FIELDS`.
    pub async fn checkout_view(&self, id: DocumentId) -> Result<Option<Document>, ServiceError> {
        let doc = self.store.find_one(SERVICES, id).await?;
        Ok(doc.map(|doc| {
            let mut projected = Document::new();
            for field in CHECKOUT_FIELDS {
                if let Some(value) = doc.get(field) {
                    projected.insert(field.to_string(), value.clone());
                }
            }
            projected
        }))
    }
}
