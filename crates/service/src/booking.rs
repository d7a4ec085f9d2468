use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use store::{
    eq_filter, DeleteResult, Document, DocumentId, DocumentStore, InsertResult, UpdateResult,
    BOOKINGS,
};

use crate::errors::ServiceError;

/// CRUD over the bookings collection. Payloads stay loosely typed; only the
/// fields the contract depends on get explicit validated extraction.
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Bookings for one customer when an email is given, the whole
    /// collection otherwise. Zero matches is an empty list, never an error.
    pub async fn list(&self, customer_email: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        let filter = match customer_email {
            Some(email) => eq_filter("customer_email", email),
            None => Document::new(),
        };
        Ok(self.store.find(BOOKINGS, &filter).await?)
    }

    pub async fn get(&self, id: DocumentId) -> Result<Option<Document>, ServiceError> {
        Ok(self.store.find_one(BOOKINGS, id).await?)
    }

    /// Insert the checkout payload verbatim as a new booking document.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: Value) -> Result<InsertResult, ServiceError> {
        let doc = payload
            .as_object()
            .cloned()
            .ok_or_else(|| ServiceError::Validation("booking payload must be a JSON object".into()))?;
        let result = self.store.insert_one(BOOKINGS, doc).await?;
        info!(booking_id = %result.inserted_id, "booking_created");
        Ok(result)
    }

    /// Set only the `status` field from the payload, ignoring everything
    /// else it carries. Any string is a valid status; the absence of the
    /// field is the one thing rejected.
    #[instrument(skip(self, payload), fields(booking_id = %id))]
    pub async fn update_status(
        &self,
        id: DocumentId,
        payload: &Value,
    ) -> Result<UpdateResult, ServiceError> {
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::Validation("payload must carry a string `status` field".into()))?;
        let result = self
            .store
            .update_one(BOOKINGS, id, eq_filter("status", status))
            .await?;
        info!(matched = result.matched_count, modified = result.modified_count, "booking_status_updated");
        Ok(result)
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn delete(&self, id: DocumentId) -> Result<DeleteResult, ServiceError> {
        let result = self.store.delete_one(BOOKINGS, id).await?;
        info!(deleted = result.deleted_count, "booking_deleted");
        Ok(result)
    }
}
