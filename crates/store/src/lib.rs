//! Document store used by the booking backend.
//! - Schemaless JSON documents grouped into named collections.
//! - `DocumentStore` is the seam handlers depend on; the file-backed and
//!   in-memory implementations are interchangeable.

pub mod document;
pub mod errors;
pub mod json_store;
pub mod store;

pub use document::{eq_filter, DeleteResult, Document, DocumentId, InsertResult, UpdateResult};
pub use errors::StoreError;
pub use json_store::JsonDocumentStore;
pub use store::memory::MemoryDocumentStore;
pub use store::{DocumentStore, BOOKINGS, SERVICES};
